//! Board configuration
//!
//! The static per-board mapping from peripheral handles to descriptors,
//! plus the LED wiring the system setters need.

pub mod board;

pub use board::*;
