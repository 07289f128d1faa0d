//! Handle registry
//!
//! Resolves `(peripheral class, handle)` pairs to the descriptors of the
//! registered board.

pub mod table;

pub use table::HandleRegistry;
