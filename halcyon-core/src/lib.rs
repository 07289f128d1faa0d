//! Board-agnostic core of the Halcyon HAL boundary
//!
//! This crate contains the logic that sits between application code and
//! the chip ports:
//!
//! - Board configuration tables
//! - Handle registry (handle -> peripheral descriptor resolution)
//! - Power manager (idle sleep, deep-sleep standby, wake scheduling)
//! - Boot mode arbiter (normal, manufacturing, ATE, bootloader)
//! - [`System`], the single context object tying them together
//!
//! Boot order: [`System::boot`] registers the board table, then decides the
//! boot mode, and only activates the power manager for a normal boot.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go first so the logging macros are visible to every module.
mod fmt;

pub mod boot;
pub mod config;
pub mod error;
pub mod power;
pub mod registry;
pub mod system;

#[cfg(test)]
mod testing;

pub use boot::{BootArbiter, BootMode, BootRecord, BootSignals, FlashBootSignals};
pub use config::{BoardConfig, BoardEntry, LedConfig};
pub use error::{HalError, PowerError};
pub use power::{
    IdleOutcome, PowerManager, PowerState, SchedulerStatus, StandbyOutcome, WakeRequest,
    WakeSource,
};
pub use registry::HandleRegistry;
pub use system::System;
