//! Halcyon Hardware Abstraction Layer
//!
//! This crate defines the vocabulary shared between board-agnostic code and
//! chip-specific drivers: typed peripheral handles, the descriptors those
//! handles resolve to, and the driver traits a chip port implements.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / network stack            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  halcyon-core (registry, power, boot)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  halcyon-hal (this crate - types/traits)│
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  chip port A  │       │  chip port B  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Contents
//!
//! - [`handle`] - per-class handle newtypes ([`GpioHandle`], [`SpiHandle`], ...)
//! - [`descriptor::PeripheralDescriptor`] - what a handle resolves to
//! - [`gpio::InputPin`], [`gpio::GpioOutput`] - digital I/O
//!   ([`gpio::EmbeddedInput`] adapts `embedded-hal` pins)
//! - [`power::PeripheralPower`], [`power::WakeTimer`], [`power::SystemControl`] - power control
//! - [`flash::KeyValueStore`] - persisted records
//! - [`critical::CriticalSectionGuard`] - scoped interrupt masking

#![no_std]
#![deny(unsafe_code)]

pub mod critical;
pub mod descriptor;
pub mod flash;
pub mod gpio;
pub mod handle;
pub mod power;

// Re-export key types at crate root for convenience
pub use critical::CriticalSectionGuard;
pub use descriptor::{Capabilities, PeripheralDescriptor, PowerDomain, MAX_DOMAINS};
pub use flash::{FlashError, KeyValueStore, StorageKey};
pub use gpio::{EmbeddedInput, GpioOutput, InputPin};
pub use handle::{
    AdcHandle, FlashHandle, GTimerHandle, GpioHandle, I2cHandle, I2sHandle, PartitionHandle,
    PeripheralClass, PeripheralHandle, PwmHandle, RngHandle, RtcHandle, SpiHandle, UartHandle,
    MAX_HANDLES_PER_CLASS, UNASSIGNED,
};
pub use power::{Platform, PeripheralPower, SystemControl, WakeTimer};
