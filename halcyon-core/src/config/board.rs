//! Board configuration types
//!
//! A board is described by a flat table of `(class, handle) -> descriptor`
//! entries. Boards normally build this table in code at startup; with the
//! `serde` feature it can also be shipped as a postcard blob in flash.

use heapless::{String, Vec};

use halcyon_hal::{GpioHandle, PeripheralClass, PeripheralDescriptor, PeripheralHandle};

#[cfg(feature = "serde")]
use halcyon_hal::{FlashError, KeyValueStore, StorageKey};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::HalError;

/// Maximum number of entries in a board table
pub const MAX_BOARD_ENTRIES: usize = 64;

/// Maximum board name length
pub const MAX_BOARD_NAME_LEN: usize = 24;

/// Maximum serialized board configuration size
#[cfg(feature = "serde")]
pub const MAX_BOARD_BLOB_SIZE: usize = 512;

/// One row of the board table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardEntry {
    /// Peripheral class
    pub class: PeripheralClass,
    /// Raw board handle (negative means unassigned and is skipped)
    pub handle: i8,
    /// What the handle resolves to
    pub descriptor: PeripheralDescriptor,
}

/// LED wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LedConfig {
    /// System status LED
    pub system: GpioHandle,
    /// RF activity LED
    pub rf: GpioHandle,
    /// LEDs light when the pin is driven low
    pub active_low: bool,
}

/// Board blob loading errors
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Blob could not be decoded
    Deserialize,
    /// Blob could not be encoded
    Serialize,
}

#[cfg(feature = "serde")]
impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

/// Complete board configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Board name, for logs
    pub name: String<MAX_BOARD_NAME_LEN>,
    /// Peripheral table
    pub entries: Vec<BoardEntry, MAX_BOARD_ENTRIES>,
    /// LED wiring
    pub leds: LedConfig,
}

impl BoardConfig {
    /// Create an empty board configuration
    ///
    /// Names longer than [`MAX_BOARD_NAME_LEN`] are truncated.
    pub fn new(name: &str) -> Self {
        let mut board_name = String::new();
        for c in name.chars() {
            if board_name.push(c).is_err() {
                break;
            }
        }
        Self {
            name: board_name,
            entries: Vec::new(),
            leds: LedConfig::default(),
        }
    }

    /// Add a typed handle
    pub fn with<H: PeripheralHandle>(
        mut self,
        handle: H,
        descriptor: PeripheralDescriptor,
    ) -> Result<Self, HalError> {
        self.add_raw(H::CLASS, handle.raw(), descriptor)?;
        Ok(self)
    }

    /// Add a raw `(class, handle)` entry
    pub fn add_raw(
        &mut self,
        class: PeripheralClass,
        handle: i8,
        descriptor: PeripheralDescriptor,
    ) -> Result<(), HalError> {
        self.entries
            .push(BoardEntry {
                class,
                handle,
                descriptor,
            })
            .map_err(|_| HalError::TableFull)
    }

    /// Set the LED wiring
    pub fn with_leds(mut self, leds: LedConfig) -> Self {
        self.leds = leds;
        self
    }

    /// Decode a board configuration from a postcard blob
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)
    }

    /// Encode into `buf`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_postcard<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Load a board configuration stored under [`StorageKey::BoardConfig`]
    #[cfg(feature = "serde")]
    pub fn load<S: KeyValueStore>(store: &mut S) -> Result<Self, ConfigError> {
        let mut buf = [0u8; MAX_BOARD_BLOB_SIZE];
        let len = store.read(StorageKey::BoardConfig, &mut buf)?;
        debug!("Read {} bytes of board config", len);
        Self::from_postcard(&buf[..len])
    }

    /// Store this configuration under [`StorageKey::BoardConfig`]
    #[cfg(feature = "serde")]
    pub fn store<S: KeyValueStore>(&self, store: &mut S) -> Result<(), ConfigError> {
        let mut buf = [0u8; MAX_BOARD_BLOB_SIZE];
        let bytes = self.to_postcard(&mut buf)?;
        store.write(StorageKey::BoardConfig, bytes)?;
        Ok(())
    }
}
