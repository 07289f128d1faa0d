//! Persisted record storage
//!
//! Small key-value records kept in flash by the platform's storage layer.
//! The HAL only needs a handful of fixed keys; layout, wear leveling and
//! integrity checks are the storage implementation's business.

/// Storage keys for records owned by the HAL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Boot record: force-bootloader flag and bootloader version marker
    BootRecord = 0,
    /// Serialized board configuration blob
    BoardConfig = 1,
}

impl StorageKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash operation failed
    Flash,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

impl core::fmt::Display for FlashError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            FlashError::Flash => "flash operation failed",
            FlashError::NotFound => "key not found",
            FlashError::BufferTooSmall => "buffer too small",
            FlashError::Corrupted => "stored data corrupted",
            FlashError::Full => "storage full",
        };
        f.write_str(msg)
    }
}

/// Blocking key-value storage
///
/// Boot-time code runs before the executor is up, so this interface is
/// synchronous. Implementations should make `write` atomic per key.
pub trait KeyValueStore {
    /// Read a value by key into the provided buffer
    ///
    /// Returns the number of bytes read.
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError>;

    /// Write (replace) a value by key
    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError>;

    /// Remove a key; removing a missing key is not an error
    fn remove(&mut self, key: StorageKey) -> Result<(), FlashError>;
}
