//! Error types
//!
//! Handle errors are caller bugs or board mismatches and are never retried.
//! Power transition deferrals are not errors and do not appear here.

use core::fmt;

/// Handle registry and board configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// Sentinel handle, or handle outside the class's configured set
    InvalidHandle,
    /// Peripheral class not wired on this board
    UnsupportedPeripheral,
    /// Board registered twice
    AlreadyInitialized,
    /// Lookup before the board was registered
    NotInitialized,
    /// Same (class, handle) listed twice in a board configuration
    DuplicateHandle,
    /// Power domain id out of range
    InvalidDomain,
    /// Board configuration table is full
    TableFull,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            HalError::InvalidHandle => "invalid peripheral handle",
            HalError::UnsupportedPeripheral => "peripheral class not supported on this board",
            HalError::AlreadyInitialized => "board already registered",
            HalError::NotInitialized => "board not registered",
            HalError::DuplicateHandle => "duplicate handle in board configuration",
            HalError::InvalidDomain => "power domain out of range",
            HalError::TableFull => "board configuration table full",
        };
        f.write_str(msg)
    }
}

/// Power manager request errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerError {
    /// Power manager not activated for this boot mode
    Inactive,
    /// Standby requested with a zero wake delay
    ZeroDuration,
}

impl fmt::Display for PowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerError::Inactive => f.write_str("power manager inactive"),
            PowerError::ZeroDuration => f.write_str("standby wake delay must be non-zero"),
        }
    }
}
