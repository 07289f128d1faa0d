//! Peripheral descriptors
//!
//! The record a handle resolves to. Descriptors are built from the board
//! configuration and never change afterwards.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of distinct power domains a board may declare
pub const MAX_DOMAINS: u8 = 32;

/// Hardware clock/power domain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerDomain(pub u8);

impl PowerDomain {
    /// Domain bit in a domain mask, or `None` if the id is out of range
    pub fn mask(self) -> Option<u32> {
        if self.0 < MAX_DOMAINS {
            Some(1u32 << self.0)
        } else {
            None
        }
    }
}

bitflags! {
    /// Static capabilities of a peripheral instance
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Capabilities: u8 {
        /// Clock may be gated while the system idles
        const POWERSAVE_SENSITIVE = 1 << 0;
        /// Can wake the system from standby
        const WAKE_SOURCE = 1 << 1;
        /// Never gated or powered down (RTC, wake timer)
        const ALWAYS_ON = 1 << 2;
        /// Drives transfers through DMA
        const DMA = 1 << 3;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Capabilities {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Capabilities({=u8:#x})", self.bits())
    }
}

/// Concrete peripheral a handle resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeripheralDescriptor {
    /// Physical instance number on the chip (e.g. USART2 -> 2)
    pub instance: u8,
    /// Power domain feeding this instance
    pub domain: PowerDomain,
    /// Capability flags
    pub caps: Capabilities,
}

impl PeripheralDescriptor {
    /// Create a descriptor with no capabilities
    pub const fn new(instance: u8, domain: PowerDomain) -> Self {
        Self {
            instance,
            domain,
            caps: Capabilities::empty(),
        }
    }

    /// Builder-style capability setter
    pub const fn with_caps(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    /// Clock may be gated while idling
    pub fn gated_in_idle(&self) -> bool {
        self.caps.contains(Capabilities::POWERSAVE_SENSITIVE)
            && !self.caps.contains(Capabilities::ALWAYS_ON)
    }

    /// Must be put into its lowest-power mode before standby
    pub fn lowered_in_standby(&self) -> bool {
        !self.caps.contains(Capabilities::ALWAYS_ON)
    }
}
