//! Boot mode arbiter
//!
//! Signals are read in a fixed priority order and evaluation stops at the
//! first asserted one, so lower-priority inputs are never touched when the
//! bootloader is forced.

use halcyon_hal::FlashError;

use super::mode::BootMode;
use super::record::BootloaderVersion;

/// Boot decision inputs
///
/// Implemented over GPIO and persisted storage by the board; see
/// [`FlashBootSignals`](super::FlashBootSignals) for the standard one.
pub trait BootSignals {
    /// Persisted "force bootloader" flag
    fn force_bootloader(&mut self) -> bool;

    /// Clear the persisted flag so the next boot proceeds normally
    fn clear_force_bootloader(&mut self) -> Result<(), FlashError>;

    /// Manufacturing-mode trigger input
    fn manufacturing_trigger(&mut self) -> bool;

    /// Automated-test-equipment trigger input
    fn ate_trigger(&mut self) -> bool;

    /// Installed bootloader version marker, if recorded
    fn bootloader_version(&mut self) -> Option<BootloaderVersion> {
        None
    }
}

/// Once-per-boot mode decision
#[derive(Debug, Clone, Default)]
pub struct BootArbiter {
    decision: Option<BootMode>,
    bootloader_version: Option<BootloaderVersion>,
}

impl BootArbiter {
    /// Create an arbiter with no decision yet
    pub const fn new() -> Self {
        Self {
            decision: None,
            bootloader_version: None,
        }
    }

    /// Decide the boot mode
    ///
    /// Priority: forced bootloader, then manufacturing, then ATE, then
    /// normal. A forced bootloader clears the persisted flag. Once decided,
    /// later calls return the same mode without reading any signal.
    pub fn decide<S: BootSignals>(&mut self, signals: &mut S) -> BootMode {
        if let Some(mode) = self.decision {
            return mode;
        }

        let mode = if signals.force_bootloader() {
            if let Err(e) = signals.clear_force_bootloader() {
                warn!("Failed to clear force-bootloader flag: {}", e);
            }
            BootMode::Bootloader
        } else if signals.manufacturing_trigger() {
            BootMode::Manufacturing
        } else if signals.ate_trigger() {
            BootMode::Ate
        } else {
            BootMode::Normal
        };

        self.bootloader_version = signals.bootloader_version();
        self.decision = Some(mode);
        info!("Boot mode: {}", mode);
        mode
    }

    /// The decision for this boot, if made
    pub fn current(&self) -> Option<BootMode> {
        self.decision
    }

    /// Bootloader version read during the decision
    pub fn bootloader_version(&self) -> Option<&str> {
        self.bootloader_version.as_ref().map(|v| v.as_str())
    }
}
