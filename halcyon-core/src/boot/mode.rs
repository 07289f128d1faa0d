//! Boot modes

/// Execution path chosen at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootMode {
    /// Regular application firmware
    Normal,
    /// Manufacturing test firmware
    Manufacturing,
    /// Automated test equipment mode
    Ate,
    /// Bootloader / recovery
    Bootloader,
}

impl BootMode {
    /// Only a normal boot runs the power manager
    pub fn activates_power_manager(self) -> bool {
        matches!(self, BootMode::Normal)
    }

    /// Check if this is one of the factory test modes
    pub fn is_test_mode(self) -> bool {
        matches!(self, BootMode::Manufacturing | BootMode::Ate)
    }
}
