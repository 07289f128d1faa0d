//! System context
//!
//! The one owner of the registry, the power state and the boot decision.
//! Built once at startup and passed by reference to whatever needs it;
//! tests build a fresh one each time.

use halcyon_hal::{
    GpioHandle, PeripheralClass, PeripheralDescriptor, PeripheralHandle, Platform,
};

use crate::boot::{BootArbiter, BootMode, BootSignals};
use crate::config::{BoardConfig, LedConfig};
use crate::error::{HalError, PowerError};
use crate::power::{
    IdleOutcome, PowerManager, PowerState, SchedulerStatus, StandbyOutcome, WakeSource,
};
use crate::registry::HandleRegistry;

/// HAL boundary context
pub struct System<P> {
    registry: HandleRegistry,
    power: PowerManager,
    boot: BootArbiter,
    boot_mode: BootMode,
    leds: LedConfig,
    platform: P,
}

impl<P: Platform> System<P> {
    /// Bring the HAL boundary up
    ///
    /// The board table is validated and registered first; this only fills
    /// the lookup table and starts no peripheral. The boot mode is decided
    /// next, so a rejected board never consumes a force-bootloader request.
    /// The power manager is only activated for a normal boot.
    pub fn boot<S: BootSignals>(
        board: &BoardConfig,
        signals: &mut S,
        platform: P,
    ) -> Result<Self, HalError> {
        let mut registry = HandleRegistry::new();
        registry.register_board(board)?;

        let mut boot = BootArbiter::new();
        let boot_mode = boot.decide(signals);

        let mut power = PowerManager::new();
        if boot_mode.activates_power_manager() {
            power.activate();
        }

        info!("HAL up on board '{}' ({})", registry.board_name(), boot_mode);

        Ok(Self {
            registry,
            power,
            boot,
            boot_mode,
            leds: board.leds,
            platform,
        })
    }

    /// Resolve a typed handle
    pub fn resolve<H>(&self, handle: H) -> Result<PeripheralDescriptor, HalError>
    where
        H: PeripheralHandle,
    {
        self.registry.resolve(handle)
    }

    /// Resolve a raw `(class, handle)` pair
    pub fn resolve_raw(
        &self,
        class: PeripheralClass,
        handle: i8,
    ) -> Result<PeripheralDescriptor, HalError> {
        self.registry.resolve_raw(class, handle)
    }

    /// Boot mode decided for this boot
    pub fn current_boot_mode(&self) -> BootMode {
        self.boot_mode
    }

    /// Installed bootloader version, if recorded
    pub fn bootloader_version(&self) -> Option<&str> {
        self.boot.bootloader_version()
    }

    /// Enable or disable idle power saving
    pub fn enable_powersave(&mut self, enable: bool) {
        self.power.enable_powersave(enable);
    }

    /// Request deep-sleep standby, waking after `seconds`
    pub fn request_standby(&mut self, seconds: u32) -> Result<StandbyOutcome, PowerError> {
        self.power.request_standby(&self.registry, &mut self.platform, seconds)
    }

    /// Scheduler idle hook
    pub fn idle_tick(&mut self, scheduler: SchedulerStatus) -> IdleOutcome {
        self.power.idle_tick(&self.registry, &mut self.platform, scheduler)
    }

    /// Report a wake event
    pub fn wake(&mut self, source: WakeSource) -> PowerState {
        self.power.wake(&self.registry, &mut self.platform, source)
    }

    /// Restart immediately
    ///
    /// Nothing is shut down first; callers that need a clean shutdown must
    /// do it before calling this.
    pub fn reboot(&mut self) -> ! {
        info!("Rebooting");
        self.platform.reboot()
    }

    /// Switch the system LED
    pub fn set_system_led(&mut self, on: bool) -> Result<(), HalError> {
        self.drive_led(self.leds.system, on)
    }

    /// Switch the RF LED
    pub fn set_rf_led(&mut self, on: bool) -> Result<(), HalError> {
        self.drive_led(self.leds.rf, on)
    }

    fn drive_led(&mut self, led: GpioHandle, on: bool) -> Result<(), HalError> {
        let pin = self.registry.resolve(led)?;
        self.platform.write(&pin, on != self.leds.active_low);
        Ok(())
    }

    /// Handle registry
    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// Power manager
    pub fn power(&self) -> &PowerManager {
        &self.power
    }

    /// Chip port
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Chip port, mutably
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}
