//! Power and system control driver traits
//!
//! These are the hooks a chip port provides so board-agnostic code can gate
//! clocks, park peripherals for standby, arm the wake timer and reset the
//! MCU. None of them may block for an unbounded time.

use crate::descriptor::{PeripheralDescriptor, PowerDomain};
use crate::gpio::GpioOutput;

/// Per-peripheral power control
pub trait PeripheralPower {
    /// Check whether the peripheral is mid-transaction
    ///
    /// The busy flag is maintained by the peripheral's driver. A busy
    /// peripheral must not have its clock gated.
    fn is_busy(&self, peripheral: &PeripheralDescriptor) -> bool;

    /// Stop the clock feeding a power domain
    fn gate_domain(&mut self, domain: PowerDomain);

    /// Restart the clock feeding a power domain
    fn ungate_domain(&mut self, domain: PowerDomain);

    /// Put a peripheral into its lowest-power mode before standby
    fn enter_low_power(&mut self, peripheral: &PeripheralDescriptor);

    /// Bring a peripheral back from its lowest-power mode
    fn exit_low_power(&mut self, peripheral: &PeripheralDescriptor);
}

/// Wake timer used to leave standby
pub trait WakeTimer {
    /// Arm (or re-arm) the timer to fire after `seconds`
    ///
    /// Re-arming replaces any previously programmed deadline.
    fn arm(&mut self, seconds: u32);

    /// Cancel the programmed deadline
    fn disarm(&mut self);
}

/// MCU-level system control
pub trait SystemControl {
    /// Reset the MCU immediately
    ///
    /// No peripheral shutdown is performed.
    fn reboot(&mut self) -> !;

    /// Enter the hardware standby mode
    ///
    /// On parts where standby loses RAM this never returns and execution
    /// restarts from reset; otherwise it returns once the system has been
    /// told to go down and wake is reported through the normal wake path.
    fn enter_standby(&mut self);
}

/// Everything a chip port implements
pub trait Platform: PeripheralPower + WakeTimer + SystemControl + GpioOutput {}

// Blanket implementation for types that implement every driver trait
impl<T: PeripheralPower + WakeTimer + SystemControl + GpioOutput> Platform for T {}
