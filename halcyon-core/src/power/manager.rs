//! Power manager
//!
//! Owns the process-wide [`PowerState`]. Every transition runs from the
//! scheduler's idle/background context, never from an interrupt handler,
//! and mutates state inside a critical section.

use halcyon_hal::{
    CriticalSectionGuard, PeripheralClass, PeripheralPower, PowerDomain, SystemControl, WakeTimer,
    MAX_DOMAINS,
};

use super::state::{
    IdleOutcome, PowerState, SchedulerStatus, StandbyOutcome, WakeRequest, WakeSource,
};
use crate::error::PowerError;
use crate::registry::HandleRegistry;

/// Power state machine
///
/// ```text
///            idle_tick            request_standby
/// IdleSleep <─────────> Active <──────────────> DeepSleepStandby
///              wake                  wake
/// ```
#[derive(Debug, Clone)]
pub struct PowerManager {
    state: PowerState,
    /// Only a normal boot activates power management
    active: bool,
    powersave: bool,
    wake_request: Option<WakeRequest>,
    /// Standby request held off by idle sleep or a busy peripheral
    pending_standby: Option<WakeRequest>,
    /// Domains gated on idle entry
    gated: u32,
    /// Consecutive sleep attempts deferred by a busy peripheral
    deferred: u32,
}

impl Default for PowerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerManager {
    /// Create an inactive manager in the `Active` state
    ///
    /// Power saving starts disabled and must be enabled explicitly.
    pub const fn new() -> Self {
        Self {
            state: PowerState::Active,
            active: false,
            powersave: false,
            wake_request: None,
            pending_standby: None,
            gated: 0,
            deferred: 0,
        }
    }

    /// Start managing power for this boot
    pub fn activate(&mut self) {
        self.active = true;
        debug!("Power manager activated");
    }

    /// Check whether the manager was activated
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current power state
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Outstanding standby wake request
    pub fn wake_request(&self) -> Option<WakeRequest> {
        self.wake_request
    }

    /// Standby request waiting for the next idle point
    pub fn pending_standby(&self) -> Option<WakeRequest> {
        self.pending_standby
    }

    /// Check whether idle power saving is enabled
    pub fn powersave_enabled(&self) -> bool {
        self.powersave
    }

    /// Consecutive sleep attempts deferred by a busy peripheral
    pub fn deferred_attempts(&self) -> u32 {
        self.deferred
    }

    /// Mask of domains currently gated by idle sleep
    pub fn gated_domains(&self) -> u32 {
        self.gated
    }

    /// Enable or disable idle power saving
    ///
    /// Checked on every idle entry attempt; a sleep already in progress is
    /// not affected.
    pub fn enable_powersave(&mut self, enable: bool) {
        self.powersave = enable;
        debug!("MCU powersave {}", if enable { "enabled" } else { "disabled" });
    }

    /// Evaluate an idle point reported by the scheduler
    ///
    /// Peripheral busy flags are polled once per call. A busy peripheral
    /// defers the attempt without changing state; the next idle point
    /// tries again.
    pub fn idle_tick<P>(
        &mut self,
        registry: &HandleRegistry,
        platform: &mut P,
        scheduler: SchedulerStatus,
    ) -> IdleOutcome
    where
        P: PeripheralPower + WakeTimer + SystemControl,
    {
        if !self.active {
            return IdleOutcome::Inactive;
        }
        if self.state.is_sleeping() {
            return IdleOutcome::AlreadySleeping;
        }

        if let Some(request) = self.pending_standby.take() {
            debug!("Retrying held standby request ({}s)", request.seconds());
            return match self.enter_standby(registry, platform, request) {
                None => IdleOutcome::EnteredStandby(request),
                Some((class, handle)) => IdleOutcome::Deferred { class, handle },
            };
        }

        if scheduler != SchedulerStatus::AllSuspended || !self.powersave {
            return IdleOutcome::StayActive;
        }

        let cs = CriticalSectionGuard::enter();

        if let Some((class, handle)) = self.find_busy(registry, platform) {
            trace!("Idle sleep deferred, {} {} busy", class, handle);
            return IdleOutcome::Deferred { class, handle };
        }

        let mut gated = 0u32;
        for (_, _, desc) in registry.iter().filter(|(_, _, desc)| desc.gated_in_idle()) {
            if let Some(bit) = desc.domain.mask() {
                if gated & bit == 0 {
                    platform.gate_domain(desc.domain);
                    gated |= bit;
                }
            }
        }

        self.gated = gated;
        self.deferred = 0;
        self.set_state(PowerState::IdleSleep);
        drop(cs);

        IdleOutcome::EnteredIdleSleep
    }

    /// Report a wake event
    ///
    /// Leaving idle sleep ungates exactly the domains that were gated.
    /// Leaving standby restores every peripheral and clears the wake
    /// request. Standby only ends on a hardware wake source.
    pub fn wake<P>(
        &mut self,
        registry: &HandleRegistry,
        platform: &mut P,
        source: WakeSource,
    ) -> PowerState
    where
        P: PeripheralPower + WakeTimer,
    {
        let _cs = CriticalSectionGuard::enter();

        match self.state {
            PowerState::Active => {}
            PowerState::IdleSleep => {
                for id in 0..MAX_DOMAINS {
                    if self.gated & (1u32 << id) != 0 {
                        platform.ungate_domain(PowerDomain(id));
                    }
                }
                self.gated = 0;
                self.set_state(PowerState::Active);
            }
            PowerState::DeepSleepStandby => {
                if !source.ends_standby() {
                    trace!("Ignoring {} while in standby", source);
                    return self.state;
                }
                platform.disarm();
                let lowered = registry.iter().filter(|(_, _, desc)| desc.lowered_in_standby());
                for (_, _, desc) in lowered {
                    platform.exit_low_power(&desc);
                }
                self.wake_request = None;
                self.set_state(PowerState::Active);
            }
        }

        self.state
    }

    /// Request deep-sleep standby with a wake delay
    ///
    /// Only `Active` enters standby directly, and only once no peripheral
    /// reports busy. A request while already in standby replaces the
    /// outstanding one and re-arms the timer. A request held off by idle
    /// sleep or a busy peripheral is latched (last one wins) and retried at
    /// the next idle point.
    pub fn request_standby<P>(
        &mut self,
        registry: &HandleRegistry,
        platform: &mut P,
        seconds: u32,
    ) -> Result<StandbyOutcome, PowerError>
    where
        P: PeripheralPower + WakeTimer + SystemControl,
    {
        if !self.active {
            return Err(PowerError::Inactive);
        }
        let request = WakeRequest::from_secs(seconds).ok_or(PowerError::ZeroDuration)?;

        match self.state {
            PowerState::Active => match self.enter_standby(registry, platform, request) {
                None => Ok(StandbyOutcome::Entered),
                Some((class, handle)) => Ok(StandbyOutcome::Busy { class, handle }),
            },
            PowerState::DeepSleepStandby => {
                let _cs = CriticalSectionGuard::enter();
                platform.arm(request.seconds());
                self.wake_request = Some(request);
                debug!("Standby wake re-armed for {}s", request.seconds());
                Ok(StandbyOutcome::Rearmed)
            }
            PowerState::IdleSleep => {
                self.pending_standby = Some(request);
                debug!("Standby ({}s) latched until idle sleep ends", request.seconds());
                Ok(StandbyOutcome::Deferred)
            }
        }
    }

    /// Enter standby from `Active`
    ///
    /// Returns the peripheral that held it off, with the request latched.
    fn enter_standby<P>(
        &mut self,
        registry: &HandleRegistry,
        platform: &mut P,
        request: WakeRequest,
    ) -> Option<(PeripheralClass, i8)>
    where
        P: PeripheralPower + WakeTimer + SystemControl,
    {
        {
            let _cs = CriticalSectionGuard::enter();

            if let Some((class, handle)) = self.find_busy(registry, platform) {
                self.pending_standby = Some(request);
                debug!("Standby ({}s) held off, {} {} busy", request.seconds(), class, handle);
                return Some((class, handle));
            }

            platform.arm(request.seconds());
            let lowered = registry.iter().filter(|(_, _, desc)| desc.lowered_in_standby());
            for (_, _, desc) in lowered {
                platform.enter_low_power(&desc);
            }
            self.wake_request = Some(request);
            self.pending_standby = None;
            self.deferred = 0;
            self.set_state(PowerState::DeepSleepStandby);
        }

        info!("Entering standby, wake in {}s", request.seconds());
        // May not return if the part loses RAM in standby.
        platform.enter_standby();
        None
    }

    /// Poll every registered peripheral once for an in-flight transaction
    fn find_busy<P: PeripheralPower>(
        &mut self,
        registry: &HandleRegistry,
        platform: &P,
    ) -> Option<(PeripheralClass, i8)> {
        let (class, handle, _) = registry.iter().find(|(_, _, desc)| platform.is_busy(desc))?;
        self.deferred = self.deferred.saturating_add(1);
        Some((class, handle))
    }

    fn set_state(&mut self, next: PowerState) {
        debug_assert!(self.state.can_transition_to(next));
        debug!("Power state {} -> {}", self.state, next);
        self.state = next;
    }
}
