//! Power states and transition outcomes

use halcyon_hal::PeripheralClass;

/// System power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Running normally
    #[default]
    Active,
    /// All tasks suspended, power-save peripherals clock-gated
    IdleSleep,
    /// Deep sleep until the wake timer or an external wake source fires
    DeepSleepStandby,
}

impl PowerState {
    /// Check whether a direct transition between two states is allowed
    ///
    /// Every sleep state is entered from and left to `Active`.
    pub fn can_transition_to(self, next: PowerState) -> bool {
        use PowerState::*;

        matches!(
            (self, next),
            (Active, IdleSleep)
                | (IdleSleep, Active)
                | (Active, DeepSleepStandby)
                | (DeepSleepStandby, Active)
        )
    }

    /// Check if this is a sleep state
    pub fn is_sleeping(self) -> bool {
        !matches!(self, PowerState::Active)
    }
}

/// Outstanding request to wake from standby
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeRequest {
    seconds: u32,
}

impl WakeRequest {
    /// Create a request; a zero delay is rejected
    pub fn from_secs(seconds: u32) -> Option<Self> {
        if seconds == 0 {
            None
        } else {
            Some(Self { seconds })
        }
    }

    /// Delay until wake, in seconds
    pub fn seconds(&self) -> u32 {
        self.seconds
    }
}

/// What ended a sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeSource {
    /// Any peripheral interrupt
    Interrupt,
    /// The scheduler made a task ready (timeout, event)
    SchedulerReady,
    /// The standby wake timer expired
    WakeTimer,
    /// An external wake pin fired
    ExternalPin,
}

impl WakeSource {
    /// Check whether this source can end deep-sleep standby
    ///
    /// With the core halted only the wake timer or a hardware interrupt can
    /// bring the system back.
    pub fn ends_standby(self) -> bool {
        matches!(
            self,
            WakeSource::WakeTimer | WakeSource::ExternalPin | WakeSource::Interrupt
        )
    }
}

/// Scheduler condition reported at an idle point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerStatus {
    /// Every runnable task has voluntarily suspended
    AllSuspended,
    /// At least one task is ready to run
    TasksReady,
}

/// Result of an idle-point evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdleOutcome {
    /// Power manager not activated for this boot
    Inactive,
    /// Conditions for sleeping not met
    StayActive,
    /// A peripheral is mid-transaction; retried on the next idle point
    Deferred {
        class: PeripheralClass,
        handle: i8,
    },
    /// Clocks gated, now in idle sleep
    EnteredIdleSleep,
    /// A latched standby request was carried out
    EnteredStandby(WakeRequest),
    /// Already in a sleep state
    AlreadySleeping,
}

/// Result of a standby request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StandbyOutcome {
    /// Standby entered
    Entered,
    /// Already in standby; the wake request was replaced and the timer re-armed
    Rearmed,
    /// In idle sleep; the request is latched and taken at the next idle point after wake
    Deferred,
    /// A peripheral is mid-transaction; the request is latched and retried
    /// at the next idle point
    Busy {
        class: PeripheralClass,
        handle: i8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_edges() {
        use PowerState::*;

        assert!(Active.can_transition_to(IdleSleep));
        assert!(IdleSleep.can_transition_to(Active));
        assert!(Active.can_transition_to(DeepSleepStandby));
        assert!(DeepSleepStandby.can_transition_to(Active));

        assert!(!IdleSleep.can_transition_to(DeepSleepStandby));
        assert!(!DeepSleepStandby.can_transition_to(IdleSleep));
        assert!(!Active.can_transition_to(Active));
    }

    #[test]
    fn test_zero_wake_rejected() {
        assert_eq!(WakeRequest::from_secs(0), None);
        assert_eq!(WakeRequest::from_secs(10).map(|r| r.seconds()), Some(10));
    }

    #[test]
    fn test_scheduler_ready_does_not_end_standby() {
        assert!(!WakeSource::SchedulerReady.ends_standby());
        assert!(WakeSource::WakeTimer.ends_standby());
    }
}
