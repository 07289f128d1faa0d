//! Power management
//!
//! Coordinates MCU power saving with the cooperative scheduler. Clocks are
//! only gated when every peripheral is quiescent, and deep-sleep standby is
//! only entered from the active state.

pub mod manager;
pub mod state;

pub use manager::PowerManager;
pub use state::{IdleOutcome, PowerState, SchedulerStatus, StandbyOutcome, WakeRequest, WakeSource};
