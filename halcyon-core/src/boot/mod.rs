//! Boot mode arbitration
//!
//! Decides once per boot which execution path the firmware takes, from the
//! persisted force-bootloader flag and the test-mode trigger inputs.

pub mod arbiter;
pub mod mode;
pub mod record;

pub use arbiter::{BootArbiter, BootSignals};
pub use mode::BootMode;
pub use record::{BootRecord, BootloaderVersion, FlashBootSignals, MAX_VERSION_LEN};
