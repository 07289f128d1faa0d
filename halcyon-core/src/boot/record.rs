//! Persisted boot record
//!
//! The force-bootloader flag and the bootloader version marker live in one
//! small postcard-encoded record under [`StorageKey::BootRecord`].

use heapless::String;
use serde::{Deserialize, Serialize};

use halcyon_hal::{FlashError, InputPin, KeyValueStore, StorageKey};

use super::arbiter::BootSignals;

/// Maximum bootloader version string length
pub const MAX_VERSION_LEN: usize = 32;

/// Encoded record upper bound (flag + length prefix + version)
const MAX_RECORD_SIZE: usize = 2 + 1 + MAX_VERSION_LEN;

/// Bootloader version marker
pub type BootloaderVersion = String<MAX_VERSION_LEN>;

/// Boot record as stored in flash
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootRecord {
    /// Enter the bootloader on next boot
    pub force_bootloader: bool,
    /// Version of the installed bootloader (empty if never recorded)
    pub bootloader_version: BootloaderVersion,
}

impl BootRecord {
    /// Read the record; a missing record reads as default
    pub fn load<S: KeyValueStore>(store: &mut S) -> Result<Self, FlashError> {
        let mut buf = [0u8; MAX_RECORD_SIZE];
        match store.read(StorageKey::BootRecord, &mut buf) {
            Ok(len) => postcard::from_bytes(&buf[..len]).map_err(|_| FlashError::Corrupted),
            Err(FlashError::NotFound) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Write the record back
    pub fn store<S: KeyValueStore>(&self, store: &mut S) -> Result<(), FlashError> {
        let mut buf = [0u8; MAX_RECORD_SIZE];
        let bytes = postcard::to_slice(self, &mut buf).map_err(|_| FlashError::BufferTooSmall)?;
        store.write(StorageKey::BootRecord, bytes)
    }

    /// Set the force-bootloader flag for the next boot
    pub fn request_bootloader<S: KeyValueStore>(store: &mut S) -> Result<(), FlashError> {
        let mut record = Self::load(store).unwrap_or_default();
        record.force_bootloader = true;
        record.store(store)?;
        info!("Bootloader requested for next boot");
        Ok(())
    }

    /// Record the installed bootloader version
    ///
    /// Called by bootloader builds. Versions longer than
    /// [`MAX_VERSION_LEN`] are rejected.
    pub fn record_bootloader_version<S: KeyValueStore>(
        store: &mut S,
        version: &str,
    ) -> Result<(), FlashError> {
        let mut record = Self::load(store).unwrap_or_default();
        record.bootloader_version.clear();
        record
            .bootloader_version
            .push_str(version)
            .map_err(|_| FlashError::BufferTooSmall)?;
        record.store(store)
    }
}

/// Boot signals from persisted storage and two trigger inputs
pub struct FlashBootSignals<S, M, A> {
    store: S,
    manufacturing: M,
    manufacturing_active_low: bool,
    ate: A,
    ate_active_low: bool,
    record: Option<BootRecord>,
}

impl<S, M, A> FlashBootSignals<S, M, A>
where
    S: KeyValueStore,
    M: InputPin,
    A: InputPin,
{
    /// Create a signal source; trigger inputs are active-high
    pub fn new(store: S, manufacturing: M, ate: A) -> Self {
        Self {
            store,
            manufacturing,
            manufacturing_active_low: false,
            ate,
            ate_active_low: false,
            record: None,
        }
    }

    /// Treat the trigger inputs as active-low (pulled up, shorted to ground)
    pub fn active_low(mut self, manufacturing: bool, ate: bool) -> Self {
        self.manufacturing_active_low = manufacturing;
        self.ate_active_low = ate;
        self
    }

    /// Give back the storage once the decision is made
    pub fn into_store(self) -> S {
        self.store
    }

    fn record(&mut self) -> &mut BootRecord {
        let store = &mut self.store;
        self.record.get_or_insert_with(|| match BootRecord::load(store) {
            Ok(record) => record,
            Err(e) => {
                warn!("Boot record unreadable ({}), using defaults", e);
                BootRecord::default()
            }
        })
    }
}

impl<S, M, A> BootSignals for FlashBootSignals<S, M, A>
where
    S: KeyValueStore,
    M: InputPin,
    A: InputPin,
{
    fn force_bootloader(&mut self) -> bool {
        self.record().force_bootloader
    }

    fn clear_force_bootloader(&mut self) -> Result<(), FlashError> {
        let record = self.record();
        record.force_bootloader = false;
        let record = record.clone();
        if record == BootRecord::default() {
            // Nothing left worth keeping
            self.store.remove(StorageKey::BootRecord)
        } else {
            record.store(&mut self.store)
        }
    }

    fn manufacturing_trigger(&mut self) -> bool {
        self.manufacturing.is_asserted(self.manufacturing_active_low)
    }

    fn ate_trigger(&mut self) -> bool {
        self.ate.is_asserted(self.ate_active_low)
    }

    fn bootloader_version(&mut self) -> Option<BootloaderVersion> {
        let version = &self.record().bootloader_version;
        if version.is_empty() {
            None
        } else {
            Some(version.clone())
        }
    }
}
