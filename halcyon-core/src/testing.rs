//! Host test doubles for the driver traits

use std::collections::HashMap;
use std::vec::Vec;

use halcyon_hal::{
    FlashError, GpioOutput, InputPin, KeyValueStore, PeripheralDescriptor, PeripheralPower,
    PowerDomain, StorageKey, SystemControl, WakeTimer,
};

/// Driver call recorded by [`MockPlatform`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Gate(PowerDomain),
    Ungate(PowerDomain),
    LowPower(u8),
    ExitLowPower(u8),
    Arm(u32),
    Disarm,
    Standby,
    Write(u8, bool),
}

/// Recording chip port
#[derive(Debug, Default)]
pub struct MockPlatform {
    pub calls: Vec<Call>,
    /// Instances reporting mid-transaction
    pub busy: Vec<u8>,
    /// Currently programmed wake deadline
    pub armed: Option<u32>,
}

impl PeripheralPower for MockPlatform {
    fn is_busy(&self, peripheral: &PeripheralDescriptor) -> bool {
        self.busy.contains(&peripheral.instance)
    }

    fn gate_domain(&mut self, domain: PowerDomain) {
        self.calls.push(Call::Gate(domain));
    }

    fn ungate_domain(&mut self, domain: PowerDomain) {
        self.calls.push(Call::Ungate(domain));
    }

    fn enter_low_power(&mut self, peripheral: &PeripheralDescriptor) {
        self.calls.push(Call::LowPower(peripheral.instance));
    }

    fn exit_low_power(&mut self, peripheral: &PeripheralDescriptor) {
        self.calls.push(Call::ExitLowPower(peripheral.instance));
    }
}

impl WakeTimer for MockPlatform {
    fn arm(&mut self, seconds: u32) {
        self.armed = Some(seconds);
        self.calls.push(Call::Arm(seconds));
    }

    fn disarm(&mut self) {
        self.armed = None;
        self.calls.push(Call::Disarm);
    }
}

impl SystemControl for MockPlatform {
    fn reboot(&mut self) -> ! {
        panic!("reboot requested");
    }

    fn enter_standby(&mut self) {
        self.calls.push(Call::Standby);
    }
}

impl GpioOutput for MockPlatform {
    fn write(&mut self, pin: &PeripheralDescriptor, high: bool) {
        self.calls.push(Call::Write(pin.instance, high));
    }
}

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub records: HashMap<u8, Vec<u8>>,
    /// Make every write fail
    pub read_only: bool,
}

impl KeyValueStore for MemoryStore {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let data = self.records.get(&key.as_u8()).ok_or(FlashError::NotFound)?;
        let dest = buffer.get_mut(..data.len()).ok_or(FlashError::BufferTooSmall)?;
        dest.copy_from_slice(data);
        Ok(data.len())
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if self.read_only {
            return Err(FlashError::Flash);
        }
        self.records.insert(key.as_u8(), data.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), FlashError> {
        if self.read_only {
            return Err(FlashError::Flash);
        }
        self.records.remove(&key.as_u8());
        Ok(())
    }
}

/// Input pin stuck at one level
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPin(pub bool);

impl InputPin for FixedPin {
    fn is_high(&mut self) -> bool {
        self.0
    }
}
