//! Handle registry implementation
//!
//! The registry is a fixed two-level table indexed by class and handle, so
//! lookups are O(1), allocation-free and safe from interrupt context.

use heapless::String;

use halcyon_hal::{
    PeripheralClass, PeripheralDescriptor, PeripheralHandle, MAX_HANDLES_PER_CLASS,
};

use crate::config::{BoardConfig, MAX_BOARD_NAME_LEN};
use crate::error::HalError;

type ClassSlots = [Option<PeripheralDescriptor>; MAX_HANDLES_PER_CLASS];

/// Board peripheral table
#[derive(Debug, Clone)]
pub struct HandleRegistry {
    slots: [ClassSlots; PeripheralClass::COUNT],
    /// Configured handles per class; zero means the class is not wired
    counts: [u8; PeripheralClass::COUNT],
    board_name: String<MAX_BOARD_NAME_LEN>,
    initialized: bool,
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleRegistry {
    /// Create an empty, unregistered table
    pub const fn new() -> Self {
        Self {
            slots: [[None; MAX_HANDLES_PER_CLASS]; PeripheralClass::COUNT],
            counts: [0; PeripheralClass::COUNT],
            board_name: String::new(),
            initialized: false,
        }
    }

    /// Register the board's peripheral table
    ///
    /// May be called once. The whole configuration is validated before
    /// anything is committed, so a rejected board leaves the registry
    /// unregistered. Entries with a negative handle mark a peripheral as
    /// absent and are skipped.
    pub fn register_board(&mut self, config: &BoardConfig) -> Result<(), HalError> {
        if self.initialized {
            return Err(HalError::AlreadyInitialized);
        }

        let mut slots = [[None; MAX_HANDLES_PER_CLASS]; PeripheralClass::COUNT];
        let mut counts = [0u8; PeripheralClass::COUNT];

        for entry in &config.entries {
            if entry.handle < 0 {
                continue;
            }
            let index = entry.handle as usize;
            if index >= MAX_HANDLES_PER_CLASS {
                return Err(HalError::InvalidHandle);
            }
            if entry.descriptor.domain.mask().is_none() {
                return Err(HalError::InvalidDomain);
            }

            let class = entry.class.index();
            let slot = &mut slots[class][index];
            if slot.is_some() {
                return Err(HalError::DuplicateHandle);
            }
            *slot = Some(entry.descriptor);
            counts[class] += 1;
        }

        self.slots = slots;
        self.counts = counts;
        self.board_name = config.name.clone();
        self.initialized = true;

        debug!(
            "Registered board '{}' with {} peripherals",
            self.board_name.as_str(),
            self.len()
        );
        Ok(())
    }

    /// Resolve a typed handle
    pub fn resolve<H>(&self, handle: H) -> Result<PeripheralDescriptor, HalError>
    where
        H: PeripheralHandle,
    {
        self.resolve_raw(H::CLASS, handle.raw())
    }

    /// Resolve a raw `(class, handle)` pair
    ///
    /// A negative handle is always `InvalidHandle`, whatever the class.
    pub fn resolve_raw(
        &self,
        class: PeripheralClass,
        handle: i8,
    ) -> Result<PeripheralDescriptor, HalError> {
        if handle < 0 {
            return Err(HalError::InvalidHandle);
        }
        if !self.initialized {
            return Err(HalError::NotInitialized);
        }
        if self.counts[class.index()] == 0 {
            return Err(HalError::UnsupportedPeripheral);
        }
        self.slots[class.index()]
            .get(handle as usize)
            .copied()
            .flatten()
            .ok_or(HalError::InvalidHandle)
    }

    /// Check whether the board wires any peripheral of this class
    pub fn is_supported(&self, class: PeripheralClass) -> bool {
        self.counts[class.index()] > 0
    }

    /// Number of handles configured for a class
    pub fn handle_count(&self, class: PeripheralClass) -> usize {
        self.counts[class.index()] as usize
    }

    /// Total number of registered peripherals
    pub fn len(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// Check whether no peripherals are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether a board has been registered
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Name of the registered board (empty before registration)
    pub fn board_name(&self) -> &str {
        self.board_name.as_str()
    }

    /// Iterate over all registered peripherals in class/handle order
    pub fn iter(&self) -> impl Iterator<Item = (PeripheralClass, i8, PeripheralDescriptor)> + '_ {
        PeripheralClass::ALL.iter().flat_map(move |&class| {
            self.slots[class.index()]
                .iter()
                .enumerate()
                .filter_map(move |(handle, slot)| slot.map(|desc| (class, handle as i8, desc)))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use halcyon_hal::{Capabilities, GpioHandle, I2cHandle, PowerDomain, SpiHandle, UartHandle};
    use proptest::prelude::*;

    use super::*;

    fn desc(instance: u8, domain: u8) -> PeripheralDescriptor {
        PeripheralDescriptor::new(instance, PowerDomain(domain))
    }

    fn devkit() -> BoardConfig {
        BoardConfig::new("devkit")
            .with(GpioHandle::new(0), desc(5, 0))
            .unwrap()
            .with(GpioHandle::new(1), desc(6, 0))
            .unwrap()
            .with(
                UartHandle::new(0),
                desc(2, 1).with_caps(Capabilities::POWERSAVE_SENSITIVE),
            )
            .unwrap()
            .with(SpiHandle::UNASSIGNED, desc(1, 2))
            .unwrap()
    }

    #[test]
    fn test_resolve_registered() {
        let mut registry = HandleRegistry::new();
        registry.register_board(&devkit()).unwrap();

        assert_eq!(registry.resolve(GpioHandle::new(1)), Ok(desc(6, 0)));
        assert_eq!(registry.resolve(UartHandle::new(0)).unwrap().instance, 2);
        assert_eq!(registry.board_name(), "devkit");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_unwired_class_is_unsupported() {
        let mut registry = HandleRegistry::new();
        registry.register_board(&devkit()).unwrap();

        assert_eq!(
            registry.resolve(I2cHandle::new(0)),
            Err(HalError::UnsupportedPeripheral)
        );
        // Only listed with the sentinel, so still not wired
        assert!(!registry.is_supported(PeripheralClass::Spi));
        assert_eq!(
            registry.resolve(SpiHandle::new(0)),
            Err(HalError::UnsupportedPeripheral)
        );
    }

    #[test]
    fn test_out_of_range_handle() {
        let mut registry = HandleRegistry::new();
        registry.register_board(&devkit()).unwrap();

        assert_eq!(registry.resolve(GpioHandle::new(2)), Err(HalError::InvalidHandle));
        assert_eq!(registry.resolve(GpioHandle::new(100)), Err(HalError::InvalidHandle));
    }

    #[test]
    fn test_resolve_before_register() {
        let registry = HandleRegistry::new();
        assert_eq!(registry.resolve(GpioHandle::new(0)), Err(HalError::NotInitialized));
        assert_eq!(
            registry.resolve(GpioHandle::UNASSIGNED),
            Err(HalError::InvalidHandle)
        );
    }

    #[test]
    fn test_second_registration_rejected() {
        let mut registry = HandleRegistry::new();
        registry.register_board(&devkit()).unwrap();

        assert_eq!(
            registry.register_board(&BoardConfig::new("empty")),
            Err(HalError::AlreadyInitialized)
        );
        // First board stays in effect
        assert_eq!(registry.board_name(), "devkit");
    }

    #[test]
    fn test_rejected_board_commits_nothing() {
        let board = devkit().with(GpioHandle::new(0), desc(9, 0)).unwrap();
        let mut registry = HandleRegistry::new();

        assert_eq!(registry.register_board(&board), Err(HalError::DuplicateHandle));
        assert!(!registry.is_initialized());
        assert!(registry.is_empty());

        // A corrected board can still be registered
        registry.register_board(&devkit()).unwrap();
    }

    #[test]
    fn test_invalid_board_entries() {
        let mut registry = HandleRegistry::new();
        let board = BoardConfig::new("bad").with(GpioHandle::new(32), desc(0, 0)).unwrap();
        assert_eq!(registry.register_board(&board), Err(HalError::InvalidHandle));

        let board = BoardConfig::new("bad").with(GpioHandle::new(0), desc(0, 40)).unwrap();
        assert_eq!(registry.register_board(&board), Err(HalError::InvalidDomain));
    }

    #[test]
    fn test_iter_order() {
        let mut registry = HandleRegistry::new();
        registry.register_board(&devkit()).unwrap();

        let seen: Vec<_> = registry.iter().map(|(class, handle, _)| (class, handle)).collect();
        assert_eq!(
            seen,
            [
                (PeripheralClass::Gpio, 0),
                (PeripheralClass::Gpio, 1),
                (PeripheralClass::Uart, 0),
            ]
        );
    }

    fn board_from(pairs: &BTreeSet<(usize, i8)>) -> BoardConfig {
        let mut board = BoardConfig::new("prop");
        for &(class, handle) in pairs {
            board
                .add_raw(
                    PeripheralClass::ALL[class],
                    handle,
                    desc(handle as u8, (class as u8) % 32),
                )
                .unwrap();
        }
        board
    }

    proptest! {
        #[test]
        fn prop_resolve_is_stable(
            pairs in prop::collection::btree_set((0usize..PeripheralClass::COUNT, 0i8..32), 0..48)
        ) {
            let board = board_from(&pairs);
            let mut registry = HandleRegistry::new();
            registry.register_board(&board).unwrap();

            for &(class, handle) in &pairs {
                let class = PeripheralClass::ALL[class];
                let first = registry.resolve_raw(class, handle).unwrap();
                let second = registry.resolve_raw(class, handle).unwrap();
                prop_assert_eq!(first, second);
                prop_assert_eq!(first, desc(handle as u8, (class.index() as u8) % 32));
            }
        }

        #[test]
        fn prop_sentinel_always_invalid(
            pairs in prop::collection::btree_set((0usize..PeripheralClass::COUNT, 0i8..32), 0..48),
            register in any::<bool>(),
        ) {
            let mut registry = HandleRegistry::new();
            if register {
                registry.register_board(&board_from(&pairs)).unwrap();
            }
            for class in PeripheralClass::ALL {
                prop_assert_eq!(registry.resolve_raw(class, -1), Err(HalError::InvalidHandle));
            }
        }

        #[test]
        fn prop_double_registration_fails(
            first in prop::collection::btree_set((0usize..PeripheralClass::COUNT, 0i8..32), 0..48),
            second in prop::collection::btree_set((0usize..PeripheralClass::COUNT, 0i8..32), 0..48),
        ) {
            let mut registry = HandleRegistry::new();
            registry.register_board(&board_from(&first)).unwrap();
            prop_assert_eq!(
                registry.register_board(&board_from(&second)),
                Err(HalError::AlreadyInitialized)
            );
        }
    }
}
