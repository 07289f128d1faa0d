//! Typed peripheral handles
//!
//! A board exposes its peripherals as small signed integers, numbered per
//! peripheral class. Each class gets its own newtype so a UART handle can
//! never be handed to code expecting a GPIO handle.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw value marking a handle as unassigned on the current board
pub const UNASSIGNED: i8 = -1;

/// Number of handle slots available per peripheral class
pub const MAX_HANDLES_PER_CLASS: usize = 32;

/// Peripheral classes addressable through the HAL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PeripheralClass {
    Gpio = 0,
    Spi = 1,
    I2c = 2,
    Uart = 3,
    Pwm = 4,
    Adc = 5,
    Flash = 6,
    /// Logical flash partition
    Partition = 7,
    Rtc = 8,
    Rng = 9,
    I2s = 10,
    /// General-purpose hardware timer
    GTimer = 11,
}

impl PeripheralClass {
    /// Number of peripheral classes
    pub const COUNT: usize = 12;

    /// Every class, in index order
    pub const ALL: [PeripheralClass; Self::COUNT] = [
        PeripheralClass::Gpio,
        PeripheralClass::Spi,
        PeripheralClass::I2c,
        PeripheralClass::Uart,
        PeripheralClass::Pwm,
        PeripheralClass::Adc,
        PeripheralClass::Flash,
        PeripheralClass::Partition,
        PeripheralClass::Rtc,
        PeripheralClass::Rng,
        PeripheralClass::I2s,
        PeripheralClass::GTimer,
    ];

    /// Table index of this class
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a class by table index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Common behaviour of the per-class handle newtypes
pub trait PeripheralHandle: Copy {
    /// Peripheral class this handle addresses
    const CLASS: PeripheralClass;

    /// Raw board-level handle value
    fn raw(self) -> i8;

    /// Check whether the handle is assigned on this board
    fn is_assigned(self) -> bool {
        self.raw() >= 0
    }
}

macro_rules! peripheral_handle {
    ($(#[$meta:meta])* $name:ident => $class:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(i8);

        impl $name {
            /// Handle marking the peripheral as absent from this board
            pub const UNASSIGNED: Self = Self(UNASSIGNED);

            /// Wrap a raw board handle value
            pub const fn new(raw: i8) -> Self {
                Self(raw)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::UNASSIGNED
            }
        }

        impl PeripheralHandle for $name {
            const CLASS: PeripheralClass = PeripheralClass::$class;

            fn raw(self) -> i8 {
                self.0
            }
        }
    };
}

peripheral_handle!(
    /// GPIO pin handle
    GpioHandle => Gpio
);
peripheral_handle!(
    /// SPI bus handle
    SpiHandle => Spi
);
peripheral_handle!(
    /// I2C bus handle
    I2cHandle => I2c
);
peripheral_handle!(
    /// UART port handle
    UartHandle => Uart
);
peripheral_handle!(
    /// PWM channel handle
    PwmHandle => Pwm
);
peripheral_handle!(
    /// ADC channel handle
    AdcHandle => Adc
);
peripheral_handle!(
    /// Flash device handle
    FlashHandle => Flash
);
peripheral_handle!(
    /// Flash partition handle
    PartitionHandle => Partition
);
peripheral_handle!(RtcHandle => Rtc);
peripheral_handle!(RngHandle => Rng);
peripheral_handle!(
    /// I2S interface handle
    I2sHandle => I2s
);
peripheral_handle!(
    /// General-purpose timer handle
    GTimerHandle => GTimer
);
