//! GPIO abstractions
//!
//! Two views of digital I/O: owned [`InputPin`] objects used for boot-time
//! trigger inputs, and the descriptor-addressed [`GpioOutput`] driver used
//! behind resolved handles.

use crate::descriptor::PeripheralDescriptor;

/// Digital input pin
///
/// Takes `&mut self` because reading a pin may touch a shared port
/// register block.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }

    /// Check whether the input is asserted, honoring polarity
    fn is_asserted(&mut self, active_low: bool) -> bool {
        self.is_high() != active_low
    }
}

/// Adapter for any `embedded-hal` input
///
/// Chip HALs (embassy-rp, embassy-stm32, ...) implement the
/// `embedded-hal` digital traits; wrap their pins in this to use them as
/// boot trigger inputs. A failed read counts as low.
pub struct EmbeddedInput<T>(pub T);

impl<T: embedded_hal::digital::InputPin> InputPin for EmbeddedInput<T> {
    fn is_high(&mut self) -> bool {
        self.0.is_high().unwrap_or(false)
    }
}

/// GPIO driver addressed by resolved descriptor
///
/// Implemented by the chip port; the descriptor's `instance` is the
/// physical pin number.
pub trait GpioOutput {
    /// Drive the pin to the given level
    fn write(&mut self, pin: &PeripheralDescriptor, high: bool);
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use super::*;

    struct Level(bool);

    impl InputPin for Level {
        fn is_high(&mut self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_asserted_polarity() {
        assert!(Level(true).is_asserted(false));
        assert!(!Level(true).is_asserted(true));
        assert!(Level(false).is_asserted(true));
        assert!(!Level(false).is_asserted(false));
    }

    struct EhPin(bool);

    impl embedded_hal::digital::ErrorType for EhPin {
        type Error = Infallible;
    }

    impl embedded_hal::digital::InputPin for EhPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0)
        }
    }

    #[test]
    fn test_embedded_hal_adapter() {
        assert!(EmbeddedInput(EhPin(true)).is_high());
        assert!(EmbeddedInput(EhPin(false)).is_asserted(true));
    }
}
