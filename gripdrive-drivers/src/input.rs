//! Button inputs
//!
//! The trigger and step buttons short their pin to ground when pressed,
//! with the pull-up enabled on the MCU side.

use embedded_hal::digital::InputPin;
use gripdrive_core::traits::DigitalInput;

/// Button wired to ground with a pull-up
pub struct ActiveLow<P> {
    pin: P,
}

impl<P: InputPin> ActiveLow<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> DigitalInput for ActiveLow<P> {
    fn is_active(&mut self) -> bool {
        // A pin that cannot be read counts as released
        self.pin.is_low().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    struct Level(bool);

    impl ErrorType for Level {
        type Error = Infallible;
    }

    impl InputPin for Level {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0)
        }
    }

    struct Broken;

    impl ErrorType for Broken {
        type Error = ErrorKind;
    }

    impl InputPin for Broken {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    #[test]
    fn test_low_is_pressed() {
        assert!(ActiveLow::new(Level(false)).is_active());
        assert!(!ActiveLow::new(Level(true)).is_active());
    }

    #[test]
    fn test_read_error_is_released() {
        assert!(!ActiveLow::new(Broken).is_active());
    }
}
