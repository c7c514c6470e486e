//! GPIO pins that switch between input and output at runtime.

pub trait FlexPin {
    type Error;

    /// Switch to floating (high impedance) input mode.
    fn configure_input(&mut self) -> Result<(), Self::Error>;

    /// Switch to push-pull output mode.
    fn configure_output(&mut self) -> Result<(), Self::Error>;

    /// Drive high. The pin must be in output mode.
    fn set_high(&mut self) -> Result<(), Self::Error>;

    /// Drive low. The pin must be in output mode.
    fn set_low(&mut self) -> Result<(), Self::Error>;
}

impl<T: FlexPin + ?Sized> FlexPin for &mut T {
    type Error = T::Error;

    fn configure_input(&mut self) -> Result<(), Self::Error> {
        T::configure_input(self)
    }

    fn configure_output(&mut self) -> Result<(), Self::Error> {
        T::configure_output(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        T::set_high(self)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        T::set_low(self)
    }
}
