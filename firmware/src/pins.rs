//! Edge-connector pins that switch between driving and floating.

use embedded_hal::digital::OutputPin;
use microbit::hal::gpio::{Disconnected, Floating, Input, Level, Output, Pin, PushPull};

use mb2_capsense::FlexPin;

/// The pin may be "writing" or "reading".
enum Mode {
    /// "writing"
    Output(Pin<Output<PushPull>>),
    /// "reading", high impedance
    Floating(Pin<Input<Floating>>),
}

impl Mode {
    fn into_disconnected(self) -> Pin<Disconnected> {
        match self {
            Mode::Output(pin) => pin.into_disconnected(),
            Mode::Floating(pin) => pin.into_disconnected(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinError {
    /// Level change requested while the pin is an input.
    NotOutput,
    /// The pin was lost mid-reconfiguration.
    Missing,
}

pub struct BoardPin {
    mode: Option<Mode>,
}

impl BoardPin {
    /// Starts out driven low, so the node begins discharged.
    pub fn new(pin: Pin<Disconnected>) -> Self {
        let pin = pin.into_push_pull_output(Level::Low);
        Self {
            mode: Some(Mode::Output(pin)),
        }
    }

    fn take(&mut self) -> Result<Pin<Disconnected>, PinError> {
        self.mode
            .take()
            .map(Mode::into_disconnected)
            .ok_or(PinError::Missing)
    }

    fn output(&mut self) -> Result<&mut Pin<Output<PushPull>>, PinError> {
        match self.mode.as_mut() {
            Some(Mode::Output(pin)) => Ok(pin),
            Some(_) => Err(PinError::NotOutput),
            None => Err(PinError::Missing),
        }
    }
}

impl FlexPin for BoardPin {
    type Error = PinError;

    fn configure_input(&mut self) -> Result<(), PinError> {
        let pin = self.take()?;
        self.mode = Some(Mode::Floating(pin.into_floating_input()));
        Ok(())
    }

    fn configure_output(&mut self) -> Result<(), PinError> {
        let pin = self.take()?;
        self.mode = Some(Mode::Output(pin.into_push_pull_output(Level::Low)));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinError> {
        let pin = self.output()?;
        pin.set_high().map_err(|never| match never {})
    }

    fn set_low(&mut self) -> Result<(), PinError> {
        let pin = self.output()?;
        pin.set_low().map_err(|never| match never {})
    }
}
