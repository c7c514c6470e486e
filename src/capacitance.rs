//! Raw sample to picofarad conversion against a fixed 400 pF reference.

/// Full-scale code of the 10-bit converter.
pub const ADC_MAX: i16 = 1023;

/// Reference capacitance of the divider, in picofarads.
pub const REFERENCE_PF: f32 = 400.0;

/// Converter output, clamped into `0..=ADC_MAX`.
///
/// The SAADC can report a few counts below zero from offset error on a
/// grounded input; those read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RawSample(i16);

impl RawSample {
    pub const fn new(code: i16) -> Self {
        if code < 0 {
            Self(0)
        } else if code > ADC_MAX {
            Self(ADC_MAX)
        } else {
            Self(code)
        }
    }

    pub const fn get(self) -> i16 {
        self.0
    }

    /// True at full scale, where the formula has no finite value.
    pub const fn is_saturated(self) -> bool {
        self.0 >= ADC_MAX
    }
}

impl From<i16> for RawSample {
    fn from(code: i16) -> Self {
        Self::new(code)
    }
}

/// Capacitance in picofarads for a raw reading.
///
/// A saturated reading gives 0 rather than dividing by zero.
pub fn capacitance_pf(raw: RawSample) -> f32 {
    if raw.is_saturated() {
        return 0.0;
    }
    let code = f32::from(raw.get());
    code * REFERENCE_PF / (f32::from(ADC_MAX) - code)
}

/// Truncate (not round) to whole picofarads.
pub fn whole_picofarads(picofarads: f32) -> i32 {
    picofarads as i32
}
