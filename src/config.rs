//! Compile-time configuration. The delays are calibrated together with the
//! sensing network.

/// Emit a status line on the log channel every this many cycles.
pub const STATUS_INTERVAL: u32 = 100;

/// Fixed delays of one measurement cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Wait in microseconds between triggering a conversion and reading
    /// the sample slot.
    pub conversion_us: u32,
    /// Time in microseconds the node charges before sampling.
    pub charge_settle_us: u32,
    /// Sleep in milliseconds between cycles.
    pub period_ms: u32,
}

impl Timing {
    pub const DEFAULT: Self = Self {
        conversion_us: 5,
        charge_settle_us: 10,
        period_ms: 50,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What to do when the conversion requested in this cycle has not
/// completed by the time the slot is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Staleness {
    /// Use whatever the slot holds and count the read as stale.
    Trust,
    /// Poll the completion counter in 1 µs steps, then give up with
    /// [`AcquireError::Timeout`](crate::AcquireError::Timeout).
    Poll { max_polls: u32 },
}

/// Layout of the record written per cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// `"<pf>\n"`
    Capacitance,
    /// `"<raw>,<pf>\n"`, read by the live-plot host script.
    RawAndCapacitance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub timing: Timing,
    pub staleness: Staleness,
    pub format: ReportFormat,
}

impl Config {
    pub const DEFAULT: Self = Self {
        timing: Timing::DEFAULT,
        staleness: Staleness::Trust,
        format: ReportFormat::Capacitance,
    };

    /// Bounded wait on conversion completion instead of trusting the fixed
    /// delay. 20 extra microseconds covers the 10 µs acquisition time plus
    /// conversion with margin.
    pub const fn hardened() -> Self {
        Self {
            staleness: Staleness::Poll { max_polls: 20 },
            ..Self::DEFAULT
        }
    }

    pub const fn with_format(self, format: ReportFormat) -> Self {
        Self { format, ..self }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
