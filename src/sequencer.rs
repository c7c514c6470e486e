//! The charge / sample / discharge cycle.
//!
//! ```text
//! Idle -> Charging -> Settling -> Sampling -> Discharging -> Computing -> Reporting -> Idle
//! ```

use embedded_hal::delay::DelayNs;
use rtt_target::rprintln;

use crate::{
    acquisition::{Acquisition, Converter},
    capacitance::{RawSample, capacitance_pf},
    config::{STATUS_INTERVAL, Timing},
    error::Error,
    pin::FlexPin,
    report::{Reporter, Sink},
};

/// Where a cycle is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Charging,
    Settling,
    Sampling,
    Discharging,
    Computing,
    Reporting,
}

/// Result of one cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub raw: RawSample,
    pub picofarads: f32,
    /// Whether the sample came from this cycle's conversion.
    pub fresh: bool,
}

pub struct Sequencer<'a, S, C, V, D, W> {
    sensor: S,
    charge: C,
    acquisition: Acquisition<'a, V>,
    delay: D,
    reporter: Reporter<W>,
    timing: Timing,
    phase: Phase,
    failed_phase: Option<Phase>,
    cycles: u32,
    failures: u32,
}

impl<'a, S, C, V, D, W> Sequencer<'a, S, C, V, D, W>
where
    S: FlexPin,
    C: FlexPin<Error = S::Error>,
    S::Error: core::fmt::Debug,
    V: Converter,
    D: DelayNs,
    W: Sink,
{
    pub fn new(
        sensor: S,
        charge: C,
        acquisition: Acquisition<'a, V>,
        delay: D,
        reporter: Reporter<W>,
        timing: Timing,
    ) -> Self {
        Self {
            sensor,
            charge,
            acquisition,
            delay,
            reporter,
            timing,
            phase: Phase::Idle,
            failed_phase: None,
            cycles: 0,
            failures: 0,
        }
    }

    /// Run one cycle up to and including the report, without the
    /// inter-cycle sleep.
    ///
    /// A failed cycle reports nothing. The node is still discharged when
    /// the sample request fails. If the discharge fails too, its pin error
    /// is returned and the sample error is only logged.
    pub fn measure(&mut self) -> Result<Measurement, Error<S::Error>> {
        let result = self.cycle();
        self.cycles = self.cycles.wrapping_add(1);
        if result.is_err() {
            self.failures = self.failures.wrapping_add(1);
            self.failed_phase = Some(self.phase);
        }
        self.phase = Phase::Idle;
        result
    }

    /// One full cycle: [`measure`](Self::measure), then sleep the period.
    pub fn step(&mut self) -> Result<Measurement, Error<S::Error>> {
        let result = self.measure();
        self.delay.delay_ms(self.timing.period_ms);
        result
    }

    pub fn run(&mut self) -> ! {
        loop {
            if let Err(err) = self.step() {
                rprintln!(
                    "cycle {} failed while {:?}: {}",
                    self.cycles,
                    self.failed_phase.unwrap_or(Phase::Idle),
                    err
                );
            }
            if self.cycles % STATUS_INTERVAL == 0 {
                rprintln!(
                    "cycles={} failed={} stale={} dropped={}",
                    self.cycles,
                    self.failures,
                    self.acquisition.stale_samples(),
                    self.reporter.dropped()
                );
            }
        }
    }

    /// Phase the most recent failed cycle stopped in.
    pub fn failed_phase(&self) -> Option<Phase> {
        self.failed_phase
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn acquisition(&self) -> &Acquisition<'a, V> {
        &self.acquisition
    }

    pub fn acquisition_mut(&mut self) -> &mut Acquisition<'a, V> {
        &mut self.acquisition
    }

    pub fn reporter(&self) -> &Reporter<W> {
        &self.reporter
    }

    fn cycle(&mut self) -> Result<Measurement, Error<S::Error>> {
        self.phase = Phase::Charging;
        self.sensor.configure_input().map_err(Error::Pin)?;
        self.charge.configure_output().map_err(Error::Pin)?;
        self.charge.set_high().map_err(Error::Pin)?;

        self.phase = Phase::Settling;
        self.delay.delay_us(self.timing.charge_settle_us);

        self.phase = Phase::Sampling;
        let sample = self.acquisition.request_sample(&mut self.delay);

        self.phase = Phase::Discharging;
        if let Err(err) = self.discharge() {
            if let Err(lost) = sample {
                rprintln!("sample error dropped: {}", lost);
            }
            return Err(err);
        }
        let sample = match sample {
            Ok(sample) => sample,
            Err(err) => {
                self.phase = Phase::Sampling;
                return Err(err.into());
            }
        };

        self.phase = Phase::Computing;
        let measurement = Measurement {
            raw: sample.raw,
            picofarads: capacitance_pf(sample.raw),
            fresh: sample.fresh,
        };

        self.phase = Phase::Reporting;
        self.reporter.report(&measurement);
        Ok(measurement)
    }

    fn discharge(&mut self) -> Result<(), Error<S::Error>> {
        self.charge.set_low().map_err(Error::Pin)?;
        self.sensor.configure_output().map_err(Error::Pin)?;
        self.sensor.set_low().map_err(Error::Pin)
    }
}
