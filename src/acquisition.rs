//! Interrupt-fed acquisition of single converter samples.

use core::sync::atomic::{AtomicI16, AtomicU32, Ordering};

use embedded_hal::delay::DelayNs;
use rtt_target::rprintln;

use crate::{
    capacitance::RawSample,
    config::{Config, Staleness},
    error::AcquireError,
};

/// Hardware side of a one-shot converter.
pub trait Converter {
    /// Start one conversion into the armed buffer.
    fn trigger(&mut self);

    /// Re-arm the result buffer for the next conversion. Called from the
    /// completion interrupt, so it must not block.
    fn rearm(&mut self);

    /// Abort a conversion that has not completed. Returns true when it is
    /// guaranteed never to reach the slot.
    fn cancel(&mut self) -> bool {
        false
    }
}

/// Latest completed sample plus a count of completed conversions.
pub struct SampleSlot {
    value: AtomicI16,
    completed: AtomicU32,
}

impl SampleSlot {
    pub const fn new() -> Self {
        Self {
            value: AtomicI16::new(0),
            completed: AtomicU32::new(0),
        }
    }

    /// Completion handler. Stores `sample`, publishes it, then re-arms the
    /// converter. Bounded and non-blocking, for interrupt context.
    pub fn on_conversion_complete<C: Converter + ?Sized>(&self, sample: i16, converter: &mut C) {
        self.value.store(sample, Ordering::Relaxed);
        // Single writer, so a plain load/store pair is enough.
        let completed = self.completed.load(Ordering::Relaxed);
        self.completed
            .store(completed.wrapping_add(1), Ordering::Release);
        converter.rearm();
    }

    pub fn latest(&self) -> RawSample {
        RawSample::new(self.value.load(Ordering::Relaxed))
    }

    /// Conversions completed since startup, wrapping.
    pub fn completed(&self) -> u32 {
        self.completed.load(Ordering::Acquire)
    }
}

impl Default for SampleSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// One value read from the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    pub raw: RawSample,
    /// False when the conversion triggered for this request had not
    /// completed and an older value was returned.
    pub fresh: bool,
}

/// Acquisition driver: triggers conversions and reads them back from the
/// slot the interrupt fills.
pub struct Acquisition<'a, C> {
    converter: C,
    slot: &'a SampleSlot,
    conversion_us: u32,
    staleness: Staleness,
    /// Conversions this driver expects to have completed.
    issued: u32,
    stale: u32,
}

impl<'a, C: Converter> Acquisition<'a, C> {
    /// Takes over an initialized, armed converter whose completion
    /// interrupt feeds `slot`.
    pub fn new(converter: C, slot: &'a SampleSlot, config: &Config) -> Self {
        Self {
            converter,
            slot,
            conversion_us: config.timing.conversion_us,
            staleness: config.staleness,
            issued: slot.completed(),
            stale: 0,
        }
    }

    /// Trigger a conversion, wait the fixed conversion delay and return the
    /// most recent sample.
    ///
    /// With [`Staleness::Trust`] this never fails; a conversion still in
    /// flight yields the previous value with `fresh == false`. With
    /// [`Staleness::Poll`] the call keeps waiting in 1 µs steps and fails
    /// once the budget is spent.
    pub fn request_sample<D: DelayNs>(&mut self, delay: &mut D) -> Result<Sample, AcquireError> {
        self.issued = self.issued.wrapping_add(1);
        self.converter.trigger();
        delay.delay_us(self.conversion_us);

        let fresh = match self.staleness {
            Staleness::Trust => self.is_complete(),
            Staleness::Poll { max_polls } => {
                let mut polls = 0;
                while !self.is_complete() {
                    if polls == max_polls {
                        let err = AcquireError::Timeout {
                            completed: self.slot.completed(),
                            issued: self.issued,
                        };
                        rprintln!("{} after {} polls", err, polls);
                        // A conversion that may still land keeps its count,
                        // so its late sample never passes for a newer one.
                        if self.converter.cancel() {
                            self.issued = self.slot.completed();
                        }
                        return Err(err);
                    }
                    delay.delay_us(1);
                    polls += 1;
                }
                true
            }
        };
        if !fresh {
            self.stale = self.stale.wrapping_add(1);
        }
        Ok(Sample {
            raw: self.slot.latest(),
            fresh,
        })
    }

    /// Number of requests answered with a value older than the conversion
    /// they triggered.
    pub fn stale_samples(&self) -> u32 {
        self.stale
    }

    pub fn converter_mut(&mut self) -> &mut C {
        &mut self.converter
    }

    fn is_complete(&self) -> bool {
        self.slot.completed().wrapping_sub(self.issued) as i32 >= 0
    }
}
