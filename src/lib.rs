//! Capacitance sensing on the micro:bit v2: charge a node, sample it with
//! the ADC, discharge it and report picofarads over RTT. Board adapters
//! live in the `mb2-capsense-firmware` crate.

#![cfg_attr(not(test), no_std)]

pub mod acquisition;
pub mod capacitance;
pub mod config;
pub mod error;
pub mod pin;
pub mod report;
pub mod sequencer;

#[cfg(test)]
mod testing;

pub use acquisition::{Acquisition, Converter, Sample, SampleSlot};
pub use capacitance::{RawSample, capacitance_pf, whole_picofarads};
pub use config::{Config, ReportFormat, Staleness, Timing};
pub use error::{AcquireError, Error};
pub use pin::FlexPin;
pub use report::{ParseError, Reading, Record, Reporter, Sink};
pub use sequencer::{Measurement, Phase, Sequencer};
