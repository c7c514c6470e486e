//! Text records for the debug channel.

use core::fmt::{self, Write};

use heapless::String;

use crate::{capacitance::whole_picofarads, config::ReportFormat, sequencer::Measurement};

/// Longest record: `"-32768,-2147483648\n"`.
const RECORD_CAPACITY: usize = 24;

/// Best-effort byte sink. Must not block when nobody is listening.
pub trait Sink {
    /// Write as much of `bytes` as fits and return how many were taken.
    fn write(&mut self, bytes: &[u8]) -> usize;
}

impl Sink for rtt_target::UpChannel {
    fn write(&mut self, bytes: &[u8]) -> usize {
        rtt_target::UpChannel::write(self, bytes)
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, bytes: &[u8]) -> usize {
        S::write(self, bytes)
    }
}

/// One formatted, newline-terminated line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record(String<RECORD_CAPACITY>);

impl Record {
    /// `"<pf>\n"` with the capacitance truncated to whole picofarads.
    pub fn capacitance(picofarads: f32) -> Self {
        let mut line = String::new();
        // Cannot overflow: an i32 is at most 11 characters.
        let _ = writeln!(line, "{}", whole_picofarads(picofarads));
        Self(line)
    }

    /// `"<raw>,<pf>\n"`.
    pub fn raw_and_capacitance(raw: i16, picofarads: f32) -> Self {
        let mut line = String::new();
        let _ = writeln!(line, "{},{}", raw, whole_picofarads(picofarads));
        Self(line)
    }

    pub fn for_measurement(measurement: &Measurement, format: ReportFormat) -> Self {
        match format {
            ReportFormat::Capacitance => Self::capacitance(measurement.picofarads),
            ReportFormat::RawAndCapacitance => {
                Self::raw_and_capacitance(measurement.raw.get(), measurement.picofarads)
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Formats measurements and pushes them into a [`Sink`].
pub struct Reporter<S> {
    sink: S,
    format: ReportFormat,
    dropped: u32,
}

impl<S: Sink> Reporter<S> {
    pub fn new(sink: S, format: ReportFormat) -> Self {
        Self {
            sink,
            format,
            dropped: 0,
        }
    }

    /// Emit one record. A record the sink only partly accepts counts as
    /// dropped; nothing is retried.
    pub fn report(&mut self, measurement: &Measurement) {
        let record = Record::for_measurement(measurement, self.format);
        let written = self.sink.write(record.as_bytes());
        if written < record.as_bytes().len() {
            self.dropped = self.dropped.wrapping_add(1);
        }
    }

    /// Records the sink did not fully accept.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

/// One record as read back from the debug channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reading {
    /// Converter code, only present in `"<raw>,<pf>"` records.
    pub raw: Option<i16>,
    pub picofarads: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Malformed,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty line"),
            ParseError::Malformed => write!(f, "not a capacitance record"),
        }
    }
}

impl Reading {
    /// Parse `"<pf>"` or `"<raw>,<pf>"`, with or without the line ending.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        match line.split_once(',') {
            None => Ok(Self {
                raw: None,
                picofarads: field(line)?,
            }),
            Some((raw, picofarads)) => Ok(Self {
                raw: Some(field(raw)?),
                picofarads: field(picofarads)?,
            }),
        }
    }
}

fn field<T: core::str::FromStr>(text: &str) -> Result<T, ParseError> {
    text.trim().parse().map_err(|_| ParseError::Malformed)
}
