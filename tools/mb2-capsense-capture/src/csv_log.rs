//! CSV recording of readings.

use std::{fs::File, io, path::Path, time::Duration};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use mb2_capsense::Reading;

const HEADER: [&str; 3] = ["Timestamp", "Elapsed_Seconds", "Capacitance"];

pub struct CsvLog<W: io::Write> {
    writer: csv::Writer<W>,
}

impl CsvLog<File> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {:?}", path))?;
        Self::new(file)
    }
}

impl<W: io::Write> CsvLog<W> {
    /// Start a log on `inner` and write the header row.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(Self { writer })
    }

    /// One row: wall-clock time, seconds since capture start, picofarads.
    pub fn record(
        &mut self,
        timestamp: NaiveDateTime,
        elapsed: Duration,
        reading: &Reading,
    ) -> Result<()> {
        self.writer.write_record([
            timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            format!("{:.4}", elapsed.as_secs_f64()),
            reading.picofarads.to_string(),
        ])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
