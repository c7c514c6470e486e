//! Host-side capture of capacitance records from the micro:bit over RTT.

mod csv_log;
mod lines;

use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use csv_log::CsvLog;
use lines::LineSplitter;
use mb2_capsense::{ParseError, Reading};
use probe_rs::{Permissions, Session, rtt::Rtt};
use tracing::{debug, info, warn};

// Links the host critical section rtt-target needs.
use critical_section as _;

/// Bytes requested per RTT read.
const READ_BYTES: usize = 256;

/// Pause between reads that returned nothing.
const IDLE_POLL: Duration = Duration::from_millis(5);

/// Pause after a failed read.
const ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Print capacitance readings streamed by the board, optionally saving them as CSV
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target chip, as named by probe-rs
    #[arg(short, long, default_value = "nRF52833_xxAA")]
    chip: String,

    /// RTT up channel carrying the records
    #[arg(long, default_value_t = 0)]
    channel: usize,

    /// Also record readings to this CSV file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("mb2_capsense_capture=debug".parse()?),
            )
            .init();
    }

    let mut session = Session::auto_attach(args.chip.as_str(), Permissions::default())
        .with_context(|| format!("Failed to attach to {}", args.chip))?;
    let mut core = session.core(0)?;
    let mut rtt = Rtt::attach(&mut core).context("Failed to attach RTT")?;
    let channel = rtt
        .up_channel(args.channel)
        .with_context(|| format!("No RTT up channel {}", args.channel))?;

    let mut csv = args.output.as_deref().map(CsvLog::create).transpose()?;
    if let Some(path) = &args.output {
        info!("recording to {:?}", path);
    }

    let start = Instant::now();
    let mut splitter = LineSplitter::new();
    let mut buf = [0u8; READ_BYTES];
    loop {
        let count = match channel.read(&mut core, &mut buf) {
            Ok(count) => count,
            Err(err) => {
                warn!("RTT read failed: {}", err);
                thread::sleep(ERROR_BACKOFF);
                continue;
            }
        };
        if count == 0 {
            thread::sleep(IDLE_POLL);
            continue;
        }

        for line in splitter.push(&buf[..count]) {
            let reading = match Reading::parse(&line) {
                Ok(reading) => reading,
                Err(ParseError::Empty) => continue,
                Err(err) => {
                    debug!("skipping {:?}: {}", line, err);
                    continue;
                }
            };
            match reading.raw {
                Some(raw) => println!("{},{}", raw, reading.picofarads),
                None => println!("{}", reading.picofarads),
            }
            if let Some(csv) = csv.as_mut() {
                csv.record(Local::now().naive_local(), start.elapsed(), &reading)?;
            }
        }
        if let Some(csv) = csv.as_mut() {
            csv.flush()?;
        }
    }
}
