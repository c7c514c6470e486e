#![no_main]
#![no_std]

mod pins;
mod saadc;

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init, set_print_channel};

use cortex_m_rt::entry;
use microbit::{
    board::Board,
    hal::{pac::interrupt, timer},
};

use mb2_capsense::{Acquisition, Config, ReportFormat, Reporter, Sequencer};

use pins::BoardPin;

const CONFIG: Config = {
    let config = if cfg!(feature = "hardened") {
        Config::hardened()
    } else {
        Config::DEFAULT
    };
    if cfg!(feature = "raw-csv") {
        config.with_format(ReportFormat::RawAndCapacitance)
    } else {
        config
    }
};

#[interrupt]
fn SAADC() {
    saadc::on_interrupt();
}

#[entry]
fn main() -> ! {
    // Records on channel 0, everything else on channel 1. Both drop
    // output instead of blocking when no host is reading.
    let channels = rtt_init! {
        up: {
            0: {
                size: 1024,
                mode: NoBlockSkip,
                name: "Capacitance"
            }
            1: {
                size: 1024,
                mode: NoBlockSkip,
                name: "Log"
            }
        }
    };
    set_print_channel(channels.up.1);

    let board = Board::take().unwrap();
    // Sensor on edge ring 1 (P0.03, AIN1), charge on ring 2 (P0.04).
    let sensor = BoardPin::new(board.edge.e01.degrade());
    let charge = BoardPin::new(board.edge.e02.degrade());
    let delay = timer::Timer::new(board.TIMER0);

    let converter = saadc::init(board.ADC);
    let acquisition = Acquisition::new(converter, &saadc::SLOT, &CONFIG);
    let reporter = Reporter::new(channels.up.0, CONFIG.format);
    let mut sequencer = Sequencer::new(sensor, charge, acquisition, delay, reporter, CONFIG.timing);

    rprintln!(
        "sampling every {} ms, {:?}, {:?}",
        CONFIG.timing.period_ms,
        CONFIG.staleness,
        CONFIG.format
    );
    sequencer.run()
}
