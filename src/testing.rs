//! Host fakes that append everything they are asked to do to one shared
//! log, so tests can check ordering across pins, delays, converter and sink.

use std::{cell::RefCell, rc::Rc};

use embedded_hal::delay::DelayNs;

use crate::{
    acquisition::{Converter, SampleSlot},
    pin::FlexPin,
    report::Sink,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Sensor,
    Charge,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Input(Role),
    Output(Role),
    High(Role),
    Low(Role),
    DelayNs(u32),
    DelayUs(u32),
    DelayMs(u32),
    Trigger,
    Rearm,
    Cancel,
    Write(String),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub trait Writes {
    /// Text handed to the sink, one entry per write.
    fn writes(&self) -> Vec<String>;
}

impl Writes for Vec<Event> {
    fn writes(&self) -> Vec<String> {
        self.iter()
            .filter_map(|event| match event {
                Event::Write(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinFault {
    NotOutput,
    Failed,
}

pub struct FakePin {
    role: Role,
    log: EventLog,
    output: bool,
    failing: bool,
    failing_lows: u32,
}

impl FakePin {
    pub fn new(role: Role, log: &EventLog) -> Self {
        Self {
            role,
            log: log.clone(),
            output: false,
            failing: false,
            failing_lows: 0,
        }
    }

    /// Every operation fails without touching the log.
    pub fn failing(role: Role, log: &EventLog) -> Self {
        Self {
            failing: true,
            ..Self::new(role, log)
        }
    }

    /// The next `count` calls to `set_low` fail.
    pub fn failing_low(self, count: u32) -> Self {
        Self {
            failing_lows: count,
            ..self
        }
    }

    fn record(&self, event: Event) -> Result<(), PinFault> {
        if self.failing {
            return Err(PinFault::Failed);
        }
        self.log.borrow_mut().push(event);
        Ok(())
    }
}

impl FlexPin for FakePin {
    type Error = PinFault;

    fn configure_input(&mut self) -> Result<(), PinFault> {
        self.record(Event::Input(self.role))?;
        self.output = false;
        Ok(())
    }

    fn configure_output(&mut self) -> Result<(), PinFault> {
        self.record(Event::Output(self.role))?;
        self.output = true;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        if !self.output {
            return Err(PinFault::NotOutput);
        }
        self.record(Event::High(self.role))
    }

    fn set_low(&mut self) -> Result<(), PinFault> {
        if !self.output {
            return Err(PinFault::NotOutput);
        }
        if self.failing_lows > 0 {
            self.failing_lows -= 1;
            return Err(PinFault::Failed);
        }
        self.record(Event::Low(self.role))
    }
}

pub struct FakeDelay {
    log: EventLog,
}

impl FakeDelay {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}

/// Converter whose "interrupt" fires inside `trigger`, or never.
pub struct FakeConverter<'a> {
    slot: &'a SampleSlot,
    log: EventLog,
    sample: Option<i16>,
    cancellable: bool,
}

impl<'a> FakeConverter<'a> {
    pub fn completing(slot: &'a SampleSlot, log: &EventLog, sample: i16) -> Self {
        Self {
            slot,
            log: log.clone(),
            sample: Some(sample),
            cancellable: false,
        }
    }

    /// Conversions are triggered but never complete.
    pub fn silent(slot: &'a SampleSlot, log: &EventLog) -> Self {
        Self {
            slot,
            log: log.clone(),
            sample: None,
            cancellable: false,
        }
    }

    /// `cancel` reports the pending conversion as discarded.
    pub fn cancellable(self) -> Self {
        Self {
            cancellable: true,
            ..self
        }
    }

    pub fn complete_with(&mut self, sample: i16) {
        self.sample = Some(sample);
    }
}

impl Converter for FakeConverter<'_> {
    fn trigger(&mut self) {
        self.log.borrow_mut().push(Event::Trigger);
        if let Some(sample) = self.sample {
            let slot = self.slot;
            slot.on_conversion_complete(sample, self);
        }
    }

    fn rearm(&mut self) {
        self.log.borrow_mut().push(Event::Rearm);
    }

    fn cancel(&mut self) -> bool {
        self.log.borrow_mut().push(Event::Cancel);
        self.cancellable
    }
}

/// Sink that takes at most `room` bytes per write.
pub struct FakeSink {
    log: EventLog,
    room: usize,
}

impl FakeSink {
    pub fn new(log: &EventLog) -> Self {
        Self::with_room(log, usize::MAX)
    }

    pub fn with_room(log: &EventLog, room: usize) -> Self {
        Self {
            log: log.clone(),
            room,
        }
    }
}

impl Sink for FakeSink {
    fn write(&mut self, bytes: &[u8]) -> usize {
        let taken = &bytes[..bytes.len().min(self.room)];
        self.log
            .borrow_mut()
            .push(Event::Write(String::from_utf8_lossy(taken).into_owned()));
        taken.len()
    }
}
