//! Interrupt-driven single-channel SAADC on a one-element EasyDMA buffer.

use core::sync::atomic::{Ordering, compiler_fence};

use critical_section_lock_mut::LockMut;
use microbit::hal::pac::{self, SAADC};

use mb2_capsense::{Converter, SampleSlot};

/// Latest conversion, written only by the SAADC interrupt.
pub static SLOT: SampleSlot = SampleSlot::new();

static DRIVER: LockMut<Saadc> = LockMut::new();

/// EasyDMA target. Only the peripheral writes it; only the interrupt
/// reads it.
static mut RESULT: [i16; 1] = [0];

pub struct Saadc {
    regs: SAADC,
}

impl Saadc {
    /// Single-ended AIN1 with the nRF SDK defaults: 10-bit, no
    /// oversampling, gain 1/6, internal 0.6 V reference, 10 µs acquisition.
    ///
    /// Panics if the peripheral does not come up.
    fn new(regs: SAADC) -> Self {
        regs.enable.write(|w| w.enable().enabled());
        regs.resolution.write(|w| w.val()._10bit());
        regs.oversample.write(|w| w.oversample().bypass());
        regs.samplerate.write(|w| w.mode().task());
        regs.ch[0].config.write(|w| {
            w.resp().bypass();
            w.resn().bypass();
            w.gain().gain1_6();
            w.refsel().internal();
            w.tacq()._10us();
            w.mode().se();
            w.burst().disabled()
        });
        regs.ch[0].pselp.write(|w| w.pselp().analog_input1());
        regs.ch[0].pseln.write(|w| w.pseln().nc());
        if regs.enable.read().enable().is_disabled() {
            panic!("SAADC failed to enable");
        }

        regs.events_end.reset();
        regs.intenset.write(|w| w.end().set());
        let mut saadc = Self { regs };
        saadc.rearm();
        saadc
    }

    /// END interrupt: publish the buffered result and re-arm.
    fn complete(&mut self, slot: &SampleSlot) {
        if self.regs.events_end.read().bits() == 0 {
            return;
        }
        self.regs.events_end.reset();
        compiler_fence(Ordering::SeqCst);
        // Safety: the DMA transfer into RESULT finished with the END event
        // and the buffer is not re-armed until after this read.
        let sample = unsafe { (&raw const RESULT).cast::<i16>().read_volatile() };
        slot.on_conversion_complete(sample, self);
    }
}

impl Converter for Saadc {
    fn trigger(&mut self) {
        self.regs.tasks_sample.write(|w| unsafe { w.bits(1) });
    }

    fn rearm(&mut self) {
        self.regs
            .result
            .ptr
            .write(|w| unsafe { w.ptr().bits((&raw mut RESULT) as u32) });
        self.regs.result.maxcnt.write(|w| unsafe { w.maxcnt().bits(1) });
        compiler_fence(Ordering::SeqCst);
        self.regs.tasks_start.write(|w| unsafe { w.bits(1) });
    }

    /// Stop the converter, drop any END not yet handled and re-arm. Runs
    /// with the lock held, so the interrupt cannot publish in between.
    fn cancel(&mut self) -> bool {
        self.regs.events_stopped.reset();
        self.regs.tasks_stop.write(|w| unsafe { w.bits(1) });
        while self.regs.events_stopped.read().bits() == 0 {}
        self.regs.events_stopped.reset();
        self.regs.events_end.reset();
        self.rearm();
        true
    }
}

/// Main-loop handle on the interrupt-shared driver.
pub struct SharedSaadc;

impl Converter for SharedSaadc {
    fn trigger(&mut self) {
        DRIVER.with_lock(|saadc| saadc.trigger());
    }

    fn rearm(&mut self) {
        DRIVER.with_lock(|saadc| saadc.rearm());
    }

    fn cancel(&mut self) -> bool {
        DRIVER.with_lock(|saadc| saadc.cancel())
    }
}

/// Configure the converter, arm it and enable its interrupt.
pub fn init(regs: SAADC) -> SharedSaadc {
    DRIVER.init(Saadc::new(regs));
    pac::NVIC::unpend(pac::Interrupt::SAADC);
    // Safety: DRIVER is initialized, so the handler has something to lock.
    unsafe {
        pac::NVIC::unmask(pac::Interrupt::SAADC);
    }
    SharedSaadc
}

pub fn on_interrupt() {
    DRIVER.with_lock(|saadc| saadc.complete(&SLOT));
}
