//! Simulated peripherals.
//!
//! Deterministic stand-ins for the ADC, carrier, buttons and clock. Time is
//! virtual: `sleep_until` jumps straight to the deadline, and every clock
//! read can be charged a fixed cost to model per-tick processing time.
//! Used by the host build of the binary and by the tests.

use core::cell::Cell;

use crate::audio::TestTone;
use crate::hal::{AdcFault, AudioInput, Button, ButtonInput, CarrierOutput, MonotonicClock};

/// Virtual microsecond clock.
#[derive(Debug, Default)]
pub struct SimClock {
    now: Cell<u64>,
    /// Time charged on every `now_us()` call
    read_cost_us: u64,
    sleeps: u32,
    last_deadline_us: Option<u64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that advances `cost_us` on every read
    pub fn with_read_cost(cost_us: u64) -> Self {
        Self {
            read_cost_us: cost_us,
            ..Self::default()
        }
    }

    /// Move time forward without sleeping
    pub fn advance(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }

    /// Current virtual time, without charging a read
    pub fn peek_us(&self) -> u64 {
        self.now.get()
    }

    /// Number of `sleep_until` calls
    pub fn sleeps(&self) -> u32 {
        self.sleeps
    }

    /// Deadline of the latest `sleep_until`
    pub fn last_deadline_us(&self) -> Option<u64> {
        self.last_deadline_us
    }
}

impl MonotonicClock for SimClock {
    fn now_us(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.read_cost_us);
        now
    }

    fn sleep_until(&mut self, deadline_us: u64) {
        self.sleeps += 1;
        self.last_deadline_us = Some(deadline_us);
        if deadline_us > self.now.get() {
            self.now.set(deadline_us);
        }
    }
}

/// Sample source behind [`SimAudio`].
#[derive(Debug, Clone, Copy)]
pub enum SimSource {
    /// Same code on every read
    Constant(u16),
    /// Sine test tone
    Tone(TestTone),
}

/// Simulated ADC with fault injection.
#[derive(Debug, Clone)]
pub struct SimAudio {
    source: SimSource,
    fail_next: u32,
    reads: u32,
}

impl SimAudio {
    pub fn constant(code: u16) -> Self {
        Self::new(SimSource::Constant(code))
    }

    /// Tone at `freq_hz` for a loop sampling at `sample_rate` Hz
    pub fn tone(freq_hz: u32, sample_rate: u32) -> Self {
        Self::new(SimSource::Tone(TestTone::new(freq_hz, sample_rate)))
    }

    pub fn new(source: SimSource) -> Self {
        Self {
            source,
            fail_next: 0,
            reads: 0,
        }
    }

    /// Make the next `count` reads fail with [`AdcFault::Timeout`]
    pub fn fail_next(&mut self, count: u32) {
        self.fail_next = count;
    }

    pub fn set_source(&mut self, source: SimSource) {
        self.source = source;
    }

    /// Total read attempts
    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl AudioInput for SimAudio {
    fn read(&mut self) -> Result<u16, AdcFault> {
        self.reads += 1;
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(AdcFault::Timeout);
        }
        Ok(match &mut self.source {
            SimSource::Constant(code) => *code,
            SimSource::Tone(tone) => tone.next_code(),
        })
    }
}

/// Carrier that records what was written to it.
///
/// Every write takes a sequence number so tests can check write order.
#[derive(Debug, Default, Clone)]
pub struct SimCarrier {
    pub period: u16,
    pub duty: u16,
    pub divider: f32,
    pub period_writes: u32,
    pub duty_writes: u32,
    pub divider_writes: u32,
    /// Sequence number of the last period write
    pub period_seq: u32,
    /// Sequence number of the last divider write
    pub divider_seq: u32,
    seq: u32,
}

impl SimCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&mut self) -> u32 {
        self.seq += 1;
        self.seq
    }
}

impl CarrierOutput for SimCarrier {
    fn set_divider(&mut self, ratio: f32) {
        self.divider = ratio;
        self.divider_writes += 1;
        self.divider_seq = self.next_seq();
    }

    fn set_period(&mut self, ticks: u16) {
        self.period = ticks;
        self.period_writes += 1;
        self.period_seq = self.next_seq();
    }

    fn set_duty(&mut self, ticks: u16) {
        self.duty = ticks;
        self.duty_writes += 1;
        self.next_seq();
    }
}

/// Active-low button pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimButtons {
    up_held: bool,
    down_held: bool,
}

impl SimButtons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: Button) {
        self.set(button, true);
    }

    pub fn release(&mut self, button: Button) {
        self.set(button, false);
    }

    pub fn release_all(&mut self) {
        self.up_held = false;
        self.down_held = false;
    }

    fn set(&mut self, button: Button, held: bool) {
        match button {
            Button::Up => self.up_held = held,
            Button::Down => self.down_held = held,
        }
    }
}

impl ButtonInput for SimButtons {
    fn is_high(&mut self, button: Button) -> bool {
        // Pull-up: released reads high
        match button {
            Button::Up => !self.up_held,
            Button::Down => !self.down_held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_read_cost_and_sleep() {
        let mut clock = SimClock::with_read_cost(10);
        assert_eq!(clock.now_us(), 0);
        assert_eq!(clock.now_us(), 10);

        clock.sleep_until(125);
        assert_eq!(clock.peek_us(), 125);

        // Past deadline: no time travel backwards
        clock.sleep_until(50);
        assert_eq!(clock.peek_us(), 125);
        assert_eq!(clock.sleeps(), 2);
    }

    #[test]
    fn test_audio_fault_injection() {
        let mut audio = SimAudio::constant(1000);
        audio.fail_next(2);
        assert_eq!(audio.read(), Err(AdcFault::Timeout));
        assert_eq!(audio.read(), Err(AdcFault::Timeout));
        assert_eq!(audio.read(), Ok(1000));
        assert_eq!(audio.reads(), 3);
    }

    #[test]
    fn test_buttons_are_active_low() {
        let mut buttons = SimButtons::new();
        assert!(buttons.is_high(Button::Up));
        buttons.press(Button::Up);
        assert!(!buttons.is_high(Button::Up));
        assert!(buttons.is_pressed(Button::Up));
        assert!(!buttons.is_pressed(Button::Down));
    }
}
