//! Real-time sampling loop.
//!
//! Drives the whole transmitter at a fixed sample rate. Each tick:
//!
//! ```text
//! ADC ──▶ window ──▶ smoother ──▶ modulator ──▶ carrier period/duty
//!                                                     │
//! buttons ──▶ frequency controller ──(on change)──▶ carrier divider
//!                                                     │
//!                                   sleep until start + k·interval
//! ```
//!
//! # Rules
//!
//! - Modulation is written before the frequency check within a tick
//! - Deadlines are absolute (`start + k * 1e6 / rate`), never "now + interval"
//! - A late tick is recorded, not compensated: the next deadline is unchanged
//! - A failed ADC read repeats the last good sample; the loop never stalls
//! - Logging only through `rt_*!` into the loop's own stream

use crate::audio::{LowPassSmoother, ModulationParameters, Modulator, SampleWindow, DEFAULT_WINDOW_SIZE};
use crate::carrier::{FrequencyController, FrequencySetting, SharedFrequencyCell};
use crate::config::PipelineConfig;
use crate::fault::{FaultCode, FaultState};
use crate::hal::{elapsed_us, AdcFault, AudioInput, Button, ButtonInput, CarrierOutput, MonotonicClock};
use crate::logging::LogStream;
use crate::{rt_info, rt_warn};

/// State shared between the loop and other contexts.
#[derive(Clone, Copy)]
pub struct LoopShared<'a> {
    /// Frequency/divider pair (written by the controller)
    pub frequency: &'a SharedFrequencyCell,
    pub fault: &'a FaultState,
    /// Log stream owned by this loop (single producer)
    pub log: &'a LogStream,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Index of this tick (0 = first)
    pub index: u64,
    /// Sample fed to the filters (last good sample on ADC fault)
    pub raw: u16,
    pub adc_fault: Option<AdcFault>,
    /// Sample after the enabled filter stages
    pub filtered: u16,
    /// Period/duty written to the carrier
    pub params: ModulationParameters,
    /// New frequency/divider if the controller retuned this tick
    pub retune: Option<FrequencySetting>,
    /// Absolute deadline the loop slept until
    pub deadline_us: u64,
    /// How far past the deadline the tick's work finished
    pub late_by_us: u64,
}

/// Sampling loop over the four peripherals.
///
/// `N` is the moving-average window length (power of 2).
pub struct SamplingLoop<'a, A, C, B, K, const N: usize = DEFAULT_WINDOW_SIZE> {
    audio: A,
    carrier: C,
    buttons: B,
    clock: K,

    config: PipelineConfig,
    window: SampleWindow<N>,
    smoother: LowPassSmoother,
    modulator: Modulator,
    controller: FrequencyController<'a>,
    shared: LoopShared<'a>,

    // Scheduling
    started: bool,
    start_us: u64,
    tick_index: u64,

    // ADC fault substitution
    last_good_sample: u16,
    adc_failing: bool,
    adc_failed_reads: u32,
}

impl<'a, A, C, B, K, const N: usize> SamplingLoop<'a, A, C, B, K, N>
where
    A: AudioInput,
    C: CarrierOutput,
    B: ButtonInput,
    K: MonotonicClock,
{
    /// Create a loop. Nothing touches the hardware until [`start`](Self::start).
    ///
    /// `config` should already be validated.
    pub fn new(
        audio: A,
        carrier: C,
        buttons: B,
        clock: K,
        shared: LoopShared<'a>,
        config: PipelineConfig,
    ) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid pipeline config");
        Self {
            audio,
            carrier,
            buttons,
            clock,
            config,
            window: SampleWindow::new(),
            smoother: LowPassSmoother::new(),
            modulator: Modulator::new(config.base_period),
            controller: FrequencyController::new(
                shared.frequency,
                config.debounce_ms,
                config.step_deci_mhz,
            ),
            shared,
            started: false,
            start_us: 0,
            tick_index: 0,
            last_good_sample: 0,
            adc_failing: false,
            adc_failed_reads: 0,
        }
    }

    /// Program the carrier with the current divider and the rest period,
    /// and take the schedule origin.
    pub fn start(&mut self) {
        let setting = self.shared.frequency.load();
        let rest = self.modulator.rest();

        self.carrier.set_divider(setting.divider);
        self.carrier.set_period(rest.period);
        self.carrier.set_duty(rest.duty);

        self.start_us = self.clock.now_us();
        self.tick_index = 0;
        self.started = true;

        rt_info!(
            self.shared.log,
            self.start_us,
            "carrier {} div {:.3}, {} Hz, window {}{}",
            setting.frequency,
            setting.divider,
            self.config.sample_rate_hz,
            if self.config.moving_average { N } else { 1 },
            if self.config.smoothing { " + lowpass" } else { "" }
        );
    }

    /// Run one tick and sleep until the next deadline.
    ///
    /// Starts the loop first if [`start`](Self::start) was not called.
    pub fn tick(&mut self) -> TickReport {
        if !self.started {
            self.start();
        }
        let index = self.tick_index;

        // 1. Sample
        let (raw, adc_fault) = self.read_sample();

        // 2. Filter
        let mut filtered = raw;
        if self.config.moving_average {
            filtered = self.window.push(filtered);
        }
        if self.config.smoothing {
            filtered = self.smoother.smooth(filtered);
        }

        // 3. Modulate
        let params = self.modulator.modulate(filtered);
        self.carrier.set_period(params.period);
        self.carrier.set_duty(params.duty);

        // 4. Buttons
        let now = self.clock.now_us();
        self.log_adc_transition(now, adc_fault);

        let up = self.buttons.is_pressed(Button::Up);
        let down = self.buttons.is_pressed(Button::Down);
        let retune = self.controller.poll_and_adjust(now, up, down);
        if let Some(setting) = retune {
            self.carrier.set_divider(setting.divider);
            rt_info!(
                self.shared.log,
                now,
                "tuned {} div {:.3}",
                setting.frequency,
                setting.divider
            );
        }

        // 5. Wait for the next absolute deadline
        self.tick_index += 1;
        let deadline_us = self.start_us + self.config.tick_offset_us(self.tick_index);
        let finished = self.clock.now_us();
        let late_by_us = elapsed_us(deadline_us, finished);
        if late_by_us > 0 {
            let late = late_by_us.min(u32::MAX as u64) as u32;
            self.shared.fault.record(FaultCode::DeadlineMissed, late);
            rt_warn!(self.shared.log, finished, "tick {} late by {} us", index, late);
        }
        self.clock.sleep_until(deadline_us);

        TickReport {
            index,
            raw,
            adc_fault,
            filtered,
            params,
            retune,
            deadline_us,
            late_by_us,
        }
    }

    /// Run forever.
    pub fn run(mut self) -> ! {
        self.start();
        loop {
            self.tick();
        }
    }

    fn read_sample(&mut self) -> (u16, Option<AdcFault>) {
        match self.audio.read() {
            Ok(sample) => {
                self.last_good_sample = sample;
                (sample, None)
            }
            Err(fault) => {
                self.adc_failed_reads = self.adc_failed_reads.saturating_add(1);
                self.shared.fault.record(FaultCode::AdcReadFailed, self.adc_failed_reads);
                (self.last_good_sample, Some(fault))
            }
        }
    }

    /// Log ADC failure onset and recovery, not every failed read.
    fn log_adc_transition(&mut self, now: u64, fault: Option<AdcFault>) {
        match (self.adc_failing, fault) {
            (false, Some(fault)) => {
                self.adc_failing = true;
                rt_warn!(
                    self.shared.log,
                    now,
                    "{}, holding sample {}",
                    fault,
                    self.last_good_sample
                );
            }
            (true, None) => {
                self.adc_failing = false;
                rt_info!(
                    self.shared.log,
                    now,
                    "ADC recovered after {} failed reads",
                    self.adc_failed_reads
                );
                self.adc_failed_reads = 0;
            }
            _ => {}
        }
    }

    /// Ticks completed since start
    #[inline]
    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }

    /// Schedule origin in microseconds
    #[inline]
    pub fn start_us(&self) -> u64 {
        self.start_us
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[inline]
    pub fn controller(&self) -> &FrequencyController<'a> {
        &self.controller
    }

    #[inline]
    pub fn carrier(&self) -> &C {
        &self.carrier
    }

    #[inline]
    pub fn clock(&self) -> &K {
        &self.clock
    }

    #[inline]
    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    #[inline]
    pub fn buttons_mut(&mut self) -> &mut B {
        &mut self.buttons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::CarrierFrequency;
    use crate::sim::{SimAudio, SimButtons, SimCarrier, SimClock};

    struct Fixture {
        frequency: SharedFrequencyCell,
        fault: FaultState,
        log: LogStream,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                frequency: SharedFrequencyCell::default(),
                fault: FaultState::new(),
                log: LogStream::new(),
            }
        }

        fn shared(&self) -> LoopShared<'_> {
            LoopShared {
                frequency: &self.frequency,
                fault: &self.fault,
                log: &self.log,
            }
        }
    }

    #[test]
    fn test_start_programs_carrier() {
        let fx = Fixture::new();
        let mut sampler: SamplingLoop<'_, _, _, _, _> = SamplingLoop::new(
            SimAudio::constant(0),
            SimCarrier::new(),
            SimButtons::new(),
            SimClock::new(),
            fx.shared(),
            PipelineConfig::default(),
        );
        sampler.start();

        let carrier = sampler.carrier();
        assert_eq!(carrier.period, 255);
        assert_eq!(carrier.duty, 127);
        assert!((carrier.divider - 1.9).abs() < 1e-6);
        assert_eq!(fx.log.pending(), 1);
    }

    #[test]
    fn test_unfiltered_path_passes_raw_sample() {
        let fx = Fixture::new();
        let config = PipelineConfig {
            moving_average: false,
            smoothing: false,
            ..Default::default()
        };
        let mut sampler: SamplingLoop<'_, _, _, _, _> = SamplingLoop::new(
            SimAudio::constant(160),
            SimCarrier::new(),
            SimButtons::new(),
            SimClock::new(),
            fx.shared(),
            config,
        );

        let report = sampler.tick();
        assert_eq!(report.filtered, 160);
        assert_eq!(report.params.period, 265);
    }

    #[test]
    fn test_adc_fault_holds_last_good_sample() {
        let fx = Fixture::new();
        let config = PipelineConfig {
            moving_average: false,
            smoothing: false,
            ..Default::default()
        };
        let mut sampler: SamplingLoop<'_, _, _, _, _> = SamplingLoop::new(
            SimAudio::constant(800),
            SimCarrier::new(),
            SimButtons::new(),
            SimClock::new(),
            fx.shared(),
            config,
        );

        sampler.tick();
        sampler.audio_mut().fail_next(3);
        for _ in 0..3 {
            let report = sampler.tick();
            assert_eq!(report.raw, 800);
            assert_eq!(report.adc_fault, Some(AdcFault::Timeout));
        }
        assert_eq!(sampler.tick().adc_fault, None);

        assert_eq!(fx.fault.adc_failures(), 3);
        assert_eq!(fx.frequency.frequency(), CarrierFrequency::DEFAULT);
        // start + onset + recovery
        assert_eq!(fx.log.pending(), 3);
    }
}
