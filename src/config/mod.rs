//! Module: config
//!
//! Purpose: Configuration system for FmPwmTx.
//!
//! Architecture:
//! - `TransmitterConfig`: live parameters as atomics, global `CONFIG` instance
//! - Every change bumps a generation counter
//! - `PipelineConfig`: plain `Copy` snapshot taken by the sampling loop at startup
//!
//! Safety: RT-safe. All access via atomics, no locks.

pub mod error;

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use crate::audio::MAX_DEVIATION_TICKS;
use crate::carrier::{CarrierFrequency, DEFAULT_DEBOUNCE_MS, DEFAULT_STEP_DECI_MHZ};

pub use error::ConfigError;

/// Lowest supported sample rate (Hz)
pub const MIN_SAMPLE_RATE_HZ: u32 = 8_000;
/// Highest supported sample rate (Hz)
pub const MAX_SAMPLE_RATE_HZ: u32 = 44_100;

/// Default sample rate (Hz)
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 8_000;
/// Default PWM wrap value
pub const DEFAULT_BASE_PERIOD: u16 = 255;
/// Default power-on frequency in tenths of MHz (90.0 MHz)
pub const DEFAULT_FREQUENCY_DECI_MHZ: u16 = 900;

/// Largest allowed tuning step in tenths of MHz (1.0 MHz)
const MAX_STEP_DECI_MHZ: u16 = 10;

/// Global transmitter configuration.
pub static CONFIG: TransmitterConfig = TransmitterConfig::new();

/// Snapshot of the parameters the sampling pipeline runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Loop rate in Hz
    pub sample_rate_hz: u32,
    /// PWM wrap value with no modulation
    pub base_period: u16,
    /// Route samples through the moving-average window
    pub moving_average: bool,
    /// Route samples through the low-pass smoother
    pub smoothing: bool,
    /// Minimum interval between accepted button presses
    pub debounce_ms: u32,
    /// Tuning step in tenths of MHz
    pub step_deci_mhz: u16,
    /// Power-on frequency in tenths of MHz
    pub default_deci_mhz: u16,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            base_period: DEFAULT_BASE_PERIOD,
            moving_average: true,
            smoothing: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            step_deci_mhz: DEFAULT_STEP_DECI_MHZ,
            default_deci_mhz: DEFAULT_FREQUENCY_DECI_MHZ,
        }
    }
}

impl PipelineConfig {
    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SAMPLE_RATE_HZ..=MAX_SAMPLE_RATE_HZ).contains(&self.sample_rate_hz) {
            return Err(ConfigError::SampleRateOutOfRange);
        }
        if (self.base_period as i32) <= MAX_DEVIATION_TICKS {
            return Err(ConfigError::BasePeriodTooSmall);
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::DebounceZero);
        }
        if self.step_deci_mhz == 0 || self.step_deci_mhz > MAX_STEP_DECI_MHZ {
            return Err(ConfigError::StepOutOfRange);
        }
        let band = CarrierFrequency::MIN.tenths()..=CarrierFrequency::MAX.tenths();
        if !band.contains(&self.default_deci_mhz) {
            return Err(ConfigError::DefaultFrequencyOutOfBand);
        }
        Ok(())
    }

    /// Offset of tick `index` from the loop start, in microseconds.
    ///
    /// Computed from the tick index rather than by summing a rounded
    /// interval, so fractional intervals (22.68 µs at 44.1 kHz) never drift.
    /// An unvalidated rate of 0 is treated as 1 Hz.
    #[inline]
    pub fn tick_offset_us(&self, index: u64) -> u64 {
        index * 1_000_000 / self.sample_rate_hz.max(1) as u64
    }

    /// Power-on carrier frequency
    #[inline]
    pub fn default_frequency(&self) -> CarrierFrequency {
        CarrierFrequency::from_tenths(self.default_deci_mhz as i32)
    }
}

/// Live transmitter configuration.
///
/// Parameters are atomics so they can be changed from a background context
/// while the RT loop runs; the loop picks them up when it is rebuilt from a
/// fresh [`snapshot`](Self::snapshot).
pub struct TransmitterConfig {
    sample_rate_hz: AtomicU32,
    base_period: AtomicU16,
    moving_average: AtomicBool,
    smoothing: AtomicBool,
    debounce_ms: AtomicU32,
    step_deci_mhz: AtomicU16,
    default_deci_mhz: AtomicU16,
    generation: AtomicU16,
}

impl TransmitterConfig {
    /// Create a configuration holding the defaults.
    pub const fn new() -> Self {
        Self {
            sample_rate_hz: AtomicU32::new(DEFAULT_SAMPLE_RATE_HZ),
            base_period: AtomicU16::new(DEFAULT_BASE_PERIOD),
            moving_average: AtomicBool::new(true),
            smoothing: AtomicBool::new(true),
            debounce_ms: AtomicU32::new(DEFAULT_DEBOUNCE_MS),
            step_deci_mhz: AtomicU16::new(DEFAULT_STEP_DECI_MHZ),
            default_deci_mhz: AtomicU16::new(DEFAULT_FREQUENCY_DECI_MHZ),
            generation: AtomicU16::new(0),
        }
    }

    /// Current parameters as a plain value
    pub fn snapshot(&self) -> PipelineConfig {
        PipelineConfig {
            sample_rate_hz: self.sample_rate_hz.load(Ordering::Acquire),
            base_period: self.base_period.load(Ordering::Acquire),
            moving_average: self.moving_average.load(Ordering::Acquire),
            smoothing: self.smoothing.load(Ordering::Acquire),
            debounce_ms: self.debounce_ms.load(Ordering::Acquire),
            step_deci_mhz: self.step_deci_mhz.load(Ordering::Acquire),
            default_deci_mhz: self.default_deci_mhz.load(Ordering::Acquire),
        }
    }

    /// Validate and store a full parameter set.
    ///
    /// Nothing is written if validation fails. Bumps the generation once.
    pub fn apply(&self, config: &PipelineConfig) -> Result<(), ConfigError> {
        config.validate()?;

        self.sample_rate_hz.store(config.sample_rate_hz, Ordering::Release);
        self.base_period.store(config.base_period, Ordering::Release);
        self.moving_average.store(config.moving_average, Ordering::Release);
        self.smoothing.store(config.smoothing, Ordering::Release);
        self.debounce_ms.store(config.debounce_ms, Ordering::Release);
        self.step_deci_mhz.store(config.step_deci_mhz, Ordering::Release);
        self.default_deci_mhz.store(config.default_deci_mhz, Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Enable or disable the moving-average stage
    pub fn set_moving_average(&self, enabled: bool) {
        self.moving_average.store(enabled, Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Enable or disable the low-pass stage
    pub fn set_smoothing(&self, enabled: bool) {
        self.smoothing.store(enabled, Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Change the sample rate (validated against the supported range)
    pub fn set_sample_rate_hz(&self, hz: u32) -> Result<(), ConfigError> {
        if !(MIN_SAMPLE_RATE_HZ..=MAX_SAMPLE_RATE_HZ).contains(&hz) {
            return Err(ConfigError::SampleRateOutOfRange);
        }
        self.sample_rate_hz.store(hz, Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Configuration generation (incremented on every change)
    #[inline]
    pub fn generation(&self) -> u16 {
        self.generation.load(Ordering::Acquire)
    }
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self::new()
    }
}
