//! Audio to PWM period/duty mapping.
//!
//! The carrier approximates FM by stretching the PWM wrap value around a
//! base period. Deviation is capped at ±32 ticks so the wrap never leaves
//! a narrow band around the base, whatever the ADC delivers.

/// Maximum period deviation from the base, in PWM ticks.
pub const MAX_DEVIATION_TICKS: i32 = 32;

/// Right shift applied to a smoothed sample to get the period offset.
pub const OFFSET_SHIFT: u32 = 4;

/// Period/duty pair for one sample tick. Not retained between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModulationParameters {
    /// PWM wrap value
    pub period: u16,
    /// Active ticks per period (always half the period)
    pub duty: u16,
}

/// Map a smoothed sample to carrier period and duty.
///
/// `period = clamp(base + (sample >> 4), base - 32, base + 32)`, `duty = period / 2`.
/// Bounds are also kept inside the `u16` range for bases near 0 or `u16::MAX`.
#[inline]
pub fn modulate(smoothed_sample: u16, base_period: u16) -> ModulationParameters {
    let base = base_period as i32;
    let offset = (smoothed_sample >> OFFSET_SHIFT) as i32;

    let low = (base - MAX_DEVIATION_TICKS).max(0);
    let high = (base + MAX_DEVIATION_TICKS).min(u16::MAX as i32);
    let period = (base + offset).clamp(low, high) as u16;

    ModulationParameters {
        period,
        duty: period / 2,
    }
}

/// Modulator bound to a configured base period.
#[derive(Debug, Clone, Copy)]
pub struct Modulator {
    base_period: u16,
}

impl Modulator {
    pub const fn new(base_period: u16) -> Self {
        Self { base_period }
    }

    #[inline]
    pub fn base_period(&self) -> u16 {
        self.base_period
    }

    /// Parameters for an idle (silent) input
    #[inline]
    pub fn rest(&self) -> ModulationParameters {
        modulate(0, self.base_period)
    }

    #[inline]
    pub fn modulate(&self, smoothed_sample: u16) -> ModulationParameters {
        modulate(smoothed_sample, self.base_period)
    }
}
