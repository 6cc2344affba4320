//! PWM HAL for the RF carrier.

/// Carrier output configuration.
#[derive(Debug, Clone, Copy)]
pub struct CarrierConfig {
    /// GPIO driving the carrier
    pub pin: i32,
    /// Clock divider applied at init (before the first retune)
    pub base_divider: f32,
    /// PWM wrap value with no modulation
    pub base_period: u16,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            pin: 13,
            base_divider: 1.0,
            base_period: 255,
        }
    }
}

/// PWM carrier generator.
///
/// All setters are fire-and-forget.
pub trait CarrierOutput {
    fn set_divider(&mut self, ratio: f32);
    fn set_period(&mut self, ticks: u16);
    fn set_duty(&mut self, ticks: u16);
}

/// Output frequency of a timer that counts `period` ticks of
/// `reference_hz / divider`.
///
/// For PWM peripherals without a wrap register the divider and period are
/// folded into one timer frequency. Never returns 0.
#[inline]
pub fn timer_frequency_hz(reference_hz: u32, divider: f32, period: u16) -> u32 {
    let ticks = divider.max(1.0) * period.max(1) as f32;
    ((reference_hz as f32 / ticks) as u32).max(1)
}

/// Duty `ticks` out of `period` rescaled to a `max_duty` resolution.
#[inline]
pub fn scale_duty(ticks: u16, period: u16, max_duty: u32) -> u32 {
    let scaled = (ticks as u64 * max_duty as u64) / period.max(1) as u64;
    scaled.min(max_duty as u64) as u32
}
