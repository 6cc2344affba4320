//! Sine lookup table for the simulated audio input.
//!
//! 256-entry table covering one full cycle, expressed as 12-bit ADC codes
//! centred on mid-scale, i.e. what an AC-coupled microphone biased at
//! VCC/2 looks like to the converter.

/// Number of entries in the sine LUT
pub const LUT_SIZE: usize = 256;

/// ADC mid-scale code (12-bit converter)
pub const ADC_MIDSCALE: u16 = 2048;

/// Largest 12-bit ADC code
pub const ADC_MAX: u16 = 4095;

/// Pre-computed sine wave in ADC codes
///
/// Index 0 = 0° (mid-scale), 64 = 90° (near 4095), 192 = 270° (near 0)
pub static ADC_SINE_LUT: [u16; LUT_SIZE] = {
    let mut table = [0u16; LUT_SIZE];
    let mut i = 0;
    while i < LUT_SIZE {
        let angle = (i as f64) * core::f64::consts::PI * 2.0 / (LUT_SIZE as f64);
        let code = ADC_MIDSCALE as f64 + const_sin(angle) * 2047.0;
        table[i] = if code < 0.0 {
            0
        } else if code > ADC_MAX as f64 {
            ADC_MAX
        } else {
            code as u16
        };
        i += 1;
    }
    table
};

/// Const-compatible sine approximation using Taylor series
const fn const_sin(x: f64) -> f64 {
    // Normalize to [-π, π]
    let mut x = x;
    while x > core::f64::consts::PI {
        x -= 2.0 * core::f64::consts::PI;
    }
    while x < -core::f64::consts::PI {
        x += 2.0 * core::f64::consts::PI;
    }

    let x2 = x * x;
    let x3 = x2 * x;
    let x5 = x3 * x2;
    let x7 = x5 * x2;
    let x9 = x7 * x2;
    let x11 = x9 * x2;

    x - x3 / 6.0 + x5 / 120.0 - x7 / 5040.0 + x9 / 362880.0 - x11 / 39916800.0
}

/// Phase-accumulator tone source over [`ADC_SINE_LUT`].
///
/// Feeds the simulated ADC with a test tone at a fixed frequency.
#[derive(Debug, Clone, Copy)]
pub struct TestTone {
    /// Phase accumulator (32-bit fixed point, top 8 bits = LUT index)
    phase: u32,
    phase_inc: u32,
}

impl TestTone {
    /// Create a tone at `freq_hz` for a loop running at `sample_rate` Hz
    pub fn new(freq_hz: u32, sample_rate: u32) -> Self {
        Self {
            phase: 0,
            phase_inc: Self::calc_phase_inc(freq_hz, sample_rate),
        }
    }

    /// phase_inc = (freq * 2^32) / sample_rate
    #[inline]
    fn calc_phase_inc(freq_hz: u32, sample_rate: u32) -> u32 {
        ((freq_hz as u64 * (1u64 << 32)) / sample_rate.max(1) as u64) as u32
    }

    /// Next ADC code
    #[inline]
    pub fn next_code(&mut self) -> u16 {
        let idx = (self.phase >> 24) as usize;
        self.phase = self.phase.wrapping_add(self.phase_inc);
        ADC_SINE_LUT[idx]
    }
}
