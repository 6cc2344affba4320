//! Audio path: ADC samples to carrier modulation
//!
//! Architecture:
//! - Moving-average window: 16 samples, integer mean
//! - Low-pass smoother: one pole, coefficient 1/2
//! - Modulator: sample >> 4 as period offset, clamped ±32 ticks
//! - Sine LUT test tone for the simulated ADC

pub mod lut;
pub mod modulator;
pub mod smoother;
pub mod window;

pub use lut::{TestTone, ADC_SINE_LUT, LUT_SIZE};
pub use modulator::{modulate, ModulationParameters, Modulator, MAX_DEVIATION_TICKS};
pub use smoother::LowPassSmoother;
pub use window::{SampleWindow, DEFAULT_WINDOW_SIZE};
