//! Hardware Abstraction Layer for FmPwmTx.
//!
//! Traits for the four peripherals the sampling loop touches, plus pin
//! configuration. Business logic stays in core modules, HAL is just I/O.
//! ESP-IDF bindings live in `esp` (target only); host runs use `crate::sim`.

pub mod adc;
pub mod clock;
pub mod gpio;
pub mod pwm;

#[cfg(target_os = "espidf")]
pub mod esp;

pub use adc::{AdcFault, AudioInput, AudioInputConfig};
pub use clock::{elapsed_us, MonotonicClock};
pub use gpio::{Button, ButtonConfig, ButtonInput};
pub use pwm::{scale_duty, timer_frequency_hz, CarrierConfig, CarrierOutput};
