//! Carrier tuning: frequency, divider model, and button controller
//!
//! Architecture:
//! - `CarrierFrequency`: band-limited 88.0-108.0 MHz on a 0.1 MHz grid
//! - `divider_for`: linear frequency → PWM clock divider map
//! - `SharedFrequencyCell`: frequency + divider pair behind a critical-section mutex
//! - `FrequencyController`: 200 ms debounce, ±0.1 MHz per press

pub mod controller;
pub mod divider;
pub mod frequency;

pub use controller::{DebounceState, FrequencyController, DEFAULT_DEBOUNCE_MS, DEFAULT_STEP_DECI_MHZ};
pub use divider::divider_for;
pub use frequency::{
    CarrierFrequency, FrequencySetting, SharedFrequencyCell, BAND_MAX_MHZ, BAND_MIN_MHZ,
    DEFAULT_MHZ,
};
