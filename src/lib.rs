//! # FmPwmTx
//!
//! Audio-to-PWM FM transmitter control loop.
//!
//! ## Architecture
//!
//! One real-time loop ([`SamplingLoop`]) samples the audio ADC, smooths the
//! sample, stretches the carrier's PWM period around a base value, and polls
//! two buttons that retune the nominal carrier frequency (88.0-108.0 MHz).
//!
//! - Filters and modulator are pure, allocation-free state machines
//! - The frequency/divider pair lives in a critical-section mutex
//!   ([`SharedFrequencyCell`]) so a button ISR could share it safely
//! - Peripherals are traits ([`hal`]); ESP-IDF bindings on target,
//!   simulated peripherals ([`sim`]) on the host
//! - Faults and logs are lock-free and never block the loop

#![cfg_attr(not(test), no_std)]

pub mod audio;
pub mod carrier;
pub mod config;
pub mod fault;
pub mod hal;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod sampler;
pub mod sim;

pub use carrier::{CarrierFrequency, FrequencyController, FrequencySetting, SharedFrequencyCell};
pub use config::{PipelineConfig, CONFIG};
pub use fault::{FaultCode, FaultState};
pub use log_globals::{BG_LOG_STREAM, RT_LOG_STREAM};
pub use sampler::{LoopShared, SamplingLoop, TickReport};
