//! Configuration error types

use core::fmt;

/// Configuration rejected by validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// E20: Sample rate outside 8000-44100 Hz
    SampleRateOutOfRange,
    /// E21: Base period leaves no room for the deviation clamp
    BasePeriodTooSmall,
    /// E22: Debounce window of zero
    DebounceZero,
    /// E23: Tuning step outside 0.1-1.0 MHz
    StepOutOfRange,
    /// E24: Power-on frequency outside 88.0-108.0 MHz
    DefaultFrequencyOutOfBand,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::SampleRateOutOfRange => "E20",
            Self::BasePeriodTooSmall => "E21",
            Self::DebounceZero => "E22",
            Self::StepOutOfRange => "E23",
            Self::DefaultFrequencyOutOfBand => "E24",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::SampleRateOutOfRange => "sample rate out of range",
            Self::BasePeriodTooSmall => "base period too small",
            Self::DebounceZero => "debounce must be non-zero",
            Self::StepOutOfRange => "tuning step out of range",
            Self::DefaultFrequencyOutOfBand => "default frequency out of band",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
