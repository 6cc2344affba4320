//! ADC HAL for the audio input.

use core::fmt;

/// Audio input configuration.
///
/// Defaults match the ESP32-S3 board: audio on GPIO1, which is ADC1
/// channel 0.
#[derive(Debug, Clone, Copy)]
pub struct AudioInputConfig {
    /// GPIO carrying the audio signal
    pub pin: i32,
    /// ADC channel multiplexed onto `pin`
    pub channel: u8,
}

impl Default for AudioInputConfig {
    fn default() -> Self {
        Self { pin: 1, channel: 0 }
    }
}

/// ADC read failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcFault {
    /// E10: Conversion did not complete
    Timeout,
    /// E11: Driver rejected the read
    Driver,
}

impl AdcFault {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout => "E10",
            Self::Driver => "E11",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Timeout => "ADC conversion timeout",
            Self::Driver => "ADC driver error",
        }
    }
}

impl fmt::Display for AdcFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// Blocking audio sampler.
///
/// Returns raw 12-bit codes. Noisy values are valid input; only a failed
/// conversion is an error.
pub trait AudioInput {
    fn read(&mut self) -> Result<u16, AdcFault>;
}
