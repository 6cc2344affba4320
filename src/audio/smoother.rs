//! Single-pole low-pass smoother (coefficient 1/2).

/// Low-pass smoother state.
///
/// Holds the previous output; each call averages it with the new sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LowPassSmoother {
    previous: u16,
}

impl LowPassSmoother {
    pub const fn new() -> Self {
        Self { previous: 0 }
    }

    /// Smooth one sample: `(sample + previous) / 2`.
    #[inline]
    pub fn smooth(&mut self, sample: u16) -> u16 {
        let smoothed = ((sample as u32 + self.previous as u32) / 2) as u16;
        self.previous = smoothed;
        smoothed
    }

    /// Last smoothed value
    #[inline]
    pub fn previous(&self) -> u16 {
        self.previous
    }

    pub fn reset(&mut self) {
        self.previous = 0;
    }
}
