//! Moving-average filter over a fixed sample window.
//!
//! Ring of the last `N` raw ADC samples. Every push overwrites the oldest
//! slot and returns the truncated mean of the whole window, so the first
//! `N - 1` outputs are pulled toward zero by the zero-filled slots.

/// Default window length used by the sampling loop.
pub const DEFAULT_WINDOW_SIZE: usize = 16;

/// Moving-average sample window.
///
/// N must be a power of 2 for efficient modulo.
pub struct SampleWindow<const N: usize = DEFAULT_WINDOW_SIZE> {
    samples: [u16; N],
    cursor: usize,
}

impl<const N: usize> SampleWindow<N> {
    /// Create a zero-filled window
    pub const fn new() -> Self {
        // Compile-time check that N is power of 2
        const { assert!(N.is_power_of_two(), "Window size must be power of 2") };

        Self {
            samples: [0u16; N],
            cursor: 0,
        }
    }

    /// Number of slots in the window
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Push a raw sample and return the window average.
    ///
    /// The sum is accumulated in `u32`: `N * u16::MAX` fits for any
    /// window up to 65536 slots.
    #[inline]
    pub fn push(&mut self, sample: u16) -> u16 {
        self.samples[self.cursor] = sample;
        self.cursor = (self.cursor + 1) & (N - 1);

        let sum: u32 = self.samples.iter().map(|&s| s as u32).sum();
        (sum / N as u32) as u16
    }

    /// Index of the slot the next push will overwrite
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current window contents in slot order (not time order)
    #[inline]
    pub fn samples(&self) -> &[u16; N] {
        &self.samples
    }

    /// Zero the window and rewind the cursor
    pub fn reset(&mut self) {
        self.samples = [0u16; N];
        self.cursor = 0;
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_filled_start() {
        let mut window: SampleWindow<4> = SampleWindow::new();
        // 400 / 4 with three empty slots
        assert_eq!(window.push(400), 100);
        assert_eq!(window.push(400), 200);
        assert_eq!(window.push(400), 300);
        assert_eq!(window.push(400), 400);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut window: SampleWindow<4> = SampleWindow::new();
        for i in 0..4 {
            assert_eq!(window.cursor(), i);
            window.push(1);
        }
        assert_eq!(window.cursor(), 0);
    }

    #[test]
    fn test_truncating_mean() {
        let mut window: SampleWindow<2> = SampleWindow::new();
        window.push(3);
        // (3 + 4) / 2 = 3.5 -> 3
        assert_eq!(window.push(4), 3);
    }

    #[test]
    fn test_full_scale_does_not_overflow() {
        let mut window: SampleWindow<16> = SampleWindow::new();
        let mut out = 0;
        for _ in 0..16 {
            out = window.push(u16::MAX);
        }
        assert_eq!(out, u16::MAX);
    }
}
