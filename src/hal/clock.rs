//! Monotonic time base for the sampling loop.

/// Microsecond monotonic clock.
pub trait MonotonicClock {
    /// Current time in microseconds
    fn now_us(&self) -> u64;

    /// Block until `deadline_us`. Returns at once if it already passed.
    fn sleep_until(&mut self, deadline_us: u64);
}

/// Microseconds from `since` to `now` (0 if `now` is earlier).
#[inline]
pub fn elapsed_us(since: u64, now: u64) -> u64 {
    now.saturating_sub(since)
}
