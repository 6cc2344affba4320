//! Two-button frequency controller.
//!
//! Debounces the UP/DOWN buttons, steps the nominal carrier frequency on
//! the 0.1 MHz grid, and commits frequency + divider to the shared cell.
//!
//! # States
//!
//! - **Idle**: the debounce window has expired, buttons are evaluated
//! - **Debouncing**: less than `debounce_ms` since the last accepted
//!   evaluation, buttons are ignored

use super::frequency::{FrequencySetting, SharedFrequencyCell};
use crate::hal::elapsed_us;

/// Minimum time between accepted button evaluations.
pub const DEFAULT_DEBOUNCE_MS: u32 = 200;

/// Tuning step in tenths of MHz (0.1 MHz).
pub const DEFAULT_STEP_DECI_MHZ: u16 = 1;

/// Debounce state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Buttons are evaluated on the next poll
    Idle,
    /// Inside the debounce window
    Debouncing,
}

/// Frequency controller
///
/// Sole writer of the [`SharedFrequencyCell`].
pub struct FrequencyController<'a> {
    cell: &'a SharedFrequencyCell,
    /// Debounce window in microseconds
    debounce_us: u64,
    /// Step per press in tenths of MHz
    step_deci_mhz: u16,
    /// Timestamp of the last accepted evaluation (None until the first press)
    last_change_us: Option<u64>,
}

impl<'a> FrequencyController<'a> {
    /// Create new controller
    ///
    /// # Arguments
    /// * `cell` - Shared frequency/divider pair
    /// * `debounce_ms` - Minimum interval between accepted presses
    /// * `step_deci_mhz` - Step per press in tenths of MHz
    pub fn new(cell: &'a SharedFrequencyCell, debounce_ms: u32, step_deci_mhz: u16) -> Self {
        Self {
            cell,
            debounce_us: debounce_ms as u64 * 1000,
            step_deci_mhz,
            last_change_us: None,
        }
    }

    /// Controller with the 200 ms / 0.1 MHz defaults
    pub fn with_defaults(cell: &'a SharedFrequencyCell) -> Self {
        Self::new(cell, DEFAULT_DEBOUNCE_MS, DEFAULT_STEP_DECI_MHZ)
    }

    /// Debounce state at `now_us`
    #[inline]
    pub fn state(&self, now_us: u64) -> DebounceState {
        match self.last_change_us {
            Some(last) if elapsed_us(last, now_us) < self.debounce_us => {
                DebounceState::Debouncing
            }
            _ => DebounceState::Idle,
        }
    }

    /// Evaluate the buttons and retune if needed.
    ///
    /// # Arguments
    /// * `now_us` - Current time in microseconds
    /// * `up_pressed` / `down_pressed` - Button states (already active-low decoded)
    ///
    /// # Returns
    /// The new frequency/divider pair when it changed. The caller writes the
    /// divider to the carrier. `None` inside the debounce window, with no
    /// button pressed, or when the step saturates at a band edge.
    ///
    /// Both buttons held apply +step then -step: net no change, but the
    /// debounce window is still consumed.
    pub fn poll_and_adjust(
        &mut self,
        now_us: u64,
        up_pressed: bool,
        down_pressed: bool,
    ) -> Option<FrequencySetting> {
        if self.state(now_us) == DebounceState::Debouncing {
            return None;
        }

        if !up_pressed && !down_pressed {
            return None;
        }

        let step = self.step_deci_mhz as i32;
        let mut delta = 0;
        if up_pressed {
            delta += step;
        }
        if down_pressed {
            delta -= step;
        }

        // Evaluation accepted, changed or not: restart the window
        self.last_change_us = Some(now_us);

        self.cell.update(|current| {
            let candidate = current.frequency.stepped(delta);
            if candidate == current.frequency {
                None
            } else {
                Some(FrequencySetting::for_frequency(candidate))
            }
        })
    }

    /// Timestamp of the last accepted evaluation
    #[inline]
    pub fn last_change_us(&self) -> Option<u64> {
        self.last_change_us
    }

    /// Current frequency/divider pair
    #[inline]
    pub fn setting(&self) -> FrequencySetting {
        self.cell.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::CarrierFrequency;

    #[test]
    fn test_first_press_is_immediate() {
        let cell = SharedFrequencyCell::default();
        let mut ctl = FrequencyController::with_defaults(&cell);

        let setting = ctl.poll_and_adjust(0, true, false).unwrap();
        assert_eq!(setting.frequency.tenths(), 901);
        assert_eq!(cell.load(), setting);
    }

    #[test]
    fn test_state_transitions() {
        let cell = SharedFrequencyCell::default();
        let mut ctl = FrequencyController::with_defaults(&cell);

        assert_eq!(ctl.state(0), DebounceState::Idle);
        ctl.poll_and_adjust(1_000, false, true);
        assert_eq!(ctl.state(1_000), DebounceState::Debouncing);
        assert_eq!(ctl.state(200_999), DebounceState::Debouncing);
        assert_eq!(ctl.state(201_000), DebounceState::Idle);
    }

    #[test]
    fn test_release_does_not_restart_window() {
        let cell = SharedFrequencyCell::default();
        let mut ctl = FrequencyController::with_defaults(&cell);

        ctl.poll_and_adjust(0, true, false);
        assert_eq!(ctl.poll_and_adjust(250_000, false, false), None);
        assert_eq!(ctl.last_change_us(), Some(0));
    }

    #[test]
    fn test_both_pressed_is_net_noop() {
        let cell = SharedFrequencyCell::default();
        let mut ctl = FrequencyController::with_defaults(&cell);

        assert_eq!(ctl.poll_and_adjust(0, true, true), None);
        assert_eq!(cell.frequency(), CarrierFrequency::DEFAULT);
        assert_eq!(ctl.state(100_000), DebounceState::Debouncing);
    }

    #[test]
    fn test_both_pressed_at_band_edge() {
        let cell = SharedFrequencyCell::new(FrequencySetting::for_frequency(CarrierFrequency::MAX));
        let mut ctl = FrequencyController::with_defaults(&cell);

        assert_eq!(ctl.poll_and_adjust(0, true, true), None);
        assert_eq!(cell.frequency(), CarrierFrequency::MAX);
    }
}
