//! Moving-average window and low-pass smoother tests

use fm_pwm_tx::audio::{LowPassSmoother, SampleWindow, DEFAULT_WINDOW_SIZE};
use proptest::prelude::*;

#[test]
fn test_window_default_size() {
    let window: SampleWindow = SampleWindow::new();
    assert_eq!(window.capacity(), DEFAULT_WINDOW_SIZE);
    assert_eq!(DEFAULT_WINDOW_SIZE, 16);
}

#[test]
fn test_window_fills_to_constant() {
    let mut window: SampleWindow = SampleWindow::new();
    let mut out = 0;
    for _ in 0..DEFAULT_WINDOW_SIZE {
        out = window.push(1000);
    }
    assert_eq!(out, 1000);

    // Keeps producing the constant once full
    for _ in 0..100 {
        assert_eq!(window.push(1000), 1000);
    }
}

#[test]
fn test_window_warmup_counts_empty_slots() {
    let mut window: SampleWindow = SampleWindow::new();
    // One sample of 1600 among 15 zeros
    assert_eq!(window.push(1600), 100);
    assert_eq!(window.push(1600), 200);
}

#[test]
fn test_window_full_scale_no_overflow() {
    let mut window: SampleWindow = SampleWindow::new();
    for _ in 0..64 {
        window.push(u16::MAX);
    }
    assert_eq!(window.push(u16::MAX), u16::MAX);
}

#[test]
fn test_window_cursor_wraps() {
    let mut window = SampleWindow::<4>::new();
    for i in 0..4 {
        assert_eq!(window.cursor(), i);
        window.push(1);
    }
    assert_eq!(window.cursor(), 0);
}

#[test]
fn test_smoother_step_response() {
    let mut smoother = LowPassSmoother::new();
    assert_eq!(smoother.smooth(4095), 2047);
    assert_eq!(smoother.smooth(4095), 3071);
    assert_eq!(smoother.smooth(4095), 3583);
}

#[test]
fn test_smoother_monotone_without_overshoot() {
    let mut smoother = LowPassSmoother::new();
    let mut last = 0;
    for _ in 0..32 {
        let out = smoother.smooth(4095);
        assert!(out >= last, "step response must not decrease");
        assert!(out <= 4095, "step response must not overshoot");
        last = out;
    }
    // Truncation stops one code short of the input
    assert_eq!(last, 4094);
}

#[test]
fn test_smoother_reset() {
    let mut smoother = LowPassSmoother::new();
    smoother.smooth(3000);
    smoother.reset();
    assert_eq!(smoother.previous(), 0);
    assert_eq!(smoother.smooth(100), 50);
}

proptest! {
    #[test]
    fn window_output_within_window_bounds(samples in prop::collection::vec(0u16..=4095, 1..80)) {
        let mut window: SampleWindow = SampleWindow::new();
        for sample in samples {
            let out = window.push(sample);
            let contents = window.samples();
            let min = *contents.iter().min().unwrap();
            let max = *contents.iter().max().unwrap();
            prop_assert!(out >= min && out <= max, "{} outside [{}, {}]", out, min, max);
        }
    }

    #[test]
    fn smoother_output_between_input_and_previous(samples in prop::collection::vec(any::<u16>(), 1..80)) {
        let mut smoother = LowPassSmoother::new();
        for sample in samples {
            let previous = smoother.previous();
            let out = smoother.smooth(sample);
            prop_assert!(out >= previous.min(sample));
            prop_assert!(out <= previous.max(sample));
        }
    }
}
