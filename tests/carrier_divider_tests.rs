//! Frequency grid and divider map tests

use approx::assert_abs_diff_eq;
use fm_pwm_tx::carrier::{divider_for, CarrierFrequency, FrequencySetting};

#[test]
fn test_divider_band_points() {
    assert_abs_diff_eq!(divider_for(108.0), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(divider_for(98.0), 1.5, epsilon = 1e-6);
    assert_abs_diff_eq!(divider_for(88.0), 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(divider_for(90.0), 1.9, epsilon = 1e-6);
}

#[test]
fn test_divider_decreases_across_band() {
    let mut last = f32::INFINITY;
    for tenths in CarrierFrequency::MIN.tenths()..=CarrierFrequency::MAX.tenths() {
        let divider = divider_for(CarrierFrequency::from_tenths(tenths as i32).mhz());
        assert!(divider < last, "divider must fall as frequency rises");
        assert!((1.0..=2.0).contains(&divider));
        last = divider;
    }
}

#[test]
fn test_setting_pairs_frequency_and_divider() {
    let setting = FrequencySetting::for_frequency(CarrierFrequency::from_tenths(1000));
    assert_eq!(setting.frequency.tenths(), 1000);
    assert_abs_diff_eq!(setting.divider, 1.4, epsilon = 1e-6);

    assert_eq!(FrequencySetting::DEFAULT.frequency, CarrierFrequency::DEFAULT);
    assert_abs_diff_eq!(FrequencySetting::DEFAULT.divider, 1.9, epsilon = 1e-6);
}

#[test]
fn test_frequency_saturates_to_band() {
    assert_eq!(CarrierFrequency::from_tenths(0), CarrierFrequency::MIN);
    assert_eq!(CarrierFrequency::from_tenths(5000), CarrierFrequency::MAX);
    assert_eq!(CarrierFrequency::clamped(120.0), CarrierFrequency::MAX);
    assert_eq!(CarrierFrequency::clamped(f32::NAN), CarrierFrequency::MIN);
    assert_eq!(CarrierFrequency::clamped(95.46).tenths(), 955);
}

#[test]
fn test_stepping_saturates() {
    assert_eq!(CarrierFrequency::MAX.stepped(1), CarrierFrequency::MAX);
    assert_eq!(CarrierFrequency::MIN.stepped(-1), CarrierFrequency::MIN);
    assert_eq!(CarrierFrequency::DEFAULT.stepped(5).tenths(), 905);
    assert!(CarrierFrequency::MAX.is_band_edge());
    assert!(!CarrierFrequency::DEFAULT.is_band_edge());
}

#[test]
fn test_display() {
    assert_eq!(CarrierFrequency::DEFAULT.to_string(), "90.0 MHz");
    assert_eq!(CarrierFrequency::from_tenths(1075).to_string(), "107.5 MHz");
}
