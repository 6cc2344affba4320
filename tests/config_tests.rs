//! Pipeline configuration tests

use fm_pwm_tx::carrier::CarrierFrequency;
use fm_pwm_tx::config::{ConfigError, PipelineConfig, TransmitterConfig};

#[test]
fn test_defaults() {
    let config = PipelineConfig::default();
    assert_eq!(config.sample_rate_hz, 8_000);
    assert_eq!(config.base_period, 255);
    assert!(config.moving_average);
    assert!(config.smoothing);
    assert_eq!(config.debounce_ms, 200);
    assert_eq!(config.step_deci_mhz, 1);
    assert_eq!(config.default_frequency(), CarrierFrequency::DEFAULT);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_validation_errors() {
    let base = PipelineConfig::default();

    let cases = [
        (PipelineConfig { sample_rate_hz: 7_999, ..base }, ConfigError::SampleRateOutOfRange),
        (PipelineConfig { sample_rate_hz: 48_000, ..base }, ConfigError::SampleRateOutOfRange),
        (PipelineConfig { base_period: 32, ..base }, ConfigError::BasePeriodTooSmall),
        (PipelineConfig { debounce_ms: 0, ..base }, ConfigError::DebounceZero),
        (PipelineConfig { step_deci_mhz: 0, ..base }, ConfigError::StepOutOfRange),
        (PipelineConfig { step_deci_mhz: 11, ..base }, ConfigError::StepOutOfRange),
        (PipelineConfig { default_deci_mhz: 879, ..base }, ConfigError::DefaultFrequencyOutOfBand),
        (PipelineConfig { default_deci_mhz: 1081, ..base }, ConfigError::DefaultFrequencyOutOfBand),
    ];

    for (config, expected) in cases {
        assert_eq!(config.validate(), Err(expected));
    }

    assert_eq!(PipelineConfig { base_period: 33, ..base }.validate(), Ok(()));
    assert_eq!(PipelineConfig { sample_rate_hz: 44_100, ..base }.validate(), Ok(()));
}

#[test]
fn test_error_codes() {
    assert_eq!(ConfigError::SampleRateOutOfRange.code(), "E20");
    assert_eq!(ConfigError::DefaultFrequencyOutOfBand.code(), "E24");
    assert_eq!(
        ConfigError::DebounceZero.to_string(),
        format!("E22: {}", ConfigError::DebounceZero.message())
    );
}

#[test]
fn test_tick_offsets() {
    let config = PipelineConfig::default();
    assert_eq!(config.tick_offset_us(0), 0);
    assert_eq!(config.tick_offset_us(1), 125);
    assert_eq!(config.tick_offset_us(8_000), 1_000_000);

    let fast = PipelineConfig {
        sample_rate_hz: 44_100,
        ..config
    };
    assert_eq!(fast.tick_offset_us(1), 22);
    assert_eq!(fast.tick_offset_us(3), 68);
    assert_eq!(fast.tick_offset_us(441), 10_000);
    assert_eq!(fast.tick_offset_us(44_100), 1_000_000);
}

#[test]
fn test_tick_offset_with_zero_rate_does_not_divide_by_zero() {
    let config = PipelineConfig {
        sample_rate_hz: 0,
        ..PipelineConfig::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::SampleRateOutOfRange));
    assert_eq!(config.tick_offset_us(0), 0);
    assert_eq!(config.tick_offset_us(3), 3_000_000);
}

#[test]
fn test_apply_is_all_or_nothing() {
    let live = TransmitterConfig::new();
    let before = live.snapshot();

    let bad = PipelineConfig {
        sample_rate_hz: 16_000,
        debounce_ms: 0,
        ..before
    };
    assert_eq!(live.apply(&bad), Err(ConfigError::DebounceZero));
    assert_eq!(live.snapshot(), before);
    assert_eq!(live.generation(), 0);

    let good = PipelineConfig {
        sample_rate_hz: 16_000,
        smoothing: false,
        ..before
    };
    assert_eq!(live.apply(&good), Ok(()));
    assert_eq!(live.snapshot(), good);
    assert_eq!(live.generation(), 1);
}

#[test]
fn test_individual_setters() {
    let live = TransmitterConfig::new();

    live.set_moving_average(false);
    live.set_smoothing(false);
    assert!(!live.snapshot().moving_average);
    assert!(!live.snapshot().smoothing);
    assert_eq!(live.generation(), 2);

    assert_eq!(live.set_sample_rate_hz(100), Err(ConfigError::SampleRateOutOfRange));
    assert_eq!(live.generation(), 2);
    assert_eq!(live.set_sample_rate_hz(22_050), Ok(()));
    assert_eq!(live.snapshot().sample_rate_hz, 22_050);
    assert_eq!(live.generation(), 3);
}
