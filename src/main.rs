//! FmPwmTx - Main entry point
//!
//! On target (ESP-IDF):
//! 1. Snapshot and validate configuration
//! 2. Start the log drain task on Core 1 (UART1 TX)
//! 3. Initialize ADC, LEDC carrier, button GPIOs
//! 4. Run the sampling loop on the main task forever
//!
//! On the host: run the same loop against simulated peripherals on
//! virtual time and print the drained log.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
mod firmware {
    use core::convert::Infallible;
    use core::ffi::c_void;
    use core::ptr;

    use esp_idf_svc::hal::gpio::{AnyOutputPin, Gpio17};
    use esp_idf_svc::hal::ledc::{LedcDriver, LedcTimerDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::UART1;
    use esp_idf_svc::sys::{self as esp_idf_sys, EspError};

    use fm_pwm_tx::carrier::{FrequencySetting, SharedFrequencyCell};
    use fm_pwm_tx::config::{PipelineConfig, CONFIG};
    use fm_pwm_tx::fault::FaultState;
    use fm_pwm_tx::hal::esp::{
        carrier_timer_config, checked_pin, EspAudioInput, EspButtons, EspCarrier, EspClock,
        UartSink,
    };
    use fm_pwm_tx::hal::{AudioInputConfig, ButtonConfig, CarrierConfig, MonotonicClock};
    use fm_pwm_tx::log_drain::{drain_to, report_dropped, report_faults};
    use fm_pwm_tx::sampler::{LoopShared, SamplingLoop};
    use fm_pwm_tx::{rt_info, rt_warn, BG_LOG_STREAM, RT_LOG_STREAM};

    static FREQUENCY: SharedFrequencyCell = SharedFrequencyCell::new(FrequencySetting::DEFAULT);
    static FAULT_STATE: FaultState = FaultState::new();

    const LOG_BAUD_RATE: u32 = 115_200;
    const DROPPED_REPORT_US: i64 = 10_000_000;

    /// Bring up peripherals and run the sampling loop.
    ///
    /// The loop spins between ticks on the main task (Core 0), so the idle
    /// task of Core 0 never runs: disable
    /// CONFIG_ESP_TASK_WDT_CHECK_IDLE_TASK_CPU0 in sdkconfig.
    pub fn run() -> Result<Infallible, EspError> {
        let config = CONFIG.snapshot();
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                rt_warn!(BG_LOG_STREAM, now_us(), "config {}, using defaults", e);
                PipelineConfig::default()
            }
        };

        FREQUENCY.store(FrequencySetting::for_frequency(config.default_frequency()));
        spawn_log_drain();

        rt_info!(BG_LOG_STREAM, now_us(), "{}", env!("VERSION_STRING"));

        let peripherals = Peripherals::take()?;

        let audio = EspAudioInput::new(
            peripherals.adc1,
            peripherals.pins.gpio1,
            &AudioInputConfig::default(),
        )?;

        let carrier_config = CarrierConfig {
            base_divider: FREQUENCY.load().divider,
            base_period: config.base_period,
            ..Default::default()
        };
        let carrier_timer =
            LedcTimerDriver::new(peripherals.ledc.timer0, &carrier_timer_config(&carrier_config))?;
        let carrier_pin = checked_pin(AnyOutputPin::from(peripherals.pins.gpio13), carrier_config.pin)?;
        let channel = LedcDriver::new(peripherals.ledc.channel0, &carrier_timer, carrier_pin)?;
        let carrier = EspCarrier::new(channel, &carrier_config, &FAULT_STATE);

        let buttons = EspButtons::new(
            peripherals.pins.gpio5.into(),
            peripherals.pins.gpio6.into(),
            &ButtonConfig::default(),
        )?;

        let shared = LoopShared {
            frequency: &FREQUENCY,
            fault: &FAULT_STATE,
            log: &RT_LOG_STREAM,
        };
        let sampler: SamplingLoop<'_, _, _, _, _> =
            SamplingLoop::new(audio, carrier, buttons, EspClock, shared, config);

        sampler.run()
    }

    fn now_us() -> u64 {
        EspClock.now_us()
    }

    fn spawn_log_drain() {
        unsafe {
            esp_idf_sys::xTaskCreatePinnedToCore(
                Some(log_drain_task),
                c"log_drain".as_ptr(),
                4096,
                ptr::null_mut(),
                1,
                ptr::null_mut(),
                1,
            );
        }
    }

    /// Log drain task (runs on Core 1).
    ///
    /// Drains RT_LOG_STREAM then BG_LOG_STREAM to UART1 on GPIO17. Consumer
    /// of both streams only: its own reports go straight to the UART.
    extern "C" fn log_drain_task(_arg: *mut c_void) {
        // SAFETY: UART1 and GPIO17 are used by this task only
        let (uart, tx_pin) = unsafe { (UART1::new(), Gpio17::new()) };
        let mut sink = match UartSink::new(uart, tx_pin, LOG_BAUD_RATE) {
            Ok(sink) => sink,
            Err(_) => {
                unsafe { esp_idf_sys::vTaskDelete(ptr::null_mut()) };
                return;
            }
        };

        let mut last_dropped_report = 0i64;

        loop {
            let written = drain_to(&RT_LOG_STREAM, &mut sink) + drain_to(&BG_LOG_STREAM, &mut sink);

            let now = unsafe { esp_idf_sys::esp_timer_get_time() };
            if now - last_dropped_report > DROPPED_REPORT_US {
                let _ = report_dropped(&RT_LOG_STREAM, &BG_LOG_STREAM, &mut sink);
                let _ = report_faults(&FAULT_STATE, &mut sink);
                last_dropped_report = now;
            }

            if written == 0 {
                unsafe {
                    esp_idf_sys::vTaskDelay(10);
                }
            }
        }
    }
}

#[cfg(target_os = "espidf")]
#[no_mangle]
fn main() {
    // Initialize ESP-IDF
    esp_idf_svc::sys::link_patches();

    if let Err(e) = firmware::run() {
        fm_pwm_tx::rt_error!(fm_pwm_tx::BG_LOG_STREAM, 0, "startup failed: {}", e);
        loop {
            unsafe {
                esp_idf_svc::sys::vTaskDelay(1000);
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use fm_pwm_tx::carrier::{FrequencySetting, SharedFrequencyCell};
    use fm_pwm_tx::config::CONFIG;
    use fm_pwm_tx::fault::FaultState;
    use fm_pwm_tx::hal::Button;
    use fm_pwm_tx::log_drain::{drain_to, report_dropped, report_faults};
    use fm_pwm_tx::sampler::{LoopShared, SamplingLoop};
    use fm_pwm_tx::sim::{SimAudio, SimButtons, SimCarrier, SimClock};
    use fm_pwm_tx::{rt_info, rt_warn, BG_LOG_STREAM, RT_LOG_STREAM};

    /// Simulated per-read processing cost
    const READ_COST_US: u64 = 5;
    /// Test tone frequency
    const TONE_HZ: u32 = 440;

    /// `fmt::Write` adapter over stdout.
    struct Stdout;

    impl core::fmt::Write for Stdout {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            print!("{}", s);
            Ok(())
        }
    }

    /// Button script: UP held 0.5-1.3 s, DOWN held 1.5-1.6 s, repeating every 2 s.
    fn scripted_buttons(t_ms: u64, buttons: &mut SimButtons) {
        buttons.release_all();
        match t_ms % 2000 {
            500..=1299 => buttons.press(Button::Up),
            1500..=1599 => buttons.press(Button::Down),
            _ => {}
        }
    }

    pub fn run(seconds: u64) {
        let mut out = Stdout;

        let config = CONFIG.snapshot();
        if let Err(e) = config.validate() {
            rt_warn!(BG_LOG_STREAM, 0, "config {}", e);
            drain_to(&BG_LOG_STREAM, &mut out);
            return;
        }
        rt_info!(BG_LOG_STREAM, 0, "{} (host simulation, {} s)", env!("VERSION_STRING"), seconds);
        drain_to(&BG_LOG_STREAM, &mut out);

        let frequency =
            SharedFrequencyCell::new(FrequencySetting::for_frequency(config.default_frequency()));
        let fault = FaultState::new();
        let shared = LoopShared {
            frequency: &frequency,
            fault: &fault,
            log: &RT_LOG_STREAM,
        };

        let mut sampler: SamplingLoop<'_, _, _, _, _> = SamplingLoop::new(
            SimAudio::tone(TONE_HZ, config.sample_rate_hz),
            SimCarrier::new(),
            SimButtons::new(),
            SimClock::with_read_cost(READ_COST_US),
            shared,
            config,
        );
        sampler.start();

        let ticks = seconds * config.sample_rate_hz as u64;
        let (mut min_period, mut max_period) = (u16::MAX, 0u16);
        for k in 0..ticks {
            let t_ms = config.tick_offset_us(k) / 1000;
            scripted_buttons(t_ms, sampler.buttons_mut());

            let report = sampler.tick();
            min_period = min_period.min(report.params.period);
            max_period = max_period.max(report.params.period);

            drain_to(&RT_LOG_STREAM, &mut out);
        }

        let _ = report_dropped(&RT_LOG_STREAM, &BG_LOG_STREAM, &mut out);
        let faults = fault.snapshot();
        let _ = report_faults(&fault, &mut out);

        let setting = frequency.load();
        let carrier = sampler.carrier();
        println!("ticks:          {}", sampler.tick_index());
        println!("frequency:      {} (divider {:.3})", setting.frequency, setting.divider);
        println!("period range:   {}..={}", min_period, max_period);
        println!(
            "carrier writes: period={} duty={} divider={}",
            carrier.period_writes, carrier.duty_writes, carrier.divider_writes
        );
        println!(
            "faults:         adc={} late={} carrier={}",
            faults.adc_failures, faults.deadline_misses, faults.carrier_failures
        );
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    let seconds = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(4);
    host::run(seconds);
}
