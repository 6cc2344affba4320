//! ESP-IDF peripheral bindings.
//!
//! - Audio: ADC1 oneshot driver, 12-bit raw codes, 12 dB attenuation
//! - Carrier: LEDC channel on low-speed timer 0
//! - Buttons: GPIO inputs with internal pull-up
//! - Clock: `esp_timer` microsecond counter
//! - Log sink: UART1 TX-only
//!
//! Drivers take typed pins from `Peripherals` and check them against the pin
//! numbers of the HAL configuration ([`checked_pin`]).
//!
//! The LEDC peripheral has no free-running wrap register, so the carrier
//! folds divider and period into the timer frequency
//! ([`timer_frequency_hz`]) and rescales duty to the channel resolution
//! ([`scale_duty`]).

use esp_idf_svc::hal::adc::attenuation;
use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_svc::hal::gpio::{self, ADCPin, AnyIOPin, Input, Pin, PinDriver, Pull};
use esp_idf_svc::hal::ledc::config::TimerConfig;
use esp_idf_svc::hal::ledc::{LedcDriver, Resolution};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartTxDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::{self, esp, EspError};

use super::{
    scale_duty, timer_frequency_hz, AdcFault, AudioInput, AudioInputConfig, Button, ButtonConfig,
    ButtonInput, CarrierConfig, CarrierOutput, MonotonicClock,
};
use crate::audio::lut::ADC_MAX;
use crate::fault::{FaultCode, FaultState};

const LEDC_MODE: sys::ledc_mode_t = sys::ledc_mode_t_LEDC_LOW_SPEED_MODE;

/// LEDC timer the carrier channel must be bound to
pub const CARRIER_TIMER: sys::ledc_timer_t = sys::ledc_timer_t_LEDC_TIMER_0;

/// LEDC source clock used for the carrier frequency map (APB, 80 MHz)
pub const LEDC_REFERENCE_HZ: u32 = 80_000_000;

/// FreeRTOS tick in microseconds (CONFIG_FREERTOS_HZ = 100)
const RTOS_TICK_US: u64 = 10_000;

fn invalid_arg() -> EspError {
    EspError::from_infallible::<{ sys::ESP_ERR_INVALID_ARG as sys::esp_err_t }>()
}

/// Return `pin` if it is GPIO `expected`, `ESP_ERR_INVALID_ARG` otherwise.
pub fn checked_pin<P: Pin>(pin: P, expected: i32) -> Result<P, EspError> {
    if pin.pin() == expected {
        Ok(pin)
    } else {
        Err(invalid_arg())
    }
}

/// ADC1 oneshot audio input.
pub struct EspAudioInput<'d, P: ADCPin> {
    channel: AdcChannelDriver<'d, P, AdcDriver<'d, P::Adc>>,
}

impl<'d, P: ADCPin + Pin> EspAudioInput<'d, P> {
    /// Bring up the ADC unit and one channel.
    ///
    /// `pin` must be `config.pin` and sit on ADC channel `config.channel`.
    pub fn new(
        adc: impl Peripheral<P = P::Adc> + 'd,
        pin: P,
        config: &AudioInputConfig,
    ) -> Result<Self, EspError> {
        let pin = checked_pin(pin, config.pin)?;
        if pin.adc_channel() != config.channel as sys::adc_channel_t {
            return Err(invalid_arg());
        }

        let driver = AdcDriver::new(adc)?;
        let channel_config = AdcChannelConfig {
            attenuation: attenuation::DB_12,
            ..Default::default()
        };
        let channel = AdcChannelDriver::new(driver, pin, &channel_config)?;

        Ok(Self { channel })
    }
}

impl<P: ADCPin> AudioInput for EspAudioInput<'_, P> {
    fn read(&mut self) -> Result<u16, AdcFault> {
        self.channel
            .read_raw()
            .map(|raw| raw.min(ADC_MAX))
            .map_err(|e| {
                if e.code() == sys::ESP_ERR_TIMEOUT as sys::esp_err_t {
                    AdcFault::Timeout
                } else {
                    AdcFault::Driver
                }
            })
    }
}

/// Timer configuration for the carrier's initial divider and period.
pub fn carrier_timer_config(config: &CarrierConfig) -> TimerConfig {
    TimerConfig::default()
        .frequency(Hertz(timer_frequency_hz(
            LEDC_REFERENCE_HZ,
            config.base_divider,
            config.base_period,
        )))
        .resolution(Resolution::Bits8)
}

/// LEDC carrier output.
///
/// Duty goes through the channel driver. Retuning changes the frequency of
/// [`CARRIER_TIMER`], whose `LedcTimerDriver` stays borrowed by the channel
/// driver for the carrier's whole life, so it is set with `ledc_set_freq`.
/// Rejected writes are recorded as [`FaultCode::CarrierWriteFailed`].
pub struct EspCarrier<'d> {
    channel: LedcDriver<'d>,
    max_duty: u32,
    divider: f32,
    period: u16,
    fault: &'d FaultState,
}

impl<'d> EspCarrier<'d> {
    /// `channel` must run on [`CARRIER_TIMER`], configured with
    /// [`carrier_timer_config`].
    pub fn new(channel: LedcDriver<'d>, config: &CarrierConfig, fault: &'d FaultState) -> Self {
        Self {
            max_duty: channel.get_max_duty(),
            channel,
            divider: config.base_divider,
            period: config.base_period,
            fault,
        }
    }

    fn apply_frequency(&mut self) {
        let hz = timer_frequency_hz(LEDC_REFERENCE_HZ, self.divider, self.period);
        let result = esp!(unsafe { sys::ledc_set_freq(LEDC_MODE, CARRIER_TIMER, hz) });
        self.check(result);
    }

    fn check(&self, result: Result<(), EspError>) {
        if let Err(e) = result {
            self.fault.record(FaultCode::CarrierWriteFailed, e.code() as u32);
        }
    }
}

impl CarrierOutput for EspCarrier<'_> {
    fn set_divider(&mut self, ratio: f32) {
        self.divider = ratio;
        self.apply_frequency();
    }

    fn set_period(&mut self, ticks: u16) {
        if ticks != self.period {
            self.period = ticks;
            self.apply_frequency();
        }
    }

    fn set_duty(&mut self, ticks: u16) {
        let duty = scale_duty(ticks, self.period, self.max_duty);
        let result = self.channel.set_duty(duty);
        self.check(result);
    }
}

/// UP/DOWN button inputs.
pub struct EspButtons<'d> {
    up: PinDriver<'d, AnyIOPin, Input>,
    down: PinDriver<'d, AnyIOPin, Input>,
}

impl<'d> EspButtons<'d> {
    /// `up` and `down` must be `config.up_pin` and `config.down_pin`.
    pub fn new(up: AnyIOPin, down: AnyIOPin, config: &ButtonConfig) -> Result<Self, EspError> {
        let up = checked_pin(up, config.up_pin)?;
        let down = checked_pin(down, config.down_pin)?;
        let pull = if config.pull_up { Pull::Up } else { Pull::Floating };

        let mut up = PinDriver::input(up)?;
        up.set_pull(pull)?;
        let mut down = PinDriver::input(down)?;
        down.set_pull(pull)?;

        Ok(Self { up, down })
    }
}

impl ButtonInput for EspButtons<'_> {
    fn is_high(&mut self, button: Button) -> bool {
        match button {
            Button::Up => self.up.is_high(),
            Button::Down => self.down.is_high(),
        }
    }
}

/// `esp_timer` clock with hybrid sleep.
///
/// Yields to FreeRTOS while the deadline is more than two RTOS ticks away,
/// then spins for the remainder.
pub struct EspClock;

impl MonotonicClock for EspClock {
    fn now_us(&self) -> u64 {
        unsafe { sys::esp_timer_get_time() as u64 }
    }

    fn sleep_until(&mut self, deadline_us: u64) {
        loop {
            let now = self.now_us();
            if now >= deadline_us {
                return;
            }
            if deadline_us - now > 2 * RTOS_TICK_US {
                unsafe {
                    sys::vTaskDelay(1);
                }
            } else {
                core::hint::spin_loop();
            }
        }
    }
}

/// UART TX sink for the log drain.
pub struct UartSink<'d> {
    uart: UartTxDriver<'d>,
}

impl<'d> UartSink<'d> {
    /// Initialize UART1 TX-only for log output.
    pub fn new(
        uart: impl Peripheral<P = uart::UART1> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        baud_rate: u32,
    ) -> Result<Self, EspError> {
        let uart_config =
            uart::config::Config::default().baudrate(esp_idf_svc::hal::units::Hertz(baud_rate));

        let uart = UartTxDriver::new(
            uart,
            tx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )?;

        Ok(Self { uart })
    }
}

impl core::fmt::Write for UartSink<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.uart
            .write(s.as_bytes())
            .map(|_| ())
            .map_err(|_| core::fmt::Error)
    }
}
