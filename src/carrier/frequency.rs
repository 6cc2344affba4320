//! Carrier frequency and the lock-protected frequency/divider cell.
//!
//! Frequencies are kept on the 0.1 MHz tuning grid as integer tenths, so
//! repeated button steps land exactly on the band edges.

use core::cell::Cell;
use core::fmt;

use critical_section::Mutex;

/// Lower band edge in MHz.
pub const BAND_MIN_MHZ: f32 = 88.0;
/// Upper band edge in MHz.
pub const BAND_MAX_MHZ: f32 = 108.0;
/// Power-on frequency in MHz.
pub const DEFAULT_MHZ: f32 = 90.0;

const BAND_MIN_TENTHS: u16 = 880;
const BAND_MAX_TENTHS: u16 = 1080;
const DEFAULT_TENTHS: u16 = 900;

/// Nominal carrier frequency, always inside `[88.0, 108.0]` MHz.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CarrierFrequency {
    tenths: u16,
}

impl CarrierFrequency {
    pub const MIN: Self = Self { tenths: BAND_MIN_TENTHS };
    pub const MAX: Self = Self { tenths: BAND_MAX_TENTHS };
    pub const DEFAULT: Self = Self { tenths: DEFAULT_TENTHS };

    /// Frequency from tenths of MHz, saturated to the band.
    pub const fn from_tenths(tenths: i32) -> Self {
        let tenths = if tenths < BAND_MIN_TENTHS as i32 {
            BAND_MIN_TENTHS
        } else if tenths > BAND_MAX_TENTHS as i32 {
            BAND_MAX_TENTHS
        } else {
            tenths as u16
        };
        Self { tenths }
    }

    /// Frequency from MHz, rounded to the 0.1 MHz grid and saturated to the band.
    ///
    /// NaN saturates to the lower edge.
    pub fn clamped(mhz: f32) -> Self {
        let mhz = mhz.clamp(BAND_MIN_MHZ, BAND_MAX_MHZ);
        Self::from_tenths((mhz * 10.0 + 0.5) as i32)
    }

    /// Frequency in tenths of MHz
    #[inline]
    pub const fn tenths(self) -> u16 {
        self.tenths
    }

    #[inline]
    pub fn mhz(self) -> f32 {
        self.tenths as f32 / 10.0
    }

    /// Move by `delta_tenths` on the tuning grid, saturating at the band edges
    #[inline]
    pub const fn stepped(self, delta_tenths: i32) -> Self {
        Self::from_tenths(self.tenths as i32 + delta_tenths)
    }

    #[inline]
    pub const fn is_band_edge(self) -> bool {
        self.tenths == BAND_MIN_TENTHS || self.tenths == BAND_MAX_TENTHS
    }
}

impl Default for CarrierFrequency {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CarrierFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} MHz", self.tenths / 10, self.tenths % 10)
    }
}

/// Frequency and the divider derived from it. Always written as a pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencySetting {
    pub frequency: CarrierFrequency,
    pub divider: f32,
}

impl FrequencySetting {
    /// Power-on setting: 90.0 MHz, divider 1.9.
    pub const DEFAULT: Self = Self {
        frequency: CarrierFrequency::DEFAULT,
        divider: 1.0 + (BAND_MAX_MHZ - DEFAULT_MHZ) / (BAND_MAX_MHZ - BAND_MIN_MHZ),
    };

    /// Setting for `frequency` with its divider computed by the divider model
    pub fn for_frequency(frequency: CarrierFrequency) -> Self {
        Self {
            frequency,
            divider: super::divider_for(frequency.mhz()),
        }
    }
}

impl Default for FrequencySetting {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Mutex-guarded frequency/divider pair.
///
/// Shared by reference between the frequency controller and the sampling
/// loop, and safe to touch from an interrupt handler: every access runs in
/// a critical section, so readers never see a frequency paired with a stale
/// divider.
///
/// # Example
///
/// ```
/// use fm_pwm_tx::carrier::{SharedFrequencyCell, FrequencySetting};
///
/// static FREQUENCY: SharedFrequencyCell = SharedFrequencyCell::new(FrequencySetting::DEFAULT);
///
/// assert_eq!(FREQUENCY.load().frequency.tenths(), 900);
/// ```
pub struct SharedFrequencyCell {
    inner: Mutex<Cell<FrequencySetting>>,
}

impl SharedFrequencyCell {
    pub const fn new(initial: FrequencySetting) -> Self {
        Self {
            inner: Mutex::new(Cell::new(initial)),
        }
    }

    /// Read the current pair
    #[inline]
    pub fn load(&self) -> FrequencySetting {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    /// Current frequency only
    #[inline]
    pub fn frequency(&self) -> CarrierFrequency {
        self.load().frequency
    }

    /// Replace the pair
    #[inline]
    pub fn store(&self, setting: FrequencySetting) {
        critical_section::with(|cs| self.inner.borrow(cs).set(setting));
    }

    /// Read-modify-write in a single critical section.
    ///
    /// `f` sees the current pair and returns the replacement, or `None` to
    /// leave it untouched. Returns what was written.
    #[inline]
    pub fn update<F>(&self, f: F) -> Option<FrequencySetting>
    where
        F: FnOnce(FrequencySetting) -> Option<FrequencySetting>,
    {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let next = f(cell.get())?;
            cell.set(next);
            Some(next)
        })
    }
}

impl Default for SharedFrequencyCell {
    fn default() -> Self {
        Self::new(FrequencySetting::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_saturates() {
        assert_eq!(CarrierFrequency::clamped(50.0), CarrierFrequency::MIN);
        assert_eq!(CarrierFrequency::clamped(200.0), CarrierFrequency::MAX);
        assert_eq!(CarrierFrequency::clamped(f32::NAN), CarrierFrequency::MIN);
        assert_eq!(CarrierFrequency::clamped(97.3).tenths(), 973);
    }

    #[test]
    fn test_stepping_saturates() {
        assert_eq!(CarrierFrequency::MAX.stepped(1), CarrierFrequency::MAX);
        assert_eq!(CarrierFrequency::MIN.stepped(-1), CarrierFrequency::MIN);
        assert_eq!(CarrierFrequency::DEFAULT.stepped(1).tenths(), 901);
    }

    #[test]
    fn test_display() {
        assert_eq!(CarrierFrequency::DEFAULT.to_string(), "90.0 MHz");
        assert_eq!(CarrierFrequency::clamped(107.9).to_string(), "107.9 MHz");
    }

    #[test]
    fn test_default_setting_matches_divider_model() {
        let computed = FrequencySetting::for_frequency(CarrierFrequency::DEFAULT);
        assert!((computed.divider - FrequencySetting::DEFAULT.divider).abs() < 1e-6);
    }

    #[test]
    fn test_update_skips_write_on_none() {
        let cell = SharedFrequencyCell::default();
        assert_eq!(cell.update(|_| None), None);
        assert_eq!(cell.load(), FrequencySetting::DEFAULT);

        let target = FrequencySetting::for_frequency(CarrierFrequency::MAX);
        assert_eq!(cell.update(|_| Some(target)), Some(target));
        assert_eq!(cell.frequency(), CarrierFrequency::MAX);
    }
}
