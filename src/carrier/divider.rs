//! Clock divider model.
//!
//! Linear map from nominal carrier frequency to the PWM clock divider:
//! the top of the band runs the carrier clock undivided, the bottom of the
//! band divides it by two.
//!
//! ```text
//!  MHz   88.0   98.0   108.0
//!  div    2.0    1.5     1.0
//! ```

use super::frequency::{BAND_MAX_MHZ, BAND_MIN_MHZ};

/// Width of the broadcast band in MHz (one divider unit).
const BAND_SPAN_MHZ: f32 = BAND_MAX_MHZ - BAND_MIN_MHZ;

/// Divider ratio for a carrier frequency in MHz.
///
/// `frequency_mhz` must already be clamped to the band. Callers hold a
/// [`CarrierFrequency`](super::CarrierFrequency), which can only be
/// constructed in range, so this is not checked at runtime in release builds.
#[inline]
pub fn divider_for(frequency_mhz: f32) -> f32 {
    debug_assert!(
        (BAND_MIN_MHZ..=BAND_MAX_MHZ).contains(&frequency_mhz),
        "frequency outside band"
    );
    1.0 + (BAND_MAX_MHZ - frequency_mhz) / BAND_SPAN_MHZ
}
