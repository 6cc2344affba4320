//! Fault state management for FmPwmTx.
//!
//! # Policy
//!
//! The sampling loop never stops on a fault. A failed ADC read is replaced
//! by the last good sample; a missed deadline is absorbed by the absolute
//! schedule. Both are latched here so a background context can report them.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes recorded by the sampling loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// ADC conversion failed; last good sample substituted.
    AdcReadFailed = 1,

    /// A tick finished after its deadline.
    /// Data holds the lateness in microseconds.
    DeadlineMissed = 2,

    /// The carrier driver rejected a period, duty or divider write.
    /// Data holds the driver error code.
    CarrierWriteFailed = 3,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::AdcReadFailed,
            2 => FaultCode::DeadlineMissed,
            3 => FaultCode::CarrierWriteFailed,
            _ => FaultCode::None,
        }
    }
}

/// Thread-safe fault latch.
///
/// Holds the most recent fault plus per-kind counters since boot.
///
/// # Usage
///
/// ```ignore
/// static FAULT: FaultState = FaultState::new();
///
/// // In the RT loop:
/// if late_us > 0 {
///     FAULT.record(FaultCode::DeadlineMissed, late_us as u32);
/// }
///
/// // In a background context:
/// if FAULT.is_active() {
///     report(FAULT.snapshot());
///     FAULT.clear();
/// }
/// ```
pub struct FaultState {
    /// True until cleared after the latest fault.
    active: AtomicBool,

    /// Code of the latest fault.
    code: AtomicU8,

    /// Data of the latest fault (meaning depends on code).
    data: AtomicU32,

    /// ADC failures since boot (never cleared).
    adc_failures: AtomicU32,

    /// Deadline misses since boot (never cleared).
    deadline_misses: AtomicU32,

    /// Rejected carrier writes since boot (never cleared).
    carrier_failures: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            adc_failures: AtomicU32::new(0),
            deadline_misses: AtomicU32::new(0),
            carrier_failures: AtomicU32::new(0),
        }
    }

    /// Record a fault and bump its counter.
    #[inline]
    pub fn record(&self, code: FaultCode, data: u32) {
        match code {
            FaultCode::None => return,
            FaultCode::AdcReadFailed => {
                self.adc_failures.fetch_add(1, Ordering::Relaxed);
            }
            FaultCode::DeadlineMissed => {
                self.deadline_misses.fetch_add(1, Ordering::Relaxed);
            }
            FaultCode::CarrierWriteFailed => {
                self.carrier_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.active.store(true, Ordering::Release);
    }

    /// Check if an unreported fault is latched.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Latest fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Latest fault data.
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    #[inline]
    pub fn adc_failures(&self) -> u32 {
        self.adc_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deadline_misses(&self) -> u32 {
        self.deadline_misses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn carrier_failures(&self) -> u32 {
        self.carrier_failures.load(Ordering::Relaxed)
    }

    /// Clear the latch (after reporting). Counters are kept.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Get a snapshot of the current fault state.
    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            adc_failures: self.adc_failures(),
            deadline_misses: self.deadline_misses(),
            carrier_failures: self.carrier_failures(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub adc_failures: u32,
    pub deadline_misses: u32,
    pub carrier_failures: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_state_basic() {
        let fault = FaultState::new();

        assert!(!fault.is_active());
        assert_eq!(fault.code(), FaultCode::None);

        fault.record(FaultCode::DeadlineMissed, 42);

        assert!(fault.is_active());
        assert_eq!(fault.code(), FaultCode::DeadlineMissed);
        assert_eq!(fault.data(), 42);
        assert_eq!(fault.deadline_misses(), 1);

        fault.clear();

        assert!(!fault.is_active());
        assert_eq!(fault.deadline_misses(), 1); // Count preserved
    }

    #[test]
    fn test_counters_are_per_kind() {
        let fault = FaultState::new();

        fault.record(FaultCode::AdcReadFailed, 0);
        fault.record(FaultCode::AdcReadFailed, 0);
        fault.record(FaultCode::DeadlineMissed, 7);
        fault.record(FaultCode::CarrierWriteFailed, 0x103);

        let snap = fault.snapshot();
        assert_eq!(snap.adc_failures, 2);
        assert_eq!(snap.deadline_misses, 1);
        assert_eq!(snap.carrier_failures, 1);
        assert_eq!(snap.code, FaultCode::CarrierWriteFailed);
        assert_eq!(snap.data, 0x103);
    }

    #[test]
    fn test_recording_none_is_ignored() {
        let fault = FaultState::new();
        fault.record(FaultCode::None, 99);
        assert!(!fault.is_active());
        assert_eq!(fault.data(), 0);
    }
}
