//! Log drain: formats queued entries onto a text sink.
//!
//! The sink is any `core::fmt::Write`: a UART TX driver on target, stdout
//! in the host simulator.
//!
//! Format: `[timestamp_us] LEVEL: message`

use core::fmt::Write;

use crate::fault::FaultState;
use crate::logging::{LogEntry, LogStream};

/// Write one formatted entry.
pub fn write_entry<W: Write>(out: &mut W, entry: &LogEntry) -> core::fmt::Result {
    writeln!(
        out,
        "[{:10}] {}: {}",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.text()
    )
}

/// Drain every pending entry of `stream` into `out`.
///
/// Returns the number of entries written. Stops at the first sink error;
/// the failed entry is lost.
pub fn drain_to<W: Write, const N: usize>(stream: &LogStream<N>, out: &mut W) -> usize {
    let mut written = 0;
    while let Some(entry) = stream.drain() {
        if write_entry(out, &entry).is_err() {
            break;
        }
        written += 1;
    }
    written
}

/// Report and reset the dropped counters of both streams.
///
/// Writes nothing when no message was dropped.
pub fn report_dropped<W: Write, const N: usize>(
    rt: &LogStream<N>,
    bg: &LogStream<N>,
    out: &mut W,
) -> core::fmt::Result {
    let rt_dropped = rt.dropped();
    let bg_dropped = bg.dropped();

    if rt_dropped > 0 || bg_dropped > 0 {
        writeln!(out, "[WARN] Dropped: RT={}, BG={}", rt_dropped, bg_dropped)?;
        rt.reset_dropped();
        bg.reset_dropped();
    }
    Ok(())
}

/// Report and clear a latched fault.
///
/// Writes straight to `out`, never into a log stream: the drain context is
/// the consumer of the streams, not a producer. Writes nothing when no fault
/// is latched.
pub fn report_faults<W: Write>(fault: &FaultState, out: &mut W) -> core::fmt::Result {
    if !fault.is_active() {
        return Ok(());
    }
    let snap = fault.snapshot();
    writeln!(
        out,
        "[WARN] Faults: adc={} late={} carrier={} last={:?} ({})",
        snap.adc_failures, snap.deadline_misses, snap.carrier_failures, snap.code, snap.data
    )?;
    fault.clear();
    Ok(())
}
