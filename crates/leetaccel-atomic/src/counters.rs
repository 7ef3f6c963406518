//! Atomic counters for the interception pipeline.
//!
//! This module provides [`PipelineCounters`], a set of counters that the
//! per-event callback bumps as it consumes, passes through and emits events.
//!
//! # RT Safety
//!
//! All `inc_*` and `record_*` methods on [`PipelineCounters`] are RT-safe:
//! - Use `Ordering::Relaxed` (counters are independent, no cross-field ordering)
//! - No heap allocations
//! - No syscalls
//! - Bounded execution time (single atomic instruction)

use core::sync::atomic::{AtomicU64, Ordering};

/// Counter snapshot returned by [`PipelineCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterSnapshot {
    /// Raw events delivered to the pipeline
    pub events_seen: u64,
    /// Motion events buffered into an aggregation window
    pub events_consumed: u64,
    /// Events handed downstream unmodified
    pub events_passed_through: u64,
    /// Transformed motion events emitted
    pub motion_emitted: u64,
    /// Self-emitted echoes recognized and released once
    pub echoes_absorbed: u64,
    /// Aggregation windows flushed at a sync marker
    pub windows_flushed: u64,
    /// Windows passed through raw because the curve faulted
    pub curve_faults: u64,
    /// Output deltas clamped to the `i32` range
    pub output_clamps: u64,
    /// Synthetic events seen with no outstanding guard
    pub unexpected_echoes: u64,
    /// Diagnostics lost to a full queue
    pub diagnostics_dropped: u64,
}

impl CounterSnapshot {
    /// Emitted events whose echo has not been observed yet.
    ///
    /// Only meaningful when the emission path loops back into the pipeline.
    #[inline]
    #[must_use]
    pub fn outstanding_echoes(&self) -> u64 {
        self.motion_emitted.saturating_sub(self.echoes_absorbed)
    }
}

/// Atomic counters for the interception pipeline.
///
/// # Example
///
/// ```rust
/// use leetaccel_atomic::PipelineCounters;
///
/// let counters = PipelineCounters::new();
/// counters.inc_seen();
/// counters.inc_passed_through();
///
/// let snapshot = counters.snapshot();
/// assert_eq!(snapshot.events_passed_through, 1);
/// ```
#[derive(Debug)]
pub struct PipelineCounters {
    events_seen: AtomicU64,
    events_consumed: AtomicU64,
    events_passed_through: AtomicU64,
    motion_emitted: AtomicU64,
    echoes_absorbed: AtomicU64,
    windows_flushed: AtomicU64,
    curve_faults: AtomicU64,
    output_clamps: AtomicU64,
    unexpected_echoes: AtomicU64,
    diagnostics_dropped: AtomicU64,
}

impl Default for PipelineCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineCounters {
    /// Create counters initialized to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events_seen: AtomicU64::new(0),
            events_consumed: AtomicU64::new(0),
            events_passed_through: AtomicU64::new(0),
            motion_emitted: AtomicU64::new(0),
            echoes_absorbed: AtomicU64::new(0),
            windows_flushed: AtomicU64::new(0),
            curve_faults: AtomicU64::new(0),
            output_clamps: AtomicU64::new(0),
            unexpected_echoes: AtomicU64::new(0),
            diagnostics_dropped: AtomicU64::new(0),
        }
    }

    /// Count one raw event entering the pipeline.
    #[inline]
    pub fn inc_seen(&self) {
        self.events_seen.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one event buffered instead of forwarded.
    #[inline]
    pub fn inc_consumed(&self) {
        self.events_consumed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one event forwarded unmodified.
    #[inline]
    pub fn inc_passed_through(&self) {
        self.events_passed_through.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one echo released against the guard.
    #[inline]
    pub fn inc_echo_absorbed(&self) {
        self.echoes_absorbed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a flushed window and the number of events it emitted.
    ///
    /// # RT Safety
    ///
    /// RT-safe. Two relaxed fetch-adds.
    #[inline]
    pub fn record_flush(&self, emitted: u64) {
        self.windows_flushed.fetch_add(1, Ordering::Relaxed);
        self.motion_emitted.fetch_add(emitted, Ordering::Relaxed);
    }

    /// Count a window that fell back to raw deltas.
    #[inline]
    pub fn inc_curve_fault(&self) {
        self.curve_faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one clamped output delta.
    #[inline]
    pub fn inc_output_clamp(&self) {
        self.output_clamps.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a synthetic event seen with no guard outstanding.
    #[inline]
    pub fn inc_unexpected_echo(&self) {
        self.unexpected_echoes.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a diagnostic that did not fit in its queue.
    #[inline]
    pub fn inc_diagnostic_dropped(&self) {
        self.diagnostics_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all counter values.
    ///
    /// The values are read one by one; there is no atomic snapshot across
    /// counters.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            events_seen: self.events_seen.load(Ordering::Relaxed),
            events_consumed: self.events_consumed.load(Ordering::Relaxed),
            events_passed_through: self.events_passed_through.load(Ordering::Relaxed),
            motion_emitted: self.motion_emitted.load(Ordering::Relaxed),
            echoes_absorbed: self.echoes_absorbed.load(Ordering::Relaxed),
            windows_flushed: self.windows_flushed.load(Ordering::Relaxed),
            curve_faults: self.curve_faults.load(Ordering::Relaxed),
            output_clamps: self.output_clamps.load(Ordering::Relaxed),
            unexpected_echoes: self.unexpected_echoes.load(Ordering::Relaxed),
            diagnostics_dropped: self.diagnostics_dropped.load(Ordering::Relaxed),
        }
    }

    /// Get a snapshot and reset all counters to zero.
    ///
    /// # RT Safety
    ///
    /// **NOT RT-safe**. Call from non-RT code only.
    #[inline]
    #[must_use]
    pub fn snapshot_and_reset(&self) -> CounterSnapshot {
        CounterSnapshot {
            events_seen: self.events_seen.swap(0, Ordering::Relaxed),
            events_consumed: self.events_consumed.swap(0, Ordering::Relaxed),
            events_passed_through: self.events_passed_through.swap(0, Ordering::Relaxed),
            motion_emitted: self.motion_emitted.swap(0, Ordering::Relaxed),
            echoes_absorbed: self.echoes_absorbed.swap(0, Ordering::Relaxed),
            windows_flushed: self.windows_flushed.swap(0, Ordering::Relaxed),
            curve_faults: self.curve_faults.swap(0, Ordering::Relaxed),
            output_clamps: self.output_clamps.swap(0, Ordering::Relaxed),
            unexpected_echoes: self.unexpected_echoes.swap(0, Ordering::Relaxed),
            diagnostics_dropped: self.diagnostics_dropped.swap(0, Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    #[inline]
    pub fn reset(&self) {
        let _previous = self.snapshot_and_reset();
    }

    /// Raw events seen so far.
    #[inline]
    #[must_use]
    pub fn events_seen(&self) -> u64 {
        self.events_seen.load(Ordering::Relaxed)
    }

    /// Transformed events emitted so far.
    #[inline]
    #[must_use]
    pub fn motion_emitted(&self) -> u64 {
        self.motion_emitted.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_counters_are_zero() {
        let counters = PipelineCounters::new();
        assert_eq!(counters.snapshot(), CounterSnapshot::default());
    }

    #[test]
    fn test_record_flush() {
        let counters = PipelineCounters::new();
        counters.record_flush(2);
        counters.record_flush(0);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.windows_flushed, 2);
        assert_eq!(snapshot.motion_emitted, 2);
    }

    #[test]
    fn test_outstanding_echoes() {
        let counters = PipelineCounters::new();
        counters.record_flush(3);
        counters.inc_echo_absorbed();
        assert_eq!(counters.snapshot().outstanding_echoes(), 2);
    }

    #[test]
    fn test_snapshot_and_reset() {
        let counters = PipelineCounters::new();
        counters.inc_seen();
        counters.inc_curve_fault();

        let snapshot = counters.snapshot_and_reset();
        assert_eq!(snapshot.events_seen, 1);
        assert_eq!(snapshot.curve_faults, 1);
        assert_eq!(counters.snapshot(), CounterSnapshot::default());
    }

    #[test]
    fn test_reset() {
        let counters = PipelineCounters::new();
        counters.inc_output_clamp();
        counters.inc_unexpected_echo();
        counters.reset();
        assert_eq!(counters.snapshot(), CounterSnapshot::default());
    }
}
