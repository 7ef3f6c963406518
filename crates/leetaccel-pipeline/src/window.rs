//! Per-device accumulator for the deltas of one report.
//!
//! # RT Safety
//!
//! `observe` and `flush` are RT-safe: fixed-size storage, no allocation,
//! constant time.

use serde::{Deserialize, Serialize};

use crate::events::Axis;

/// What a second update to the same axis within one report does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameAxisPolicy {
    /// The later value replaces the earlier one.
    #[default]
    Overwrite,
    /// Values are summed, saturating at the `i32` bounds.
    Accumulate,
}

/// Deltas flushed from one window; axes never observed are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotionDelta {
    /// Horizontal counts.
    pub dx: i32,
    /// Vertical counts.
    pub dy: i32,
    /// Vertical wheel detents.
    pub dwheel: i32,
}

impl MotionDelta {
    /// Delta on `axis`.
    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.dx,
            Axis::Y => self.dy,
            Axis::Wheel => self.dwheel,
        }
    }

    /// True when every axis is zero.
    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0 && self.dwheel == 0
    }
}

/// Pending deltas between two synchronization markers.
///
/// ```
/// use leetaccel_pipeline::events::Axis;
/// use leetaccel_pipeline::window::{AggregationWindow, SameAxisPolicy};
///
/// let mut window = AggregationWindow::new(SameAxisPolicy::Overwrite);
/// window.observe(Axis::X, 5);
/// window.observe(Axis::X, 7);
///
/// let delta = window.flush();
/// assert_eq!((delta.dx, delta.dy, delta.dwheel), (7, 0, 0));
/// assert!(window.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AggregationWindow {
    pending: [Option<i32>; 3],
    policy: SameAxisPolicy,
}

impl AggregationWindow {
    /// Create an empty window.
    pub fn new(policy: SameAxisPolicy) -> Self {
        Self {
            pending: [None; 3],
            policy,
        }
    }

    /// Policy for repeated axes.
    pub fn policy(&self) -> SameAxisPolicy {
        self.policy
    }

    /// Record `delta` for `axis`.
    #[inline]
    pub fn observe(&mut self, axis: Axis, delta: i32) {
        let policy = self.policy;
        if let Some(slot) = self.pending.get_mut(axis.index()) {
            *slot = Some(match (policy, *slot) {
                (SameAxisPolicy::Accumulate, Some(previous)) => previous.saturating_add(delta),
                _ => delta,
            });
        }
    }

    /// Pending value for `axis`, `None` if it was not observed.
    pub fn pending(&self, axis: Axis) -> Option<i32> {
        self.pending.get(axis.index()).copied().flatten()
    }

    /// True when no axis has been observed since the last flush.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.iter().all(Option::is_none)
    }

    /// Return the pending deltas and clear the window.
    #[inline]
    pub fn flush(&mut self) -> MotionDelta {
        let [x, y, wheel] = core::mem::take(&mut self.pending);
        MotionDelta {
            dx: x.unwrap_or(0),
            dy: y.unwrap_or(0),
            dwheel: wheel.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_unobserved_is_zero() {
        let mut window = AggregationWindow::default();
        assert!(window.is_empty());
        assert_eq!(window.flush(), MotionDelta::default());
    }

    #[test]
    fn test_accumulate_saturates() {
        let mut window = AggregationWindow::new(SameAxisPolicy::Accumulate);
        window.observe(Axis::Y, i32::MAX - 1);
        window.observe(Axis::Y, 5);
        window.observe(Axis::Wheel, -1);
        window.observe(Axis::Wheel, -1);

        let delta = window.flush();
        assert_eq!(delta.dy, i32::MAX);
        assert_eq!(delta.dwheel, -2);
    }

    #[test]
    fn test_observed_zero_is_not_empty() {
        let mut window = AggregationWindow::default();
        window.observe(Axis::X, 0);
        assert!(!window.is_empty());
        assert_eq!(window.pending(Axis::X), Some(0));
        assert!(window.flush().is_zero());
    }
}
