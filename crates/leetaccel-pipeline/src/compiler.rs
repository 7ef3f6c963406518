//! Curve compilation and hand-off to the interception thread
//!
//! A configuration thread validates a [`Parameters`] snapshot and compiles it
//! into an [`AccelCurve`] ahead of time. The result goes into a single-slot
//! lock-free queue; the interception thread picks it up at the next window
//! boundary and hands the curve it replaced back through a second queue, so
//! neither allocation nor deallocation happens on the event path.
//!
//! ```text
//! Parameters ─▶ ParameterFeed::publish ─▶ [pending] ─▶ MotionPipeline (at SYN)
//!                                                            │
//!        ParameterFeed::collect_retired ◀── [retired] ◀──────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use leetaccel_atomic::queues::EventQueue;
use leetaccel_curves::{AccelCurve, Parameters};
use leetaccel_errors::ConfigError;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::hash::calculate_parameters_hash;

/// Retired curves held before the publisher collects them.
pub const RETIRED_CAPACITY: usize = 4;

/// A validated curve and the hash of the parameters it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCurve {
    /// The compiled curve.
    pub curve: AccelCurve,
    /// [`calculate_parameters_hash`] of the source parameters.
    pub params_hash: u64,
    /// Publish counter, 0 for curves compiled outside a feed.
    pub generation: u64,
}

impl CompiledCurve {
    /// Validate and compile `params`.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure from [`AccelCurve::from_parameters`].
    pub fn compile(params: &Parameters) -> Result<Self, ConfigError> {
        Ok(Self {
            curve: AccelCurve::from_parameters(params)?,
            params_hash: calculate_parameters_hash(params),
            generation: 0,
        })
    }

    /// The identity curve for default parameters.
    pub fn identity() -> Self {
        Self {
            curve: AccelCurve::identity(),
            params_hash: calculate_parameters_hash(&Parameters::default()),
            generation: 0,
        }
    }
}

/// Result of [`ParameterFeed::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new curve is pending.
    Published {
        /// Publish counter of the new curve.
        generation: u64,
    },
    /// The parameters match the last published snapshot.
    Unchanged,
}

/// Single-slot curve hand-off between a configuration thread and the
/// interception thread.
///
/// # RT Safety
///
/// [`Self::take_pending`] and [`Self::retire`] are RT-safe (lock-free,
/// no allocation). [`Self::publish`] allocates and takes a lock; call it from
/// the configuration side only.
#[derive(Debug)]
pub struct ParameterFeed {
    pending: EventQueue<Box<CompiledCurve>>,
    retired: EventQueue<Box<CompiledCurve>>,
    last_published: Mutex<Option<u64>>,
    generation: AtomicU64,
}

impl Default for ParameterFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterFeed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self {
            pending: EventQueue::with_capacity(1),
            retired: EventQueue::with_capacity(RETIRED_CAPACITY),
            last_published: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Validate `params` and queue the compiled curve.
    ///
    /// A curve that was published but not yet picked up is replaced; only
    /// the newest snapshot is ever applied.
    ///
    /// # Errors
    ///
    /// Returns the validation failure. The active curve and any pending one
    /// are left untouched.
    pub fn publish(&self, params: &Parameters) -> Result<PublishOutcome, ConfigError> {
        let mut last = self.last_published.lock();
        let hash = calculate_parameters_hash(params);
        if *last == Some(hash) {
            trace!(hash, "Parameters unchanged, skipping publish");
            return Ok(PublishOutcome::Unchanged);
        }

        let mut compiled = CompiledCurve::compile(params).inspect_err(|e| {
            warn!(error = %e, "Rejected parameter update");
        })?;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        compiled.generation = generation;

        let mut item = Box::new(compiled);
        loop {
            match self.pending.push(item) {
                Ok(()) => break,
                Err(rejected) => {
                    item = rejected;
                    if let Some(stale) = self.pending.pop() {
                        debug!(generation = stale.generation, "Replacing unapplied curve");
                    }
                }
            }
        }

        *last = Some(hash);
        debug!(generation, mode = ?params.mode, "Published curve");
        Ok(PublishOutcome::Published { generation })
    }

    /// Forget the last published snapshot so the next publish always queues.
    ///
    /// Called when the active curve changes outside the feed.
    pub fn forget_published(&self) {
        *self.last_published.lock() = None;
    }

    /// Take the pending curve, if any.
    #[inline]
    pub fn take_pending(&self) -> Option<Box<CompiledCurve>> {
        self.pending.pop()
    }

    /// True when a curve is waiting to be applied.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Hand a replaced curve back for dropping.
    ///
    /// When the retired queue is full the curve is freed in place.
    #[inline]
    pub fn retire(&self, curve: Box<CompiledCurve>) {
        let _queued = self.retired.push_drop(curve);
    }

    /// Drop retired curves. Returns how many were freed.
    pub fn collect_retired(&self) -> usize {
        let freed = self.retired.drain().count();
        if freed > 0 {
            trace!(freed, "Collected retired curves");
        }
        freed
    }

    /// Retired curves that had to be freed on the interception thread.
    pub fn retired_overflow(&self) -> u64 {
        self.retired.dropped()
    }

    /// Last publish counter handed out.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
