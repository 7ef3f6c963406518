//! Prelude for leetaccel-atomic.
//!
//! ```rust
//! use leetaccel_atomic::prelude::*;
//!
//! let counters = PipelineCounters::new();
//! counters.inc_seen();
//! ```

pub use crate::counters::{CounterSnapshot, PipelineCounters};

#[cfg(feature = "queues")]
#[cfg_attr(docsrs, doc(cfg(feature = "queues")))]
pub use crate::queues::{DEFAULT_QUEUE_CAPACITY, EventQueue};
