//! # leetaccel-atomic
//!
//! RT-safe counters and queues for the leetaccel interception pipeline.
//!
//! The per-event callback cannot log, lock or allocate. It records what it
//! did in [`PipelineCounters`] and hands anything worth reporting to an
//! [`queues::EventQueue`], which a non-RT thread drains later.
//!
//! ## Safety Guarantees
//!
//! - **No heap allocations** after initialization
//! - **No blocking operations**, all methods are lock-free
//! - **No syscalls** in RT hot paths
//! - **Deterministic execution time** for all operations
//!
//! ## Usage
//!
//! ```rust
//! use leetaccel_atomic::PipelineCounters;
//!
//! let counters = PipelineCounters::new();
//!
//! // RT-safe operations (no allocations, no blocking)
//! counters.inc_seen();
//! counters.inc_consumed();
//! counters.record_flush(2);
//!
//! // Read (non-RT path, typically a status command)
//! let values = counters.snapshot();
//! assert_eq!(values.motion_emitted, 2);
//! ```

#![no_std]
#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod counters;

#[cfg(feature = "queues")]
#[cfg_attr(docsrs, doc(cfg(feature = "queues")))]
pub mod queues;

pub mod prelude;

pub use counters::{CounterSnapshot, PipelineCounters};
