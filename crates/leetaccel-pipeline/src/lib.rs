//! Pointer Motion Interception Pipeline for leetaccel
//!
//! This crate sits on a pointer device's event stream. It buffers the
//! relative deltas of each report, and at the report's synchronization
//! marker replaces them with curve-accelerated ones.
//!
//! # Overview
//!
//! - **InputEvent**: raw events with Linux input-layer codes
//! - **AggregationWindow**: per-device deltas between two markers
//! - **InterceptionController**: per-device state machine, including the
//!   echo guard for sinks that loop emitted events back
//! - **MotionPipeline**: tracked devices, active curve, sink
//! - **ParameterFeed**: lock-free curve hand-off from a configuration thread
//!
//! # RT Safety Guarantees
//!
//! - **No heap allocations** in `MotionPipeline::on_event()`
//! - **No logging or locks** on the event path; faults are queued as
//!   [`DiagnosticEvent`]s and drained elsewhere
//! - **Fail open**: a curve fault passes the raw deltas through
//! - **Curve swaps** only at window boundaries
//!
//! # Architecture
//!
//! ```text
//! device ─▶ on_event ─▶ InterceptionController ─▶ EmissionSink::emit
//!                ▲            │                 └▶ EmissionSink::pass_through
//!                │            ▼                              │
//!          ParameterFeed   AccelCurve                        │
//!                └──────── echo (loopback sinks) ◀───────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use leetaccel_pipeline::prelude::*;
//! use leetaccel_curves::Parameters;
//!
//! let mut pipeline = MotionPipeline::new(RecordingSink::new(EchoMode::Loopback));
//! pipeline.apply_parameters(&Parameters { sensitivity: 2.0, ..Parameters::default() })?;
//!
//! let mouse = DeviceId::new("3-1:1.0");
//! pipeline.track(mouse.clone());
//! pipeline.on_event(&mouse, InputEvent::rel(Axis::X, 4));
//! pipeline.on_event(&mouse, InputEvent::sync());
//!
//! // The emitted event comes back once and is let through untouched.
//! for (device, echo) in pipeline.sink_mut().take_echoes() {
//!     pipeline.on_event(&device, echo);
//! }
//! assert_eq!(pipeline.counters().snapshot().echoes_absorbed, 1);
//! # Ok::<(), PipelineError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod compiler;
pub mod controller;
pub mod diagnostics;
pub mod events;
pub mod executor;
pub mod hash;
pub mod prelude;
pub mod sink;
pub mod state;
pub mod types;
pub mod window;

pub use compiler::{CompiledCurve, ParameterFeed, PublishOutcome};
pub use controller::{ControllerState, Disposition, Interception, InterceptionController};
pub use diagnostics::{DiagnosticEvent, DiagnosticSummary};
pub use events::{Axis, EventKind, InputEvent, Origin, ParseEventError};
pub use hash::calculate_parameters_hash;
pub use sink::{EchoMode, EmissionSink, OutputKind, OutputRecord, RecordingSink};
pub use state::{DeviceStateSnapshot, PipelineStateSnapshot};
pub use types::{DeviceHandle, MotionPipeline, PipelineError, PipelineSettings};
pub use window::{AggregationWindow, MotionDelta, SameAxisPolicy};

pub use leetaccel_device::DeviceId;
