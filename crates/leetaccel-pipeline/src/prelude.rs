//! Prelude for leetaccel-pipeline
//!
//! This module provides convenient re-exports of commonly used types.
//!
//! # Example
//!
//! ```
//! use leetaccel_pipeline::prelude::*;
//!
//! let pipeline = MotionPipeline::new(RecordingSink::default());
//! assert_eq!(pipeline.tracked_devices().count(), 0);
//! ```

pub use crate::compiler::{ParameterFeed, PublishOutcome};
pub use crate::controller::{ControllerState, Disposition};
pub use crate::diagnostics::DiagnosticEvent;
pub use crate::events::{Axis, InputEvent};
pub use crate::sink::{EchoMode, EmissionSink, RecordingSink};
pub use crate::types::{MotionPipeline, PipelineError, PipelineSettings};
pub use crate::window::SameAxisPolicy;
pub use leetaccel_device::DeviceId;
