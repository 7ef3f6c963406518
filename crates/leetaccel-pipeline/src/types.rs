//! Core pipeline types
//!
//! [`MotionPipeline`] owns one [`InterceptionController`] per tracked device,
//! the active curve, and the sink. There is no global state; everything the
//! event path touches lives in this struct or behind the shared counters and
//! diagnostics queue.

use std::collections::HashMap;
use std::sync::Arc;

use leetaccel_atomic::PipelineCounters;
use leetaccel_atomic::queues::EventQueue;
use leetaccel_curves::{AccelCurve, Parameters};
use leetaccel_device::DeviceId;
use leetaccel_errors::ConfigError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::compiler::{CompiledCurve, ParameterFeed};
use crate::controller::InterceptionController;
use crate::diagnostics::DiagnosticEvent;
use crate::sink::EmissionSink;
use crate::window::SameAxisPolicy;

/// Default diagnostics queue capacity.
pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 256;

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Handling of repeated axis updates within one report.
    pub same_axis_policy: SameAxisPolicy,
    /// Keep sub-count remainders across windows instead of rounding.
    pub carry_remainder: bool,
    /// Diagnostics held before new ones are dropped.
    pub diagnostics_capacity: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            same_axis_policy: SameAxisPolicy::Overwrite,
            carry_remainder: true,
            diagnostics_capacity: DEFAULT_DIAGNOSTICS_CAPACITY,
        }
    }
}

/// Small copyable id for a tracked device, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceHandle(u32);

impl DeviceHandle {
    /// Wrap a raw handle.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw handle.
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The device is not tracked
    #[error("Device not tracked: {0}")]
    UnknownDevice(DeviceId),

    /// Parameters were rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Per-device state held by the pipeline.
#[derive(Debug, Clone)]
pub(crate) struct DeviceState {
    pub handle: DeviceHandle,
    pub controller: InterceptionController,
}

/// Motion acceleration pipeline over a set of tracked devices.
///
/// # Example
///
/// ```
/// use leetaccel_pipeline::prelude::*;
///
/// let mut pipeline = MotionPipeline::new(RecordingSink::new(EchoMode::Decoupled));
/// let mouse = DeviceId::new("1-1:1.0");
/// pipeline.track(mouse.clone());
///
/// pipeline.on_event(&mouse, InputEvent::rel(Axis::X, 5));
/// pipeline.on_event(&mouse, InputEvent::rel(Axis::Y, 3));
/// pipeline.on_event(&mouse, InputEvent::sync());
///
/// let out: Vec<String> = pipeline.sink().events().iter().map(|e| e.to_string()).collect();
/// assert_eq!(out, ["REL_X 5 *", "REL_Y 3 *", "SYN"]);
/// ```
#[derive(Debug)]
pub struct MotionPipeline<S> {
    pub(crate) settings: PipelineSettings,
    pub(crate) sink: S,
    pub(crate) curve: Box<CompiledCurve>,
    pub(crate) devices: HashMap<DeviceId, DeviceState>,
    pub(crate) next_handle: u32,
    pub(crate) counters: Arc<PipelineCounters>,
    pub(crate) diagnostics: Arc<EventQueue<DiagnosticEvent>>,
    pub(crate) feed: Option<Arc<ParameterFeed>>,
}

impl<S: EmissionSink> MotionPipeline<S> {
    /// Pipeline with default settings and the identity curve.
    pub fn new(sink: S) -> Self {
        Self::with_settings(sink, PipelineSettings::default())
    }

    /// Pipeline with explicit settings.
    pub fn with_settings(sink: S, settings: PipelineSettings) -> Self {
        Self {
            settings,
            sink,
            curve: Box::new(CompiledCurve::identity()),
            devices: HashMap::new(),
            next_handle: 0,
            counters: Arc::new(PipelineCounters::new()),
            diagnostics: Arc::new(EventQueue::with_capacity(settings.diagnostics_capacity)),
            feed: None,
        }
    }

    /// Active settings.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// The sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the pipeline and return the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Active curve.
    pub fn curve(&self) -> &AccelCurve {
        &self.curve.curve
    }

    /// Hash of the parameters behind the active curve.
    pub fn params_hash(&self) -> u64 {
        self.curve.params_hash
    }

    /// Shared event counters.
    pub fn counters(&self) -> Arc<PipelineCounters> {
        Arc::clone(&self.counters)
    }

    /// Shared diagnostics queue.
    pub fn diagnostics(&self) -> Arc<EventQueue<DiagnosticEvent>> {
        Arc::clone(&self.diagnostics)
    }

    /// Start intercepting `device`.
    ///
    /// Tracking an already tracked device returns its existing handle.
    pub fn track(&mut self, device: DeviceId) -> DeviceHandle {
        if let Some(state) = self.devices.get(&device) {
            return state.handle;
        }
        let handle = DeviceHandle::new(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        let controller = InterceptionController::new(
            self.settings.same_axis_policy,
            self.sink.echo_mode(),
            self.settings.carry_remainder,
        );
        info!(device = %device, handle = handle.get(), "Tracking device");
        self.devices.insert(device, DeviceState { handle, controller });
        handle
    }

    /// Stop intercepting `device`, flushing buffered motion first.
    ///
    /// Returns the handle it had, or `None` if it was not tracked.
    pub fn untrack(&mut self, device: &DeviceId) -> Option<DeviceHandle> {
        if let Ok(emitted) = self.force_flush(device) {
            debug!(device = %device, emitted, "Flushed on untrack");
        }
        let state = self.devices.remove(device)?;
        info!(device = %device, handle = state.handle.get(), "Stopped tracking device");
        Some(state.handle)
    }

    /// True if `device` is tracked.
    pub fn is_tracked(&self, device: &DeviceId) -> bool {
        self.devices.contains_key(device)
    }

    /// Tracked devices, in no particular order.
    pub fn tracked_devices(&self) -> impl Iterator<Item = &DeviceId> {
        self.devices.keys()
    }

    /// Controller for `device`.
    pub fn controller(&self, device: &DeviceId) -> Option<&InterceptionController> {
        self.devices.get(device).map(|s| &s.controller)
    }

    /// Validate `params` and make the resulting curve active.
    ///
    /// Call this from the thread that drives [`Self::on_event`]; use
    /// [`Self::attach_feed`] to update from another thread.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; the active curve is kept.
    pub fn apply_parameters(&mut self, params: &Parameters) -> Result<(), PipelineError> {
        let compiled = CompiledCurve::compile(params)?;
        info!(mode = ?params.mode, sensitivity = params.sensitivity, "Applied parameters");
        self.curve = Box::new(compiled);
        if let Some(feed) = &self.feed {
            if let Some(stale) = feed.take_pending() {
                debug!(
                    generation = stale.generation,
                    "Discarding curve superseded by direct apply"
                );
                feed.retire(stale);
            }
            feed.forget_published();
        }
        Ok(())
    }

    /// Feed for publishing curves from another thread.
    ///
    /// Pending curves are applied at the next synchronization marker.
    pub fn attach_feed(&mut self) -> Arc<ParameterFeed> {
        Arc::clone(self.feed.get_or_insert_with(|| Arc::new(ParameterFeed::new())))
    }

    /// Log and return every queued diagnostic.
    pub fn drain_diagnostics(&self) -> Vec<DiagnosticEvent> {
        let events: Vec<DiagnosticEvent> = self.diagnostics.drain().collect();
        for event in &events {
            event.log();
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{EchoMode, RecordingSink};

    #[test]
    fn test_track_is_idempotent() {
        let mut pipeline = MotionPipeline::new(RecordingSink::default());
        let a = DeviceId::new("a");
        let first = pipeline.track(a.clone());
        let second = pipeline.track(a.clone());
        let other = pipeline.track(DeviceId::new("b"));
        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(pipeline.tracked_devices().count(), 2);
    }

    #[test]
    fn test_controller_takes_sink_echo_mode() {
        let mut pipeline = MotionPipeline::new(RecordingSink::new(EchoMode::Decoupled));
        let a = DeviceId::new("a");
        let _handle = pipeline.track(a.clone());
        assert_eq!(
            pipeline.controller(&a).map(InterceptionController::echo_mode),
            Some(EchoMode::Decoupled)
        );
    }

    #[test]
    fn test_rejected_parameters_keep_curve() {
        let mut pipeline = MotionPipeline::new(RecordingSink::default());
        let before = pipeline.params_hash();
        let bad = Parameters {
            sensitivity: -1.0,
            ..Parameters::default()
        };
        assert!(matches!(pipeline.apply_parameters(&bad), Err(PipelineError::Config(_))));
        assert_eq!(pipeline.params_hash(), before);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() -> Result<(), serde_json::Error> {
        let settings: PipelineSettings = serde_json::from_str(r#"{"same_axis_policy":"accumulate"}"#)?;
        assert_eq!(settings.same_axis_policy, SameAxisPolicy::Accumulate);
        assert!(settings.carry_remainder);
        assert_eq!(settings.diagnostics_capacity, DEFAULT_DIAGNOSTICS_CAPACITY);
        Ok(())
    }
}
