//! Per-event execution
//!
//! This is the interception callback. It runs once per raw event with strict
//! guarantees:
//! - No heap allocations in the hot path
//! - No logging, locks or syscalls; faults go to the diagnostics queue
//! - Bounded execution time (one curve evaluation per window)
//! - Curve swaps only at window boundaries

use leetaccel_device::DeviceId;
use leetaccel_errors::RTError;

use crate::controller::{Disposition, Interception};
use crate::diagnostics::DiagnosticEvent;
use crate::events::InputEvent;
use crate::sink::EmissionSink;
use crate::types::{DeviceHandle, MotionPipeline, PipelineError};

impl<S: EmissionSink> MotionPipeline<S> {
    /// Handle one raw event from `device`.
    ///
    /// Events from untracked devices are forwarded unmodified. For tracked
    /// devices the controller decides; transformed events reach the sink
    /// through [`EmissionSink::emit`] before the marker that triggered them
    /// is forwarded.
    ///
    /// # RT Safety
    ///
    /// - **No heap allocations** unless the sink allocates
    /// - **No blocking**: counters are atomics, diagnostics a lock-free queue
    #[inline]
    pub fn on_event(&mut self, device: &DeviceId, event: InputEvent) -> Disposition {
        self.counters.inc_seen();

        if event.is_sync_report() && !event.is_synthetic() {
            self.poll_feed();
        }

        let Some(state) = self.devices.get_mut(device) else {
            self.counters.inc_passed_through();
            self.sink.pass_through(device, event);
            return Disposition::PassThrough;
        };
        let handle = state.handle;
        let out = state.controller.handle(event, &self.curve.curve);
        let disposition = out.disposition;
        self.dispatch(device, handle, Some(event), &out);
        disposition
    }

    /// Flush `device`'s buffered motion now and follow it with a synthetic
    /// `SYN_REPORT`.
    ///
    /// For sources that never send a synchronization marker, the caller
    /// decides when a window ends. Returns the number of motion events
    /// emitted.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownDevice`] if the device is not tracked.
    pub fn force_flush(&mut self, device: &DeviceId) -> Result<usize, PipelineError> {
        self.poll_feed();
        let state = self
            .devices
            .get_mut(device)
            .ok_or_else(|| PipelineError::UnknownDevice(device.clone()))?;
        let handle = state.handle;
        let Some(out) = state.controller.force_flush(&self.curve.curve) else {
            return Ok(0);
        };
        self.dispatch(device, handle, None, &out);
        if !out.emitted.is_empty() {
            self.sink.emit(device, InputEvent::sync().synthetic());
        }
        Ok(out.emitted.len())
    }

    /// Apply a curve published through the feed, if one is pending.
    #[inline]
    fn poll_feed(&mut self) {
        let Some(feed) = self.feed.as_ref() else {
            return;
        };
        if let Some(next) = feed.take_pending() {
            let previous = core::mem::replace(&mut self.curve, next);
            feed.retire(previous);
        }
    }

    #[inline]
    fn dispatch(
        &mut self,
        device: &DeviceId,
        handle: DeviceHandle,
        trigger: Option<InputEvent>,
        out: &Interception,
    ) {
        for event in &out.emitted {
            self.sink.emit(device, *event);
        }
        if out.flushed {
            self.counters
                .record_flush(u64::try_from(out.emitted.len()).unwrap_or(u64::MAX));
        }
        if out.echo_absorbed {
            self.counters.inc_echo_absorbed();
        }
        for fault in &out.faults {
            match fault {
                RTError::CurveConfig => self.counters.inc_curve_fault(),
                RTError::OutputOverflow => self.counters.inc_output_clamp(),
                RTError::UnexpectedEcho => self.counters.inc_unexpected_echo(),
                _ => {}
            }
            self.report(handle, *fault);
        }

        let Some(event) = trigger else {
            return;
        };
        match out.disposition {
            Disposition::Consume => self.counters.inc_consumed(),
            Disposition::PassThrough => {
                self.counters.inc_passed_through();
                self.sink.pass_through(device, event);
            }
        }
    }

    #[inline]
    fn report(&self, device: DeviceHandle, error: RTError) {
        if !self.diagnostics.push_drop(DiagnosticEvent { device, error }) {
            self.counters.inc_diagnostic_dropped();
        }
    }
}
