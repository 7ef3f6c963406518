//! Pipeline state inspection
//!
//! Snapshots for status commands and debugging. Taking one walks every
//! tracked device and allocates, so it is not for the event path.

use leetaccel_atomic::CounterSnapshot;
use leetaccel_device::DeviceId;
use serde::Serialize;

use crate::controller::ControllerState;
use crate::events::Axis;
use crate::sink::EmissionSink;
use crate::types::{DeviceHandle, MotionPipeline};

/// State of one tracked device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceStateSnapshot {
    /// Device id.
    pub device: DeviceId,
    /// Handle used in diagnostics.
    pub handle: u32,
    /// `idle`, `buffering` or `suppressing`.
    pub state: &'static str,
    /// Echoes still expected.
    pub outstanding_echoes: u32,
    /// Buffered `(x, y, wheel)`, `None` for axes not observed.
    pub pending: [Option<i32>; 3],
    /// Sub-count remainder `(x, y)`.
    pub carry: (f64, f64),
}

/// Pipeline state snapshot for debugging and analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineStateSnapshot {
    /// Tracked devices, ordered by handle.
    pub devices: Vec<DeviceStateSnapshot>,
    /// Hash of the parameters behind the active curve.
    pub params_hash: u64,
    /// Publish counter of the active curve.
    pub curve_generation: u64,
    /// Diagnostics waiting to be drained.
    pub queued_diagnostics: usize,
    /// Counter values at the time of the snapshot.
    #[serde(skip)]
    pub counters: CounterSnapshot,
}

impl ControllerState {
    /// Lowercase state name.
    pub fn name(self) -> &'static str {
        match self {
            ControllerState::Idle => "idle",
            ControllerState::Buffering => "buffering",
            ControllerState::Suppressing { .. } => "suppressing",
        }
    }
}

impl<S: EmissionSink> MotionPipeline<S> {
    /// Create a state snapshot for debugging
    #[must_use]
    pub fn state_snapshot(&self) -> PipelineStateSnapshot {
        let mut devices: Vec<DeviceStateSnapshot> = self
            .devices
            .iter()
            .map(|(id, s)| {
                let window = s.controller.window();
                DeviceStateSnapshot {
                    device: id.clone(),
                    handle: s.handle.get(),
                    state: s.controller.state().name(),
                    outstanding_echoes: s.controller.outstanding_echoes(),
                    pending: Axis::ALL.map(|axis| window.pending(axis)),
                    carry: s.controller.carry(),
                }
            })
            .collect();
        devices.sort_by_key(|d| d.handle);

        PipelineStateSnapshot {
            devices,
            params_hash: self.curve.params_hash,
            curve_generation: self.curve.generation,
            queued_diagnostics: self.diagnostics.len(),
            counters: self.counters.snapshot(),
        }
    }

    /// Handle of a tracked device.
    #[must_use]
    pub fn handle_of(&self, device: &DeviceId) -> Option<DeviceHandle> {
        self.devices.get(device).map(|s| s.handle)
    }

    /// Drop every device's buffered motion, carry and outstanding echoes.
    ///
    /// Use after the emission path was reset, when no echo will arrive.
    pub fn reset_state(&mut self) {
        for state in self.devices.values_mut() {
            state.controller.reset();
        }
    }
}
