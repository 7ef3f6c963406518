//! Where transformed and forwarded events go.

use leetaccel_device::DeviceId;
use serde::{Deserialize, Serialize};

use crate::events::InputEvent;

/// How emitted events relate to the pipeline's own input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EchoMode {
    /// Emitted events re-enter the pipeline through the same device path
    /// and must be suppressed once.
    #[default]
    Loopback,
    /// Emitted events go to a separate output and never come back.
    Decoupled,
}

/// Consumer of the pipeline's output.
///
/// Both methods run inside the interception callback and must not block.
/// With [`EchoMode::Loopback`] the sink must not feed an emitted event back
/// into the pipeline synchronously; it queues the echo for a later call.
pub trait EmissionSink {
    /// Inject a transformed event.
    fn emit(&mut self, device: &DeviceId, event: InputEvent);

    /// Forward a raw event unmodified.
    fn pass_through(&mut self, device: &DeviceId, event: InputEvent);

    /// Echo behaviour of this sink.
    fn echo_mode(&self) -> EchoMode {
        EchoMode::Loopback
    }
}

impl<S: EmissionSink + ?Sized> EmissionSink for Box<S> {
    fn emit(&mut self, device: &DeviceId, event: InputEvent) {
        (**self).emit(device, event);
    }

    fn pass_through(&mut self, device: &DeviceId, event: InputEvent) {
        (**self).pass_through(device, event);
    }

    fn echo_mode(&self) -> EchoMode {
        (**self).echo_mode()
    }
}

/// How a recorded event left the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Injected by [`EmissionSink::emit`].
    Emitted,
    /// Forwarded by [`EmissionSink::pass_through`].
    PassedThrough,
}

/// One recorded output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Device the event belongs to.
    pub device: DeviceId,
    /// How it left.
    pub kind: OutputKind,
    /// The event.
    pub event: InputEvent,
}

/// Sink that records the output stream in order.
///
/// Used by replay tooling and tests. [`RecordingSink::take_echoes`] returns
/// what a loopback device would deliver back to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    mode: EchoMode,
    records: Vec<OutputRecord>,
    unreplayed: usize,
}

impl RecordingSink {
    /// Recording sink in the given echo mode.
    pub fn new(mode: EchoMode) -> Self {
        Self {
            mode,
            records: Vec::new(),
            unreplayed: 0,
        }
    }

    /// Everything recorded so far.
    pub fn records(&self) -> &[OutputRecord] {
        &self.records
    }

    /// Recorded events, without device or kind.
    pub fn events(&self) -> Vec<InputEvent> {
        self.records.iter().map(|r| r.event).collect()
    }

    /// Only emitted events.
    pub fn emitted(&self) -> Vec<InputEvent> {
        self.records
            .iter()
            .filter(|r| r.kind == OutputKind::Emitted)
            .map(|r| r.event)
            .collect()
    }

    /// Emitted events not yet returned by this method, in order.
    ///
    /// In loopback mode these are the echoes the pipeline expects next.
    pub fn take_echoes(&mut self) -> Vec<(DeviceId, InputEvent)> {
        let start = self.records.len().saturating_sub(self.unreplayed);
        self.unreplayed = 0;
        self.records
            .iter()
            .skip(start)
            .filter(|r| r.kind == OutputKind::Emitted)
            .map(|r| (r.device.clone(), r.event))
            .collect()
    }

    /// Forget everything recorded.
    pub fn clear(&mut self) {
        self.records.clear();
        self.unreplayed = 0;
    }

    fn record(&mut self, device: &DeviceId, kind: OutputKind, event: InputEvent) {
        self.records.push(OutputRecord {
            device: device.clone(),
            kind,
            event,
        });
        self.unreplayed += 1;
    }
}

impl EmissionSink for RecordingSink {
    fn emit(&mut self, device: &DeviceId, event: InputEvent) {
        self.record(device, OutputKind::Emitted, event);
    }

    fn pass_through(&mut self, device: &DeviceId, event: InputEvent) {
        self.record(device, OutputKind::PassedThrough, event);
    }

    fn echo_mode(&self) -> EchoMode {
        self.mode
    }
}
