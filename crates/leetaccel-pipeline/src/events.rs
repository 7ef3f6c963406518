//! Raw input events as delivered by the report source.
//!
//! Codes follow the Linux input layer: a relative event carries `REL_X`,
//! `REL_Y` or `REL_WHEEL`, and a report ends with `SYN_REPORT`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Event type code for synchronization markers.
pub const EV_SYN: u16 = 0x00;
/// Event type code for keys and buttons.
pub const EV_KEY: u16 = 0x01;
/// Event type code for relative axes.
pub const EV_REL: u16 = 0x02;
/// Event type code for absolute axes.
pub const EV_ABS: u16 = 0x03;

/// Relative X axis.
pub const REL_X: u16 = 0x00;
/// Relative Y axis.
pub const REL_Y: u16 = 0x01;
/// Vertical wheel.
pub const REL_WHEEL: u16 = 0x08;
/// End of one report.
pub const SYN_REPORT: u16 = 0;

/// Event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Synchronization marker
    Sync,
    /// Key or button
    Key,
    /// Relative axis
    Rel,
    /// Absolute axis
    Abs,
    /// Any other type code
    Other(u16),
}

impl EventKind {
    /// Decode an input-layer type code.
    pub fn from_type(code: u16) -> Self {
        match code {
            EV_SYN => EventKind::Sync,
            EV_KEY => EventKind::Key,
            EV_REL => EventKind::Rel,
            EV_ABS => EventKind::Abs,
            other => EventKind::Other(other),
        }
    }

    /// Input-layer type code.
    pub fn type_code(self) -> u16 {
        match self {
            EventKind::Sync => EV_SYN,
            EventKind::Key => EV_KEY,
            EventKind::Rel => EV_REL,
            EventKind::Abs => EV_ABS,
            EventKind::Other(code) => code,
        }
    }
}

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Reported by the physical device.
    #[default]
    Device,
    /// Emitted by this pipeline.
    Synthetic,
}

/// Relative axis the pipeline aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Horizontal motion
    X,
    /// Vertical motion
    Y,
    /// Vertical wheel
    Wheel,
}

impl Axis {
    /// Every tracked axis, in emission order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Wheel];

    /// Relative code for this axis.
    pub fn code(self) -> u16 {
        match self {
            Axis::X => REL_X,
            Axis::Y => REL_Y,
            Axis::Wheel => REL_WHEEL,
        }
    }

    /// Axis for a relative code, `None` for untracked codes.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            REL_X => Some(Axis::X),
            REL_Y => Some(Axis::Y),
            REL_WHEEL => Some(Axis::Wheel),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Wheel => 2,
        }
    }
}

/// One raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputEvent {
    /// Event type.
    pub kind: EventKind,
    /// Type-specific code.
    pub code: u16,
    /// Delta, key state or absolute position.
    pub value: i32,
    /// Device or pipeline.
    #[serde(default)]
    pub origin: Origin,
}

impl InputEvent {
    /// Event from the device.
    pub const fn new(kind: EventKind, code: u16, value: i32) -> Self {
        Self {
            kind,
            code,
            value,
            origin: Origin::Device,
        }
    }

    /// Relative event on `axis`.
    pub const fn rel(axis: Axis, value: i32) -> Self {
        let code = match axis {
            Axis::X => REL_X,
            Axis::Y => REL_Y,
            Axis::Wheel => REL_WHEEL,
        };
        Self::new(EventKind::Rel, code, value)
    }

    /// `SYN_REPORT` marker.
    pub const fn sync() -> Self {
        Self::new(EventKind::Sync, SYN_REPORT, 0)
    }

    /// Key press or release.
    pub const fn key(code: u16, value: i32) -> Self {
        Self::new(EventKind::Key, code, value)
    }

    /// The same event tagged as emitted by the pipeline.
    #[must_use]
    pub const fn synthetic(mut self) -> Self {
        self.origin = Origin::Synthetic;
        self
    }

    /// True for `SYN_REPORT`.
    pub fn is_sync_report(&self) -> bool {
        self.kind == EventKind::Sync && self.code == SYN_REPORT
    }

    /// Tracked axis for a relative event.
    pub fn axis(&self) -> Option<Axis> {
        match self.kind {
            EventKind::Rel => Axis::from_code(self.code),
            _ => None,
        }
    }

    /// True when the pipeline emitted this event.
    pub fn is_synthetic(&self) -> bool {
        self.origin == Origin::Synthetic
    }
}

/// Event log line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid event '{line}': {reason}")]
pub struct ParseEventError {
    /// Offending line
    pub line: String,
    /// What was wrong
    pub reason: &'static str,
}

/// Parses the replay log format.
///
/// One event per line: `REL_X 5`, `REL_Y -3`, `REL_WHEEL 1`, `REL <code>
/// <value>`, `KEY <code> <value>`, `ABS <code> <value>`, `SYN`. A trailing
/// `*` marks the event synthetic.
///
/// ```
/// use leetaccel_pipeline::events::{Axis, InputEvent};
///
/// let event: InputEvent = "REL_X -4".parse()?;
/// assert_eq!(event, InputEvent::rel(Axis::X, -4));
/// assert!("SYN".parse::<InputEvent>()?.is_sync_report());
/// # Ok::<(), leetaccel_pipeline::events::ParseEventError>(())
/// ```
impl FromStr for InputEvent {
    type Err = ParseEventError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fail = |reason| ParseEventError {
            line: line.to_string(),
            reason,
        };

        let trimmed = line.trim();
        let (body, synthetic) = match trimmed.strip_suffix('*') {
            Some(rest) => (rest.trim_end(), true),
            None => (trimmed, false),
        };
        let mut parts = body.split_whitespace();
        let tag = parts.next().ok_or_else(|| fail("empty line"))?;
        let mut number = |what| -> Result<i64, ParseEventError> {
            parts
                .next()
                .ok_or_else(|| fail(what))?
                .parse::<i64>()
                .map_err(|_bad| fail(what))
        };

        let upper = tag.to_ascii_uppercase();
        let event = match upper.as_str() {
            "SYN" | "SYN_REPORT" => InputEvent::sync(),
            "REL_X" | "REL_Y" | "REL_WHEEL" => {
                let axis = match upper.as_str() {
                    "REL_X" => Axis::X,
                    "REL_Y" => Axis::Y,
                    _ => Axis::Wheel,
                };
                let value = to_value(number("missing value")?).ok_or_else(|| fail("value out of range"))?;
                InputEvent::rel(axis, value)
            }
            kind @ ("REL" | "KEY" | "ABS") => {
                let code =
                    u16::try_from(number("missing code")?).map_err(|_bad| fail("code out of range"))?;
                let value = to_value(number("missing value")?).ok_or_else(|| fail("value out of range"))?;
                let kind = match kind {
                    "REL" => EventKind::Rel,
                    "KEY" => EventKind::Key,
                    _ => EventKind::Abs,
                };
                InputEvent::new(kind, code, value)
            }
            _ => return Err(fail("unknown event type")),
        };

        if parts.next().is_some() {
            return Err(fail("trailing input"));
        }
        Ok(if synthetic { event.synthetic() } else { event })
    }
}

fn to_value(v: i64) -> Option<i32> {
    i32::try_from(v).ok()
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.axis()) {
            (EventKind::Sync, _) if self.code == SYN_REPORT => f.write_str("SYN")?,
            (EventKind::Rel, Some(Axis::X)) => write!(f, "REL_X {}", self.value)?,
            (EventKind::Rel, Some(Axis::Y)) => write!(f, "REL_Y {}", self.value)?,
            (EventKind::Rel, Some(Axis::Wheel)) => write!(f, "REL_WHEEL {}", self.value)?,
            (EventKind::Rel, None) => write!(f, "REL {} {}", self.code, self.value)?,
            (EventKind::Key, _) => write!(f, "KEY {} {}", self.code, self.value)?,
            (EventKind::Abs, _) => write!(f, "ABS {} {}", self.code, self.value)?,
            (kind, _) => write!(f, "EV{} {} {}", kind.type_code(), self.code, self.value)?,
        }
        if self.is_synthetic() {
            f.write_str(" *")?;
        }
        Ok(())
    }
}
