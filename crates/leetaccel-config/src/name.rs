//! Parameter names and value shapes as the driver exposes them.

use std::fmt;
use std::str::FromStr;

use leetaccel_errors::ConfigError;
use serde::{Deserialize, Serialize};

/// One independently settable driver parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParamName {
    /// Base ratio.
    Sensitivity,
    /// Output speed cap.
    OutputCap,
    /// Input speed cap.
    InputCap,
    /// Speed offset.
    Offset,
    /// Final scale.
    PreScale,
    /// Rotation in degrees.
    RotationAngle,
    /// Acceleration factor.
    Acceleration,
    /// Exponent or smoothness.
    Exponent,
    /// Motivity and Jump midpoint.
    Midpoint,
    /// Jump smoothing flag.
    UseSmoothing,
    /// Integer mode code.
    AccelerationMode,
    /// Number of lookup-table entries.
    LutSize,
    /// Bulk lookup-table buffer, all x values then all y values.
    LutDataBuf,
}

impl ParamName {
    /// Every parameter, in store order.
    pub const ALL: [ParamName; 13] = [
        ParamName::Sensitivity,
        ParamName::OutputCap,
        ParamName::InputCap,
        ParamName::Offset,
        ParamName::PreScale,
        ParamName::RotationAngle,
        ParamName::Acceleration,
        ParamName::Exponent,
        ParamName::Midpoint,
        ParamName::UseSmoothing,
        ParamName::AccelerationMode,
        ParamName::LutSize,
        ParamName::LutDataBuf,
    ];

    /// Name used by the store.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::Sensitivity => "Sensitivity",
            ParamName::OutputCap => "OutputCap",
            ParamName::InputCap => "InputCap",
            ParamName::Offset => "Offset",
            ParamName::PreScale => "PreScale",
            ParamName::RotationAngle => "RotationAngle",
            ParamName::Acceleration => "Acceleration",
            ParamName::Exponent => "Exponent",
            ParamName::Midpoint => "Midpoint",
            ParamName::UseSmoothing => "UseSmoothing",
            ParamName::AccelerationMode => "AccelerationMode",
            ParamName::LutSize => "LutSize",
            ParamName::LutDataBuf => "LutDataBuf",
        }
    }

    /// Value shape the parameter is stored as.
    pub fn expected_kind(self) -> ValueKind {
        match self {
            ParamName::UseSmoothing => ValueKind::Flag,
            ParamName::AccelerationMode | ParamName::LutSize => ValueKind::Integer,
            ParamName::LutDataBuf => ValueKind::Table,
            _ => ValueKind::Scalar,
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ParamName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::invalid_format("ParamName", format!("unknown parameter '{s}'")))
    }
}

/// Shape of a [`ParamValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Floating-point scalar
    Scalar,
    /// Boolean
    Flag,
    /// Integer
    Integer,
    /// Array of floats
    Table,
}

impl ValueKind {
    /// Human-readable name used in type-mismatch errors.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Scalar => "scalar",
            ValueKind::Flag => "flag",
            ValueKind::Integer => "integer",
            ValueKind::Table => "table",
        }
    }
}

/// A stored parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    /// Floating-point scalar
    Scalar(f64),
    /// Boolean
    Flag(bool),
    /// Integer
    Integer(i64),
    /// Array of floats
    Table(Vec<f64>),
}

impl ParamValue {
    /// Shape of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            ParamValue::Scalar(_) => ValueKind::Scalar,
            ParamValue::Flag(_) => ValueKind::Flag,
            ParamValue::Integer(_) => ValueKind::Integer,
            ParamValue::Table(_) => ValueKind::Table,
        }
    }

    /// The scalar, or a type mismatch naming `name`.
    pub fn as_scalar(&self, name: ParamName) -> Result<f64, ConfigError> {
        match self {
            ParamValue::Scalar(v) => Ok(*v),
            other => Err(mismatch(name, other)),
        }
    }

    /// The flag, or a type mismatch naming `name`.
    pub fn as_flag(&self, name: ParamName) -> Result<bool, ConfigError> {
        match self {
            ParamValue::Flag(v) => Ok(*v),
            other => Err(mismatch(name, other)),
        }
    }

    /// The integer, or a type mismatch naming `name`.
    pub fn as_integer(&self, name: ParamName) -> Result<i64, ConfigError> {
        match self {
            ParamValue::Integer(v) => Ok(*v),
            other => Err(mismatch(name, other)),
        }
    }

    /// The table, or a type mismatch naming `name`.
    pub fn into_table(self, name: ParamName) -> Result<Vec<f64>, ConfigError> {
        match self {
            ParamValue::Table(v) => Ok(v),
            other => Err(mismatch(name, &other)),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Scalar(v) => write!(f, "{v}"),
            ParamValue::Flag(v) => write!(f, "{}", u8::from(*v)),
            ParamValue::Integer(v) => write!(f, "{v}"),
            ParamValue::Table(values) => {
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
        }
    }
}

fn mismatch(name: ParamName, actual: &ParamValue) -> ConfigError {
    ConfigError::type_mismatch(
        name.as_str(),
        name.expected_kind().as_str(),
        actual.kind().as_str(),
    )
}
