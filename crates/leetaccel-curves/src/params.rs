//! Parameter Set: the active curve mode and every field it may read.

use core::fmt;
use core::str::FromStr;

use leetaccel_errors::ConfigError;
use serde::{Deserialize, Serialize};

use crate::lut::LookupTable;

/// Acceleration curve family.
///
/// The numeric codes are the ones the parameter store uses for
/// `AccelerationMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AccelMode {
    /// `sensitivity + accel * s`
    #[default]
    Linear = 1,
    /// `sensitivity + accel * s^exponent`, exponent in (0, 1]
    Power = 2,
    /// `sensitivity + accel * s^exponent`, exponent in (2, 5]
    Classic = 3,
    /// Sigmoid rising from `sensitivity` toward `accel` around `midpoint`
    Motivity = 4,
    /// Step of height `accel` at `midpoint`, optionally smoothed
    Jump = 5,
    /// Piecewise-linear table of `(speed, ratio)`
    LookupTable = 6,
}

impl AccelMode {
    /// Every mode, in code order.
    pub const ALL: [AccelMode; 6] = [
        AccelMode::Linear,
        AccelMode::Power,
        AccelMode::Classic,
        AccelMode::Motivity,
        AccelMode::Jump,
        AccelMode::LookupTable,
    ];

    /// Store code for this mode.
    pub fn code(self) -> i64 {
        i64::from(self as u8)
    }

    /// Decode a store code.
    pub fn from_code(code: i64) -> Result<Self, ConfigError> {
        match code {
            1 => Ok(AccelMode::Linear),
            2 => Ok(AccelMode::Power),
            3 => Ok(AccelMode::Classic),
            4 => Ok(AccelMode::Motivity),
            5 => Ok(AccelMode::Jump),
            6 => Ok(AccelMode::LookupTable),
            other => Err(ConfigError::UnknownMode(other)),
        }
    }

    /// Lower-case name used on the command line and in JSON.
    pub fn name(self) -> &'static str {
        match self {
            AccelMode::Linear => "linear",
            AccelMode::Power => "power",
            AccelMode::Classic => "classic",
            AccelMode::Motivity => "motivity",
            AccelMode::Jump => "jump",
            AccelMode::LookupTable => "lookup_table",
        }
    }
}

impl fmt::Display for AccelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AccelMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "linear" => Ok(AccelMode::Linear),
            "power" => Ok(AccelMode::Power),
            "classic" => Ok(AccelMode::Classic),
            "motivity" => Ok(AccelMode::Motivity),
            "jump" => Ok(AccelMode::Jump),
            "lut" | "lookup_table" | "lookup-table" => Ok(AccelMode::LookupTable),
            other => match other.parse::<i64>() {
                Ok(code) => AccelMode::from_code(code),
                Err(_not_a_code) => Err(ConfigError::invalid_format(
                    "AccelerationMode",
                    format!("unknown mode '{s}'"),
                )),
            },
        }
    }
}

/// Full parameter snapshot handed to the curve engine.
///
/// Fields that the active mode does not read are carried along untouched and
/// never validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Active curve family.
    pub mode: AccelMode,
    /// Base ratio at zero speed (> 0).
    pub sensitivity: f64,
    /// Final scale applied to the ratio (> 0).
    pub pre_scale: f64,
    /// Maximum output speed, 0 disables.
    pub output_cap: f64,
    /// Maximum input speed fed to the curve, 0 disables.
    pub input_cap: f64,
    /// Speed below which no acceleration applies (>= 0).
    pub offset: f64,
    /// Rotation of the motion vector in degrees, `[0, 180]`.
    pub rotation_degrees: f64,
    /// Acceleration factor. Its meaning depends on the mode.
    pub accel_factor: f64,
    /// Power/Classic exponent, or Jump smoothness.
    pub exponent: f64,
    /// Motivity and Jump midpoint.
    pub midpoint: f64,
    /// Jump only: smooth the step.
    pub use_smoothing: bool,
    /// Entries for [`AccelMode::LookupTable`].
    pub lookup_table: LookupTable,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            mode: AccelMode::Linear,
            sensitivity: 1.0,
            pre_scale: 1.0,
            output_cap: 0.0,
            input_cap: 0.0,
            offset: 0.0,
            rotation_degrees: 0.0,
            accel_factor: 0.0,
            exponent: 1.0,
            midpoint: 1.0,
            use_smoothing: true,
            lookup_table: LookupTable::new(),
        }
    }
}

impl Parameters {
    /// Defaults with a different mode.
    pub fn for_mode(mode: AccelMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Pull the mode-specific fields into the range the mode's controls
    /// offer, leaving everything else unchanged.
    ///
    /// Linear acceleration is capped at 0.1, Power and Jump exponents are
    /// kept in `[0.1, 1]` and the Classic exponent in `[2.1, 5]`.
    #[must_use]
    pub fn clamped_for_mode(&self) -> Self {
        let mut out = self.clone();
        match out.mode {
            AccelMode::Linear => out.accel_factor = out.accel_factor.min(0.1),
            AccelMode::Power | AccelMode::Jump => out.exponent = out.exponent.clamp(0.1, 1.0),
            AccelMode::Classic => out.exponent = out.exponent.clamp(2.1, 5.0),
            AccelMode::Motivity | AccelMode::LookupTable => {}
        }
        out
    }

    /// The ratio the engine falls back to when these parameters are invalid.
    pub fn fallback_multiplier(&self) -> f64 {
        if self.sensitivity.is_finite() && self.sensitivity > 0.0 {
            self.sensitivity
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_codes_roundtrip() {
        for mode in AccelMode::ALL {
            assert_eq!(AccelMode::from_code(mode.code()).ok(), Some(mode));
        }
        assert_eq!(
            AccelMode::from_code(0).err(),
            Some(ConfigError::UnknownMode(0))
        );
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Classic".parse::<AccelMode>().ok(), Some(AccelMode::Classic));
        assert_eq!("lut".parse::<AccelMode>().ok(), Some(AccelMode::LookupTable));
        assert_eq!("4".parse::<AccelMode>().ok(), Some(AccelMode::Motivity));
        assert!("wobble".parse::<AccelMode>().is_err());
    }

    #[test]
    fn test_clamped_for_mode() {
        let mut p = Parameters::for_mode(AccelMode::Classic);
        p.exponent = 1.0;
        assert!((p.clamped_for_mode().exponent - 2.1).abs() < 1e-12);

        p.mode = AccelMode::Linear;
        p.accel_factor = 3.0;
        assert!((p.clamped_for_mode().accel_factor - 0.1).abs() < 1e-12);
        assert!((p.clamped_for_mode().exponent - 1.0).abs() < 1e-12);

        p.mode = AccelMode::Jump;
        p.exponent = 0.0;
        assert!((p.clamped_for_mode().exponent - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let p: Parameters = match serde_json::from_str(r#"{"mode":"power","exponent":0.5}"#) {
            Ok(p) => p,
            Err(e) => panic!("unexpected error: {:?}", e),
        };
        assert_eq!(p.mode, AccelMode::Power);
        assert!((p.sensitivity - 1.0).abs() < 1e-12);
        assert!(p.use_smoothing);
    }

    #[test]
    fn test_fallback_multiplier_is_finite() {
        let mut p = Parameters::default();
        p.sensitivity = f64::NAN;
        assert!((p.fallback_multiplier() - 1.0).abs() < 1e-12);
        p.sensitivity = 2.5;
        assert!((p.fallback_multiplier() - 2.5).abs() < 1e-12);
    }
}
