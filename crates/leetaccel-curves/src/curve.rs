//! Decoded, validated curves for the hot path.
//!
//! [`AccelCurve::from_parameters`] checks a [`Parameters`] snapshot once, at
//! configuration time, and keeps only what the active mode needs. After that
//! the per-report work is a branch on [`Curve`] and a handful of float ops.
//!
//! # RT Safety
//!
//! `AccelCurve::multiplier()` and `AccelCurve::try_transform()` are RT-safe:
//! - No heap allocations
//! - Bounded execution time (the lookup table is a binary search)
//! - No locks, syscalls or I/O

use leetaccel_errors::{ConfigError, RTError, RTResult};

use crate::lut::LookupTable;
use crate::params::{AccelMode, Parameters};

/// Curve family with only the fields it reads.
#[derive(Clone, Debug, PartialEq)]
pub enum Curve {
    /// `sensitivity + accel * s`
    Linear {
        /// Slope.
        accel: f64,
    },
    /// `sensitivity + accel * s^exponent`, exponent in (0, 1]
    Power {
        /// Gain.
        accel: f64,
        /// Exponent.
        exponent: f64,
    },
    /// `sensitivity + accel * s^exponent`, exponent in (2, 5]
    Classic {
        /// Gain.
        accel: f64,
        /// Exponent.
        exponent: f64,
    },
    /// `sensitivity + (asymptote - sensitivity) * sigmoid(s - midpoint)`
    Motivity {
        /// Upper bound of the ratio.
        asymptote: f64,
        /// Speed at which the curve is halfway up.
        midpoint: f64,
    },
    /// `sensitivity + jump * step(s - midpoint)`
    Jump {
        /// Height of the step.
        jump: f64,
        /// Speed of the step.
        midpoint: f64,
        /// Sigmoid width, `None` for a hard step.
        width: Option<f64>,
    },
    /// Piecewise-linear table of ratios.
    LookupTable(LookupTable),
}

/// A validated curve plus the stages shared by every mode.
#[derive(Clone, Debug, PartialEq)]
pub struct AccelCurve {
    curve: Curve,
    sensitivity: f64,
    pre_scale: f64,
    output_cap: f64,
    input_cap: f64,
    offset: f64,
    rotation_degrees: f64,
    cos: f64,
    sin: f64,
}

impl AccelCurve {
    /// Validate `params` and decode the active mode.
    ///
    /// # Errors
    ///
    /// The first field found outside its domain.
    pub fn from_parameters(params: &Parameters) -> Result<Self, ConfigError> {
        let sensitivity = positive("Sensitivity", params.sensitivity)?;
        let pre_scale = positive("PreScale", params.pre_scale)?;
        let output_cap = non_negative("OutputCap", params.output_cap)?;
        let input_cap = non_negative("InputCap", params.input_cap)?;
        let offset = non_negative("Offset", params.offset)?;
        let rotation_degrees = finite("RotationAngle", params.rotation_degrees)?;
        if !(0.0..=180.0).contains(&rotation_degrees) {
            return Err(ConfigError::out_of_range(
                "RotationAngle",
                rotation_degrees,
                "[0, 180]",
            ));
        }

        let curve = match params.mode {
            AccelMode::Linear => Curve::Linear {
                accel: non_negative("Acceleration", params.accel_factor)?,
            },
            AccelMode::Power => Curve::Power {
                accel: non_negative("Acceleration", params.accel_factor)?,
                exponent: within("Exponent", params.exponent, 0.0, 1.0, "(0, 1]")?,
            },
            AccelMode::Classic => Curve::Classic {
                accel: non_negative("Acceleration", params.accel_factor)?,
                exponent: within("Exponent", params.exponent, 2.0, 5.0, "(2, 5]")?,
            },
            AccelMode::Motivity => {
                let asymptote = finite("Acceleration", params.accel_factor)?;
                if asymptote < sensitivity {
                    return Err(ConfigError::out_of_range(
                        "Acceleration",
                        asymptote,
                        "[Sensitivity, inf)",
                    ));
                }
                Curve::Motivity {
                    asymptote,
                    midpoint: positive("Midpoint", params.midpoint)?,
                }
            }
            AccelMode::Jump => {
                let jump = non_negative("Acceleration", params.accel_factor)?;
                let midpoint = positive("Midpoint", params.midpoint)?;
                let width = if params.use_smoothing {
                    let smoothness = within("Exponent", params.exponent, 0.0, 1.0, "(0, 1]")?;
                    Some(smoothness * midpoint / 4.0)
                } else {
                    None
                };
                Curve::Jump {
                    jump,
                    midpoint,
                    width,
                }
            }
            AccelMode::LookupTable => {
                let table = &params.lookup_table;
                match table.min_y() {
                    None => return Err(ConfigError::EmptyTable),
                    Some(y) if y < 0.0 => {
                        return Err(ConfigError::out_of_range("LutDataBuf", y, "[0, inf)"));
                    }
                    Some(_) => Curve::LookupTable(table.clone()),
                }
            }
        };

        let radians = rotation_degrees.to_radians();
        Ok(Self {
            curve,
            sensitivity,
            pre_scale,
            output_cap,
            input_cap,
            offset,
            rotation_degrees,
            cos: radians.cos(),
            sin: radians.sin(),
        })
    }

    /// Identity curve: Linear, sensitivity 1, no acceleration.
    pub fn identity() -> Self {
        Self {
            curve: Curve::Linear { accel: 0.0 },
            sensitivity: 1.0,
            pre_scale: 1.0,
            output_cap: 0.0,
            input_cap: 0.0,
            offset: 0.0,
            rotation_degrees: 0.0,
            cos: 1.0,
            sin: 0.0,
        }
    }

    /// The decoded family.
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// Base ratio.
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Configured rotation in degrees.
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    /// Maximum output speed, 0 when uncapped.
    pub fn output_cap(&self) -> f64 {
        self.output_cap
    }

    /// Ratio of the curve family at the shaped speed `s`, before scaling.
    #[inline]
    fn ratio(&self, s: f64) -> f64 {
        let sens = self.sensitivity;
        match &self.curve {
            Curve::Linear { accel } => sens + accel * s,
            Curve::Power { accel, exponent } | Curve::Classic { accel, exponent } => {
                sens + accel * s.powf(*exponent)
            }
            Curve::Motivity {
                asymptote,
                midpoint,
            } => sens + (asymptote - sens) * sigmoid(s - midpoint),
            Curve::Jump {
                jump,
                midpoint,
                width,
            } => match width {
                Some(w) if *w > 0.0 => sens + jump * sigmoid((s - midpoint) / w),
                _ if s >= *midpoint => sens + jump,
                _ => sens,
            },
            Curve::LookupTable(table) => table.interpolate(s).unwrap_or(sens),
        }
    }

    /// Multiplier for a report of magnitude `speed`.
    ///
    /// Negative, NaN and infinite speeds are treated as 0.
    ///
    /// # Errors
    ///
    /// [`RTError::CurveConfig`] when the curve overflows to a non-finite
    /// value for this speed.
    #[inline]
    pub fn try_multiplier(&self, speed: f64) -> RTResult<f64> {
        let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };

        let mut s = speed;
        if self.input_cap > 0.0 {
            s = s.min(self.input_cap);
        }
        s = (s - self.offset).max(0.0);

        let mut multiplier = self.ratio(s) * self.pre_scale;
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(RTError::CurveConfig);
        }

        if self.output_cap > 0.0 && speed > 0.0 && speed * multiplier > self.output_cap {
            multiplier = self.output_cap / speed;
        }
        Ok(multiplier)
    }

    /// Multiplier for `speed`, or `sensitivity` if the curve overflows.
    #[inline]
    pub fn multiplier(&self, speed: f64) -> f64 {
        self.try_multiplier(speed).unwrap_or(self.sensitivity)
    }

    /// Rotate `(dx, dy)` by the configured angle.
    #[inline]
    pub fn rotate(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx * self.cos - dy * self.sin, dx * self.sin + dy * self.cos)
    }

    /// Rotate, then scale by the multiplier for the vector's magnitude.
    ///
    /// # Errors
    ///
    /// [`RTError::CurveConfig`] as for [`Self::try_multiplier`].
    #[inline]
    pub fn try_transform(&self, dx: f64, dy: f64) -> RTResult<(f64, f64)> {
        let (rx, ry) = self.rotate(dx, dy);
        let multiplier = self.try_multiplier(rx.hypot(ry))?;
        Ok((rx * multiplier, ry * multiplier))
    }

    /// [`Self::try_transform`] falling back to rotation only.
    #[inline]
    pub fn transform(&self, dx: f64, dy: f64) -> (f64, f64) {
        match self.try_transform(dx, dy) {
            Ok(v) => v,
            Err(_fault) => self.rotate(dx, dy),
        }
    }
}

impl Default for AccelCurve {
    fn default() -> Self {
        Self::identity()
    }
}

impl TryFrom<&Parameters> for AccelCurve {
    type Error = ConfigError;

    fn try_from(params: &Parameters) -> Result<Self, Self::Error> {
        Self::from_parameters(params)
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn finite(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite(field))
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    let value = finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::out_of_range(field, value, "(0, inf)"))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    let value = finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::out_of_range(field, value, "[0, inf)"))
    }
}

/// `value` in the half-open interval `(low, high]`.
fn within(
    field: &'static str,
    value: f64,
    low: f64,
    high: f64,
    domain: &'static str,
) -> Result<f64, ConfigError> {
    let value = finite(field, value)?;
    if value > low && value <= high {
        Ok(value)
    } else {
        Err(ConfigError::out_of_range(field, value, domain))
    }
}
