//! Curve engine entry points that take raw [`Parameters`].
//!
//! These decode the parameters on every call and never fail: invalid input
//! yields the fallback ratio together with the error that caused it. Use
//! [`AccelCurve`] directly on the hot path.

use leetaccel_errors::ConfigError;
use serde::{Deserialize, Serialize};

use crate::curve::AccelCurve;
use crate::params::Parameters;

/// A value plus the configuration fault, if any, that forced a fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<T> {
    /// The computed value, or the fallback when `fault` is set.
    pub value: T,
    /// Why the fallback was used.
    pub fault: Option<ConfigError>,
}

impl<T> Evaluation<T> {
    fn ok(value: T) -> Self {
        Self { value, fault: None }
    }

    fn fallback(value: T, fault: ConfigError) -> Self {
        Self {
            value,
            fault: Some(fault),
        }
    }

    /// True when no fallback was needed.
    pub fn is_clean(&self) -> bool {
        self.fault.is_none()
    }

    /// Discard the fallback value and surface the fault as an error.
    pub fn into_result(self) -> Result<T, ConfigError> {
        match self.fault {
            None => Ok(self.value),
            Some(fault) => Err(fault),
        }
    }
}

/// One point of a sampled curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    /// Input speed.
    pub x: f64,
    /// Multiplier at that speed.
    pub y: f64,
}

/// Multiplier for `speed` under `params`.
///
/// Invalid parameters produce `sensitivity` (unscaled) and the
/// [`ConfigError`] describing the offending field. The value is always
/// finite and non-negative.
///
/// ```
/// use leetaccel_curves::{AccelMode, Parameters, evaluate_multiplier};
///
/// let mut params = Parameters::for_mode(AccelMode::Classic);
/// params.sensitivity = 1.2;
/// params.exponent = 0.0;
///
/// let eval = evaluate_multiplier(10.0, &params);
/// assert_eq!(eval.value, 1.2);
/// assert!(eval.fault.is_some());
/// ```
pub fn evaluate_multiplier(speed: f64, params: &Parameters) -> Evaluation<f64> {
    match AccelCurve::from_parameters(params) {
        Ok(curve) => evaluate_with(&curve, speed),
        Err(fault) => Evaluation::fallback(params.fallback_multiplier(), fault),
    }
}

fn evaluate_with(curve: &AccelCurve, speed: f64) -> Evaluation<f64> {
    match curve.try_multiplier(speed) {
        Ok(value) => Evaluation::ok(value),
        Err(_overflow) => {
            Evaluation::fallback(curve.sensitivity(), ConfigError::NotFinite("Multiplier"))
        }
    }
}

/// Sample the multiplier at `point_count` evenly spaced speeds in
/// `[0, range_max]`.
///
/// `x_i = range_max * i / (point_count - 1)`; zero points yields an empty
/// sequence and one point yields the sample at 0. Allocates, so keep it off
/// the hot path.
pub fn sample_curve(
    params: &Parameters,
    range_max: f64,
    point_count: usize,
) -> Evaluation<Vec<CurveSample>> {
    let range_max = if range_max.is_finite() {
        range_max.max(0.0)
    } else {
        0.0
    };
    let xs = sample_points(range_max, point_count);

    match AccelCurve::from_parameters(params) {
        Ok(curve) => {
            let mut fault = None;
            let samples = xs
                .map(|x| {
                    let eval = evaluate_with(&curve, x);
                    if fault.is_none() {
                        fault = eval.fault;
                    }
                    CurveSample { x, y: eval.value }
                })
                .collect();
            Evaluation {
                value: samples,
                fault,
            }
        }
        Err(fault) => {
            let y = params.fallback_multiplier();
            let samples = xs.map(|x| CurveSample { x, y }).collect();
            Evaluation::fallback(samples, fault)
        }
    }
}

fn sample_points(range_max: f64, point_count: usize) -> impl Iterator<Item = f64> {
    let last = point_count.saturating_sub(1).max(1) as f64;
    (0..point_count).map(move |i| range_max * (i as f64) / last)
}
