//! Common imports for curve users.

pub use crate::{
    AccelCurve, AccelMode, CacheSettings, CurveCache, CurveError, CurveSample, CurveSnapshot,
    Evaluation, LookupTable, Parameters, evaluate_multiplier, sample_curve,
};
