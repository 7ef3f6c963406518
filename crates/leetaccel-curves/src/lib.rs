//! Pointer acceleration curves for leetaccel
//!
//! This crate maps the speed of one aggregated motion report to the ratio
//! that scales it. It holds the parameter model, the six curve families,
//! the bounded lookup table and its text format, bulk sampling for previews
//! and the preview cache.
//!
//! # Overview
//!
//! - **Linear**: `sensitivity + accel * s`
//! - **Power**: `sensitivity + accel * s^e`, `e` in (0, 1]
//! - **Classic**: `sensitivity + accel * s^e`, `e` in (2, 5]
//! - **Motivity**: sigmoid rising from `sensitivity` toward `accel`
//! - **Jump**: step of height `accel` at `midpoint`, optionally smoothed
//! - **LookupTable**: piecewise-linear `(speed, ratio)` table
//!
//! Every mode shares the same outer stages: speed shaping (input cap, then
//! offset), pre-scale, and the output cap.
//!
//! # RT Safety Guarantees
//!
//! ## RT-Safe: `AccelCurve::multiplier()`, `AccelCurve::try_transform()`
//! - No heap allocations
//! - No syscalls, I/O or locks
//! - Bounded execution time
//!
//! ## NOT RT-Safe: `evaluate_multiplier()`, `sample_curve()`, `CurveCache::rebuild()`
//! These decode parameters on every call, may allocate errors or sample
//! vectors, and the cache takes a lock. Use them from configuration or
//! preview code.
//!
//! # Example
//!
//! ```
//! use leetaccel_curves::{AccelCurve, AccelMode, Parameters};
//!
//! let mut params = Parameters::for_mode(AccelMode::Power);
//! params.accel_factor = 0.5;
//! params.exponent = 0.5;
//!
//! // Validate once at configuration time
//! let curve = AccelCurve::from_parameters(&params)?;
//!
//! // Per report
//! let (dx, dy) = curve.transform(3.0, 4.0);
//! assert!(dx > 3.0 && dy > 4.0);
//! # Ok::<(), leetaccel_errors::ConfigError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cache;
pub mod curve;
pub mod engine;
pub mod lut;
pub mod params;
pub mod prelude;

pub use cache::{CacheSettings, CurveCache, CurveSnapshot};
pub use curve::{AccelCurve, Curve};
pub use engine::{CurveSample, Evaluation, evaluate_multiplier, sample_curve};
pub use lut::{LookupTable, LutPoint, MAX_TABLE_ENTRIES, ParsedTable};
pub use params::{AccelMode, Parameters};

/// Error reported when parameters cannot drive a curve.
pub type CurveError = leetaccel_errors::ConfigError;
