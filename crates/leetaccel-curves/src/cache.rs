//! Preview cache of the sampled curve.
//!
//! Readers take an `Arc` of the last published [`CurveSnapshot`]; a rebuild
//! samples into a fresh snapshot first and then swaps the pointer, so the
//! write lock is held only for the swap and a reader never sees a partially
//! built curve.

use std::sync::Arc;

use leetaccel_errors::ConfigError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::{CurveSample, sample_curve};
use crate::params::Parameters;

/// Range and resolution of the preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Largest sampled speed.
    pub range_max: f64,
    /// Number of samples, including both ends.
    pub points: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            range_max: 50.0,
            points: 512,
        }
    }
}

/// Immutable result of one rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSnapshot {
    generation: u64,
    range_max: f64,
    samples: Vec<CurveSample>,
    fault: Option<ConfigError>,
}

impl CurveSnapshot {
    /// Rebuild counter, 0 for the initial snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Sampled points in ascending `x`.
    pub fn samples(&self) -> &[CurveSample] {
        &self.samples
    }

    /// Largest sampled speed.
    pub fn range_max(&self) -> f64 {
        self.range_max
    }

    /// Configuration error that produced a flat fallback curve.
    pub fn fault(&self) -> Option<&ConfigError> {
        self.fault.as_ref()
    }

    /// Interpolated multiplier at `x`, clamped to the sampled range.
    pub fn value_at(&self, x: f64) -> Option<f64> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        if x.is_nan() || x <= first.x {
            return Some(first.y);
        }
        if x >= last.x {
            return Some(last.y);
        }
        let upper = self.samples.partition_point(|s| s.x <= x);
        let hi = self.samples.get(upper)?;
        let lo = self.samples.get(upper.checked_sub(1)?)?;
        let t = (x - lo.x) / (hi.x - lo.x);
        Some(lo.y + t * (hi.y - lo.y))
    }
}

/// Rebuild-then-swap holder for the preview curve.
///
/// ```
/// use leetaccel_curves::{CurveCache, Parameters};
///
/// let cache = CurveCache::default();
/// let before = cache.current_samples();
///
/// let mut params = Parameters::default();
/// params.accel_factor = 0.1;
/// cache.rebuild(&params)?;
///
/// assert_eq!(before.generation() + 1, cache.generation());
/// assert!(cache.current_samples().value_at(50.0) > before.value_at(50.0));
/// # Ok::<(), leetaccel_errors::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct CurveCache {
    settings: CacheSettings,
    current: RwLock<Arc<CurveSnapshot>>,
}

impl CurveCache {
    /// Create a cache sampled from default parameters.
    pub fn new(settings: CacheSettings) -> Self {
        let initial = build(&Parameters::default(), settings, 0);
        Self {
            settings,
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Range and resolution in use.
    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    /// Resample for `params` and publish the result.
    ///
    /// # Errors
    ///
    /// Invalid parameters still publish a flat fallback curve; the error is
    /// returned so the caller can display it.
    pub fn rebuild(&self, params: &Parameters) -> Result<Arc<CurveSnapshot>, ConfigError> {
        let eval = sample_curve(params, self.settings.range_max, self.settings.points);
        let fault = eval.fault.clone();

        let published = {
            let mut current = self.current.write();
            let generation = current.generation.saturating_add(1);
            let snapshot = Arc::new(CurveSnapshot {
                generation,
                range_max: self.settings.range_max,
                samples: eval.value,
                fault: eval.fault,
            });
            *current = Arc::clone(&snapshot);
            snapshot
        };

        match fault {
            None => {
                debug!(
                    generation = published.generation,
                    mode = %params.mode,
                    "Curve cache rebuilt"
                );
                Ok(published)
            }
            Some(e) => {
                warn!(generation = published.generation, error = %e, "Curve cache rebuilt with fallback");
                Err(e)
            }
        }
    }

    /// Last published snapshot.
    pub fn current_samples(&self) -> Arc<CurveSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Generation of the last published snapshot.
    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }
}

impl Default for CurveCache {
    fn default() -> Self {
        Self::new(CacheSettings::default())
    }
}

fn build(params: &Parameters, settings: CacheSettings, generation: u64) -> CurveSnapshot {
    let eval = sample_curve(params, settings.range_max, settings.points);
    CurveSnapshot {
        generation,
        range_max: settings.range_max,
        samples: eval.value,
        fault: eval.fault,
    }
}
