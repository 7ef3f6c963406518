//! Curve preview sampling

use anyhow::Result;
use leetaccel_curves::{CacheSettings, CurveCache, CurveSample};
use serde::Serialize;
use tracing::info;

use crate::commands::{Context, SampleArgs};
use crate::output;

#[derive(Debug, Serialize)]
struct SampleReport<'a> {
    mode: String,
    range_max: f64,
    samples: &'a [CurveSample],
    fault: Option<String>,
}

/// Sample the configured curve over `[0, range]`.
pub fn execute(ctx: &Context, args: &SampleArgs) -> Result<()> {
    let settings = CacheSettings {
        range_max: args.range.unwrap_or(ctx.config.preview.range_max),
        points: args.points.unwrap_or(ctx.config.preview.points),
    };
    let cache = CurveCache::new(settings);
    let fault = cache.rebuild(ctx.params()).err();
    let snapshot = cache.current_samples();
    info!(
        points = snapshot.samples().len(),
        generation = snapshot.generation(),
        "Sampled curve"
    );

    if ctx.json {
        return output::print_success_json(&SampleReport {
            mode: ctx.params().mode.to_string(),
            range_max: snapshot.range_max(),
            samples: snapshot.samples(),
            fault: fault.map(|f| f.to_string()),
        });
    }

    if let Some(fault) = &fault {
        output::print_fault_human(fault);
    }
    output::heading(&format!(
        "Curve: {} over [0, {}]",
        ctx.params().mode,
        snapshot.range_max()
    ));
    for sample in snapshot.samples() {
        println!("  {:>10.3} {:>10.6}", sample.x, sample.y);
    }
    Ok(())
}
