//! Multiplier evaluation at given speeds

use anyhow::Result;
use leetaccel_curves::evaluate_multiplier;
use serde::Serialize;

use crate::commands::Context;
use crate::output;

#[derive(Debug, Serialize)]
struct EvalRow {
    speed: f64,
    multiplier: f64,
    output_speed: f64,
}

#[derive(Debug, Serialize)]
struct EvalReport {
    mode: String,
    results: Vec<EvalRow>,
    fault: Option<String>,
}

/// Evaluate the configured curve at each speed.
///
/// A configuration fault is reported but not fatal; the rows then hold the
/// fallback multiplier.
pub fn execute(ctx: &Context, speeds: &[f64]) -> Result<()> {
    let params = ctx.params();
    let mut fault = None;
    let results: Vec<EvalRow> = speeds
        .iter()
        .map(|&speed| {
            let eval = evaluate_multiplier(speed, params);
            if fault.is_none() {
                fault = eval.fault;
            }
            EvalRow {
                speed,
                multiplier: eval.value,
                output_speed: speed * eval.value,
            }
        })
        .collect();

    if ctx.json {
        return output::print_success_json(&EvalReport {
            mode: params.mode.to_string(),
            results,
            fault: fault.map(|f| f.to_string()),
        });
    }

    if let Some(fault) = &fault {
        output::print_fault_human(fault);
    }
    output::heading(&format!("Curve: {}", params.mode));
    println!("  {:>12} {:>12} {:>12}", "speed", "multiplier", "output");
    for row in &results {
        println!(
            "  {:>12.4} {:>12.6} {:>12.4}",
            row.speed, row.multiplier, row.output_speed
        );
    }
    Ok(())
}
