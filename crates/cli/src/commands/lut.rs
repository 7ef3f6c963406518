//! Lookup table parsing and validation

use anyhow::Result;
use leetaccel_curves::{AccelCurve, AccelMode, LookupTable, Parameters};
use serde::Serialize;

use crate::commands::Context;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct LutReport {
    entries: usize,
    truncated: bool,
    canonical: String,
    usable: bool,
    problem: Option<String>,
}

/// Parse `text`, report truncation, and print the canonical form.
///
/// # Errors
///
/// Malformed text. A table that parses but cannot drive the curve (negative
/// ratio, empty) is reported, not rejected.
pub fn execute(ctx: &Context, text: &str) -> Result<()> {
    let parsed = LookupTable::parse(text).map_err(CliError::from)?;
    let params = Parameters {
        mode: AccelMode::LookupTable,
        lookup_table: parsed.table.clone(),
        ..ctx.params().clone()
    };
    let problem = AccelCurve::from_parameters(&params).err();

    let report = LutReport {
        entries: parsed.table.len(),
        truncated: parsed.truncated,
        canonical: parsed.table.to_text(),
        usable: problem.is_none(),
        problem: problem.map(|p| p.to_string()),
    };

    if ctx.json {
        return output::print_success_json(&report);
    }

    output::heading("Lookup table");
    output::field("entries", report.entries);
    output::field("truncated", report.truncated);
    output::field("canonical", &report.canonical);
    if let Some(problem) = &report.problem {
        output::field("unusable", problem);
    }
    Ok(())
}
