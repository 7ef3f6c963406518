//! Parameter validation and store preview

use std::collections::BTreeMap;

use anyhow::Result;
use leetaccel_config::{MemoryStore, ParamValue, save_parameters};
use leetaccel_curves::AccelCurve;
use serde::Serialize;
use tracing::info;

use crate::commands::Context;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct CheckReport {
    mode: String,
    sensitivity: f64,
    parameters: BTreeMap<String, ParamValue>,
}

/// Validate the resolved parameters and print what the driver store would
/// receive.
///
/// # Errors
///
/// [`CliError::InvalidConfiguration`] when the curve rejects the set.
pub fn execute(ctx: &Context) -> Result<()> {
    let params = ctx.params();
    let curve = AccelCurve::from_parameters(params).map_err(CliError::from)?;

    let store = MemoryStore::new();
    save_parameters(params, &store).map_err(CliError::from)?;
    info!(mode = %params.mode, entries = store.len(), "Parameters valid");

    let report = CheckReport {
        mode: params.mode.to_string(),
        sensitivity: curve.sensitivity(),
        parameters: store
            .snapshot()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    };

    if ctx.json {
        return output::print_success_json(&report);
    }

    output::heading(&format!("Valid {} curve", report.mode));
    for (name, value) in &report.parameters {
        output::field(name, value);
    }
    Ok(())
}
