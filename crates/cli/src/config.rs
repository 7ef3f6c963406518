//! Configuration file loading and command-line overrides

use std::path::Path;

use clap::Args;
use leetaccel_curves::{AccelMode, CacheSettings, LookupTable, Parameters};
use leetaccel_pipeline::{EchoMode, PipelineSettings};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CliError;

/// Everything accelctl reads from `--config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Curve parameters.
    pub parameters: Parameters,
    /// Pipeline behaviour for `replay`.
    pub pipeline: PipelineSettings,
    /// Whether `replay` loops emitted events back.
    pub echo_mode: EchoMode,
    /// Range and resolution for `sample`.
    pub preview: CacheSettings,
}

impl CliConfig {
    /// Read a JSON config file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            debug!("No config file, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(CliError::ConfigNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        debug!(path = %path.display(), mode = %config.parameters.mode, "Loaded config");
        Ok(config)
    }
}

/// Parameter overrides accepted by every subcommand.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ParamArgs {
    /// Curve mode (linear, power, classic, motivity, jump, lut, or its code)
    #[arg(long, global = true)]
    pub mode: Option<AccelMode>,

    /// Base ratio at zero speed
    #[arg(long, global = true)]
    pub sensitivity: Option<f64>,

    /// Acceleration factor
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub accel: Option<f64>,

    /// Exponent (Power, Classic) or smoothness (Jump)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub exponent: Option<f64>,

    /// Midpoint (Motivity, Jump)
    #[arg(long, global = true)]
    pub midpoint: Option<f64>,

    /// Final scale applied to the ratio
    #[arg(long, global = true)]
    pub pre_scale: Option<f64>,

    /// Rotation in degrees
    #[arg(long, global = true)]
    pub rotation: Option<f64>,

    /// Speed below which no acceleration applies
    #[arg(long, global = true)]
    pub offset: Option<f64>,

    /// Maximum input speed, 0 disables
    #[arg(long, global = true)]
    pub input_cap: Option<f64>,

    /// Maximum output speed, 0 disables
    #[arg(long, global = true)]
    pub output_cap: Option<f64>,

    /// Smooth the Jump step
    #[arg(long, global = true)]
    pub smoothing: Option<bool>,

    /// Lookup table as `x,y;x,y;...`
    #[arg(long, global = true, value_name = "TABLE")]
    pub lut: Option<String>,
}

impl ParamArgs {
    /// Apply the given overrides on top of `params`.
    pub fn apply(&self, params: &mut Parameters) -> Result<(), CliError> {
        let scalars = [
            (self.sensitivity, &mut params.sensitivity),
            (self.accel, &mut params.accel_factor),
            (self.exponent, &mut params.exponent),
            (self.midpoint, &mut params.midpoint),
            (self.pre_scale, &mut params.pre_scale),
            (self.rotation, &mut params.rotation_degrees),
            (self.offset, &mut params.offset),
            (self.input_cap, &mut params.input_cap),
            (self.output_cap, &mut params.output_cap),
        ];
        for (value, field) in scalars {
            if let Some(v) = value {
                *field = v;
            }
        }
        if let Some(mode) = self.mode {
            params.mode = mode;
        }
        if let Some(smoothing) = self.smoothing {
            params.use_smoothing = smoothing;
        }
        if let Some(text) = &self.lut {
            params.lookup_table = parse_table(text)?;
        }
        Ok(())
    }
}

/// Parse table text, warning when it had to be cut short.
pub fn parse_table(text: &str) -> Result<LookupTable, CliError> {
    let parsed = LookupTable::parse(text)?;
    if parsed.truncated {
        warn!(
            kept = parsed.table.len(),
            "Lookup table truncated to {} entries",
            LookupTable::CAPACITY
        );
    }
    Ok(parsed.table)
}
