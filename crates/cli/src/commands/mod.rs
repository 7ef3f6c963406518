//! Command implementations for accelctl CLI

pub mod check;
pub mod eval;
pub mod lut;
pub mod replay;
pub mod sample;

use std::path::PathBuf;

use clap::Args;
use leetaccel_curves::Parameters;
use leetaccel_pipeline::{EchoMode, SameAxisPolicy};

use crate::config::CliConfig;

/// Resolved configuration and output mode shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Config file contents with command-line overrides applied.
    pub config: CliConfig,
    /// Emit JSON instead of human-readable text.
    pub json: bool,
}

impl Context {
    /// Parameters after overrides.
    pub fn params(&self) -> &Parameters {
        &self.config.parameters
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SampleArgs {
    /// Largest sampled speed (defaults to the config preview range)
    #[arg(long)]
    pub range: Option<f64>,

    /// Number of samples, including both ends
    #[arg(long)]
    pub points: Option<usize>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ReplayArgs {
    /// Event log, one event per line; `-` reads stdin
    pub file: PathBuf,

    /// Override the echo mode from the config
    #[arg(long, value_enum)]
    pub echo: Option<EchoArg>,

    /// Sum repeated axis updates within one report instead of keeping the last
    #[arg(long)]
    pub accumulate: bool,

    /// Round each report instead of carrying sub-count remainders
    #[arg(long)]
    pub no_carry: bool,

    /// Device id recorded in the output
    #[arg(long, default_value = "replay")]
    pub device: String,
}

impl ReplayArgs {
    /// Apply the replay flags to `config`.
    pub fn apply(&self, config: &mut CliConfig) {
        if let Some(echo) = self.echo {
            config.echo_mode = echo.into();
        }
        if self.accumulate {
            config.pipeline.same_axis_policy = SameAxisPolicy::Accumulate;
        }
        if self.no_carry {
            config.pipeline.carry_remainder = false;
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoArg {
    /// Emitted events come back and are suppressed once
    Loopback,
    /// Emitted events go to a separate output
    Decoupled,
}

impl From<EchoArg> for EchoMode {
    fn from(value: EchoArg) -> Self {
        match value {
            EchoArg::Loopback => EchoMode::Loopback,
            EchoArg::Decoupled => EchoMode::Decoupled,
        }
    }
}
