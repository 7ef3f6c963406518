//! accelctl - leetaccel curve and pipeline tool
//!
//! Evaluates and samples acceleration curves, validates parameter sets, and
//! replays recorded pointer event logs through the interception pipeline
//! without touching a real device.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod config;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{Context, ReplayArgs, SampleArgs};
use crate::config::{CliConfig, ParamArgs};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "accelctl")]
#[command(about = "Pointer acceleration curve and pipeline tool")]
#[command(version)]
#[command(long_about = "
accelctl evaluates leetaccel acceleration curves, validates parameter sets
before they reach the driver, and replays recorded event logs through the
interception pipeline.

Parameters come from --config (JSON) and may be overridden per invocation
with --mode, --sensitivity, --accel and friends.
Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// JSON configuration file
    #[arg(long, global = true, env = "ACCELCTL_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(flatten)]
    params: ParamArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the multiplier at each input speed
    Eval {
        /// Input speeds in counts per report
        #[arg(required = true, allow_negative_numbers = true)]
        speeds: Vec<f64>,
    },

    /// Sample the curve over a speed range
    Sample(SampleArgs),

    /// Parse and validate lookup table text
    Lut {
        /// Table as `x,y;x,y;...`
        text: String,
    },

    /// Replay an event log through the pipeline
    Replay(ReplayArgs),

    /// Validate parameters and show the driver store entries
    Check,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,

        /// Print installation instructions instead of the script
        #[arg(long)]
        instructions: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("accelctl={log_level},leetaccel_pipeline={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute_command(&cli) {
        if cli.json {
            output::print_error_json(&e);
        } else {
            output::print_error_human(&e);
        }
        let exit_code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(exit_code);
    }
}

fn build_context(cli: &Cli) -> Result<Context, CliError> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    cli.params.apply(&mut config.parameters)?;
    if let Commands::Replay(args) = &cli.command {
        args.apply(&mut config);
    }
    Ok(Context {
        config,
        json: cli.json,
    })
}

fn execute_command(cli: &Cli) -> Result<()> {
    if let Commands::Completion {
        shell,
        instructions,
    } = &cli.command
    {
        if *instructions {
            completion::print_completion_instructions(*shell);
        } else {
            completion::generate_completion(*shell);
        }
        return Ok(());
    }

    let ctx = build_context(cli)?;
    match &cli.command {
        Commands::Eval { speeds } => commands::eval::execute(&ctx, speeds),
        Commands::Sample(args) => commands::sample::execute(&ctx, args),
        Commands::Lut { text } => commands::lut::execute(&ctx, text),
        Commands::Replay(args) => commands::replay::execute(&ctx, args),
        Commands::Check => commands::check::execute(&ctx),
        Commands::Completion { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use leetaccel_curves::AccelMode;
    use leetaccel_pipeline::{EchoMode, SameAxisPolicy};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < f64::EPSILON
    }

    fn all_close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| close(*x, *y))
    }

    // --- Global flag parsing ---

    #[test]
    fn parse_check_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "check"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.params, ParamArgs::default());
        assert!(matches!(cli.command, Commands::Check));
        Ok(())
    }

    #[test]
    fn parse_global_flags_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "check", "--json", "-vv"])?;
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    #[test]
    fn parse_parameter_overrides() -> TestResult {
        let cli = Cli::try_parse_from([
            "accelctl",
            "--mode",
            "classic",
            "eval",
            "--accel",
            "0.5",
            "--exponent",
            "2",
            "10",
        ])?;
        assert_eq!(cli.params.mode, Some(AccelMode::Classic));
        assert!(matches!(cli.params.accel, Some(v) if close(v, 0.5)));
        assert!(matches!(cli.params.exponent, Some(v) if close(v, 2.0)));
        match &cli.command {
            Commands::Eval { speeds } => assert!(all_close(speeds, &[10.0])),
            _ => return Err("expected Eval command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_unknown_mode_fails() {
        let result = Cli::try_parse_from(["accelctl", "--mode", "quadratic", "check"]);
        assert!(result.is_err());
    }

    // --- Command parsing ---

    #[test]
    fn parse_eval_requires_speeds() {
        assert!(Cli::try_parse_from(["accelctl", "eval"]).is_err());
    }

    #[test]
    fn parse_eval_negative_speed() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "eval", "-3", "4.5"])?;
        match &cli.command {
            Commands::Eval { speeds } => assert!(all_close(speeds, &[-3.0, 4.5])),
            _ => return Err("expected Eval command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_sample_range() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "sample", "--range", "20", "--points", "5"])?;
        match &cli.command {
            Commands::Sample(args) => {
                assert!(matches!(args.range, Some(v) if close(v, 20.0)));
                assert_eq!(args.points, Some(5));
            }
            _ => return Err("expected Sample command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_replay_flags() -> TestResult {
        let cli = Cli::try_parse_from([
            "accelctl",
            "replay",
            "moves.log",
            "--echo",
            "decoupled",
            "--accumulate",
            "--no-carry",
        ])?;
        match &cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.file, PathBuf::from("moves.log"));
                assert_eq!(args.device, "replay");
                let mut config = CliConfig::default();
                args.apply(&mut config);
                assert_eq!(config.echo_mode, EchoMode::Decoupled);
                assert_eq!(config.pipeline.same_axis_policy, SameAxisPolicy::Accumulate);
                assert!(!config.pipeline.carry_remainder);
            }
            _ => return Err("expected Replay command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_completion() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "completion", "bash", "--instructions"])?;
        match &cli.command {
            Commands::Completion {
                shell,
                instructions,
            } => {
                assert_eq!(*shell, clap_complete::Shell::Bash);
                assert!(instructions);
            }
            _ => return Err("expected Completion command".into()),
        }
        Ok(())
    }

    #[test]
    fn context_applies_overrides_over_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["accelctl", "--sensitivity", "2.5", "check"])?;
        let ctx = build_context(&cli)?;
        assert!(close(ctx.params().sensitivity, 2.5));
        Ok(())
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
