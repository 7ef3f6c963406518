//! Error types for accelctl CLI

use std::path::PathBuf;

use leetaccel_errors::ConfigError;
use leetaccel_pipeline::{ParseEventError, PipelineError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Event log line {line}: {source}")]
    Replay {
        line: usize,
        #[source]
        source: ParseEventError,
    },

    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ConfigNotFound(_) => 2,
            CliError::InvalidConfiguration(_) | CliError::Replay { .. } | CliError::JsonError(_) => 4,
            CliError::UnknownDevice(_) => 3,
            CliError::IoError(_) => 1,
        }
    }

    /// Short machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::ConfigNotFound(_) => "config_not_found",
            CliError::InvalidConfiguration(_) => "invalid_configuration",
            CliError::Replay { .. } => "replay",
            CliError::UnknownDevice(_) => "unknown_device",
            CliError::IoError(_) => "io",
            CliError::JsonError(_) => "json",
        }
    }
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Config(e) => CliError::InvalidConfiguration(e),
            PipelineError::UnknownDevice(id) => CliError::UnknownDevice(id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leetaccel_pipeline::DeviceId;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::ConfigNotFound(PathBuf::from("x.json")).exit_code(), 2);
        assert_eq!(
            CliError::from(PipelineError::UnknownDevice(DeviceId::new("1-1"))).exit_code(),
            3
        );
        assert_eq!(
            CliError::from(ConfigError::Store("gone".to_string())).exit_code(),
            4
        );
    }
}
