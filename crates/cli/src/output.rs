//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use serde::Serialize;
use serde_json::json;

use crate::error::CliError;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format error as JSON: {}", e),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    match error.downcast_ref::<CliError>() {
        Some(e) => e.kind(),
        None => "error",
    }
}

/// Print `body` merged into `{"success": true, ...}`.
pub fn print_success_json<T: Serialize>(body: &T) -> anyhow::Result<()> {
    let mut value = serde_json::to_value(body)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("success".to_string(), json!(true));
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Print a non-fatal configuration fault.
pub fn print_fault_human(fault: &leetaccel_errors::ConfigError) {
    eprintln!(
        "{} {} (using fallback multiplier)",
        "Warning:".yellow().bold(),
        fault
    );
}

/// Section heading.
pub fn heading(text: &str) {
    println!("{}", text.bold());
}

/// `label: value` line.
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<18} {}", format!("{label}:"), value);
}
