//! Shell completion generation for accelctl

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io;

use crate::Cli;

const BIN_NAME: &str = "accelctl";

/// Write the completion script for `shell` to stdout.
pub fn generate_completion(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());
}

/// Print where to install the script for `shell`.
pub fn print_completion_instructions(shell: Shell) {
    match shell {
        Shell::Bash => {
            println!("# Add to ~/.bashrc:");
            println!("eval \"$({BIN_NAME} completion bash)\"");
        }
        Shell::Zsh => {
            println!("# Save into a directory on your fpath:");
            println!("{BIN_NAME} completion zsh > ~/.zsh/completions/_{BIN_NAME}");
        }
        Shell::Fish => {
            println!("{BIN_NAME} completion fish > ~/.config/fish/completions/{BIN_NAME}.fish");
        }
        Shell::PowerShell => {
            println!("# Add to your PowerShell profile:");
            println!("Invoke-Expression (& {BIN_NAME} completion powershell | Out-String)");
        }
        _ => {
            println!("# See your shell's documentation for loading {shell:?} completions.");
        }
    }
}
