//! # Shell Completion Module
//!
//! Generates completion scripts for the `playtally` command line through
//! clap_complete.
//!
//! ## Usage
//!
//! ```bash
//! # Bash
//! playtally completion bash > ~/.local/share/bash-completion/completions/playtally
//!
//! # Zsh
//! playtally completion zsh > ~/.config/zsh/completions/_playtally
//!
//! # Fish
//! playtally completion fish > ~/.config/fish/completions/playtally.fish
//! ```

use crate::cli::{Args, Shell};
use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};
use std::io::Write;

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
            Shell::Elvish => CompletionShell::Elvish,
        }
    }
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Args::command();
    let name = cmd.get_name().to_string();
    generate(CompletionShell::from(shell), &mut cmd, name, out);
}

/// Print the completion script for `shell` to stdout.
pub fn print_completions(shell: Shell) {
    write_completions(shell, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_conversion() {
        assert_eq!(CompletionShell::from(Shell::Bash), CompletionShell::Bash);
        assert_eq!(CompletionShell::from(Shell::PowerShell), CompletionShell::PowerShell);
    }

    #[test]
    fn test_bash_completion_mentions_commands() {
        let mut buffer = Vec::new();
        write_completions(Shell::Bash, &mut buffer);

        let script = String::from_utf8_lossy(&buffer);
        assert!(script.contains("_playtally"));
        assert!(script.contains("stats"));
        assert!(script.contains("playlist"));
    }
}
