//! Shared helpers for command handlers: terminal notifier and confirmer.

use std::io::{self, IsTerminal};

use clientela_core::{Confirmer, Notifier, Severity};

use crate::error::CliError;
use crate::output;

/// Prints controller notifications to stderr, one line each.
pub struct ConsoleNotifier {
    quiet: bool,
    color: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool, color: bool) -> Self {
        Self { quiet, color }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        if self.quiet && matches!(severity, Severity::Success | Severity::Info) {
            return;
        }
        let line = match severity {
            Severity::Success => output::paint_ok(&format!("✓ {message}"), self.color),
            Severity::Info => output::paint_dim(&format!("· {message}"), self.color),
            Severity::Warning => output::paint_warn(&format!("! {message}"), self.color),
            Severity::Error => output::paint_err(&format!("✗ {message}"), self.color),
        };
        eprintln!("{line}");
    }
}

/// Interactive yes/no prompt, auto-approving when `--yes` was passed.
pub struct PromptConfirmer {
    yes: bool,
}

impl PromptConfirmer {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }
}

impl Confirmer for PromptConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        if self.yes {
            return true;
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "confirmation prompt failed, treating as no");
                false
            })
    }
}

/// Refuse destructive work when nobody can answer a prompt.
pub fn require_interactive(action: &str, yes_flag: bool) -> Result<(), CliError> {
    if yes_flag || io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        })
    }
}
