//! Scoped sudo context
//!
//! Sudo is never requested for the entire process. The diff is computed
//! unprivileged; sudo is validated once right before the plan runs and
//! invalidated again when the context is dropped.

use anyhow::{Context, Result, bail};
use std::process::{Command, Output};

/// Scoped sudo context - automatically invalidates on drop
pub struct SudoContext {
    validated: bool,
}

impl SudoContext {
    /// Acquire sudo privileges with a reason shown to user
    pub fn acquire(reason: &str) -> Result<Self> {
        eprintln!();
        eprintln!("  Sudo required: {reason}");
        eprintln!();

        // Validate sudo (will prompt for password)
        let status = Command::new("sudo")
            .args(["-v"])
            .status()
            .context("Failed to execute sudo")?;

        if !status.success() {
            bail!("Failed to acquire sudo privileges");
        }

        Ok(Self { validated: true })
    }

    /// Run a command with sudo
    pub fn run(&self, cmd: &str, args: &[String]) -> Result<Output> {
        if !self.validated {
            bail!("Sudo context not validated");
        }

        Command::new("sudo")
            .arg(cmd)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute: sudo {cmd} {}", args.join(" ")))
    }
}

impl Drop for SudoContext {
    fn drop(&mut self) {
        // Invalidate sudo timestamp to release privileges
        let _ = Command::new("sudo").args(["-k"]).status();
    }
}
