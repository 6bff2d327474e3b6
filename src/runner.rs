//! `zfs` command-line integration
//!
//! Captures the live property listing and runs plan steps. This is the
//! only place the tool talks to the storage subsystem.

use anyhow::{Context, Result, bail};
use std::process::{Command, Output, Stdio};
use zfsprops::{ExecutionStep, StepRunner};

use crate::sudo::SudoContext;

/// Arguments for listing locally-set properties of every filesystem
///
/// Inherited and default values are filtered out by `zfs` itself.
pub const SNAPSHOT_ARGS: [&str; 7] = ["get", "-Hp", "-t", "filesystem", "-s", "local", "all"];

/// Runs `zfs`, optionally through a validated sudo context
pub struct ZfsCli {
    bin: String,
    sudo: Option<SudoContext>,
}

impl ZfsCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            sudo: None,
        }
    }

    /// Run mutating steps through sudo
    pub fn with_sudo(mut self, sudo: SudoContext) -> Self {
        self.sudo = Some(sudo);
        self
    }

    /// Capture the raw property listing
    pub fn snapshot(&self) -> Result<String> {
        if !command_exists(&self.bin) {
            bail!("`{}` not found; is ZFS installed?", self.bin);
        }

        let output = Command::new(&self.bin)
            .args(SNAPSHOT_ARGS)
            .output()
            .with_context(|| format!("Failed to execute: {} {}", self.bin, SNAPSHOT_ARGS.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{} get failed: {}", self.bin, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_zfs(&self, args: &[String]) -> Result<Output> {
        match &self.sudo {
            Some(sudo) => sudo.run(&self.bin, args),
            None => Command::new(&self.bin)
                .args(args)
                .output()
                .with_context(|| format!("Failed to execute: {} {}", self.bin, args.join(" "))),
        }
    }
}

impl StepRunner for ZfsCli {
    fn run(&self, step: &ExecutionStep) -> Result<()> {
        let output = self.run_zfs(&step.tokens())?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{}", stderr.trim());
        }

        Ok(())
    }
}

/// Check if a command exists
pub fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
