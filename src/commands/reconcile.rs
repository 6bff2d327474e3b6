//! Reconciliation commands
//!
//! - `diff` - Show drift between declared and live properties
//! - `plan` - Print the zfs commands apply would run
//! - `apply` - Converge live properties onto the declaration

use anyhow::{Context as _, Result};
use zfsprops::{PropertyChange, diff as diff_states, parse, plan as build_plan};

use crate::Context;
use crate::cli::ApplyArgs;
use crate::config::Config;
use crate::engine::{self, ApplyOptions};
use crate::runner::ZfsCli;
use crate::sudo::SudoContext;
use crate::ui;

/// Load both states and diff them
///
/// The desired-state location is checked before `zfs` is ever invoked.
fn compute_changes(config: &Config) -> Result<Vec<PropertyChange>> {
    let desired = config.load_desired()?;

    let raw = ZfsCli::new(&config.zfs_bin).snapshot()?;
    let actual = parse(&raw).context("Could not parse zfs property listing")?;
    log::info!(
        "Found {} properties across {} datasets",
        actual.property_count(),
        actual.dataset_count()
    );

    let unmanaged = actual
        .iter()
        .filter(|(name, _)| !desired.manages(name))
        .count();
    if unmanaged > 0 {
        log::debug!("Skipping {unmanaged} unmanaged datasets");
    }

    Ok(diff_states(&desired, &actual))
}

pub fn diff(ctx: &Context, config: &Config, json: bool) -> Result<()> {
    let changes = compute_changes(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
        return Ok(());
    }

    if !ctx.quiet {
        ui::header("Property Diff");
        if ctx.verbose > 0 {
            ui::kv("State", &config.state_path()?.display().to_string());
            ui::kv("zfs", &config.zfs_bin);
        }
    }
    engine::display_diff(&changes)
}

pub fn plan(ctx: &Context, config: &Config) -> Result<()> {
    let changes = compute_changes(config)?;
    let plan = build_plan(&changes)?;

    if plan.is_empty() {
        if !ctx.quiet {
            ui::success("No changes");
        }
        return Ok(());
    }

    for step in plan.iter() {
        println!("{step}");
    }

    Ok(())
}

pub fn apply(ctx: &Context, config: &Config, args: &ApplyArgs) -> Result<()> {
    let changes = compute_changes(config)?;

    if !ctx.quiet {
        ui::header("Apply Properties");
    }

    let opts = ApplyOptions {
        dry_run: args.dry_run,
        yes: args.yes,
        keep_going: args.keep_going,
    };

    let summary = engine::execute(&changes, &opts, || {
        let cli = ZfsCli::new(&config.zfs_bin);
        if args.sudo {
            let sudo = SudoContext::acquire("Apply ZFS property changes")?;
            Ok(cli.with_sudo(sudo))
        } else {
            Ok(cli)
        }
    })?;

    if !summary.is_success() {
        anyhow::bail!("{} step(s) failed to apply", summary.failed);
    }

    Ok(())
}
