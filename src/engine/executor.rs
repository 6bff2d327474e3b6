//! Execution engine - zfs-attrs executor with UI integration

use anyhow::Result;
use colored::Colorize;
use indicatif::ProgressBar;
use zfsprops::{
    ApplyDecision, ConfirmCallback, ExecuteOptions, ExecuteSummary, ExecutionStep, FailurePolicy,
    GateOutcome, ProgressCallback, PropertyChange, StepOutcome, StepRunner, apply_gate,
};

use crate::progress;
use crate::ui;

use super::differ::display_diff;

/// Options for applying (includes `yes` for confirmation skip)
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
    /// Skip confirmation prompts
    pub yes: bool,
    /// Keep running remaining steps after a failure
    pub keep_going: bool,
}

/// Show, confirm and apply a change list
///
/// `runner` is only called once the changes are approved, so privileges
/// are acquired as late as possible.
pub fn execute<R, F>(
    changes: &[PropertyChange],
    opts: &ApplyOptions,
    runner: F,
) -> Result<ExecuteSummary>
where
    R: StepRunner,
    F: FnOnce() -> Result<R>,
{
    // 1. Display what will change
    display_diff(changes)?;

    // 2. Confirm (unless --yes, or nothing would run anyway)
    let decision = if changes.is_empty() || opts.yes || opts.dry_run {
        ApplyDecision::Apply
    } else {
        ApplyDecision::ask(&mut DialoguerConfirm, "Apply these changes?")?
    };

    let plan = match apply_gate(changes, decision)? {
        GateOutcome::NoChanges => return Ok(ExecuteSummary::default()),
        GateOutcome::Declined => {
            println!();
            println!("  {} Aborted", "✗".red());
            return Ok(ExecuteSummary::default());
        }
        GateOutcome::Proceed(plan) => plan,
    };

    if opts.dry_run {
        println!();
        println!("  {} Dry run - no changes made. Would run:", "ℹ".blue());
        for step in plan.iter() {
            ui::dim(&step.to_string());
        }
        return Ok(ExecuteSummary::default());
    }

    // 3. Run the plan
    let runner = runner()?;
    let exec_opts = ExecuteOptions {
        dry_run: false,
        policy: if opts.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Halt
        },
    };

    println!();
    println!(
        "  {} Applying {} to {}...",
        "→".cyan(),
        ui::count(plan.len(), "step"),
        ui::count(plan.datasets().len(), "dataset")
    );

    let mut bar = BarProgress::default();
    let summary = zfsprops::execute(plan, &exec_opts, &runner, &mut bar);

    // 4. Summary
    print_summary(&summary);

    Ok(summary)
}

/// Confirm with user
struct DialoguerConfirm;

impl ConfirmCallback for DialoguerConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        Ok(confirmed)
    }
}

/// Progress bar over plan steps
#[derive(Default)]
struct BarProgress {
    pb: Option<ProgressBar>,
}

impl ProgressCallback for BarProgress {
    fn on_start(&mut self, total: usize) {
        self.pb = Some(progress::bar(total as u64, "Applying"));
    }

    fn on_step_start(&mut self, step: &ExecutionStep) {
        if let Some(pb) = &self.pb {
            pb.set_message(step.to_string());
        }
    }

    fn on_step_complete(&mut self, step: &ExecutionStep, outcome: &StepOutcome) {
        let Some(pb) = &self.pb else { return };

        let symbol = match outcome {
            StepOutcome::Applied => "✓".green(),
            StepOutcome::Failed { .. } => "✗".red(),
            StepOutcome::NotAttempted => "⊘".dimmed(),
        };
        pb.println(format!("    {symbol} {step}"));
        pb.inc(1);
    }

    fn on_finish(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Print final summary
fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!(
            "  {} Properties converged successfully!",
            "✓".green().bold()
        );
    } else {
        println!("  {} Applied with errors", "⚠".yellow().bold());
    }

    if summary.applied > 0 {
        println!("    • {} applied", ui::count(summary.applied, "step"));
    }
    if summary.not_attempted > 0 {
        println!("    • {} not attempted", ui::count(summary.not_attempted, "step"));
    }
    if summary.failed > 0 {
        println!("    • {} {}", summary.failed, "failed".red());
        for (_, outcome) in &summary.outcomes {
            if let StepOutcome::Failed { error } = outcome {
                println!("      {}", error.dimmed());
            }
        }
        println!();
        ui::warn("Steps before the failure stay applied; re-run to converge the rest.");
    }
}
