//! Diff display - colors layered over the plain report

use anyhow::Result;
use colored::Colorize;
use zfsprops::{DiffSummary, PropertyChange, render};

/// Display a list of changes in a user-friendly format
pub fn display_diff(changes: &[PropertyChange]) -> Result<()> {
    if changes.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return Ok(());
    }

    let summary = DiffSummary::from_changes(changes)?;
    let report = render(changes)?;

    println!();
    for line in report.lines() {
        println!("  {}", colorize_line(line));
    }

    println!();
    println!(
        "  Summary: {} changes across {} datasets ({} to set, {} to change, {} to inherit)",
        summary.total().to_string().bold(),
        summary.datasets,
        summary.additions.to_string().green(),
        summary.modifications.to_string().yellow(),
        summary.removals.to_string().red()
    );

    Ok(())
}

/// Style one line of the plain report by its marker
fn colorize_line(line: &str) -> String {
    match line.get(..3) {
        Some(" + ") => line.green().to_string(),
        Some(" - ") => line.red().to_string(),
        Some(" ~ ") => line.yellow().to_string(),
        _ if line.is_empty() => String::new(),
        _ => line.bold().to_string(),
    }
}
