//! Plain-text rendering of a change list
//!
//! Output is grouped per dataset:
//! ```text
//! tank:
//!  + atime: off
//!  - recordsize: 1M
//!  ~ compression: on -> lz4
//! ```
//! Styling is left to callers, which can key off the marker column.

use crate::diff::group_by_dataset;
use crate::error::Result;
use crate::types::{ChangeKind, PropertyChange};

/// Render changes as a per-dataset report with properties sorted by name.
pub fn render(changes: &[PropertyChange]) -> Result<String> {
    let mut blocks = Vec::new();

    for (dataset, group) in group_by_dataset(changes) {
        let mut sorted = group;
        sorted.sort_by(|a, b| a.property.cmp(&b.property));

        let mut block = format!("{dataset}:");
        for change in sorted {
            block.push('\n');
            block.push_str(&render_line(change)?);
        }
        blocks.push(block);
    }

    Ok(blocks.join("\n\n").trim().to_string())
}

/// Render one change as ` <marker> <property>: <values>`.
pub fn render_line(change: &PropertyChange) -> Result<String> {
    let kind = change.kind()?;
    let expected = change.expected.as_deref().unwrap_or_default();
    let actual = change.actual.as_deref().unwrap_or_default();

    let values = match kind {
        ChangeKind::Addition => expected.to_string(),
        ChangeKind::Removal => actual.to_string(),
        ChangeKind::Modification => format!("{actual} -> {expected}"),
    };

    Ok(format!(" {} {}: {}", kind.marker(), change.property, values))
}
