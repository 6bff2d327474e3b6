//! Parser for the tab-separated property listing produced by `zfs get -H`.
//!
//! Each record has the form:
//! ```text
//! dataset<TAB>property<TAB>value<TAB>source
//! ```
//! The listing is expected to be pre-filtered to locally-set properties of
//! filesystem datasets, so inherited and default values never show up here.

use crate::error::{Error, Result};
use crate::types::ActualState;

/// Parse a raw property listing into a snapshot.
///
/// Records for the same dataset are merged no matter where they appear in
/// the listing. Blank lines are skipped. The first malformed record aborts
/// the whole parse.
pub fn parse(raw: &str) -> Result<ActualState> {
    let mut state = ActualState::new();

    for (line_num, line) in raw.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }

        let (dataset, property, value) = parse_record(line, line_num + 1)?;
        state.insert(dataset, property, value);
    }

    log::debug!(
        "Parsed {} properties across {} datasets",
        state.property_count(),
        state.dataset_count()
    );

    Ok(state)
}

/// Split one record into (dataset, property, value).
fn parse_record(line: &str, line_num: usize) -> Result<(&str, &str, &str)> {
    let mut fields = line.split('\t');

    match (fields.next(), fields.next(), fields.next()) {
        (Some(dataset), Some(property), Some(value)) => {
            if dataset.is_empty() || property.is_empty() {
                return Err(Error::Parse {
                    line: line_num,
                    message: "empty dataset or property name".to_string(),
                });
            }
            Ok((dataset, property, value))
        }
        _ => Err(Error::Parse {
            line: line_num,
            message: format!(
                "expected at least 3 tab-separated fields, found {}",
                line.split('\t').count()
            ),
        }),
    }
}
