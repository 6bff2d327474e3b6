//! Core types for dataset property reconciliation

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Locally-set properties of a single dataset, in snapshot order
pub type PropertyMap = IndexMap<String, String>;

/// Point-in-time snapshot of locally-set dataset properties
///
/// Datasets and their properties keep the order in which they first
/// appeared in the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActualState {
    datasets: IndexMap<String, PropertyMap>,
}

impl ActualState {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a property value, replacing any earlier value for the same pair
    pub fn insert(
        &mut self,
        dataset: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.datasets
            .entry(dataset.into())
            .or_default()
            .insert(property.into(), value.into());
    }

    /// Properties set on a dataset, if the dataset appears in the snapshot
    pub fn properties(&self, dataset: &str) -> Option<&PropertyMap> {
        self.datasets.get(dataset)
    }

    /// Value of a single property
    pub fn get(&self, dataset: &str, property: &str) -> Option<&str> {
        self.datasets
            .get(dataset)
            .and_then(|props| props.get(property))
            .map(String::as_str)
    }

    /// Iterate datasets in snapshot order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyMap)> {
        self.datasets.iter()
    }

    /// Number of datasets in the snapshot
    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }

    /// Number of properties across all datasets
    pub fn property_count(&self) -> usize {
        self.datasets.values().map(IndexMap::len).sum()
    }

    /// Check if the snapshot holds no datasets
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Declared configuration of one managed dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredDatasetSpec {
    /// Properties excluded from diffing on this dataset
    #[serde(default)]
    pub ignored_properties: HashSet<String>,
    /// Declared property values, in document order
    #[serde(default)]
    pub properties: IndexMap<String, String>,
}

impl DesiredDatasetSpec {
    /// Check if a property is excluded from diffing
    pub fn is_ignored(&self, property: &str) -> bool {
        self.ignored_properties.contains(property)
    }
}

/// Desired state of every managed dataset
///
/// Datasets missing from `datasets` are unmanaged and never compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredState {
    #[serde(default)]
    pub datasets: IndexMap<String, DesiredDatasetSpec>,
}

impl DesiredState {
    /// Decode a desired-state JSON document
    ///
    /// Unknown top-level keys are ignored; all property values must be strings.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Check if a dataset is managed by this declaration
    pub fn manages(&self, dataset: &str) -> bool {
        self.datasets.contains_key(dataset)
    }
}

/// Classification of a property change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Declared property missing from the dataset
    Addition,
    /// Undeclared local property to revert to inherited
    Removal,
    /// Property set to a different value than declared
    Modification,
}

impl ChangeKind {
    /// Marker used in rendered diffs
    pub fn marker(self) -> char {
        match self {
            Self::Addition => '+',
            Self::Removal => '-',
            Self::Modification => '~',
        }
    }
}

/// A single property drift between desired and actual state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyChange {
    pub dataset: String,
    pub property: String,
    /// Declared value (`None` means revert to inherited)
    pub expected: Option<String>,
    /// Live value (`None` means not set locally)
    pub actual: Option<String>,
}

impl PropertyChange {
    /// Declared property that is not set on the dataset
    pub fn addition(
        dataset: impl Into<String>,
        property: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            property: property.into(),
            expected: Some(expected.into()),
            actual: None,
        }
    }

    /// Local property with no declaration
    pub fn removal(
        dataset: impl Into<String>,
        property: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            property: property.into(),
            expected: None,
            actual: Some(actual.into()),
        }
    }

    /// Property whose live value differs from the declared one
    pub fn modification(
        dataset: impl Into<String>,
        property: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            property: property.into(),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }

    /// Classify the change
    ///
    /// A record with both sides absent can only come from a faulty diff and
    /// is rejected.
    pub fn kind(&self) -> Result<ChangeKind> {
        match (&self.expected, &self.actual) {
            (Some(_), None) => Ok(ChangeKind::Addition),
            (None, Some(_)) => Ok(ChangeKind::Removal),
            (Some(_), Some(_)) => Ok(ChangeKind::Modification),
            (None, None) => Err(Error::InvariantViolation {
                dataset: self.dataset.clone(),
                property: self.property.clone(),
            }),
        }
    }
}

/// One convergence step for an external executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ExecutionStep {
    /// Set several properties on a dataset in a single operation
    Set {
        dataset: String,
        assignments: Vec<(String, String)>,
    },
    /// Revert one property to its inherited value
    Inherit { dataset: String, property: String },
}

impl ExecutionStep {
    /// Dataset the step operates on
    pub fn dataset(&self) -> &str {
        match self {
            Self::Set { dataset, .. } | Self::Inherit { dataset, .. } => dataset,
        }
    }

    /// Command tokens, without the `zfs` program name
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Set {
                dataset,
                assignments,
            } => {
                let mut tokens = Vec::with_capacity(assignments.len() + 3);
                tokens.push("set".to_string());
                tokens.push("-u".to_string());
                tokens.extend(assignments.iter().map(|(k, v)| format!("{k}={v}")));
                tokens.push(dataset.clone());
                tokens
            }
            Self::Inherit { dataset, property } => {
                vec!["inherit".to_string(), property.clone(), dataset.clone()]
            }
        }
    }
}

impl fmt::Display for ExecutionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zfs")?;
        for token in self.tokens() {
            if token.is_empty() || token.contains(char::is_whitespace) {
                write!(f, " '{token}'")?;
            } else {
                write!(f, " {token}")?;
            }
        }
        Ok(())
    }
}

/// What to do with the remaining steps after one fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failed step
    #[default]
    Halt,
    /// Keep running the remaining steps
    Continue,
}

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't run any step, just report what would happen
    pub dry_run: bool,
    /// Behaviour after a failed step
    pub policy: FailurePolicy,
}

/// Result of a single plan step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step ran successfully
    Applied,
    /// Step was run and failed
    Failed { error: String },
    /// Step was not run (dry run, or halted after an earlier failure)
    NotAttempted,
}

impl StepOutcome {
    /// Check if the outcome represents a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default)]
pub struct ExecuteSummary {
    pub applied: usize,
    pub failed: usize,
    pub not_attempted: usize,
    /// Every step with its outcome, in plan order
    pub outcomes: Vec<(ExecutionStep, StepOutcome)>,
}

impl ExecuteSummary {
    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of steps processed
    pub fn total(&self) -> usize {
        self.applied + self.failed + self.not_attempted
    }

    /// Record the outcome of a step
    pub fn record(&mut self, step: ExecutionStep, outcome: StepOutcome) {
        match &outcome {
            StepOutcome::Applied => self.applied += 1,
            StepOutcome::Failed { .. } => self.failed += 1,
            StepOutcome::NotAttempted => self.not_attempted += 1,
        }
        self.outcomes.push((step, outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_kind() {
        assert_eq!(
            PropertyChange::addition("tank", "atime", "off").kind().unwrap(),
            ChangeKind::Addition
        );
        assert_eq!(
            PropertyChange::removal("tank", "atime", "on").kind().unwrap(),
            ChangeKind::Removal
        );
        assert_eq!(
            PropertyChange::modification("tank", "atime", "off", "on")
                .kind()
                .unwrap(),
            ChangeKind::Modification
        );
    }

    #[test]
    fn test_change_kind_rejects_empty_change() {
        let change = PropertyChange {
            dataset: "tank".into(),
            property: "atime".into(),
            expected: None,
            actual: None,
        };
        assert!(matches!(
            change.kind(),
            Err(Error::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_step_tokens() {
        let set = ExecutionStep::Set {
            dataset: "tank/home".into(),
            assignments: vec![
                ("compression".into(), "lz4".into()),
                ("atime".into(), "off".into()),
            ],
        };
        assert_eq!(
            set.tokens(),
            vec!["set", "-u", "compression=lz4", "atime=off", "tank/home"]
        );

        let inherit = ExecutionStep::Inherit {
            dataset: "tank/home".into(),
            property: "quota".into(),
        };
        assert_eq!(inherit.tokens(), vec!["inherit", "quota", "tank/home"]);
        assert_eq!(inherit.to_string(), "zfs inherit quota tank/home");
    }

    #[test]
    fn test_step_display_quotes_whitespace() {
        let set = ExecutionStep::Set {
            dataset: "tank".into(),
            assignments: vec![("org:note".into(), "two words".into())],
        };
        assert_eq!(set.to_string(), "zfs set -u 'org:note=two words' tank");
    }

    #[test]
    fn test_desired_state_defaults_and_order() {
        let state = DesiredState::from_json_str(
            r#"{
                "pools": {},
                "datasets": {
                    "tank/z": { "properties": { "b": "1", "a": "2" } },
                    "tank/a": { "ignored_properties": ["mountpoint"] }
                }
            }"#,
        )
        .unwrap();

        let names: Vec<_> = state.datasets.keys().cloned().collect();
        assert_eq!(names, vec!["tank/z", "tank/a"]);

        let props: Vec<_> = state.datasets["tank/z"].properties.keys().cloned().collect();
        assert_eq!(props, vec!["b", "a"]);

        assert!(state.datasets["tank/a"].properties.is_empty());
        assert!(state.datasets["tank/a"].is_ignored("mountpoint"));
        assert!(state.manages("tank/a"));
        assert!(!state.manages("tank"));
    }

    #[test]
    fn test_desired_state_rejects_non_string_values() {
        let result =
            DesiredState::from_json_str(r#"{"datasets": {"tank": {"properties": {"copies": 2}}}}"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_actual_state_counts() {
        let mut actual = ActualState::new();
        actual.insert("tank", "compression", "on");
        actual.insert("tank", "atime", "off");
        actual.insert("tank/home", "quota", "10G");
        actual.insert("tank", "compression", "lz4");

        assert_eq!(actual.dataset_count(), 2);
        assert_eq!(actual.property_count(), 3);
        assert_eq!(actual.get("tank", "compression"), Some("lz4"));
        assert_eq!(actual.get("tank/home", "atime"), None);
    }

    #[test]
    fn test_summary_record() {
        let step = ExecutionStep::Inherit {
            dataset: "tank".into(),
            property: "atime".into(),
        };
        let mut summary = ExecuteSummary::default();
        summary.record(step.clone(), StepOutcome::Applied);
        summary.record(
            step.clone(),
            StepOutcome::Failed {
                error: "boom".into(),
            },
        );
        summary.record(step, StepOutcome::NotAttempted);

        assert_eq!(summary.total(), 3);
        assert!(!summary.is_success());
        assert_eq!(summary.outcomes.len(), 3);
    }
}
