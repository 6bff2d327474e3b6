//! # zfsprops
//!
//! Reconcile declared ZFS dataset properties against the live system.
//!
//! The crate is a pure pipeline over two already-materialized snapshots:
//!
//! - **Parse**: turn `zfs get -H` output into an [`ActualState`]
//! - **Diff**: compare a [`DesiredState`] with the snapshot, yielding [`PropertyChange`]s
//! - **Render**: format changes as a per-dataset report for review
//! - **Plan**: compile changes into ordered [`ExecutionStep`]s
//!
//! Running `zfs`, reading the declaration from disk, and prompting the
//! operator are left to the caller through the traits in [`context`].
//!
//! ## Example
//!
//! ```
//! use zfsprops::{DesiredState, diff, parse, plan, render};
//!
//! let desired = DesiredState::from_json_str(
//!     r#"{"datasets": {"locker": {"ignored_properties": [], "properties": {"compression": "on"}}}}"#,
//! )?;
//! let actual = parse("locker\tcompression\toff\tlocal\n")?;
//!
//! let changes = diff(&desired, &actual);
//! assert_eq!(render(&changes)?, "locker:\n ~ compression: off -> on");
//!
//! let steps = plan(&changes)?;
//! assert_eq!(steps.steps[0].tokens(), ["set", "-u", "compression=on", "locker"]);
//! # Ok::<(), zfsprops::Error>(())
//! ```
//!
//! ## Unmanaged datasets
//!
//! Only datasets named in the declaration are compared. A dataset that is
//! present on the system but absent from the declaration is never touched,
//! while undeclared local properties on a *declared* dataset are reverted
//! to their inherited value.

pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod gate;
pub mod parser;
pub mod planner;
pub mod render;
pub mod types;

// Re-export main types at crate root
pub use context::{
    AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback, StepRunner,
};
pub use diff::{DiffSummary, diff, group_by_dataset};
pub use error::{Error, Result};
pub use executor::{execute, execute_simple};
pub use gate::{ApplyDecision, GateOutcome, apply_gate};
pub use parser::parse;
pub use planner::{ExecutionPlan, plan};
pub use render::{render, render_line};
pub use types::{
    ActualState, ChangeKind, DesiredDatasetSpec, DesiredState, ExecuteOptions, ExecuteSummary,
    ExecutionStep, FailurePolicy, PropertyChange, PropertyMap, StepOutcome,
};
