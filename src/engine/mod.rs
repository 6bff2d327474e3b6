//! Execution engine for zfs-attrs
//!
//! The engine orchestrates:
//! 1. Displaying - Show the diff with colors and a summary
//! 2. Gating - Turn the operator's answer into a plan or an abort
//! 3. Executing - Run the plan step by step with progress

pub mod differ;
pub mod executor;

pub use differ::display_diff;
pub use executor::{ApplyOptions, execute};
