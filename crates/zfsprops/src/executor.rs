//! Execution engine - runs plan steps in order through a step runner
//!
//! Steps are independent `zfs` invocations with no transaction spanning
//! them. A failure leaves earlier steps applied; the failure policy only
//! decides whether later steps are still attempted.

use crate::context::{ProgressCallback, StepRunner};
use crate::error::Error;
use crate::planner::ExecutionPlan;
use crate::types::{ExecuteOptions, ExecuteSummary, FailurePolicy, StepOutcome};

/// Execute a plan with the given options and callbacks
///
/// # Arguments
/// * `plan` - The execution plan to run
/// * `opts` - Execution options (dry_run, failure policy)
/// * `runner` - Runs each step against the system
/// * `progress` - Progress callback
///
/// # Returns
/// Summary with one outcome per step, in plan order
pub fn execute<R, P>(
    plan: ExecutionPlan,
    opts: &ExecuteOptions,
    runner: &R,
    progress: &mut P,
) -> ExecuteSummary
where
    R: StepRunner + ?Sized,
    P: ProgressCallback + ?Sized,
{
    let mut summary = ExecuteSummary::default();
    let mut halted = false;

    progress.on_start(plan.len());

    for step in plan {
        if opts.dry_run || halted {
            progress.on_step_complete(&step, &StepOutcome::NotAttempted);
            summary.record(step, StepOutcome::NotAttempted);
            continue;
        }

        progress.on_step_start(&step);
        log::debug!("Running: {step}");

        let outcome = match runner.run(&step) {
            Ok(()) => StepOutcome::Applied,
            Err(e) => {
                let error = Error::Execution {
                    step: step.to_string(),
                    message: format!("{e:#}"),
                };
                log::warn!("{error}");
                if opts.policy == FailurePolicy::Halt {
                    halted = true;
                }
                StepOutcome::Failed {
                    error: error.to_string(),
                }
            }
        };

        progress.on_step_complete(&step, &outcome);
        summary.record(step, outcome);
    }

    progress.on_finish();

    summary
}

/// Simple execution without progress reporting
pub fn execute_simple<R: StepRunner + ?Sized>(
    plan: ExecutionPlan,
    opts: &ExecuteOptions,
    runner: &R,
) -> ExecuteSummary {
    use crate::context::NoProgress;

    execute(plan, opts, runner, &mut NoProgress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExecutionStep;
    use anyhow::{Result, bail};
    use std::cell::RefCell;

    /// Records every step and fails the ones touching `fail_on`
    struct MockRunner {
        fail_on: Option<String>,
        ran: RefCell<Vec<String>>,
    }

    impl MockRunner {
        fn new(fail_on: Option<&str>) -> Self {
            Self {
                fail_on: fail_on.map(str::to_string),
                ran: RefCell::new(Vec::new()),
            }
        }
    }

    impl StepRunner for MockRunner {
        fn run(&self, step: &ExecutionStep) -> Result<()> {
            self.ran.borrow_mut().push(step.to_string());
            if self.fail_on.as_deref() == Some(step.dataset()) {
                bail!("cannot set property for '{}': permission denied", step.dataset());
            }
            Ok(())
        }
    }

    fn inherit(dataset: &str, property: &str) -> ExecutionStep {
        ExecutionStep::Inherit {
            dataset: dataset.into(),
            property: property.into(),
        }
    }

    fn three_step_plan() -> ExecutionPlan {
        ExecutionPlan {
            steps: vec![
                inherit("tank/a", "atime"),
                inherit("tank/b", "atime"),
                inherit("tank/c", "atime"),
            ],
        }
    }

    #[test]
    fn test_execute_empty_plan() {
        let runner = MockRunner::new(None);
        let summary = execute_simple(ExecutionPlan::new(), &ExecuteOptions::default(), &runner);

        assert_eq!(summary.total(), 0);
        assert!(summary.is_success());
    }

    #[test]
    fn test_execute_runs_all_steps_in_order() {
        let runner = MockRunner::new(None);
        let summary = execute_simple(three_step_plan(), &ExecuteOptions::default(), &runner);

        assert_eq!(summary.applied, 3);
        assert_eq!(
            *runner.ran.borrow(),
            vec![
                "zfs inherit atime tank/a",
                "zfs inherit atime tank/b",
                "zfs inherit atime tank/c",
            ]
        );
    }

    #[test]
    fn test_execute_halts_after_failure() {
        let runner = MockRunner::new(Some("tank/b"));
        let summary = execute_simple(three_step_plan(), &ExecuteOptions::default(), &runner);

        assert_eq!(summary.applied, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.not_attempted, 1);
        assert_eq!(runner.ran.borrow().len(), 2);
        assert!(matches!(
            &summary.outcomes[1].1,
            StepOutcome::Failed { error } if error.contains("permission denied")
        ));
    }

    #[test]
    fn test_execute_continues_after_failure() {
        let runner = MockRunner::new(Some("tank/a"));
        let opts = ExecuteOptions {
            policy: FailurePolicy::Continue,
            ..ExecuteOptions::default()
        };
        let summary = execute_simple(three_step_plan(), &opts, &runner);

        assert_eq!(summary.applied, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(runner.ran.borrow().len(), 3);
    }

    #[test]
    fn test_execute_dry_run_runs_nothing() {
        let runner = MockRunner::new(None);
        let opts = ExecuteOptions {
            dry_run: true,
            ..ExecuteOptions::default()
        };
        let summary = execute_simple(three_step_plan(), &opts, &runner);

        assert_eq!(summary.not_attempted, 3);
        assert!(runner.ran.borrow().is_empty());
    }

    #[test]
    fn test_execute_reports_progress() {
        #[derive(Default)]
        struct Counting {
            total: usize,
            started: usize,
            completed: usize,
            finished: bool,
        }

        impl ProgressCallback for Counting {
            fn on_start(&mut self, total: usize) {
                self.total = total;
            }
            fn on_step_start(&mut self, _step: &ExecutionStep) {
                self.started += 1;
            }
            fn on_step_complete(&mut self, _step: &ExecutionStep, _outcome: &StepOutcome) {
                self.completed += 1;
            }
            fn on_finish(&mut self) {
                self.finished = true;
            }
        }

        let runner = MockRunner::new(Some("tank/a"));
        let mut progress = Counting::default();
        execute(
            three_step_plan(),
            &ExecuteOptions::default(),
            &runner,
            &mut progress,
        );

        assert_eq!(progress.total, 3);
        assert_eq!(progress.started, 1);
        assert_eq!(progress.completed, 3);
        assert!(progress.finished);
    }
}
