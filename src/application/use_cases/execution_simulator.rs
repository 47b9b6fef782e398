use crate::domain::error::Result;
use crate::domain::execution::ExecutionStatus;
use crate::domain::notification::Severity;
use crate::domain::test_case::TestCase;
use crate::infrastructure::config::ExecutionConfig;
use crate::infrastructure::notifier::Notifier;
use crate::infrastructure::random::RandomSource;
use crate::infrastructure::scheduler::{Scheduler, SchedulerExt, TimerHandle};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
}

/// Simulated test runs. Outcomes are only ever reported as notifications.
#[derive(Clone)]
pub struct ExecutionSimulator {
    scheduler: Arc<dyn Scheduler>,
    random: Arc<dyn RandomSource>,
    notifier: Arc<dyn Notifier>,
    config: ExecutionConfig,
}

impl ExecutionSimulator {
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        random: Arc<dyn RandomSource>,
        notifier: Arc<dyn Notifier>,
        config: ExecutionConfig,
    ) -> Self {
        Self {
            scheduler,
            random,
            notifier,
            config,
        }
    }

    /// One independent pass/fail draw.
    pub fn draw_outcome(&self) -> ExecutionStatus {
        if self.random.next_unit() < self.config.pass_probability {
            ExecutionStatus::Passed
        } else {
            ExecutionStatus::Failed
        }
    }

    /// Reports a pass or fail for `test_case` once the execution delay has
    /// elapsed. Nothing is stored and the outcome is not returned.
    pub fn run(&self, test_case: &TestCase) -> Result<TimerHandle> {
        let simulator = self.clone();
        let title = test_case.title.clone();
        let test_case_id = test_case.id.clone();
        let run_id = Uuid::new_v4().to_string();
        self.scheduler.schedule_after(
            self.config.delay(),
            Box::pin(async move {
                let outcome = simulator.draw_outcome();
                info!(
                    run_id = %run_id,
                    test_case_id = %test_case_id,
                    outcome = ?outcome,
                    "Simulated execution finished"
                );
                match outcome {
                    ExecutionStatus::Passed => simulator
                        .notifier
                        .notify(Severity::Success, &format!("Test passed: {}", title)),
                    _ => simulator
                        .notifier
                        .notify(Severity::Error, &format!("Test failed: {}", title)),
                }
            }),
        )
    }

    /// Draws one outcome per test case after the suite delay and reports the
    /// totals in a single notification.
    pub fn run_suite(&self, test_cases: Vec<TestCase>) -> Result<TimerHandle> {
        let simulator = self.clone();
        self.scheduler.schedule_after(
            self.config.suite_delay(),
            Box::pin(async move {
                let summary = simulator.summarize(&test_cases);
                info!(
                    total = test_cases.len(),
                    passed = summary.passed,
                    failed = summary.failed,
                    "Simulated suite finished"
                );
                simulator.notifier.notify(
                    Severity::Success,
                    &format!(
                        "Test suite completed: {} passed, {} failed",
                        summary.passed, summary.failed
                    ),
                );
            }),
        )
    }

    fn summarize(&self, test_cases: &[TestCase]) -> SuiteSummary {
        let passed = test_cases
            .iter()
            .filter(|_| self.draw_outcome() == ExecutionStatus::Passed)
            .count();
        SuiteSummary {
            passed,
            failed: test_cases.len() - passed,
        }
    }
}
