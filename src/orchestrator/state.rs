//! Outcome of one build invocation.

use std::time::Duration;

/// A step that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub description: &'static str,
    pub elapsed: Duration,
}

/// What a run did. Only successful runs produce a report; failures surface
/// as the error of the step that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Completed steps in execution order
    pub completed: Vec<StepRecord>,

    /// Steps that were planned but not executed (dry run)
    pub skipped: Vec<&'static str>,

    pub dry_run: bool,
}

impl BuildReport {
    pub fn record(&mut self, description: &'static str, elapsed: Duration) {
        self.completed.push(StepRecord {
            description,
            elapsed,
        });
    }

    pub fn total_elapsed(&self) -> Duration {
        self.completed.iter().map(|s| s.elapsed).sum()
    }

    /// Descriptions of completed steps, in order.
    pub fn completed_descriptions(&self) -> Vec<&'static str> {
        self.completed.iter().map(|s| s.description).collect()
    }
}
