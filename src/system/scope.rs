//! Named scoped operations.
//!
//! A [`StepScope`] announces a step when created and reports exactly once
//! when the step ends: completed, failed with an error, or aborted (dropped
//! without an outcome, e.g. on panic or an early `?` return).

use crate::log_collector::PARSED_TARGET;
use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct StepScope {
    description: String,
    started: Instant,
    finished: bool,
}

impl StepScope {
    pub fn start(description: impl Into<String>) -> Self {
        let description = description.into();
        log::info!(target: PARSED_TARGET, "Running {}", description);
        StepScope {
            description,
            started: Instant::now(),
            finished: false,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn complete(mut self) -> Duration {
        self.finished = true;
        let elapsed = self.elapsed();
        log::info!(
            target: PARSED_TARGET,
            "Completed {} in {:.2?}",
            self.description,
            elapsed
        );
        elapsed
    }

    pub fn fail(mut self, error: &dyn Display) -> Duration {
        self.finished = true;
        let elapsed = self.elapsed();
        log::error!(
            target: PARSED_TARGET,
            "{} failed after {:.2?}: {}",
            self.description,
            elapsed,
            error
        );
        elapsed
    }

    /// Report `result` as this scope's outcome and pass it through.
    pub fn finish<T, E: Display>(self, result: Result<T, E>) -> Result<T, E> {
        match &result {
            Ok(_) => {
                self.complete();
            }
            Err(e) => {
                self.fail(e);
            }
        }
        result
    }
}

impl Drop for StepScope {
    fn drop(&mut self) {
        if !self.finished {
            log::error!(
                target: PARSED_TARGET,
                "{} aborted after {:.2?}",
                self.description,
                self.elapsed()
            );
        }
    }
}

/// Run `operation` inside a scope named `description`.
pub async fn scoped<T, E, F>(description: impl Into<String>, operation: F) -> Result<T, E>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    let scope = StepScope::start(description);
    let result = operation.await;
    scope.finish(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Log, Metadata, Record};
    use std::sync::{Mutex, Once};

    static INIT: Once = Once::new();
    static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct CaptureLogger;

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if let Ok(mut lines) = CAPTURED.lock() {
                lines.push(format!("{} {}", record.level(), record.args()));
            }
        }

        fn flush(&self) {}
    }

    fn capture() {
        INIT.call_once(|| {
            let _ = log::set_logger(&CaptureLogger);
            log::set_max_level(log::LevelFilter::Trace);
        });
    }

    /// Captured lines mentioning `needle`.
    fn lines_with(needle: &str) -> Vec<String> {
        CAPTURED
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.contains(needle))
            .cloned()
            .collect()
    }

    #[test]
    fn test_scope_reports_completion() {
        capture();
        let scope = StepScope::start("scope-ok-step");
        assert_eq!(scope.description(), "scope-ok-step");
        scope.complete();

        let lines = lines_with("scope-ok-step");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("INFO Running scope-ok-step"));
        assert!(lines[1].starts_with("INFO Completed scope-ok-step in"));
    }

    #[test]
    fn test_scope_finish_passes_error_through() {
        capture();
        let result: Result<(), String> =
            StepScope::start("scope-err-step").finish(Err("yarn exploded".to_string()));
        assert_eq!(result, Err("yarn exploded".to_string()));

        let lines = lines_with("scope-err-step");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("ERROR scope-err-step failed after"));
        assert!(lines[1].ends_with("yarn exploded"));
    }

    #[test]
    fn test_scope_dropped_reports_abort() {
        capture();
        {
            let _scope = StepScope::start("scope-drop-step");
        }
        let lines = lines_with("scope-drop-step");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("ERROR scope-drop-step aborted after"));
    }

    #[tokio::test]
    async fn test_scoped_future_success() {
        capture();
        let value: Result<u32, String> = scoped("scope-async-step", async { Ok(7) }).await;
        assert_eq!(value, Ok(7));
        assert_eq!(lines_with("Completed scope-async-step").len(), 1);
    }
}
