//! Where check failures go.

use std::cell::RefCell;

use crate::error::Failure;

/// Receives the outcome of failed checks.
pub trait Reporter {
    /// Record a failure and let the current check carry on.
    fn report(&self, failure: Failure);

    /// Record a failure and abort the test.
    fn fatal(&self, failure: Failure) -> ! {
        let message = failure.to_string();
        self.report(failure);
        panic!("{message}");
    }
}

/// Collects soft failures for one test and fails the test on drop if any
/// are left.
///
/// ```should_panic
/// use web_testutil::{Failure, Reporter, TestReporter};
///
/// let t = TestReporter::new();
/// t.report(Failure::Status { expected: 200, actual: 500 });
/// // `t` is dropped here and the test panics listing the failure.
/// ```
#[derive(Debug, Default)]
pub struct TestReporter {
    failures: RefCell<Vec<Failure>>,
}

impl TestReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_failed(&self) -> bool {
        !self.failures.borrow().is_empty()
    }

    /// Drain the recorded failures. Draining means the reporter no longer
    /// fails the test on drop, so tests of failing checks use this to
    /// assert on what was reported.
    pub fn take_failures(&self) -> Vec<Failure> {
        self.failures.take()
    }
}

impl Reporter for TestReporter {
    fn report(&self, failure: Failure) {
        tracing::error!(%failure, "check failed");
        self.failures.borrow_mut().push(failure);
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        let failures = self.failures.get_mut();
        if failures.is_empty() || std::thread::panicking() {
            return;
        }
        let lines: Vec<String> = failures.iter().map(|f| format!("  - {f}")).collect();
        panic!("{} check(s) failed:\n{}", failures.len(), lines.join("\n"));
    }
}
