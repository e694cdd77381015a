//! Runs health checks and tallies the results

use std::time::Instant;

use tracing::debug;

use super::check::{CheckResult, CheckStatus, SystemCheck};

/// One executed check
#[derive(Debug)]
pub struct CheckOutcome {
    pub name: String,
    pub description: Option<&'static str>,
    pub result: CheckResult,
}

/// Results from running a health check suite
#[derive(Debug, Default)]
pub struct HealthCheckReport {
    pub outcomes: Vec<CheckOutcome>,
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl HealthCheckReport {
    /// No failures (warnings allowed)
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// 0 = all pass, 1 = any fail, 2 = any warn (but no fail)
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else if self.warned > 0 {
            2
        } else {
            0
        }
    }

    /// Result of a check by name
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.name == name)
            .map(|outcome| &outcome.result)
    }

    fn record(&mut self, outcome: CheckOutcome) {
        match outcome.result.status {
            CheckStatus::Pass => self.passed += 1,
            CheckStatus::Warn => self.warned += 1,
            CheckStatus::Fail => self.failed += 1,
        }
        self.total += 1;
        self.outcomes.push(outcome);
    }
}

/// Orchestrates running health checks and collecting results
#[derive(Default)]
pub struct HealthCheckRunner {
    checks: Vec<Box<dyn SystemCheck>>,
}

impl HealthCheckRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_check<C: SystemCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Runs every registered check in order
    pub fn run(self) -> HealthCheckReport {
        let mut report = HealthCheckReport::default();

        for check in self.checks {
            let start = Instant::now();
            let result = check.check().with_duration(start.elapsed());
            debug!(check = check.name(), status = ?result.status, "Health check finished");

            report.record(CheckOutcome {
                name: check.name().to_string(),
                description: check.description(),
                result,
            });
        }

        report
    }
}
