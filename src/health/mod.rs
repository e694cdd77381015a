//! Health check system for validating startup and degraded features
//!
//! Useful for CI and for diagnosing a machine where gamepads or config
//! profiles misbehave.
//!
//! # Example
//!
//! ```no_run
//! use skydash::health::{HealthCheckRunner, checks::*};
//!
//! let report = HealthCheckRunner::new()
//!     .add_check(ConfigCheck::new())
//!     .add_check(BindingsCheck::new())
//!     .run();
//!
//! if report.is_healthy() {
//!     println!("All systems operational!");
//! }
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

pub use check::{CheckResult, CheckStatus, SystemCheck};
pub use reporter::{format_report, print_report};
pub use runner::{CheckOutcome, HealthCheckReport, HealthCheckRunner};

/// Runs all default health checks and returns a report
pub fn run_all_checks() -> HealthCheckReport {
    HealthCheckRunner::new()
        .add_check(checks::ConfigCheck::new())
        .add_check(checks::BindingsCheck::new())
        .add_check(checks::GamepadBackendCheck::new())
        .add_check(checks::DashControllerCheck::new())
        .add_check(checks::BuildInfoCheck::new())
        .run()
}
