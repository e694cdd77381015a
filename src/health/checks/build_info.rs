//! Build information health check

use crate::build_info;
use crate::health::check::{CheckResult, SystemCheck};

/// Checks that build metadata was embedded
pub struct BuildInfoCheck;

impl BuildInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuildInfoCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates build metadata (git, rustc, timestamps)")
    }

    fn check(&self) -> CheckResult {
        let details = build_info::detailed_info()
            .lines()
            .map(str::to_string)
            .collect();

        if build_info::RUSTC_SEMVER.is_empty() {
            return CheckResult::warn("Compiler version missing").with_details(details);
        }

        CheckResult::pass(build_info::version_string()).with_details(details)
    }
}
