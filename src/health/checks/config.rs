//! Configuration system health check

use crate::config::AppConfig;
use crate::health::check::{CheckResult, SystemCheck};

/// Checks that every profile loads and validates
pub struct ConfigCheck {
    profiles: Vec<&'static str>,
}

impl ConfigCheck {
    /// Checks the debug and release profiles
    pub fn new() -> Self {
        Self::with_profiles(vec!["debug", "release"])
    }

    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Loads and validates each profile plus environment overrides")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();
        let mut failed = 0;

        for profile in &self.profiles {
            match AppConfig::load(profile) {
                Ok(config) => details.push(format!(
                    "✓ Profile '{}': context '{}', dash {} u/s for {} ms",
                    profile,
                    config.input.context,
                    config.dash.dash_speed,
                    config.dash.dash_duration_ms
                )),
                Err(e) => {
                    details.push(format!("✗ Profile '{profile}': {e}"));
                    failed += 1;
                }
            }
        }

        let env_ok = match AppConfig::load_from_env() {
            Ok(config) => {
                details.push(format!("✓ Environment config: profile '{}'", config.profile));
                true
            }
            Err(e) => {
                details.push(format!("⚠ Environment config: {e}"));
                false
            }
        };

        if failed > 0 {
            CheckResult::fail(format!("{failed} profile(s) failed to load")).with_details(details)
        } else if !env_ok {
            CheckResult::warn("Profiles load, environment overrides invalid").with_details(details)
        } else {
            CheckResult::pass(format!("{} profiles validated", self.profiles.len()))
                .with_details(details)
        }
    }
}
