//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.
//! Every section has serde defaults, so a missing profile file still yields
//! a usable configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config sources could not be read or deserialized
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read successfully but is outside its allowed range
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width
    pub width: f64,
    /// Window height
    pub height: f64,
    /// Whether the window should be fullscreen
    pub fullscreen: bool,
    /// Whether the window should be resizable
    pub resizable: bool,
    /// Whether the window should be decorated (has title bar, borders, etc.)
    pub decorated: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Skydash".to_string(),
            width: 960.0,
            height: 540.0,
            fullscreen: false,
            resizable: true,
            decorated: true,
        }
    }
}

/// Input normalization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Minimum left-stick magnitude before it produces movement
    pub stick_deadzone: f32,
    /// Deflection past which an axis-bound action counts as pressed
    pub axis_threshold: f32,
    /// How often the device list is rescanned, in milliseconds
    pub gamepad_poll_interval_ms: u64,
    /// Binding context installed at startup ("world", "battle" or "map")
    pub context: String,
}

impl InputConfig {
    pub fn gamepad_poll_interval(&self) -> Duration {
        Duration::from_millis(self.gamepad_poll_interval_ms)
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            stick_deadzone: 0.15,
            axis_threshold: 0.3,
            gamepad_poll_interval_ms: 100,
            context: "world".to_string(),
        }
    }
}

/// Dash and charged auto-run tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Holds shorter than this dash instead of charging
    pub tap_threshold_ms: u64,
    /// Charge window; accumulated charge is capped here
    pub max_charge_ms: u64,
    /// Horizontal dash velocity in units per second
    pub dash_speed: f32,
    /// How long a dash lasts
    pub dash_duration_ms: u64,
    /// Body alpha while dashing
    pub dash_alpha: f32,
    /// Charge fraction below which an auto-run fizzles
    pub min_charge_fraction: f32,
    /// Auto-run duration at the minimum accepted charge scale (fraction 0)
    pub auto_run_min_ms: u64,
    /// Auto-run duration at full charge
    pub auto_run_max_ms: u64,
    /// Horizontal auto-run velocity in units per second
    pub auto_run_speed: f32,
    /// RGB color handed to the charge bar
    pub charge_bar_color: u32,
}

impl DashConfig {
    pub fn tap_threshold(&self) -> Duration {
        Duration::from_millis(self.tap_threshold_ms)
    }

    pub fn max_charge(&self) -> Duration {
        Duration::from_millis(self.max_charge_ms)
    }

    pub fn dash_duration(&self) -> Duration {
        Duration::from_millis(self.dash_duration_ms)
    }

    /// Auto-run length for a charge fraction, linear between the min and max
    pub fn auto_run_duration(&self, fraction: f32) -> Duration {
        let min = Duration::from_millis(self.auto_run_min_ms);
        let max = Duration::from_millis(self.auto_run_max_ms);
        min + max.saturating_sub(min).mul_f32(fraction.clamp(0.0, 1.0))
    }
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            tap_threshold_ms: 200,
            max_charge_ms: 1000,
            dash_speed: 600.0,
            dash_duration_ms: 200,
            dash_alpha: 0.6,
            min_charge_fraction: 0.3,
            auto_run_min_ms: 2000,
            auto_run_max_ms: 5000,
            auto_run_speed: 320.0,
            charge_bar_color: 0x4fc3f7,
        }
    }
}

/// Reference player body settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal walking velocity in units per second
    pub walk_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { walk_speed: 200.0 }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub dash: DashConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. config/{profile}.toml (next to the executable, else ./config)
    /// 2. Environment variables with prefix APP_ (e.g., APP_DASH__DASH_SPEED=800)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_with_dir(Self::find_config_dir().as_deref(), profile)
    }

    /// Loads a profile from an explicit config directory
    pub fn load_from_dir(dir: &Path, profile: &str) -> Result<Self, ConfigError> {
        Self::load_with_dir(Some(dir), profile)
    }

    fn load_with_dir(dir: Option<&Path>, profile: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = match dir {
            Some(dir) => {
                let profile_path = dir.join(profile);
                builder.add_source(File::from(profile_path.as_path()).required(false))
            }
            None => builder.add_source(File::with_name(&format!("config/{profile}")).required(false)),
        };

        // Use __ as separator for nested fields (e.g., APP_INPUT__STICK_DEADZONE)
        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .set_override("profile", profile)?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        cwd_config.exists().then_some(cwd_config)
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    /// Rejects values the input and dash systems cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let input = &self.input;
        if !(0.0..1.0).contains(&input.stick_deadzone) {
            return Err(ConfigError::invalid(
                "input.stick_deadzone",
                format!("{} is not in [0, 1)", input.stick_deadzone),
            ));
        }
        if !(input.axis_threshold > 0.0 && input.axis_threshold <= 1.0) {
            return Err(ConfigError::invalid(
                "input.axis_threshold",
                format!("{} is not in (0, 1]", input.axis_threshold),
            ));
        }
        if input.gamepad_poll_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "input.gamepad_poll_interval_ms",
                "must be at least 1",
            ));
        }

        let dash = &self.dash;
        if dash.max_charge_ms == 0 {
            return Err(ConfigError::invalid("dash.max_charge_ms", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&dash.min_charge_fraction) {
            return Err(ConfigError::invalid(
                "dash.min_charge_fraction",
                format!("{} is not in [0, 1]", dash.min_charge_fraction),
            ));
        }
        if dash.auto_run_min_ms > dash.auto_run_max_ms {
            return Err(ConfigError::invalid(
                "dash.auto_run_min_ms",
                format!(
                    "{} exceeds auto_run_max_ms ({})",
                    dash.auto_run_min_ms, dash.auto_run_max_ms
                ),
            ));
        }
        if !(0.0..=1.0).contains(&dash.dash_alpha) {
            return Err(ConfigError::invalid(
                "dash.dash_alpha",
                format!("{} is not in [0, 1]", dash.dash_alpha),
            ));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load("release").unwrap_or_else(|_| Self {
            profile: "release".to_string(),
            window: WindowConfig::default(),
            input: InputConfig::default(),
            dash: DashConfig::default(),
            player: PlayerConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    #[test]
    fn test_missing_profile_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_dir(dir.path(), "nonexistent").unwrap();

        assert_eq!(config.profile, "nonexistent");
        assert_eq!(config.input.stick_deadzone, 0.15);
        assert_eq!(config.dash.tap_threshold(), Duration::from_millis(200));
        assert_eq!(config.input.context, "world");
    }

    #[test]
    fn test_profile_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("fast.toml"),
            "[dash]\ndash_speed = 900.0\n\n[input]\ncontext = \"battle\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from_dir(dir.path(), "fast").unwrap();
        assert_eq!(config.dash.dash_speed, 900.0);
        assert_eq!(config.input.context, "battle");
        // Untouched fields keep their defaults
        assert_eq!(config.dash.max_charge_ms, 1000);
    }

    #[test]
    fn test_out_of_range_value_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.toml"), "[input]\nstick_deadzone = 1.5\n").unwrap();

        let err = AppConfig::load_from_dir(dir.path(), "bad").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "input.stick_deadzone",
                ..
            }
        ));
    }

    #[test]
    fn test_auto_run_duration_scales_linearly() {
        let dash = DashConfig::default();
        assert_eq!(dash.auto_run_duration(0.0), Duration::from_millis(2000));
        assert_eq!(dash.auto_run_duration(0.5), Duration::from_millis(3500));
        assert_eq!(dash.auto_run_duration(1.0), Duration::from_millis(5000));
        assert_eq!(dash.auto_run_duration(3.0), Duration::from_millis(5000));
    }

    #[test]
    fn test_inverted_auto_run_bounds_fail_validation() {
        let mut config = AppConfig {
            profile: "test".to_string(),
            window: WindowConfig::default(),
            input: InputConfig::default(),
            dash: DashConfig::default(),
            player: PlayerConfig::default(),
        };
        assert!(config.validate().is_ok());

        config.dash.auto_run_min_ms = 6000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_auto_run_bounds_use_minimum() {
        let dash = DashConfig {
            auto_run_min_ms: 6000,
            ..DashConfig::default()
        };
        assert_eq!(dash.auto_run_duration(0.8), Duration::from_millis(6000));
    }
}
