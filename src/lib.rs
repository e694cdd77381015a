//! Skydash
//!
//! Unified keyboard/gamepad/touch input and a tap-to-dash, hold-to-auto-run
//! movement controller for a 2D action game.

/// Desktop host - windowing and the per-frame drive loop
pub mod app;

/// Build-time information (git SHA, branch, timestamp, etc.)
pub mod build_info;

/// Profile-based configuration
pub mod config;

/// Dash / charged auto-run state machine
pub mod dash;

/// Health checks for startup validation
pub mod health;

/// Input normalization across keyboard, gamepad and touch
pub mod input;

/// Frame clock and reference player body
pub mod sim;
