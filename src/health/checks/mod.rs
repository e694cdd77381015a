//! Built-in health checks for core systems

pub mod bindings;
pub mod build_info;
pub mod config;
pub mod dash;
pub mod gamepad;

pub use bindings::BindingsCheck;
pub use build_info::BuildInfoCheck;
pub use config::ConfigCheck;
pub use dash::DashControllerCheck;
pub use gamepad::GamepadBackendCheck;
