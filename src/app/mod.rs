//! Game application module
//!
//! Desktop host: windowing, keyboard events, and the per-frame drive of the
//! input and dash systems.

mod runner;
mod window;

pub use runner::{App, Game};
pub use window::window_attributes_from_config;
