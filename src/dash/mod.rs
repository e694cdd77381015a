//! Dash and charged auto-run
//!
//! A quick tap of the dash input produces a short fixed-speed dash; holding
//! it charges an auto-run whose length scales with the charge. Timing runs on
//! the host's frame clock and the delayed end-of-window transitions go
//! through a cancellable [`Scheduler`].

mod collaborators;
mod controller;
mod scheduler;

pub use collaborators::{ChargeBar, MovementBody, TracingChargeBar};
pub use controller::{CHARGE_BAR_ID, DashController, DashPhase, DashState};
pub use scheduler::{Scheduler, TaskToken};
