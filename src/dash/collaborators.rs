//! Host-side collaborators the dash controller drives

use tracing::trace;

/// Physics body whose horizontal motion the controller takes over
pub trait MovementBody {
    fn velocity_x(&self) -> f32;

    fn set_velocity_x(&mut self, velocity: f32);

    /// True when the sprite is mirrored, i.e. facing left
    fn is_flipped_x(&self) -> bool;

    /// Visual feedback while dashing
    fn set_alpha(&mut self, alpha: f32);
}

/// On-screen charge meter
pub trait ChargeBar {
    fn create(&mut self, id: &str, color: u32);

    /// Fill fraction in [0, 1]; also makes the bar visible
    fn update(&mut self, fraction: f32);

    fn hide(&mut self);
}

/// Charge bar for hosts without a HUD; reports fills through tracing
#[derive(Debug, Default)]
pub struct TracingChargeBar {
    id: String,
    visible: bool,
    fraction: f32,
}

impl TracingChargeBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }
}

impl ChargeBar for TracingChargeBar {
    fn create(&mut self, id: &str, color: u32) {
        self.id = id.to_string();
        trace!(id, color, "Charge bar created");
    }

    fn update(&mut self, fraction: f32) {
        self.visible = true;
        self.fraction = fraction;
        trace!(id = %self.id, fraction, "Charge bar");
    }

    fn hide(&mut self) {
        if self.visible {
            trace!(id = %self.id, "Charge bar hidden");
        }
        self.visible = false;
        self.fraction = 0.0;
    }
}
