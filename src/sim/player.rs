//! Reference player body

use std::time::Duration;

use glam::Vec2;

use crate::dash::MovementBody;

/// Kinematic player: position, velocity, facing and sprite alpha
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Mirrored sprite, facing left
    pub flip_x: bool,
    pub alpha: f32,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            flip_x: false,
            alpha: 1.0,
        }
    }

    /// Integrates velocity and keeps the facing in sync with horizontal motion
    pub fn step(&mut self, dt: Duration) {
        self.position += self.velocity * dt.as_secs_f32();
        if self.velocity.x < 0.0 {
            self.flip_x = true;
        } else if self.velocity.x > 0.0 {
            self.flip_x = false;
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl MovementBody for Player {
    fn velocity_x(&self) -> f32 {
        self.velocity.x
    }

    fn set_velocity_x(&mut self, velocity: f32) {
        self.velocity.x = velocity;
    }

    fn is_flipped_x(&self) -> bool {
        self.flip_x
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }
}
