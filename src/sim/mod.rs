//! Game simulation module
//!
//! Owns the frame clock the input and dash systems measure time against,
//! plus a reference player body.

mod player;

pub use player::Player;

use std::time::Duration;

/// Game world clock
pub struct World {
    /// Total number of simulation ticks elapsed
    tick_count: u64,
    /// Scaled simulation time since start; the frame clock handed to systems
    sim_time: Duration,
    /// Time scale multiplier (1.0 = normal speed, 0.0 = paused, 2.0 = 2x speed)
    time_scale: f32,
    /// Whether the simulation is paused
    paused: bool,
}

impl World {
    /// Creates a new game world with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the time scale
    pub fn with_time_scale(mut self, scale: f32) -> Self {
        self.time_scale = scale.max(0.0);
        self
    }

    /// Advances the clock by one frame and returns the scaled delta
    pub fn tick(&mut self, delta_time: Duration) -> Duration {
        if self.paused {
            return Duration::ZERO;
        }

        let scaled = if self.time_scale == 1.0 {
            delta_time
        } else {
            delta_time.mul_f32(self.time_scale)
        };
        self.tick_count += 1;
        self.sim_time += scaled;
        scaled
    }

    /// Returns the current tick count
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Monotonic frame clock
    pub fn now(&self) -> Duration {
        self.sim_time
    }

    /// Sets the time scale multiplier
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Returns the current time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Pauses the simulation
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes the simulation
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggles pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Returns whether the simulation is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for World {
    fn default() -> Self {
        Self {
            tick_count: 0,
            sim_time: Duration::ZERO,
            time_scale: 1.0,
            paused: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances_with_scale() {
        let mut world = World::new().with_time_scale(2.0);
        let delta = world.tick(Duration::from_millis(16));

        assert!((delta.as_secs_f64() - 0.032).abs() < 1e-6);
        assert_eq!(world.now(), delta);
        assert_eq!(world.tick_count(), 1);
    }

    #[test]
    fn test_paused_clock_stands_still() {
        let mut world = World::new();
        world.tick(Duration::from_millis(10));
        world.pause();

        assert_eq!(world.tick(Duration::from_millis(10)), Duration::ZERO);
        assert_eq!(world.now(), Duration::from_millis(10));
        assert_eq!(world.tick_count(), 1);

        world.toggle_pause();
        assert!(!world.is_paused());
    }

    #[test]
    fn test_negative_scale_clamped() {
        let mut world = World::new();
        world.set_time_scale(-1.0);
        assert_eq!(world.time_scale(), 0.0);
    }
}
