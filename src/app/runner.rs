//! Main application handler for the game

use std::time::Instant;

use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use super::window::window_attributes_from_config;
use crate::config::AppConfig;
use crate::dash::{DashController, TracingChargeBar};
use crate::input::InputManager;
use crate::sim::{Player, World};

/// Per-frame input and dash driver
///
/// Runs the frame contract: gamepad refresh, dash press/release delivery,
/// dash update, movement, then end-of-frame input bookkeeping.
pub struct Game {
    world: World,
    input: InputManager,
    dash: DashController<Player, TracingChargeBar>,
    walk_speed: f32,
}

impl Game {
    pub fn new(config: &AppConfig, mut input: InputManager) -> Self {
        input.init(&config.input.context);

        Self {
            world: World::new(),
            input,
            dash: DashController::new(
                config.dash.clone(),
                Player::default(),
                TracingChargeBar::new(),
            ),
            walk_speed: config.player.walk_speed,
        }
    }

    /// Runs one frame of `delta` host time
    pub fn frame(&mut self, delta: std::time::Duration) {
        let dt = self.world.tick(delta);
        let now = self.world.now();

        self.input.update(now);

        if self.input.is_key_just_down("dash") {
            self.dash.on_shift_down(now);
        }
        if self.input.is_key_just_up("dash") {
            self.dash.on_shift_up(now);
        }
        self.dash.update(now);

        if self.dash.can_move() {
            let movement = self.input.get_movement_input();
            let player = self.dash.body_mut();
            player.velocity.x = movement.x * self.walk_speed;
        }
        self.dash.body_mut().step(dt);

        self.input.end_frame();
    }

    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    pub fn dash(&self) -> &DashController<Player, TracingChargeBar> {
        &self.dash
    }

    pub fn player(&self) -> &Player {
        self.dash.body()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Cancels pending dash transitions and releases input resources
    pub fn shutdown(&mut self) {
        self.dash.destroy();
        self.input.destroy();
    }
}

/// Main game application
pub struct App {
    config: AppConfig,
    window: Option<Window>,
    game: Game,
    last_update: Option<Instant>,
}

impl App {
    /// Creates a new game application with the provided configuration
    pub fn new(config: AppConfig) -> Self {
        info!(profile = %config.profile, "Starting game");
        info!(?config.window, "Window configuration");

        let input = InputManager::with_platform_gamepads(config.input.clone());
        let game = Game::new(&config, input);

        Self {
            config,
            window: None,
            game,
            last_update: None,
        }
    }

    /// Creates a new game application with configuration loaded from environment
    pub fn from_env() -> Self {
        let config = AppConfig::load_from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using default configuration");
            AppConfig::default()
        });
        Self::new(config)
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let delta = self
            .last_update
            .map(|last| now.duration_since(last))
            .unwrap_or_default();
        self.last_update = Some(now);

        self.game.frame(delta);

        let player = self.game.player();
        debug!(
            x = player.position.x,
            vx = player.velocity.x,
            phase = ?self.game.dash().phase(),
            "Frame"
        );
    }
}

impl Default for App {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = window_attributes_from_config(&self.config.window);
        match event_loop.create_window(attributes) {
            Ok(window) => {
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(error = %e, "Failed to create window");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.game.input_mut().handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                self.game.shutdown();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.tick();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, VirtualGamepads};
    use std::time::Duration;

    fn game() -> Game {
        let config = AppConfig {
            profile: "test".to_string(),
            window: Default::default(),
            input: Default::default(),
            dash: Default::default(),
            player: Default::default(),
        };
        let input = InputManager::new(config.input.clone(), Box::new(VirtualGamepads::new()));
        Game::new(&config, input)
    }

    #[test]
    fn test_walking_moves_player() {
        let mut game = game();
        game.input_mut().handle_key(KeyCode::D, true);
        game.frame(Duration::from_millis(100));

        assert_eq!(game.player().velocity.x, 200.0);
        assert!(game.player().position.x > 0.0);
    }

    #[test]
    fn test_shift_tap_dashes_and_blocks_walking() {
        let mut game = game();
        game.input_mut().handle_key(KeyCode::Shift, true);
        game.frame(Duration::from_millis(16));
        game.input_mut().handle_key(KeyCode::Shift, false);
        game.input_mut().handle_key(KeyCode::A, true);
        game.frame(Duration::from_millis(16));

        assert!(game.dash().state().is_dashing);
        // Dash keeps its own direction while walking input is suppressed
        assert_eq!(game.player().velocity.x, 600.0);
    }

    #[test]
    fn test_shift_tap_within_one_frame_dashes() {
        let mut game = game();
        game.input_mut().handle_key(KeyCode::Shift, true);
        game.input_mut().handle_key(KeyCode::Shift, false);
        game.frame(Duration::from_millis(50));

        assert!(game.dash().state().is_dashing);
        assert_eq!(game.player().velocity.x, 600.0);

        // Both edges are gone next frame
        game.frame(Duration::from_millis(16));
        assert!(!game.input_mut().is_key_just_down("dash"));
        assert!(!game.input_mut().is_key_just_up("dash"));
    }
}
