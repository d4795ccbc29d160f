//! Brick Breaker - A ball-and-paddle arcade game core
//!
//! Core modules:
//! - `sim`: Simulation (entities, levels, collisions, particles, game state machine)
//! - `input`: Held/processed key masks for edge-triggered actions
//! - `highscores`: Per-level best-time leaderboards
//! - `render`: Read-only sprite snapshot for an external renderer
//! - `settings`: Data-driven game tuning

pub mod highscores;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use highscores::{HighScoreEntry, JsonScoreStore, MemoryScoreStore, ScoreStore};
pub use input::{Key, KeyState};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Bricks are laid out over this fraction of the field height (from the top)
    pub const BRICK_AREA_FRACTION: f32 = 0.5;

    /// Paddle defaults
    pub const PADDLE_SIZE: Vec2 = Vec2::new(100.0, 20.0);
    pub const PADDLE_SPEED: f32 = 500.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.5;
    pub const INITIAL_BALL_VELOCITY: Vec2 = Vec2::new(0.0, -500.0);

    /// How strongly the hit offset on the paddle steers the ball
    pub const PADDLE_STRENGTH: f32 = 0.5;
    /// Fraction of paddle velocity added to the ball on a paddle hit
    pub const PADDLE_INFLUENCE: f32 = 0.25;
    /// Fraction of paddle velocity imparted when the ball is released
    pub const LAUNCH_INFLUENCE: f32 = 0.9;

    pub const STARTING_LIVES: u32 = 3;

    /// Particle pool capacity
    pub const MAX_PARTICLES: usize = 750;
    /// Alpha lost per second by a live particle
    pub const PARTICLE_FADE_RATE: f32 = 3.0;

    /// Maximum characters in a high score name
    pub const MAX_NAME_LEN: usize = 10;

    /// Largest frame delta the simulation will integrate in one call
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Bundled level files (`assets/levels/1.lvl ..= 6.lvl`)
    pub const LEVEL_COUNT: usize = 6;
}
