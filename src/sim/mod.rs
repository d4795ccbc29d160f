//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and windowing (level files are the only I/O):
//! - Time only advances through the `dt` handed to `Game::update`
//! - Seeded RNG only (particles)
//! - Stable iteration order (bricks keep their load order)

pub mod collision;
pub mod game;
pub mod level;
pub mod particles;
pub mod state;

pub use collision::{
    CollisionResult, Direction, PaddleInfluence, check_aabb, check_ball_box,
    resolve_brick_collision, resolve_paddle_collision, vector_direction,
};
pub use game::Game;
pub use level::{Level, LevelGrid, parse_grid, read_grid_file, read_level_dir};
pub use particles::{Particle, ParticlePool};
pub use state::{Ball, Entity, GameMode, LevelTimer};
