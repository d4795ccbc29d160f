//! Game state and core simulation types
//!
//! Paddle and bricks are plain [`Entity`] rectangles; the ball embeds one and
//! adds its circular collision radius and the stuck-to-paddle flag.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Current mode of the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Level selection screen
    #[default]
    Menu,
    /// Active gameplay
    Active,
    /// Level cleared without beating the leaderboard
    Win,
    /// Ran out of lives
    Over,
    /// Level cleared with a leaderboard time, capturing the player's name
    HighScore,
    /// Leaderboard for the selected level
    HighScoreDisplay,
}

/// An axis-aligned movable rectangle (paddle, brick, ball body)
///
/// `pos` is the top-left corner. A destroyed entity stays in its container so
/// indices remain stable, but it no longer collides or renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: Vec2,
    pub size: Vec2,
    /// Units per second
    pub vel: Vec2,
    pub color: Vec3,
    /// Radians, for the renderer only
    pub rotation: f32,
    /// Cannot be destroyed, does not count toward level completion
    pub solid: bool,
    pub destroyed: bool,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::ONE,
            vel: Vec2::ZERO,
            color: Vec3::ONE,
            rotation: 0.0,
            solid: false,
            destroyed: false,
        }
    }
}

impl Entity {
    /// Create an entity; negative size components are clamped to zero
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size: size.max(Vec2::ZERO),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn solid(mut self) -> Self {
        self.solid = true;
        self
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.half_extents()
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }
}

/// The ball: an entity body plus a collision radius
///
/// Invariant: `body.size == (2r, 2r)` and the radius never changes after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub body: Entity,
    radius: f32,
    /// Attached to the paddle; velocity is ignored until released
    pub stuck: bool,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, vel: Vec2) -> Self {
        let radius = radius.max(0.0);
        Self {
            body: Entity::new(pos, Vec2::splat(radius * 2.0)).with_velocity(vel),
            radius,
            stuck: true,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.body.pos + Vec2::splat(self.radius)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.body.vel.length()
    }

    /// Integrate position and bounce off the side and top walls
    ///
    /// The bottom is open: falling past it is the loss condition and is
    /// checked by the game, not here.
    pub fn step(&mut self, dt: f32, field_width: f32) -> Vec2 {
        if self.stuck {
            return self.body.pos;
        }

        let body = &mut self.body;
        body.pos += body.vel * dt;

        if body.pos.x <= 0.0 {
            body.vel.x = -body.vel.x;
            body.pos.x = 0.0;
        } else if body.pos.x + body.size.x >= field_width {
            body.vel.x = -body.vel.x;
            body.pos.x = field_width - body.size.x;
        }

        if body.pos.y <= 0.0 {
            body.vel.y = -body.vel.y;
            body.pos.y = 0.0;
        }

        body.pos
    }

    /// Put the ball back on the paddle with a fresh velocity
    pub fn reset(&mut self, pos: Vec2, vel: Vec2) {
        self.body.pos = pos;
        self.body.vel = vel;
        self.stuck = true;
    }

    /// Release from the paddle, taking `influence` of the paddle's horizontal
    /// velocity while keeping the current speed
    pub fn release(&mut self, paddle_vel_x: f32, influence: f32) {
        if !self.stuck {
            return;
        }
        let speed = self.speed();
        let mut vel = self.body.vel;
        vel.x = paddle_vel_x * influence;
        self.body.vel = vel.normalize_or_zero() * speed;
        self.stuck = false;
    }
}

/// Level completion stopwatch, driven by simulated frame time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelTimer {
    elapsed: f32,
    running: bool,
}

impl LevelTimer {
    /// Restart from zero
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Stopped at zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Stop and return the recorded time
    pub fn stop(&mut self) -> f32 {
        self.running = false;
        self.elapsed
    }

    pub fn tick(&mut self, dt: f32) {
        if self.running {
            self.elapsed += dt;
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
