//! Game tuning and preferences
//!
//! Loaded from a JSON file; any missing field falls back to the constants in
//! [`crate::consts`].

use std::path::Path;

use anyhow::Context;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::PaddleInfluence;

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Fraction of the field height (from the top) that bricks occupy
    pub brick_area_fraction: f32,

    // === Paddle ===
    pub paddle_size: Vec2,
    pub paddle_speed: f32,
    pub paddle_strength: f32,
    pub paddle_influence: f32,
    pub influence_policy: PaddleInfluence,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_velocity: Vec2,
    pub launch_influence: f32,

    // === Session ===
    pub starting_lives: u32,
    pub max_name_len: usize,

    // === Particles ===
    pub max_particles: usize,
    pub particle_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            brick_area_fraction: BRICK_AREA_FRACTION,

            paddle_size: PADDLE_SIZE,
            paddle_speed: PADDLE_SPEED,
            paddle_strength: PADDLE_STRENGTH,
            paddle_influence: PADDLE_INFLUENCE,
            influence_policy: PaddleInfluence::SignAgreement,

            ball_radius: BALL_RADIUS,
            ball_velocity: INITIAL_BALL_VELOCITY,
            launch_influence: LAUNCH_INFLUENCE,

            starting_lives: STARTING_LIVES,
            max_name_len: MAX_NAME_LEN,

            max_particles: MAX_PARTICLES,
            particle_seed: 0,
        }
    }
}

impl Settings {
    /// Replace values the simulation cannot run with by their defaults
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.field_width) || !positive(self.field_height) {
            log::warn!("Invalid field size, using defaults");
            self.field_width = defaults.field_width;
            self.field_height = defaults.field_height;
        }
        if !(self.brick_area_fraction > 0.0 && self.brick_area_fraction <= 1.0) {
            self.brick_area_fraction = defaults.brick_area_fraction;
        }
        if !positive(self.paddle_size.x) || !positive(self.paddle_size.y) {
            self.paddle_size = defaults.paddle_size;
        }
        // The paddle must fit in the field
        self.paddle_size.x = self.paddle_size.x.min(self.field_width);
        if !positive(self.paddle_speed) {
            self.paddle_speed = defaults.paddle_speed;
        }
        if !self.paddle_strength.is_finite() {
            self.paddle_strength = defaults.paddle_strength;
        }
        if !self.paddle_influence.is_finite() {
            self.paddle_influence = defaults.paddle_influence;
        }
        if !positive(self.ball_radius) {
            self.ball_radius = defaults.ball_radius;
        }
        if !self.ball_velocity.is_finite() || self.ball_velocity.y >= 0.0 {
            self.ball_velocity = defaults.ball_velocity;
        }
        if !self.launch_influence.is_finite() {
            self.launch_influence = defaults.launch_influence;
        }
        if self.starting_lives == 0 {
            self.starting_lives = defaults.starting_lives;
        }
        // A zero cap would make name entry impossible to confirm
        if self.max_name_len == 0 {
            self.max_name_len = defaults.max_name_len;
        }
        if self.max_particles == 0 {
            self.max_particles = defaults.max_particles;
        }
        self
    }

    /// Height of the area the level grid is spread over
    pub fn brick_area_height(&self) -> f32 {
        self.field_height * self.brick_area_fraction
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.validated()
            }
            Err(e) => {
                log::warn!("Using default settings: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
