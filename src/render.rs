//! Read-only frame snapshot for an external renderer
//!
//! The simulation never draws. Each frame the renderer captures a
//! [`FrameSnapshot`] and uploads its instances as-is.

use bytemuck::{Pod, Zeroable};

use crate::sim::{Game, GameMode};

/// What a sprite instance depicts (selects texture/shader on the GPU side)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SpriteKind {
    Brick = 0,
    SolidBrick = 1,
    Paddle = 2,
    Ball = 3,
    Particle = 4,
}

/// One textured quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
    /// Radians
    pub rotation: f32,
    pub kind: u32,
}

impl SpriteInstance {
    pub fn kind(&self) -> Option<SpriteKind> {
        match self.kind {
            0 => Some(SpriteKind::Brick),
            1 => Some(SpriteKind::SolidBrick),
            2 => Some(SpriteKind::Paddle),
            3 => Some(SpriteKind::Ball),
            4 => Some(SpriteKind::Particle),
            _ => None,
        }
    }
}

/// Particle quads are drawn at this size
pub const PARTICLE_SIZE: f32 = 10.0;

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub mode: GameMode,
    pub level: usize,
    pub lives: u32,
    /// Running clock while playing, last completion time otherwise
    pub time: f32,
    /// Draw order: bricks, paddle, particles, ball
    pub sprites: Vec<SpriteInstance>,
}

impl FrameSnapshot {
    pub fn capture(game: &Game) -> Self {
        let time = if game.mode == GameMode::Active {
            game.elapsed_time()
        } else {
            game.completion_time()
        };

        Self {
            mode: game.mode,
            level: game.level_index(),
            lives: game.lives(),
            time,
            sprites: Self::sprites(game),
        }
    }

    /// Playfield sprites; text-only screens have none
    fn sprites(game: &Game) -> Vec<SpriteInstance> {
        if !matches!(game.mode, GameMode::Menu | GameMode::Active | GameMode::Win) {
            return Vec::new();
        }

        let mut sprites = Vec::new();

        for brick in game.current_level().bricks.iter().filter(|b| !b.destroyed) {
            let kind = if brick.solid {
                SpriteKind::SolidBrick
            } else {
                SpriteKind::Brick
            };
            sprites.push(SpriteInstance {
                position: brick.pos.to_array(),
                size: brick.size.to_array(),
                color: brick.color.extend(1.0).to_array(),
                rotation: brick.rotation,
                kind: kind as u32,
            });
        }

        let paddle = &game.paddle;
        sprites.push(SpriteInstance {
            position: paddle.pos.to_array(),
            size: paddle.size.to_array(),
            color: paddle.color.extend(1.0).to_array(),
            rotation: paddle.rotation,
            kind: SpriteKind::Paddle as u32,
        });

        // The trail only shows while something is moving
        if !game.ball.stuck || game.paddle.vel.x != 0.0 {
            for p in game.particles.alive() {
                sprites.push(SpriteInstance {
                    position: p.pos.to_array(),
                    size: [PARTICLE_SIZE; 2],
                    color: p.color.to_array(),
                    rotation: 0.0,
                    kind: SpriteKind::Particle as u32,
                });
            }
        }

        let ball = &game.ball.body;
        sprites.push(SpriteInstance {
            position: ball.pos.to_array(),
            size: ball.size.to_array(),
            color: ball.color.extend(1.0).to_array(),
            rotation: ball.rotation,
            kind: SpriteKind::Ball as u32,
        });

        sprites
    }

    /// Raw instance bytes for a GPU buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sprites)
    }
}
