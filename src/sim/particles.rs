//! Ball trail particles
//!
//! A fixed pool that is never resized; dead slots (`life <= 0`) are reused.
//! Purely cosmetic: particles never interact with the simulation.

use glam::{Vec2, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::Entity;
use crate::consts::PARTICLE_FADE_RATE;

/// Spawn jitter is drawn from `[-SPAN/2, SPAN/2)` and divided by the scale
const JITTER_SPAN: u32 = 100;
const JITTER_SCALE: f32 = 10.0;
/// Darkest shade of a spawned particle
const SHADE_BASE: f32 = 0.5;
/// Share of the source velocity a particle inherits
const TRAIL_VELOCITY_FACTOR: f32 = 0.1;

/// A single trail particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// RGBA, alpha fades as the particle ages
    pub color: Vec4,
    /// Seconds left; `<= 0` means the slot is free
    pub life: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: Vec4::ONE,
            life: 0.0,
        }
    }
}

impl Particle {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Fixed-capacity particle pool trailing a source entity
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    last_used: usize,
    rng: Pcg32,
}

impl ParticlePool {
    pub fn new(capacity: usize, seed: u64) -> Self {
        Self {
            particles: vec![Particle::default(); capacity],
            last_used: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn alive(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_alive())
    }

    /// Kill every particle
    pub fn clear(&mut self) {
        for p in &mut self.particles {
            p.life = 0.0;
        }
        self.last_used = 0;
    }

    /// Spawn `new_particles` at `source` and age the whole pool by `dt`
    ///
    /// `offset` is added to the source's top-left corner so the trail can be
    /// centered on the visible sprite.
    pub fn update(&mut self, dt: f32, source: &Entity, new_particles: usize, offset: Vec2) {
        if self.particles.is_empty() {
            return;
        }

        for _ in 0..new_particles {
            let slot = self.first_unused();
            self.respawn(slot, source, offset);
        }

        for p in &mut self.particles {
            if !p.is_alive() {
                continue;
            }
            p.life -= dt;
            if p.is_alive() {
                p.pos -= p.vel * dt;
                p.color.w = (p.color.w - dt * PARTICLE_FADE_RATE).max(0.0);
            }
        }
    }

    /// Index of a free slot, or the lowest-life slot if none are free
    ///
    /// Searches forward from the last used slot first, which almost always
    /// finds one immediately.
    fn first_unused(&mut self) -> usize {
        if let Some(i) = (self.last_used..self.particles.len()).find(|&i| !self.particles[i].is_alive()) {
            self.last_used = i;
            return i;
        }

        let mut oldest = 0;
        for i in 0..self.last_used {
            if !self.particles[i].is_alive() {
                self.last_used = i;
                return i;
            }
            if self.particles[i].life < self.particles[oldest].life {
                oldest = i;
            }
        }

        self.last_used = oldest;
        oldest
    }

    fn respawn(&mut self, slot: usize, source: &Entity, offset: Vec2) {
        let jitter = (self.rng.random_range(0..JITTER_SPAN) as f32 - (JITTER_SPAN / 2) as f32) / JITTER_SCALE;
        let shade = SHADE_BASE + self.rng.random_range(0..100u32) as f32 / 100.0;

        let p = &mut self.particles[slot];
        p.pos = source.pos + Vec2::splat(jitter) + offset;
        p.vel = source.vel * TRAIL_VELOCITY_FACTOR;
        p.color = Vec4::new(shade, shade, shade, 1.0);
        p.life = 1.0;
    }
}
