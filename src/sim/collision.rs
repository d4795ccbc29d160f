//! Collision detection and response for the ball, bricks and paddle
//!
//! Everything is axis-aligned: boxes are [`Entity`] rectangles and the ball
//! is a circle. Detection is pure; resolution mutates only the ball.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, Entity};

/// Compass side of a collision, as seen from the closest point on the box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Scan order used for tie-breaking
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Result of a ball-vs-box check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Side classification (only meaningful when `hit`)
    pub direction: Direction,
    /// Closest point on the box minus the ball center
    pub difference: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            direction: Direction::Up,
            difference: Vec2::ZERO,
        }
    }
}

/// How the paddle's own velocity feeds into a rebound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaddleInfluence {
    /// Always add the paddle velocity share
    Always,
    /// Only add it when the paddle moves toward the side of the paddle that was hit
    #[default]
    SignAgreement,
}

/// Box-vs-box overlap on closed intervals (touching edges count)
pub fn check_aabb(a: &Entity, b: &Entity) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    let overlap_x = a_max.x >= b.pos.x && b_max.x >= a.pos.x;
    let overlap_y = a_max.y >= b.pos.y && b_max.y >= a.pos.y;
    overlap_x && overlap_y
}

/// Circle-vs-box test
///
/// A ball exactly tangent to the box (distance == radius) does not collide,
/// so a ball left tangent by the previous resolution is not re-triggered.
pub fn check_ball_box(ball: &Ball, target: &Entity) -> CollisionResult {
    let center = ball.center();
    let half_extents = target.half_extents();
    let box_center = target.pos + half_extents;

    let clamped = (center - box_center).clamp(-half_extents, half_extents);
    let closest = box_center + clamped;
    let difference = closest - center;

    if difference.length() < ball.radius() {
        CollisionResult {
            hit: true,
            direction: vector_direction(difference),
            difference,
        }
    } else {
        CollisionResult::miss()
    }
}

/// Compass direction with the largest dot product against `target`
///
/// Ties keep the earlier direction in [`Direction::ALL`]; a zero vector maps
/// to `Up`.
pub fn vector_direction(target: Vec2) -> Direction {
    let target = target.normalize_or_zero();
    let mut best = Direction::Up;
    let mut max = f32::NEG_INFINITY;
    for dir in Direction::ALL {
        let dot = target.dot(dir.unit());
        if dot > max {
            max = dot;
            best = dir;
        }
    }
    best
}

/// Reflect and push the ball out of a brick along the hit axis
pub fn resolve_brick_collision(ball: &mut Ball, direction: Direction, difference: Vec2) {
    let radius = ball.radius();
    let body = &mut ball.body;

    if direction.is_horizontal() {
        body.vel.x = -body.vel.x;
        let penetration = radius - difference.x.abs();
        body.pos.x += if direction == Direction::Left {
            penetration
        } else {
            -penetration
        };
    } else {
        body.vel.y = -body.vel.y;
        let penetration = radius - difference.y.abs();
        body.pos.y += if direction == Direction::Up {
            -penetration
        } else {
            penetration
        };
    }
}

/// Redirect the ball off the paddle
///
/// The hit offset from the paddle center steers the horizontal component,
/// a share of paddle velocity adds "english", the speed is preserved and the
/// ball always leaves upward.
pub fn resolve_paddle_collision(
    ball: &mut Ball,
    paddle: &Entity,
    strength: f32,
    influence: f32,
    policy: PaddleInfluence,
) {
    let half_width = paddle.size.x / 2.0;
    let distance = ball.center().x - paddle.center().x;
    let percentage = if half_width > 0.0 { distance / half_width } else { 0.0 };

    let paddle_vx = paddle.vel.x;
    let applies = match policy {
        PaddleInfluence::Always => true,
        PaddleInfluence::SignAgreement => {
            (percentage >= 0.0 && paddle_vx >= 0.0) || (percentage < 0.0 && paddle_vx < 0.0)
        }
    };
    let english = if applies { paddle_vx * influence } else { 0.0 };

    let speed = ball.speed();
    let mut vel = ball.body.vel;
    vel.x = speed * percentage * strength + english;
    vel = vel.normalize_or_zero() * speed;
    vel.y = -vel.y.abs();
    ball.body.vel = vel;
}
