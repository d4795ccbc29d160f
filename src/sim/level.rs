//! Brick layouts built from grids of tile codes
//!
//! Tile codes:
//! - `0`: empty
//! - `1`: solid (indestructible, ignored for completion)
//! - `2+`: destructible, tinted by code

use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::state::Entity;

/// Rows of tile codes, top row first
pub type LevelGrid = Vec<Vec<u32>>;

/// Tint for solid bricks
pub const SOLID_COLOR: Vec3 = Vec3::new(0.8, 0.8, 0.7);

/// Color for a destructible tile code; unknown codes are white
pub fn brick_color(code: u32) -> Vec3 {
    match code {
        2 => Vec3::new(0.2, 0.6, 1.0), // blue
        3 => Vec3::new(0.0, 0.7, 0.0), // green
        4 => Vec3::new(0.8, 0.8, 0.4), // brown
        5 => Vec3::new(1.0, 0.5, 0.0), // orange
        _ => Vec3::ONE,
    }
}

/// Parse whitespace-separated tile codes, one row per line
///
/// Blank lines are skipped. Returns `None` if any token is not a
/// non-negative integer.
pub fn parse_grid(source: &str) -> Option<LevelGrid> {
    source
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split_whitespace()
                .map(|token| token.parse::<u32>().ok())
                .collect::<Option<Vec<u32>>>()
        })
        .collect()
}

/// Read and parse a level file; missing or malformed files give an empty grid
pub fn read_grid_file(path: impl AsRef<Path>) -> LevelGrid {
    let path = path.as_ref();
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            log::warn!("Level file {} unreadable ({}), using empty level", path.display(), e);
            return LevelGrid::new();
        }
    };

    parse_grid(&source).unwrap_or_else(|| {
        log::warn!("Level file {} is malformed, using empty level", path.display());
        LevelGrid::new()
    })
}

/// Read `1.lvl ..= count.lvl` from a directory, in order
pub fn read_level_dir(dir: impl AsRef<Path>, count: usize) -> Vec<LevelGrid> {
    let dir = dir.as_ref();
    (1..=count)
        .map(|n| read_grid_file(dir.join(format!("{}.lvl", n))))
        .collect()
}

/// A fixed layout of bricks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    pub bricks: Vec<Entity>,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a level from `grid`, spread over a `width` x `height` area
    pub fn from_grid(grid: &[Vec<u32>], width: f32, height: f32) -> Self {
        let mut level = Self::new();
        level.load(grid, width, height);
        level
    }

    /// Clear all bricks and rebuild them from `grid`
    ///
    /// Tile size is the area divided by the grid dimensions, using the first
    /// row's length as the column count. Cells missing from shorter rows are
    /// empty; cells past the first row's length are ignored.
    pub fn load(&mut self, grid: &[Vec<u32>], width: f32, height: f32) {
        self.bricks.clear();

        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return;
        }

        let tile = Vec2::new(width / cols as f32, height / rows as f32);

        for (y, row) in grid.iter().enumerate() {
            for (x, &code) in row.iter().take(cols).enumerate() {
                let pos = Vec2::new(tile.x * x as f32, tile.y * y as f32);
                match code {
                    0 => {}
                    1 => self
                        .bricks
                        .push(Entity::new(pos, tile).with_color(SOLID_COLOR).solid()),
                    code => self
                        .bricks
                        .push(Entity::new(pos, tile).with_color(brick_color(code))),
                }
            }
        }

        log::debug!("Level loaded: {}x{} grid, {} bricks", cols, rows, self.bricks.len());
    }

    /// True when every destructible brick is destroyed
    pub fn is_completed(&self) -> bool {
        self.bricks.iter().all(|b| b.solid || b.destroyed)
    }

    /// Destructible bricks still standing
    pub fn remaining(&self) -> usize {
        self.bricks.iter().filter(|b| !b.solid && !b.destroyed).count()
    }
}
