//! Brick Breaker entry point
//!
//! Native headless driver: loads settings, levels and high scores, then runs
//! the frame loop with a simple autopilot standing in for the keyboard. A
//! windowed front end follows the same per-frame contract:
//! write held keys, `process_input`, `update`, then render a `FrameSnapshot`.

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;

use brick_breaker::consts::LEVEL_COUNT;
use brick_breaker::render::FrameSnapshot;
use brick_breaker::sim::{Game, GameMode, read_level_dir};
use brick_breaker::{JsonScoreStore, Key, MemoryScoreStore, ScoreStore, Settings};

#[derive(Parser)]
#[command(name = "brick-breaker")]
#[command(about = "Run a headless Brick Breaker session driven by an autopilot")]
struct Args {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Fixed frame delta in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Settings JSON (defaults are used when absent or unreadable)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// High score JSON file; scores stay in memory when omitted
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Directory holding 1.lvl ..= 6.lvl
    #[arg(long, default_value = "assets/levels")]
    levels: PathBuf,

    /// Level to select before starting (1-based)
    #[arg(long, default_value_t = 1)]
    level: usize,

    /// Name typed in when a run makes the leaderboard
    #[arg(long, default_value = "AUTO")]
    name: String,
}

/// Keyboard stand-in: taps through menus and tracks the ball with the paddle
struct Autopilot {
    name: String,
    /// Menu presses still needed to reach the requested level
    level_steps: usize,
    /// Alternates so tapped keys are released between presses
    tap: bool,
}

impl Autopilot {
    fn new(name: String, level_steps: usize) -> Self {
        Self {
            name,
            level_steps,
            tap: false,
        }
    }

    /// Set this frame's held keys (and typed characters) for the game
    fn drive(&mut self, game: &mut Game) {
        game.keys.release_all();
        self.tap = !self.tap;

        match game.mode {
            GameMode::Menu => {
                if !self.tap {
                    return;
                }
                if self.level_steps > 0 {
                    self.level_steps -= 1;
                    game.keys.key_down(Key::NextLevel);
                } else {
                    game.keys.key_down(Key::Confirm);
                }
            }
            GameMode::Active => self.steer(game),
            GameMode::HighScore => {
                if game.player_name().is_empty() {
                    for c in self.name.chars() {
                        game.process_char(c);
                    }
                }
                // Names made only of rejected characters would never confirm
                if game.player_name().is_empty() {
                    game.process_char('A');
                }
                if self.tap {
                    game.keys.key_down(Key::Confirm);
                }
            }
            GameMode::Win | GameMode::Over | GameMode::HighScoreDisplay => {
                if self.tap {
                    game.keys.key_down(Key::Confirm);
                }
            }
        }
    }

    fn steer(&self, game: &mut Game) {
        if game.ball.stuck {
            game.keys.key_down(Key::Launch);
            return;
        }

        let target = game.ball.center().x;
        let paddle = game.paddle.center().x;
        let dead_zone = game.paddle.size.x / 4.0;

        if target < paddle - dead_zone {
            game.keys.key_down(Key::Left);
        } else if target > paddle + dead_zone {
            game.keys.key_down(Key::Right);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Brick Breaker (headless) starting...");

    let args = Args::parse();
    if !(args.dt.is_finite() && args.dt > 0.0) {
        bail!("--dt must be a positive number of seconds, got {}", args.dt);
    }
    if args.level == 0 || args.level > LEVEL_COUNT {
        bail!("--level must be between 1 and {}, got {}", LEVEL_COUNT, args.level);
    }

    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let grids = read_level_dir(&args.levels, LEVEL_COUNT);
    let bricks: usize = grids.iter().flatten().flatten().filter(|&&c| c != 0).count();
    log::info!("Loaded {} levels ({} bricks) from {}", grids.len(), bricks, args.levels.display());

    let scores: Box<dyn ScoreStore> = match &args.scores {
        Some(path) => {
            let store = JsonScoreStore::open(path);
            log::info!("High scores stored in {}", store.path().display());
            Box::new(store)
        }
        None => Box::new(MemoryScoreStore::new()),
    };

    let mut game = Game::new(settings, grids, scores);
    let mut pilot = Autopilot::new(args.name.clone(), args.level - 1);

    let mut mode = game.mode;
    let mut attempts = 0u32;
    let mut clears = 0u32;
    let mut peak_sprites = 0usize;

    for _ in 0..args.frames {
        pilot.drive(&mut game);
        game.process_input(args.dt);
        game.update(args.dt);

        let snapshot = FrameSnapshot::capture(&game);
        peak_sprites = peak_sprites.max(snapshot.sprites.len());

        if snapshot.mode != mode {
            match snapshot.mode {
                GameMode::Active => attempts += 1,
                GameMode::Win | GameMode::HighScore => clears += 1,
                _ => {}
            }
            mode = snapshot.mode;
        }
    }

    println!();
    println!("=== SESSION ===");
    println!("  Frames:       {}", args.frames);
    println!("  Level:        {}", game.level_index() + 1);
    println!("  Attempts:     {}", attempts);
    println!("  Clears:       {}", clears);
    println!("  Final mode:   {:?}", game.mode);
    println!("  Bricks left:  {}", game.current_level().remaining());
    println!("  Peak sprites: {}", peak_sprites);

    let table = game.high_scores();
    if !table.is_empty() {
        println!();
        println!("=== HIGH SCORES (level {}) ===", game.level_index() + 1);
        for (rank, entry) in table.iter().enumerate() {
            println!("  {:>2}. {:<10} {}", rank + 1, entry.name, entry.formatted_time());
        }
    }

    Ok(())
}
