//! Game state machine
//!
//! `Game` owns the paddle, ball, particles and levels. The frame loop calls
//! [`Game::process_input`] then [`Game::update`] once per frame, forwards typed
//! characters to [`Game::process_char`], and renders from the read-only state.
//!
//! ```text
//! Menu -> Active -> Win ------------------------------> Menu
//!                -> Over -----------------------------> Menu
//!                -> HighScore -> HighScoreDisplay ----> Menu
//! Menu -> HighScoreDisplay -> Menu
//! ```

use glam::Vec2;

use super::collision::{check_ball_box, resolve_brick_collision, resolve_paddle_collision};
use super::level::{Level, LevelGrid};
use super::particles::ParticlePool;
use super::state::{Ball, Entity, GameMode, LevelTimer};
use crate::consts::MAX_FRAME_DT;
use crate::highscores::{HighScoreEntry, ScoreStore};
use crate::input::{Key, KeyState};
use crate::settings::Settings;

/// Trail particles spawned per simulated frame
const PARTICLES_PER_FRAME: usize = 1;

pub struct Game {
    pub settings: Settings,
    pub mode: GameMode,
    /// Held/processed key masks; the platform layer writes the held state
    pub keys: KeyState,
    pub paddle: Entity,
    pub ball: Ball,
    pub particles: ParticlePool,
    /// Selected level index
    level: usize,
    lives: u32,
    levels: Vec<Level>,
    grids: Vec<LevelGrid>,
    timer: LevelTimer,
    completion_time: f32,
    player_name: String,
    scores: Box<dyn ScoreStore>,
}

impl Game {
    /// Create a session in the menu with every level loaded
    ///
    /// An empty `grids` list still yields one (empty) level so the level
    /// index is always valid.
    pub fn new(settings: Settings, grids: Vec<LevelGrid>, mut scores: Box<dyn ScoreStore>) -> Self {
        let settings = settings.validated();

        let grids = if grids.is_empty() {
            log::warn!("No levels supplied, using a single empty level");
            vec![LevelGrid::new()]
        } else {
            grids
        };

        let levels = grids
            .iter()
            .map(|g| Level::from_grid(g, settings.field_width, settings.brick_area_height()))
            .collect::<Vec<_>>();

        for level in 0..levels.len() {
            if !scores.create_table(level) {
                log::error!("Failed to create high score table for level {}", level + 1);
            }
        }

        let paddle = Entity::new(Self::paddle_start(&settings), settings.paddle_size);
        let ball = Ball::new(
            Self::ball_start(&paddle, settings.ball_radius),
            settings.ball_radius,
            settings.ball_velocity,
        );
        let particles = ParticlePool::new(settings.max_particles, settings.particle_seed);

        log::info!("Game ready: {} levels", levels.len());

        Self {
            mode: GameMode::Menu,
            keys: KeyState::new(),
            paddle,
            ball,
            particles,
            level: 0,
            lives: settings.starting_lives,
            levels,
            grids,
            timer: LevelTimer::default(),
            completion_time: 0.0,
            player_name: String::new(),
            scores,
            settings,
        }
    }

    /// Paddle centered horizontally, resting on the bottom edge
    fn paddle_start(settings: &Settings) -> Vec2 {
        Vec2::new(
            settings.field_width / 2.0 - settings.paddle_size.x / 2.0,
            settings.field_height - settings.paddle_size.y,
        )
    }

    /// Ball centered on top of the paddle
    fn ball_start(paddle: &Entity, radius: f32) -> Vec2 {
        paddle.pos + Vec2::new(paddle.size.x / 2.0 - radius, -radius * 2.0)
    }

    // === Accessors ===

    pub fn level_index(&self) -> usize {
        self.level
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn current_level(&self) -> &Level {
        &self.levels[self.level]
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Time recorded when the last level was cleared
    pub fn completion_time(&self) -> f32 {
        self.completion_time
    }

    /// Time on the running level clock
    pub fn elapsed_time(&self) -> f32 {
        self.timer.elapsed()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Leaderboard for the selected level
    pub fn high_scores(&self) -> Vec<HighScoreEntry> {
        self.scores.top_scores(self.level)
    }

    // === Input ===

    /// Handle held keys for the current mode
    ///
    /// Discrete actions consume their key press so a held key fires once.
    pub fn process_input(&mut self, dt: f32) {
        let dt = clamp_dt(dt);

        match self.mode {
            GameMode::Menu => self.menu_input(),
            GameMode::Active => self.active_input(dt),
            GameMode::Win | GameMode::Over => {
                if self.keys.take_press(Key::Confirm) {
                    self.reset_level();
                    self.set_mode(GameMode::Menu);
                }
            }
            GameMode::HighScore => {
                if self.keys.take_press(Key::Backspace) {
                    self.player_name.pop();
                }
                if self.keys.take_press(Key::Confirm) && !self.player_name.is_empty() {
                    self.submit_high_score();
                }
            }
            GameMode::HighScoreDisplay => {
                if self.keys.take_press(Key::Confirm) {
                    self.set_mode(GameMode::Menu);
                }
            }
        }
    }

    /// Typed character for name entry; ignored outside the high score prompt
    pub fn process_char(&mut self, c: char) {
        if self.mode != GameMode::HighScore {
            return;
        }
        if (c.is_ascii_alphanumeric() || c == ' ')
            && self.player_name.chars().count() < self.settings.max_name_len
        {
            self.player_name.push(c);
        }
    }

    fn menu_input(&mut self) {
        let count = self.levels.len();

        if self.keys.take_press(Key::Confirm) {
            self.start_attempt();
            return;
        }
        if self.keys.take_press(Key::ShowScores) {
            self.set_mode(GameMode::HighScoreDisplay);
            return;
        }
        if self.keys.take_press(Key::NextLevel) {
            self.level = (self.level + 1) % count;
            log::debug!("Selected level {}", self.level + 1);
        }
        if self.keys.take_press(Key::PrevLevel) {
            self.level = (self.level + count - 1) % count;
            log::debug!("Selected level {}", self.level + 1);
        }
    }

    fn active_input(&mut self, dt: f32) {
        let speed = self.settings.paddle_speed;
        let step = speed * dt;
        let max_x = (self.settings.field_width - self.paddle.size.x).max(0.0);

        let target_x = if self.keys.is_held(Key::Left) {
            self.paddle.vel.x = -speed;
            Some((self.paddle.pos.x - step).clamp(0.0, max_x))
        } else if self.keys.is_held(Key::Right) {
            self.paddle.vel.x = speed;
            Some((self.paddle.pos.x + step).clamp(0.0, max_x))
        } else {
            self.paddle.vel.x = 0.0;
            None
        };

        if let Some(x) = target_x {
            let moved = x - self.paddle.pos.x;
            self.paddle.pos.x = x;
            if self.ball.stuck {
                self.ball.body.pos.x += moved;
            }
        }

        if self.keys.is_held(Key::Launch) && self.ball.stuck {
            self.ball.release(self.paddle.vel.x, self.settings.launch_influence);
            if self.lives == self.settings.starting_lives {
                self.timer.start();
            }
            log::debug!("Ball released with velocity {:?}", self.ball.body.vel);
        }
    }

    // === Simulation ===

    /// Advance one frame: ball motion, collisions, particles, then loss/win
    ///
    /// Only the active mode simulates; other modes are static screens.
    pub fn update(&mut self, dt: f32) {
        if self.mode != GameMode::Active {
            return;
        }
        let dt = clamp_dt(dt);

        self.timer.tick(dt);
        self.ball.step(dt, self.settings.field_width);
        self.do_collisions();
        self.particles.update(
            dt,
            &self.ball.body,
            PARTICLES_PER_FRAME,
            Vec2::splat(self.ball.radius() / 2.0),
        );

        if self.ball.body.pos.y >= self.settings.field_height {
            self.lose_life();
        }

        if self.mode == GameMode::Active && self.current_level().is_completed() {
            self.level_cleared();
        }
    }

    /// Ball against every standing brick (in load order), then the paddle
    pub fn do_collisions(&mut self) {
        let ball = &mut self.ball;
        for brick in self.levels[self.level].bricks.iter_mut() {
            if brick.destroyed {
                continue;
            }
            let collision = check_ball_box(ball, brick);
            if collision.hit {
                if !brick.solid {
                    brick.destroyed = true;
                }
                resolve_brick_collision(ball, collision.direction, collision.difference);
            }
        }

        if !self.ball.stuck {
            let collision = check_ball_box(&self.ball, &self.paddle);
            if collision.hit {
                resolve_paddle_collision(
                    &mut self.ball,
                    &self.paddle,
                    self.settings.paddle_strength,
                    self.settings.paddle_influence,
                    self.settings.influence_policy,
                );
            }
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        log::info!("Ball lost, {} lives left", self.lives);

        if self.lives == 0 {
            self.timer.stop();
            self.lives = self.settings.starting_lives;
            self.set_mode(GameMode::Over);
        }
        self.reset_player();
    }

    fn level_cleared(&mut self) {
        let timed = self.timer.is_running();
        self.completion_time = self.timer.stop();
        log::info!("Level {} cleared in {:.2}s", self.level + 1, self.completion_time);

        self.lives = self.settings.starting_lives;
        self.reset_player();

        // A level cleared before the ball was ever released has no real time
        let next = if timed && self.scores.is_new_high_score(self.level, self.completion_time) {
            GameMode::HighScore
        } else {
            GameMode::Win
        };
        self.set_mode(next);
    }

    fn start_attempt(&mut self) {
        self.lives = self.settings.starting_lives;
        self.timer.reset();
        self.particles.clear();
        self.reset_player();
        log::info!("Starting level {}", self.level + 1);
        self.set_mode(GameMode::Active);
    }

    fn submit_high_score(&mut self) {
        if !self
            .scores
            .add_score(self.level, &self.player_name, self.completion_time)
        {
            log::warn!("High score for level {} was not saved", self.level + 1);
        }
        self.player_name.clear();
        self.reset_level();
        self.set_mode(GameMode::HighScoreDisplay);
    }

    fn set_mode(&mut self, mode: GameMode) {
        if self.mode != mode {
            log::info!("Mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    // === Resets ===

    /// Rebuild the selected level's bricks from its grid
    pub fn reset_level(&mut self) {
        let height = self.settings.brick_area_height();
        self.levels[self.level].load(&self.grids[self.level], self.settings.field_width, height);
    }

    /// Re-stick the ball to the paddle
    ///
    /// The paddle is only recentered at the start of a fresh attempt (full
    /// lives); after losing a single life it stays where it was.
    pub fn reset_player(&mut self) {
        self.paddle.size = self.settings.paddle_size;
        self.paddle.vel.x = 0.0;
        if self.lives == self.settings.starting_lives {
            self.paddle.pos = Self::paddle_start(&self.settings);
        }
        let start = Self::ball_start(&self.paddle, self.ball.radius());
        self.ball.reset(start, self.settings.ball_velocity);
    }
}

/// Clamp a frame delta to `[0, MAX_FRAME_DT]`; non-finite deltas become 0
fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryScoreStore;

    const DT: f32 = 1.0 / 60.0;

    fn game_with(grids: Vec<LevelGrid>, scores: MemoryScoreStore) -> Game {
        Game::new(Settings::default(), grids, Box::new(scores))
    }

    fn game() -> Game {
        // Two destructible bricks on top, one solid brick bottom-right
        game_with(vec![vec![vec![2, 2], vec![0, 1]]], MemoryScoreStore::new())
    }

    fn press(game: &mut Game, key: Key) {
        game.keys.key_down(key);
        game.process_input(DT);
        game.keys.key_up(key);
    }

    fn start(game: &mut Game) {
        press(game, Key::Confirm);
        assert_eq!(game.mode, GameMode::Active);
    }

    #[test]
    fn test_initial_layout() {
        let game = game();
        assert_eq!(game.mode, GameMode::Menu);
        assert_eq!(game.paddle.pos, Vec2::new(350.0, 580.0));
        assert_eq!(game.paddle.size, Vec2::new(100.0, 20.0));
        assert_eq!(game.ball.body.pos, Vec2::new(387.5, 555.0));
        assert!(game.ball.stuck);
        assert_eq!(game.current_level().bricks.len(), 3);
    }

    #[test]
    fn test_release_starts_timer() {
        let mut game = game();
        start(&mut game);
        assert!(!game.timer_running());

        game.keys.key_down(Key::Launch);
        game.process_input(DT);
        assert!(!game.ball.stuck);
        assert!(game.timer_running());
        assert!((game.ball.speed() - 500.0).abs() < 1e-3);

        game.update(DT);
        assert!(game.elapsed_time() > 0.0);
    }

    #[test]
    fn test_stuck_ball_follows_paddle() {
        let mut game = game();
        start(&mut game);
        game.keys.key_down(Key::Right);
        game.process_input(0.1);
        assert_eq!(game.paddle.pos.x, 400.0);
        assert_eq!(game.paddle.vel.x, 500.0);
        assert_eq!(game.ball.body.pos.x, 437.5);
    }

    #[test]
    fn test_paddle_clamped_to_field() {
        let mut game = game();
        start(&mut game);
        game.keys.key_down(Key::Left);
        for _ in 0..100 {
            game.process_input(DT);
        }
        assert_eq!(game.paddle.pos.x, 0.0);
        assert!((game.ball.body.pos.x - 37.5).abs() < 1e-3);

        game.keys.key_up(Key::Left);
        game.keys.key_down(Key::Right);
        for _ in 0..200 {
            game.process_input(DT);
        }
        assert_eq!(game.paddle.pos.x, 700.0);
        assert!((game.ball.body.pos.x - 737.5).abs() < 1e-3);
    }

    #[test]
    fn test_menu_level_cycling_wraps() {
        let grids = vec![vec![vec![2]], vec![vec![3]], vec![vec![4]]];
        let mut game = game_with(grids, MemoryScoreStore::new());

        press(&mut game, Key::PrevLevel);
        assert_eq!(game.level_index(), 2);
        press(&mut game, Key::NextLevel);
        assert_eq!(game.level_index(), 0);

        // Holding the key moves only once
        game.keys.key_down(Key::NextLevel);
        for _ in 0..10 {
            game.process_input(DT);
        }
        assert_eq!(game.level_index(), 1);
    }

    #[test]
    fn test_losing_a_life_keeps_paddle_position() {
        let mut game = game();
        start(&mut game);
        game.keys.key_down(Key::Left);
        game.process_input(0.1);
        game.keys.key_up(Key::Left);
        game.keys.key_down(Key::Launch);
        game.process_input(DT);
        game.keys.key_up(Key::Launch);
        let paddle_x = game.paddle.pos.x;

        game.ball.body.pos.y = 650.0;
        game.update(0.0);

        assert_eq!(game.lives(), 2);
        assert_eq!(game.mode, GameMode::Active);
        assert!(game.ball.stuck);
        assert_eq!(game.paddle.pos.x, paddle_x);
        assert_eq!(game.ball.body.pos, Vec2::new(paddle_x + 37.5, 555.0));
        assert_eq!(game.ball.body.vel, Vec2::new(0.0, -500.0));
    }

    #[test]
    fn test_game_over_resets_and_returns_to_menu() {
        let mut game = game();
        start(&mut game);
        game.keys.key_down(Key::Left);
        game.process_input(0.1);
        game.keys.key_up(Key::Left);

        for _ in 0..3 {
            game.ball.stuck = false;
            game.ball.body.pos.y = 650.0;
            game.update(DT);
        }

        assert_eq!(game.mode, GameMode::Over);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.paddle.pos.x, 350.0);

        press(&mut game, Key::Confirm);
        assert_eq!(game.mode, GameMode::Menu);
    }

    #[test]
    fn test_ball_breaks_brick_and_bounces() {
        let mut game = game();
        start(&mut game);
        // Brick 0 spans (0,0)-(400,150); put the ball just under it moving up
        game.ball.stuck = false;
        game.ball.body.pos = Vec2::new(100.0, 145.0);
        game.ball.body.vel = Vec2::new(0.0, -300.0);

        game.update(DT);

        assert!(game.current_level().bricks[0].destroyed);
        assert!(game.ball.body.vel.y > 0.0);
    }

    #[test]
    fn test_solid_brick_is_never_destroyed() {
        let mut game = game();
        start(&mut game);
        // Brick 2 (solid) spans (400,150)-(800,300)
        game.ball.stuck = false;
        game.ball.body.pos = Vec2::new(500.0, 295.0);
        game.ball.body.vel = Vec2::new(0.0, -300.0);

        game.update(DT);

        let solid = &game.current_level().bricks[2];
        assert!(solid.solid);
        assert!(!solid.destroyed);
        assert!(game.ball.body.vel.y > 0.0);
    }

    #[test]
    fn test_paddle_bounce_sends_ball_up() {
        let mut game = game();
        start(&mut game);
        game.ball.stuck = false;
        game.ball.body.pos = Vec2::new(420.0, 560.0);
        game.ball.body.vel = Vec2::new(0.0, 400.0);

        game.update(DT);

        assert!(game.ball.body.vel.y < 0.0);
        assert!(game.ball.body.vel.x > 0.0);
        assert!((game.ball.speed() - 400.0).abs() < 1e-2);
    }

    fn clear_level(game: &mut Game) {
        for brick in &mut game.levels[game.level].bricks {
            if !brick.solid {
                brick.destroyed = true;
            }
        }
    }

    #[test]
    fn test_win_with_high_score_flow() {
        let mut game = game();
        start(&mut game);
        press(&mut game, Key::Launch);
        game.update(DT);
        clear_level(&mut game);
        game.update(DT);

        assert_eq!(game.mode, GameMode::HighScore);
        assert!(game.completion_time() > 0.0);
        assert!(!game.timer_running());
        assert!(game.ball.stuck);

        // Empty names are not submitted
        press(&mut game, Key::Confirm);
        assert_eq!(game.mode, GameMode::HighScore);

        for c in "Ann!e".chars() {
            game.process_char(c);
        }
        assert_eq!(game.player_name(), "Anne");
        press(&mut game, Key::Backspace);
        assert_eq!(game.player_name(), "Ann");

        press(&mut game, Key::Confirm);
        assert_eq!(game.mode, GameMode::HighScoreDisplay);
        assert_eq!(game.player_name(), "");
        let scores = game.high_scores();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].name, "Ann");
        assert_eq!(scores[0].time, game.completion_time());
        // Bricks are back
        assert!(!game.current_level().is_completed());

        press(&mut game, Key::Confirm);
        assert_eq!(game.mode, GameMode::Menu);
    }

    #[test]
    fn test_win_without_high_score() {
        let mut scores = MemoryScoreStore::new();
        scores.create_table(0);
        for i in 0..10 {
            scores.add_score(0, "pro", 0.001 * (i + 1) as f32);
        }
        let mut game = game_with(vec![vec![vec![2]]], scores);
        start(&mut game);
        press(&mut game, Key::Launch);
        game.update(DT);
        clear_level(&mut game);
        game.update(DT);

        assert_eq!(game.mode, GameMode::Win);
        press(&mut game, Key::Confirm);
        assert_eq!(game.mode, GameMode::Menu);
        assert!(!game.current_level().is_completed());
    }

    #[test]
    fn test_name_length_cap() {
        let mut game = game();
        game.mode = GameMode::HighScore;
        for c in "abcdefghijklmnop".chars() {
            game.process_char(c);
        }
        assert_eq!(game.player_name(), "abcdefghij");

        game.mode = GameMode::Menu;
        game.process_char('z');
        assert_eq!(game.player_name(), "abcdefghij");
    }

    #[test]
    fn test_held_confirm_does_not_chain_transitions() {
        let mut game = game();
        game.mode = GameMode::Win;
        game.keys.key_down(Key::Confirm);
        for _ in 0..5 {
            game.process_input(DT);
        }
        assert_eq!(game.mode, GameMode::Menu);
    }

    #[test]
    fn test_menu_opens_high_scores() {
        let mut game = game();
        press(&mut game, Key::ShowScores);
        assert_eq!(game.mode, GameMode::HighScoreDisplay);
        press(&mut game, Key::Confirm);
        assert_eq!(game.mode, GameMode::Menu);
    }

    #[test]
    fn test_empty_level_list_is_safe() {
        let mut game = game_with(Vec::new(), MemoryScoreStore::new());
        assert_eq!(game.level_count(), 1);
        start(&mut game);
        game.update(DT);
        // Nothing to break and no time recorded
        assert_eq!(game.mode, GameMode::Win);
    }

    #[test]
    fn test_extreme_dt_stays_valid() {
        let mut game = game();
        start(&mut game);
        press(&mut game, Key::Launch);
        for dt in [1000.0, -5.0, f32::NAN, f32::INFINITY, DT] {
            game.keys.key_down(Key::Right);
            game.process_input(dt);
            game.update(dt);
            assert!(game.ball.body.pos.is_finite());
            assert!(game.paddle.pos.x >= 0.0 && game.paddle.pos.x <= 700.0);
        }
    }

    #[test]
    fn test_particle_pool_size_invariant() {
        let mut game = game();
        start(&mut game);
        press(&mut game, Key::Launch);
        let capacity = game.particles.capacity();
        for _ in 0..2000 {
            game.update(DT);
        }
        assert_eq!(game.particles.capacity(), capacity);
        assert_eq!(game.particles.particles().len(), capacity);
    }

    #[test]
    fn test_ball_breaks_two_bricks_in_one_frame() {
        let mut game = game();
        start(&mut game);
        // Straddling the seam between bricks 0 and 1, just under them
        game.ball.stuck = false;
        game.ball.body.pos = Vec2::new(387.5, 140.0);
        game.ball.body.vel = Vec2::new(0.0, -300.0);

        game.update(DT);

        let bricks = &game.current_level().bricks;
        assert!(bricks[0].destroyed);
        assert!(bricks[1].destroyed);
        assert!(!bricks[2].destroyed);
        // Only the solid brick is left, so the level counts as cleared
        assert_eq!(game.mode, GameMode::Win);
    }

    #[test]
    fn test_destroyed_brick_is_ignored() {
        let mut game = game();
        start(&mut game);
        game.levels[0].bricks[0].destroyed = true;
        game.ball.stuck = false;
        game.ball.body.pos = Vec2::new(100.0, 50.0);
        game.ball.body.vel = Vec2::new(0.0, -300.0);

        game.update(DT);

        assert_eq!(game.ball.body.vel, Vec2::new(0.0, -300.0));
        assert!(!game.current_level().bricks[1].destroyed);
    }

    #[test]
    fn test_paddle_stays_in_field_with_bad_speed() {
        let mut game = game();
        start(&mut game);
        game.settings.paddle_speed = -500.0;

        game.keys.key_down(Key::Left);
        for _ in 0..200 {
            game.process_input(DT);
        }
        game.keys.key_up(Key::Left);
        assert_eq!(game.paddle.pos.x, 700.0);

        game.keys.key_down(Key::Right);
        for _ in 0..200 {
            game.process_input(DT);
        }
        assert_eq!(game.paddle.pos.x, 0.0);
    }

    #[test]
    fn test_bad_tuning_is_repaired_on_new() {
        let settings = Settings {
            paddle_speed: -500.0,
            launch_influence: f32::NAN,
            max_name_len: 0,
            ..Default::default()
        };
        let mut game = Game::new(settings, vec![vec![vec![2]]], Box::new(MemoryScoreStore::new()));
        start(&mut game);

        game.keys.key_down(Key::Left);
        game.process_input(0.1);
        assert_eq!(game.paddle.pos.x, 300.0);

        game.keys.key_down(Key::Launch);
        game.process_input(DT);
        assert!(!game.ball.stuck);
        assert!((game.ball.speed() - 500.0).abs() < 1e-3);

        game.mode = GameMode::HighScore;
        for c in "Ada".chars() {
            game.process_char(c);
        }
        assert_eq!(game.player_name(), "Ada");
        press(&mut game, Key::Confirm);
        assert_eq!(game.mode, GameMode::HighScoreDisplay);
    }

    /// Store whose writes always fail
    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn create_table(&mut self, _level: usize) -> bool {
            false
        }

        fn add_score(&mut self, _level: usize, _name: &str, _time: f32) -> bool {
            false
        }

        fn top_scores(&self, _level: usize) -> Vec<HighScoreEntry> {
            Vec::new()
        }

        fn is_new_high_score(&self, _level: usize, time: f32) -> bool {
            time.is_finite()
        }
    }

    #[test]
    fn test_failed_score_write_still_returns_to_menu() {
        let mut game = Game::new(Settings::default(), vec![vec![vec![2]]], Box::new(BrokenStore));
        start(&mut game);
        press(&mut game, Key::Launch);
        game.update(DT);
        clear_level(&mut game);
        game.update(DT);
        assert_eq!(game.mode, GameMode::HighScore);

        game.process_char('x');
        press(&mut game, Key::Confirm);
        assert_eq!(game.mode, GameMode::HighScoreDisplay);
        assert!(game.high_scores().is_empty());
        assert!(!game.current_level().is_completed());

        press(&mut game, Key::Confirm);
        assert_eq!(game.mode, GameMode::Menu);
    }

    #[test]
    fn test_new_attempt_starts_with_fresh_clock_and_trail() {
        let mut game = game();
        start(&mut game);
        press(&mut game, Key::Launch);
        for _ in 0..10 {
            game.update(DT);
        }
        assert!(game.elapsed_time() > 0.0);
        assert!(game.particles.alive().count() > 0);

        // Lose every life, then start over from the menu
        for _ in 0..3 {
            game.ball.stuck = false;
            game.ball.body.pos.y = 650.0;
            game.update(DT);
        }
        assert_eq!(game.mode, GameMode::Over);
        press(&mut game, Key::Confirm);
        start(&mut game);

        assert_eq!(game.elapsed_time(), 0.0);
        assert!(!game.timer_running());
        assert_eq!(game.particles.alive().count(), 0);
    }
}
