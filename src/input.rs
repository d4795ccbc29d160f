//! Key state with held and processed masks
//!
//! - **Held:** written only by the platform layer (`key_down` / `key_up`).
//!   Continuous actions such as paddle movement read it every frame.
//!
//! - **Processed:** set by the game when a discrete action (menu navigation,
//!   confirm, backspace) consumes a press, and cleared only when the key is
//!   released. A held key therefore triggers its action exactly once.

use serde::{Deserialize, Serialize};

/// Logical game keys; the platform layer maps physical keys onto these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Paddle left (A / Left arrow)
    Left,
    /// Paddle right (D / Right arrow)
    Right,
    /// Next level in the menu (W)
    NextLevel,
    /// Previous level in the menu (S)
    PrevLevel,
    /// Release the ball (Space)
    Launch,
    /// Confirm / acknowledge (Enter)
    Confirm,
    /// Delete the last name character (Backspace)
    Backspace,
    /// Open the leaderboard from the menu (H)
    ShowScores,
}

impl Key {
    pub const COUNT: usize = 8;

    pub const ALL: [Key; Key::COUNT] = [
        Key::Left,
        Key::Right,
        Key::NextLevel,
        Key::PrevLevel,
        Key::Launch,
        Key::Confirm,
        Key::Backspace,
        Key::ShowScores,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    held: [bool; Key::COUNT],
    processed: [bool; Key::COUNT],
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform: key went down
    pub fn key_down(&mut self, key: Key) {
        self.held[key.index()] = true;
    }

    /// Platform: key went up; the next press can be processed again
    pub fn key_up(&mut self, key: Key) {
        self.held[key.index()] = false;
        self.processed[key.index()] = false;
    }

    /// Platform: drop every held key (e.g. on focus loss)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    #[inline]
    pub fn is_processed(&self, key: Key) -> bool {
        self.processed[key.index()]
    }

    /// Held and not yet consumed by a discrete action
    #[inline]
    pub fn is_fresh(&self, key: Key) -> bool {
        self.is_held(key) && !self.is_processed(key)
    }

    /// Consume a fresh press; true at most once per physical press
    pub fn take_press(&mut self, key: Key) -> bool {
        if self.is_fresh(key) {
            self.processed[key.index()] = true;
            true
        } else {
            false
        }
    }
}
