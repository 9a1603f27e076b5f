//! Space Jumper - an endless vertical platformer simulation
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (physics, generation, collisions, game state)
//! - `game_loop`: Threaded runner that paces ticks and feeds the renderer
//! - `renderer`: Snapshot handed to the external renderer each tick
//! - `platform`: Clock and pointer input abstraction
//! - `persistence`: Fire-and-forget best score persistence
//! - `highscores`: Local leaderboard file backing the persistence service
//! - `settings` / `tuning`: Configuration and data-driven game balance

pub mod game_loop;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game_loop::{GameLoop, LoopHandle};
pub use highscores::{HighScores, LocalScoreStore};
pub use persistence::{PersistenceService, ScoreKeeper};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE_HZ: u32 = 60;

    /// Pointer must be this far from the player's center to steer
    pub const INPUT_DEAD_ZONE: f32 = 50.0;

    /// Title "tap to start" blink bounds and step per tick
    pub const TAP_ALPHA_MIN: i32 = 100;
    pub const TAP_ALPHA_MAX: i32 = 255;
    pub const TAP_ALPHA_STEP: i32 = 5;
    /// Title fade per tick once play starts
    pub const TITLE_FADE_STEP: f32 = 8.0;
}
