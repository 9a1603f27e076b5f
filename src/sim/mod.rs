//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Wall clock enters only through the `now_ms` argument to `tick`
//! - No rendering, input or storage dependencies

pub mod backdrop;
pub mod camera;
pub mod collision;
pub mod enemy;
pub mod generator;
pub mod player;
pub mod powerups;
pub mod state;
pub mod tick;

pub use backdrop::{Backdrop, Star, TitleFx};
pub use camera::Camera;
pub use collision::{EnemyOutcome, Landing};
pub use powerups::{EffectTimer, PowerUpManager};
pub use state::{
    Enemy, EnemyKind, GamePhase, GameState, Platform, PlatformStyle, Player, PowerUp, PowerUpKind,
    Score, Screen, World,
};
pub use tick::{GameEvent, LossCause, MoveIntent, TickInput, tick};
