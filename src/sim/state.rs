//! Game state and core simulation types
//!
//! Everything one tick reads or writes lives in `GameState`. Subsystems get
//! the pieces they need passed in explicitly; nothing here is global.

use std::collections::HashSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::backdrop::{Backdrop, TitleFx};
use super::camera::Camera;
use super::generator;
use super::powerups::PowerUpManager;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first tap; only cosmetics animate
    Title,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for an explicit restart
    GameOver,
}

/// Visible play area in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub is_jumping: bool,
    /// Effective values for this tick (base scaled by active power-ups)
    pub gravity: f32,
    pub jump_force: f32,
    pub move_speed: f32,
}

impl Player {
    /// New player at the middle of the screen with base physics
    pub fn new(tuning: &Tuning, screen: Screen) -> Self {
        let size = tuning.player_size;
        Self {
            pos: Vec2::new(screen.width / 2.0 - size / 2.0, screen.height / 2.0),
            vel: Vec2::ZERO,
            width: size,
            height: size,
            is_jumping: false,
            gravity: tuning.gravity,
            jump_force: tuning.jump_force,
            move_speed: tuning.move_speed,
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) / 2.0
    }
}

/// Cosmetic platform look; irrelevant to gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformStyle {
    Rock,
    Station,
    Crystal,
}

impl PlatformStyle {
    pub const ALL: [PlatformStyle; 3] = [Self::Rock, Self::Station, Self::Crystal];
}

/// A platform the player can bounce on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub style: PlatformStyle,
}

impl Platform {
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Falls and drifts, spins for show
    Asteroid,
    /// Patrols horizontally between the screen margins
    AlienShip,
    /// Stationary, pulses on the wall clock
    SpaceMine,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [Self::Asteroid, Self::AlienShip, Self::SpaceMine];
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Top-left corner of the bounding square
    pub pos: Vec2,
    pub size: f32,
    pub fall_speed: f32,
    pub horizontal_speed: f32,
    /// +1 right, -1 left (patrol only)
    pub direction: f32,
    /// Degrees, cosmetic
    pub rotation: f32,
    pub destroyed: bool,
}

impl Enemy {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    SuperJump,
    SpeedBoost,
    SlowFall,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        Self::Shield,
        Self::SuperJump,
        Self::SpeedBoost,
        Self::SlowFall,
    ];

    /// Stable slot for per-kind tables
    pub fn index(self) -> usize {
        match self {
            Self::Shield => 0,
            Self::SuperJump => 1,
            Self::SpeedBoost => 2,
            Self::SlowFall => 3,
        }
    }
}

/// A collectible power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub collected: bool,
}

impl PowerUp {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// Live level contents
#[derive(Debug, Clone, Default)]
pub struct World {
    /// Ordered by creation, so strictly decreasing y
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    /// Ids of platforms that already scored
    pub landed: HashSet<u32>,
    /// y of the most recently generated platform
    pub last_generated_y: f32,
    /// Platforms generated since the last enemy spawn
    pub enemy_spawn_counter: u32,
    next_id: u32,
}

impl World {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Drop every entity and generation cursor
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Current and best-ever score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Platforms landed on this run
    pub current: u32,
    pub best: u32,
}

impl Score {
    /// Count one new platform, raising the best if exceeded
    pub fn record_landing(&mut self) {
        self.current += 1;
        self.best = self.best.max(self.current);
    }

    /// Fold in a best score reported from outside (e.g. loaded from storage)
    pub fn merge_best(&mut self, best: u32) {
        self.best = self.best.max(best);
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub screen: Screen,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub world: World,
    pub camera: Camera,
    pub power_ups: PowerUpManager,
    pub score: Score,
    /// Star field, cosmetic only
    pub backdrop: Backdrop,
    /// Title blink/fade, cosmetic only
    pub title: TitleFx,
}

impl GameState {
    /// Create a session on the title screen with the first level ready
    pub fn new(settings: &Settings, seed: u64) -> Self {
        // Programmatic settings skip the load path, so repair here too
        let tuning = settings.tuning.clone().sanitized();
        let screen = Screen {
            width: settings.screen_width,
            height: settings.screen_height,
        };
        let mut rng = Pcg32::seed_from_u64(seed);
        let backdrop = Backdrop::new(&mut rng, screen);

        let mut state = Self {
            seed,
            rng,
            player: Player::new(&tuning, screen),
            power_ups: PowerUpManager::new(&tuning),
            tuning,
            screen,
            time_ticks: 0,
            phase: GamePhase::Title,
            world: World::default(),
            camera: Camera::default(),
            score: Score::default(),
            backdrop,
            title: TitleFx::default(),
        };
        state.reset_run();
        state
    }

    /// Clear the run and rebuild the opening level; best score survives
    pub fn reset_run(&mut self) {
        self.score.current = 0;
        self.camera = Camera::default();
        self.power_ups.reset();
        self.world.clear();

        generator::populate_initial(&mut self.world, &mut self.rng, &self.tuning, self.screen);

        self.player = Player::new(&self.tuning, self.screen);
        if let Some(start) = generator::start_platform(&self.world, &self.tuning, self.screen) {
            self.player.pos = Vec2::new(
                start.center_x() - self.player.width / 2.0,
                start.top() - self.tuning.spawn_height,
            );
        }
    }

    /// Leave GameOver straight into a fresh run (the title never recurs)
    pub fn restart(&mut self) {
        self.reset_run();
        self.title.skip();
        self.phase = GamePhase::Playing;
        log::info!("Run restarted (best {})", self.score.best);
    }
}

/// Uniform draw in [lo, hi); collapses to `lo` for an empty range
pub(crate) fn random_in(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        lo + rng.random::<f32>() * (hi - lo)
    } else {
        lo
    }
}

/// Uniformly pick one entry of a closed enumeration
pub(crate) fn pick<T: Copy>(rng: &mut Pcg32, all: &[T]) -> T {
    all[rng.random_range(0..all.len())]
}
