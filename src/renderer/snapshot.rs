//! Per-tick render snapshot

use serde::Serialize;

use crate::sim::{
    Enemy, EnemyKind, GamePhase, GameState, Platform, Player, PowerUp, PowerUpKind, Star, TitleFx,
};

/// Enemy plus its wall-clock animation values
#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    #[serde(flatten)]
    pub enemy: Enemy,
    /// Mine scale factor; 1.0 for other kinds
    pub pulse: f32,
    /// Mine glow opacity (0-1); 1.0 for other kinds
    pub glow_alpha: f32,
}

/// An active power-up effect for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectView {
    pub kind: PowerUpKind,
    pub time_left_ms: u64,
    pub time_left_secs: u64,
}

/// Everything a renderer needs for one frame, in world coordinates
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub now_ms: u64,
    pub phase: GamePhase,
    /// Subtract from world y to get screen y
    pub camera_y: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    pub score: u32,
    pub best: u32,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<EnemyView>,
    pub power_ups: Vec<PowerUp>,
    pub effects: Vec<EffectView>,
    /// Mine spin in degrees, shared by every mine
    pub mine_spin: f32,
    pub stars: Vec<Star>,
    pub title: TitleFx,
}

impl Snapshot {
    pub fn capture(state: &GameState, now_ms: u64) -> Self {
        let pulse = Enemy::pulse(now_ms);
        let glow_alpha = Enemy::glow_alpha(now_ms);

        let enemies = state
            .world
            .enemies
            .iter()
            .map(|e| {
                let (pulse, glow_alpha) = match e.kind {
                    EnemyKind::SpaceMine => (pulse, glow_alpha),
                    EnemyKind::Asteroid | EnemyKind::AlienShip => (1.0, 1.0),
                };
                EnemyView {
                    enemy: e.clone(),
                    pulse,
                    glow_alpha,
                }
            })
            .collect();

        let effects = PowerUpKind::ALL
            .iter()
            .filter(|&&kind| state.power_ups.is_active(kind))
            .map(|&kind| EffectView {
                kind,
                time_left_ms: state.power_ups.time_left_ms(kind, now_ms),
                time_left_secs: state.power_ups.time_left_secs(kind, now_ms),
            })
            .collect();

        Self {
            tick: state.time_ticks,
            now_ms,
            phase: state.phase,
            camera_y: state.camera.y,
            screen_width: state.screen.width,
            screen_height: state.screen.height,
            score: state.score.current,
            best: state.score.best,
            player: state.player.clone(),
            platforms: state.world.platforms.clone(),
            enemies,
            power_ups: state.world.power_ups.clone(),
            effects,
            mine_spin: Enemy::spin(now_ms),
            stars: state.backdrop.stars.clone(),
            title: state.title,
        }
    }

    /// Player y relative to the top of the view
    pub fn player_screen_y(&self) -> f32 {
        self.player.pos.y - self.camera_y
    }
}
