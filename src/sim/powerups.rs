//! Timed power-up effects
//!
//! Four independent on/off effects, each with an absolute wall-clock expiry.
//! All queries take the current timestamp from the caller, so the manager has
//! no hidden clock and replays identically given the same timestamps.

use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;
use crate::tuning::Tuning;

/// Activation state of one effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTimer {
    pub active: bool,
    /// Absolute expiry (ms on the session clock)
    pub expires_at_ms: u64,
}

/// Tracks the four timed effects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpManager {
    timers: [EffectTimer; 4],
    durations_ms: [u64; 4],
}

impl PowerUpManager {
    pub fn new(tuning: &Tuning) -> Self {
        let mut durations_ms = [0; 4];
        for kind in PowerUpKind::ALL {
            durations_ms[kind.index()] = match kind {
                PowerUpKind::Shield => tuning.shield_duration_ms,
                PowerUpKind::SuperJump => tuning.super_jump_duration_ms,
                PowerUpKind::SpeedBoost => tuning.speed_boost_duration_ms,
                PowerUpKind::SlowFall => tuning.slow_fall_duration_ms,
            };
        }
        Self {
            timers: [EffectTimer::default(); 4],
            durations_ms,
        }
    }

    pub fn duration_ms(&self, kind: PowerUpKind) -> u64 {
        self.durations_ms[kind.index()]
    }

    /// Switch an effect on; re-activation restarts the full duration
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: u64) {
        let duration = self.duration_ms(kind);
        self.timers[kind.index()] = EffectTimer {
            active: true,
            expires_at_ms: now_ms.saturating_add(duration),
        };
    }

    /// Deactivate every effect whose expiry has passed
    pub fn update(&mut self, now_ms: u64) {
        for timer in &mut self.timers {
            if timer.active && now_ms >= timer.expires_at_ms {
                timer.active = false;
            }
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.timers[kind.index()].active
    }

    pub fn timer(&self, kind: PowerUpKind) -> EffectTimer {
        self.timers[kind.index()]
    }

    pub fn has_shield(&self) -> bool {
        self.is_active(PowerUpKind::Shield)
    }

    /// Spend the shield on a fall-off. Returns whether one was available.
    pub fn use_shield(&mut self) -> bool {
        self.consume_shield()
    }

    /// Spend the shield on an enemy hit. Returns whether it absorbed the hit.
    pub fn take_damage(&mut self) -> bool {
        self.consume_shield()
    }

    // Consumption ignores the expiry timer entirely
    fn consume_shield(&mut self) -> bool {
        let shield = &mut self.timers[PowerUpKind::Shield.index()];
        if shield.active {
            shield.active = false;
            true
        } else {
            false
        }
    }

    /// Remaining time in ms; 0 once expired or inactive
    pub fn time_left_ms(&self, kind: PowerUpKind, now_ms: u64) -> u64 {
        let timer = self.timer(kind);
        if timer.active {
            timer.expires_at_ms.saturating_sub(now_ms)
        } else {
            0
        }
    }

    /// Whole seconds left, for HUD display
    pub fn time_left_secs(&self, kind: PowerUpKind, now_ms: u64) -> u64 {
        self.time_left_ms(kind, now_ms) / 1000
    }

    /// Clear all effects for a fresh run
    pub fn reset(&mut self) {
        self.timers = [EffectTimer::default(); 4];
    }
}
