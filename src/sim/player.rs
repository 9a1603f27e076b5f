//! Player physics
//!
//! One integration step per tick. Effective gravity, jump force and move
//! speed are rebuilt from the base tuning every tick, so an expired power-up
//! stops affecting the player on the very next tick.

use super::powerups::PowerUpManager;
use super::state::{Player, PowerUpKind};
use crate::tuning::Tuning;

impl Player {
    /// Integrate one tick of motion
    pub fn update(&mut self, tuning: &Tuning, screen_width: f32) {
        self.vel.y = (self.vel.y + self.gravity).min(tuning.max_fall_speed);
        self.pos.y += self.vel.y;

        self.vel.x *= tuning.friction;
        self.pos.x += self.vel.x;

        // Inelastic wall stop
        let max_x = (screen_width - self.width).max(0.0);
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = 0.0;
        }
        if self.pos.x > max_x {
            self.pos.x = max_x;
            self.vel.x = 0.0;
        }
    }

    pub fn jump(&mut self) {
        self.vel.y = self.jump_force;
        self.is_jumping = true;
    }

    pub fn move_left(&mut self) {
        self.vel.x = -self.move_speed;
    }

    pub fn move_right(&mut self) {
        self.vel.x = self.move_speed;
    }

    /// Horizontal motion only ever decays through friction
    pub fn stop_moving(&mut self) {}

    /// Rebuild effective physics from base values and active effects.
    ///
    /// Each attribute has exactly one modifier, so effects never compound.
    pub fn apply_power_ups(&mut self, power_ups: &PowerUpManager, tuning: &Tuning) {
        self.gravity = tuning.gravity;
        self.jump_force = tuning.jump_force;
        self.move_speed = tuning.move_speed;

        if power_ups.is_active(PowerUpKind::SuperJump) {
            self.jump_force = tuning.jump_force * tuning.super_jump_multiplier;
        }
        if power_ups.is_active(PowerUpKind::SpeedBoost) {
            self.move_speed = tuning.move_speed * tuning.speed_boost_multiplier;
        }
        if power_ups.is_active(PowerUpKind::SlowFall) {
            self.gravity = tuning.gravity * tuning.slow_fall_multiplier;
        }
    }
}
