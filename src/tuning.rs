//! Data-driven game balance
//!
//! Every gameplay constant lives here so a settings file can rebalance a run
//! without touching the simulation. Values are in world units per tick at the
//! fixed tick rate, except durations which are wall-clock milliseconds.

use serde::{Deserialize, Serialize};

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_size: f32,
    /// Downward acceleration added to vy every tick
    pub gravity: f32,
    /// Upward launch velocity (negative = up)
    pub jump_force: f32,
    pub max_fall_speed: f32,
    pub move_speed: f32,
    /// Per-tick horizontal velocity decay (< 1)
    pub friction: f32,
    /// How far above the start platform the player spawns
    pub spawn_height: f32,

    // === Power-up multipliers ===
    pub super_jump_multiplier: f32,
    pub speed_boost_multiplier: f32,
    pub slow_fall_multiplier: f32,

    // === Power-up durations (ms) ===
    pub shield_duration_ms: u64,
    pub super_jump_duration_ms: u64,
    pub speed_boost_duration_ms: u64,
    pub slow_fall_duration_ms: u64,

    // === Level generation ===
    pub platform_height: f32,
    pub platform_min_width: f32,
    pub platform_max_width: f32,
    pub start_platform_width: f32,
    /// Start platform sits this far above the bottom of the screen
    pub start_platform_offset: f32,
    pub min_platform_spacing: f32,
    pub max_platform_spacing: f32,
    /// Entities further than one screen plus this margin below the camera are culled
    pub cull_margin: f32,

    // === Power-up spawning ===
    pub power_up_size: f32,
    pub power_up_chance: f32,
    /// Power-ups float this far above their platform
    pub power_up_lift: f32,

    // === Enemy spawning ===
    pub enemy_chance: f32,
    /// Platforms that must be generated between two enemies
    pub enemy_min_platform_gap: u32,
    /// Nominal enemy footprint used for spawn x placement
    pub enemy_spawn_size: f32,
    /// Enemies spawn this far above their platform
    pub enemy_lift: f32,
    pub asteroid_size: f32,
    pub alien_ship_size: f32,
    pub mine_min_size: f32,
    pub mine_max_size: f32,
    pub asteroid_min_fall: f32,
    pub asteroid_max_fall: f32,
    /// Asteroid drift is drawn from [-max, max)
    pub asteroid_max_drift: f32,
    pub ship_min_speed: f32,
    pub ship_max_speed: f32,
    pub ship_edge_margin: f32,

    // === Camera ===
    pub camera_smoothing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 80.0,
            gravity: 1.2,
            jump_force: -30.0,
            max_fall_speed: 30.0,
            move_speed: 15.0,
            friction: 0.85,
            spawn_height: 250.0,

            super_jump_multiplier: 1.4,
            speed_boost_multiplier: 1.6,
            slow_fall_multiplier: 0.6,

            shield_duration_ms: 15_000,
            super_jump_duration_ms: 5_000,
            speed_boost_duration_ms: 5_000,
            slow_fall_duration_ms: 7_000,

            platform_height: 30.0,
            platform_min_width: 160.0,
            platform_max_width: 240.0,
            start_platform_width: 200.0,
            start_platform_offset: 150.0,
            min_platform_spacing: 150.0,
            max_platform_spacing: 180.0,
            cull_margin: 100.0,

            power_up_size: 80.0,
            power_up_chance: 0.2,
            power_up_lift: 90.0,

            enemy_chance: 0.1,
            enemy_min_platform_gap: 3,
            enemy_spawn_size: 70.0,
            enemy_lift: 200.0,
            asteroid_size: 90.0,
            alien_ship_size: 130.0,
            mine_min_size: 60.0,
            mine_max_size: 120.0,
            asteroid_min_fall: 2.0,
            asteroid_max_fall: 6.0,
            asteroid_max_drift: 0.75,
            ship_min_speed: 2.5,
            ship_max_speed: 4.5,
            ship_edge_margin: 10.0,

            camera_smoothing: 0.15,
        }
    }
}

/// Weakest gravity a run can use; below this a jump barely comes down
pub const MIN_GRAVITY: f32 = 0.01;

/// Generated gaps stay this far inside the jump reach
const SPACING_REACH_RATIO: f32 = 0.9;

impl Tuning {
    /// Highest rise of the player's feet after a base-strength jump.
    ///
    /// Closed form of the discrete update the player controller runs
    /// (`vy += g; y += vy`): the player keeps rising for the `m` ticks where
    /// `jump + k * g < 0`.
    pub fn max_jump_height(&self) -> f32 {
        if !(self.gravity > 0.0 && self.jump_force < 0.0) {
            return 0.0;
        }
        let (jump, g) = (-(self.jump_force as f64), self.gravity as f64);
        let rising_ticks = ((jump / g).ceil() - 1.0).max(0.0);
        let rise = rising_ticks * jump - g * rising_ticks * (rising_ticks + 1.0) / 2.0;
        rise.max(0.0) as f32
    }

    /// Repair values that would make a run unwinnable, a range empty or
    /// generation unable to make progress.
    pub fn sanitized(mut self) -> Self {
        let defaults = Tuning::default();

        if !(self.gravity.is_finite() && self.gravity >= MIN_GRAVITY) {
            log::warn!("gravity {} below {}, using default", self.gravity, MIN_GRAVITY);
            self.gravity = defaults.gravity;
        }
        if !(self.jump_force.is_finite() && self.jump_force < 0.0) {
            log::warn!("jump_force {} is not upward, using default", self.jump_force);
            self.jump_force = defaults.jump_force;
        }
        if !(self.max_fall_speed.is_finite() && self.max_fall_speed > 0.0) {
            log::warn!("max_fall_speed {} invalid, using default", self.max_fall_speed);
            self.max_fall_speed = defaults.max_fall_speed;
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            log::warn!("friction {} outside (0, 1), using default", self.friction);
            self.friction = defaults.friction;
        }
        if self.platform_max_width < self.platform_min_width {
            std::mem::swap(&mut self.platform_min_width, &mut self.platform_max_width);
        }
        if self.mine_max_size < self.mine_min_size {
            std::mem::swap(&mut self.mine_min_size, &mut self.mine_max_size);
        }

        self.sanitize_spacing(&defaults);

        self.power_up_chance = self.power_up_chance.clamp(0.0, 1.0);
        self.enemy_chance = self.enemy_chance.clamp(0.0, 1.0);
        self.camera_smoothing = self.camera_smoothing.clamp(0.01, 1.0);
        self
    }

    /// Keep `0 < min <= max < reach` for platform gaps
    fn sanitize_spacing(&mut self, defaults: &Tuning) {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.min_platform_spacing) || !positive(self.max_platform_spacing) {
            log::warn!(
                "platform spacing {}..{} invalid, using defaults",
                self.min_platform_spacing,
                self.max_platform_spacing
            );
            self.min_platform_spacing = defaults.min_platform_spacing;
            self.max_platform_spacing = defaults.max_platform_spacing;
        }
        if self.max_platform_spacing < self.min_platform_spacing {
            std::mem::swap(&mut self.min_platform_spacing, &mut self.max_platform_spacing);
        }

        // A jump too weak for even the default gaps can't carry a run
        let mut reach = self.max_jump_height();
        if reach * SPACING_REACH_RATIO <= defaults.min_platform_spacing {
            log::warn!(
                "jump reach {:.1} (gravity {}, jump_force {}) too short, using default physics",
                reach,
                self.gravity,
                self.jump_force
            );
            self.gravity = defaults.gravity;
            self.jump_force = defaults.jump_force;
            reach = self.max_jump_height();
        }

        let limit = reach * SPACING_REACH_RATIO;
        if self.min_platform_spacing >= limit {
            log::warn!(
                "minimum platform spacing {} exceeds jump reach {:.1}, using default spacing",
                self.min_platform_spacing,
                reach
            );
            self.min_platform_spacing = defaults.min_platform_spacing;
            self.max_platform_spacing = defaults.max_platform_spacing;
        }
        if self.max_platform_spacing >= reach {
            log::warn!(
                "maximum platform spacing {} exceeds jump reach {:.1}, capping at {:.1}",
                self.max_platform_spacing,
                reach,
                limit
            );
            self.max_platform_spacing = limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_jump_reach() {
        let tuning = Tuning::default();
        // 30 - 1.2k summed over the 24 rising ticks
        assert!((tuning.max_jump_height() - 360.0).abs() < 0.5);
        assert!(tuning.max_platform_spacing < tuning.max_jump_height());
    }

    #[test]
    fn test_sanitize_caps_unreachable_spacing() {
        let tuning = Tuning {
            min_platform_spacing: 300.0,
            max_platform_spacing: 500.0,
            ..Default::default()
        }
        .sanitized();
        assert!(tuning.max_platform_spacing < tuning.max_jump_height());
        assert!(tuning.min_platform_spacing <= tuning.max_platform_spacing);
    }

    #[test]
    fn test_sanitize_weak_jump_restores_physics() {
        let tuning = Tuning {
            jump_force: -1.0,
            ..Default::default()
        };
        assert_eq!(tuning.max_jump_height(), 0.0);

        let tuning = tuning.sanitized();
        assert_eq!(tuning.jump_force, Tuning::default().jump_force);
        assert!(tuning.min_platform_spacing > 0.0);
        assert!(tuning.min_platform_spacing <= tuning.max_platform_spacing);
        assert!(tuning.max_platform_spacing < tuning.max_jump_height());
    }

    #[test]
    fn test_tiny_gravity_terminates() {
        let tuning = Tuning {
            gravity: 1e-7,
            ..Default::default()
        };
        // Closed form: no per-tick loop to stall on
        assert!(tuning.max_jump_height() > 1_000_000.0);

        let tuning = tuning.sanitized();
        assert_eq!(tuning.gravity, Tuning::default().gravity);
    }

    #[test]
    fn test_sanitize_non_finite_values() {
        let tuning = Tuning {
            gravity: f32::NAN,
            jump_force: f32::NEG_INFINITY,
            max_fall_speed: f32::INFINITY,
            min_platform_spacing: f32::NAN,
            max_platform_spacing: f32::INFINITY,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_sanitize_zero_or_negative_spacing() {
        for (min, max) in [(0.0, 0.0), (-50.0, -10.0), (0.0, 170.0), (-20.0, 160.0)] {
            let tuning = Tuning {
                min_platform_spacing: min,
                max_platform_spacing: max,
                ..Default::default()
            }
            .sanitized();
            assert!(tuning.min_platform_spacing > 0.0, "{min}..{max}");
            assert!(tuning.min_platform_spacing <= tuning.max_platform_spacing);
            assert!(tuning.max_platform_spacing < tuning.max_jump_height());
        }
    }

    #[test]
    fn test_sanitize_spacing_beyond_reach_uses_defaults() {
        let tuning = Tuning {
            min_platform_spacing: 400.0,
            max_platform_spacing: 500.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.min_platform_spacing, 150.0);
        assert_eq!(tuning.max_platform_spacing, 180.0);
    }

    #[test]
    fn test_sanitize_swaps_inverted_ranges() {
        let tuning = Tuning {
            platform_min_width: 240.0,
            platform_max_width: 160.0,
            enemy_chance: 3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.platform_min_width, 160.0);
        assert_eq!(tuning.platform_max_width, 240.0);
        assert_eq!(tuning.enemy_chance, 1.0);
    }

    #[test]
    fn test_default_is_already_sane() {
        assert_eq!(Tuning::default().sanitized(), Tuning::default());
    }
}
