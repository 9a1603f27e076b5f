//! Enemy spawning and per-kind kinematics

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Enemy, EnemyKind, random_in};
use crate::tuning::Tuning;

impl Enemy {
    /// Roll a new enemy of `kind` with its per-instance parameters
    pub fn spawn(id: u32, kind: EnemyKind, pos: Vec2, tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let size = match kind {
            EnemyKind::Asteroid => tuning.asteroid_size,
            EnemyKind::AlienShip => tuning.alien_ship_size,
            EnemyKind::SpaceMine => random_in(rng, tuning.mine_min_size, tuning.mine_max_size),
        };
        let fall_speed = match kind {
            EnemyKind::Asteroid => {
                random_in(rng, tuning.asteroid_min_fall, tuning.asteroid_max_fall)
            }
            EnemyKind::AlienShip | EnemyKind::SpaceMine => 0.0,
        };
        let horizontal_speed = match kind {
            EnemyKind::Asteroid => {
                random_in(rng, -tuning.asteroid_max_drift, tuning.asteroid_max_drift)
            }
            EnemyKind::AlienShip => random_in(rng, tuning.ship_min_speed, tuning.ship_max_speed),
            EnemyKind::SpaceMine => 0.0,
        };
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

        Self {
            id,
            kind,
            pos,
            size,
            fall_speed,
            horizontal_speed,
            direction,
            rotation: 0.0,
            destroyed: false,
        }
    }

    /// Advance one tick of motion.
    ///
    /// Returns false when the result is not a finite position; the caller
    /// drops that enemy instead of letting it poison the tick.
    pub fn update(&mut self, screen_width: f32, tuning: &Tuning) -> bool {
        match self.kind {
            EnemyKind::Asteroid => {
                self.pos.y += self.fall_speed;
                // Drifts without bounds, leaves the screen on its own
                self.pos.x += self.horizontal_speed;
                self.rotation = (self.rotation + 4.0) % 360.0;
            }
            EnemyKind::AlienShip => {
                self.pos.x += self.horizontal_speed * self.direction;

                let left_edge = tuning.ship_edge_margin;
                let right_edge = screen_width - self.size - tuning.ship_edge_margin;
                if self.pos.x <= left_edge {
                    self.pos.x = left_edge;
                    self.direction = 1.0;
                } else if self.pos.x >= right_edge {
                    self.pos.x = right_edge;
                    self.direction = -1.0;
                }
            }
            EnemyKind::SpaceMine => {
                self.rotation = (self.rotation + 1.5) % 360.0;
            }
        }
        self.pos.is_finite() && self.rotation.is_finite()
    }

    /// Mine size pulse in [0.75, 1.25], driven by wall-clock time.
    ///
    /// This is the one deliberately non-deterministic input to a frame; it
    /// never feeds back into collision or motion.
    pub fn pulse(now_ms: u64) -> f32 {
        1.0 + (now_ms as f64 / 300.0).sin() as f32 * 0.25
    }

    /// Mine glow alpha in [0.2, 1.0]
    pub fn glow_alpha(now_ms: u64) -> f32 {
        ((now_ms as f64 / 500.0).sin() * 0.4 + 0.6) as f32
    }

    /// Mine spin in degrees
    pub fn spin(now_ms: u64) -> f32 {
        ((now_ms as f64 / 50.0) % 360.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    const WIDTH: f32 = 720.0;

    fn spawn(kind: EnemyKind, seed: u64) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(seed);
        Enemy::spawn(1, kind, Vec2::new(300.0, 100.0), &Tuning::default(), &mut rng)
    }

    #[test]
    fn test_spawn_parameters_per_kind() {
        let tuning = Tuning::default();
        for seed in 0..50 {
            let rock = spawn(EnemyKind::Asteroid, seed);
            assert_eq!(rock.size, tuning.asteroid_size);
            assert!((2.0..6.0).contains(&rock.fall_speed));
            assert!(rock.horizontal_speed.abs() <= 0.75);

            let ship = spawn(EnemyKind::AlienShip, seed);
            assert_eq!(ship.size, tuning.alien_ship_size);
            assert_eq!(ship.fall_speed, 0.0);
            assert!((2.5..4.5).contains(&ship.horizontal_speed));

            let mine = spawn(EnemyKind::SpaceMine, seed);
            assert!((60.0..120.0).contains(&mine.size));
            assert_eq!(mine.fall_speed, 0.0);
            assert_eq!(mine.horizontal_speed, 0.0);
        }
    }

    #[test]
    fn test_asteroid_falls_and_drifts() {
        let mut rock = spawn(EnemyKind::Asteroid, 3);
        let start = rock.pos;
        assert!(rock.update(WIDTH, &Tuning::default()));
        assert_eq!(rock.pos.y, start.y + rock.fall_speed);
        assert_eq!(rock.pos.x, start.x + rock.horizontal_speed);
        assert_eq!(rock.rotation, 4.0);
    }

    #[test]
    fn test_ship_bounces_between_margins() {
        let tuning = Tuning::default();
        let mut ship = spawn(EnemyKind::AlienShip, 5);
        ship.direction = 1.0;
        let right_edge = WIDTH - ship.size - tuning.ship_edge_margin;
        ship.pos.x = right_edge - 1.0;

        ship.update(WIDTH, &tuning);
        assert_eq!(ship.pos.x, right_edge);
        assert_eq!(ship.direction, -1.0);
        let y = ship.pos.y;

        ship.pos.x = tuning.ship_edge_margin + 1.0;
        ship.update(WIDTH, &tuning);
        assert_eq!(ship.pos.x, tuning.ship_edge_margin);
        assert_eq!(ship.direction, 1.0);
        assert_eq!(ship.pos.y, y);
    }

    #[test]
    fn test_mine_stays_put() {
        let mut mine = spawn(EnemyKind::SpaceMine, 9);
        let start = mine.pos;
        for _ in 0..100 {
            mine.update(WIDTH, &Tuning::default());
        }
        assert_eq!(mine.pos, start);
    }

    #[test]
    fn test_non_finite_motion_is_reported() {
        let mut rock = spawn(EnemyKind::Asteroid, 1);
        rock.fall_speed = f32::NAN;
        assert!(!rock.update(WIDTH, &Tuning::default()));
    }

    #[test]
    fn test_mine_pulse_is_pure() {
        assert_eq!(Enemy::pulse(12_345), Enemy::pulse(12_345));
        for t in (0..10_000).step_by(37) {
            let p = Enemy::pulse(t);
            assert!((0.75..=1.25).contains(&p));
            let a = Enemy::glow_alpha(t);
            assert!((0.2..=1.0).contains(&a));
        }
    }
}
