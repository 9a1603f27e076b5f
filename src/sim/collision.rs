//! Collision detection and response
//!
//! Platforms use a swept test on the player's bottom edge so a fast fall
//! cannot tunnel through a thin platform between two ticks. Enemies and
//! power-ups use circle approximations around their centers.

use glam::Vec2;

use super::powerups::PowerUpManager;
use super::state::{Enemy, Platform, Player, PowerUp, PowerUpKind, Score, World};
use crate::tuning::Tuning;

/// Result of the landing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub platform_id: u32,
    /// First landing on this platform (score went up)
    pub scored: bool,
}

/// Result of the enemy pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnemyOutcome {
    /// Enemies destroyed by the shield this tick
    pub absorbed: Vec<u32>,
    /// Id of the enemy that ended the run
    pub fatal: Option<u32>,
    /// Enemies dropped because their update went bad
    pub faulted: Vec<u32>,
}

/// Swept landing test.
///
/// Only a descending player can land. The bottom edge must cross the
/// platform top between the previous tick and this one, with the
/// horizontal extents overlapping.
pub fn is_landing(player: &Player, platform: &Platform) -> bool {
    if player.vel.y <= 0.0 {
        return false;
    }
    let bottom = player.bottom();
    let previous_bottom = bottom - player.vel.y;

    let horizontal_overlap = player.right() > platform.left() && player.left() < platform.right();
    let crossed_top = previous_bottom <= platform.top() && bottom >= platform.top();

    horizontal_overlap && crossed_top
}

/// Circle overlap between two centers
#[inline]
pub fn circles_overlap(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

pub fn hits_enemy(player: &Player, enemy: &Enemy) -> bool {
    !enemy.destroyed
        && circles_overlap(
            player.center(),
            enemy.center(),
            enemy.size / 2.0 + player.width / 3.0,
        )
}

pub fn touches_power_up(player: &Player, power_up: &PowerUp) -> bool {
    !power_up.collected
        && circles_overlap(
            player.center(),
            power_up.center(),
            power_up.size / 2.0 + player.width / 2.0,
        )
}

/// Bounce the player off the first platform it lands on.
///
/// The player is snapped onto the platform and jumps; a platform scores the
/// first time only.
pub fn resolve_landing(player: &mut Player, world: &mut World, score: &mut Score) -> Option<Landing> {
    let platform = world.platforms.iter().find(|p| is_landing(player, p))?;
    let platform_id = platform.id;

    player.pos.y = platform.top() - player.height;
    player.jump();

    let scored = world.landed.insert(platform_id);
    if scored {
        score.record_landing();
    }
    Some(Landing {
        platform_id,
        scored,
    })
}

/// Collect every touched power-up and switch its effect on
pub fn collect_power_ups(
    player: &Player,
    world: &mut World,
    power_ups: &mut PowerUpManager,
    now_ms: u64,
) -> Vec<PowerUpKind> {
    let mut collected = Vec::new();
    for power_up in &mut world.power_ups {
        if touches_power_up(player, power_up) {
            power_up.collected = true;
            power_ups.activate(power_up.kind, now_ms);
            collected.push(power_up.kind);
        }
    }
    world.power_ups.retain(|p| !p.collected);
    collected
}

/// Move every enemy, then test it against the player.
///
/// A hit spends the shield if there is one; otherwise the pass stops at the
/// first fatal enemy. Each enemy is handled on its own: one that produces a
/// non-finite position is dropped without affecting the rest.
pub fn resolve_enemies(
    player: &Player,
    world: &mut World,
    power_ups: &mut PowerUpManager,
    tuning: &Tuning,
    screen_width: f32,
) -> EnemyOutcome {
    let mut outcome = EnemyOutcome::default();

    for enemy in &mut world.enemies {
        if enemy.destroyed {
            continue;
        }
        if !enemy.update(screen_width, tuning) {
            log::warn!("Enemy {} ({:?}) left finite space, dropping it", enemy.id, enemy.kind);
            enemy.destroyed = true;
            outcome.faulted.push(enemy.id);
            continue;
        }
        if hits_enemy(player, enemy) {
            if power_ups.take_damage() {
                enemy.destroyed = true;
                outcome.absorbed.push(enemy.id);
                log::debug!("Shield absorbed enemy {}", enemy.id);
            } else {
                outcome.fatal = Some(enemy.id);
                break;
            }
        }
    }

    world.enemies.retain(|e| !e.destroyed);
    outcome
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::sim::state::{EnemyKind, PlatformStyle, Screen};

    const SCREEN: Screen = Screen {
        width: 720.0,
        height: 1280.0,
    };

    fn player_at(x: f32, y: f32, vy: f32) -> Player {
        let mut p = Player::new(&Tuning::default(), SCREEN);
        p.pos = Vec2::new(x, y);
        p.vel.y = vy;
        p
    }

    fn platform(id: u32, x: f32, y: f32, width: f32) -> Platform {
        Platform {
            id,
            pos: Vec2::new(x, y),
            width,
            height: 30.0,
            style: PlatformStyle::Rock,
        }
    }

    fn enemy_at(id: u32, center: Vec2) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(id as u64);
        let mut e = Enemy::spawn(id, EnemyKind::SpaceMine, Vec2::ZERO, &Tuning::default(), &mut rng);
        e.pos = center - Vec2::splat(e.size / 2.0);
        e
    }

    #[test]
    fn test_landing_scenario() {
        // Bottom at 500 moving down 10/tick, platform top at 505 is not yet reached
        let p = player_at(100.0, 500.0 - 80.0, 10.0);
        assert!(!is_landing(&p, &platform(1, 50.0, 505.0, 200.0)));

        // Bottom at 505 after this tick, previous bottom 495: crossed
        let mut p = player_at(100.0, 505.0 - 80.0, 10.0);
        let mut world = World::default();
        world.platforms.push(platform(1, 50.0, 505.0, 200.0));
        let mut score = Score::default();

        let landing = resolve_landing(&mut p, &mut world, &mut score).unwrap();
        assert_eq!(landing, Landing { platform_id: 1, scored: true });
        assert_eq!(p.pos.y, 505.0 - p.height);
        assert_eq!(p.vel.y, Tuning::default().jump_force);
        assert_eq!(score.current, 1);
    }

    #[test]
    fn test_swept_test_catches_tunneling() {
        // Previous bottom 480, current bottom 510: platform top 500 in between
        let p = player_at(100.0, 510.0 - 80.0, 30.0);
        assert!(is_landing(&p, &platform(1, 50.0, 500.0, 200.0)));
    }

    #[test]
    fn test_rising_player_never_lands() {
        let p = player_at(100.0, 505.0 - 80.0, -10.0);
        assert!(!is_landing(&p, &platform(1, 50.0, 500.0, 200.0)));
        let p = player_at(100.0, 500.0 - 80.0, 0.0);
        assert!(!is_landing(&p, &platform(1, 50.0, 500.0, 200.0)));
    }

    #[test]
    fn test_no_landing_without_horizontal_overlap() {
        let p = player_at(300.0, 505.0 - 80.0, 10.0);
        assert!(!is_landing(&p, &platform(1, 50.0, 500.0, 200.0)));
        // Edges touching is not overlap
        let p = player_at(250.0, 505.0 - 80.0, 10.0);
        assert!(!is_landing(&p, &platform(1, 50.0, 500.0, 200.0)));
    }

    #[test]
    fn test_platform_scores_once() {
        let mut world = World::default();
        world.platforms.push(platform(7, 0.0, 500.0, 720.0));
        let mut score = Score::default();

        for _ in 0..5 {
            let mut p = player_at(100.0, 505.0 - 80.0, 10.0);
            let landing = resolve_landing(&mut p, &mut world, &mut score).unwrap();
            assert_eq!(landing.platform_id, 7);
        }
        assert_eq!(score.current, 1);
    }

    #[test]
    fn test_first_match_wins() {
        let mut world = World::default();
        world.platforms.push(platform(1, 0.0, 500.0, 720.0));
        world.platforms.push(platform(2, 0.0, 505.0, 720.0));
        let mut score = Score::default();
        let mut p = player_at(100.0, 510.0 - 80.0, 20.0);

        let landing = resolve_landing(&mut p, &mut world, &mut score).unwrap();
        assert_eq!(landing.platform_id, 1);
        assert_eq!(score.current, 1);
    }

    #[test]
    fn test_power_up_pickup_activates_effect() {
        let tuning = Tuning::default();
        let p = player_at(100.0, 100.0, 0.0);
        let mut world = World::default();
        world.power_ups.push(PowerUp {
            id: 1,
            kind: PowerUpKind::SlowFall,
            pos: p.center() + Vec2::new(50.0, 0.0) - Vec2::splat(40.0),
            size: 80.0,
            collected: false,
        });
        world.power_ups.push(PowerUp {
            id: 2,
            kind: PowerUpKind::Shield,
            pos: p.center() + Vec2::new(200.0, 0.0),
            size: 80.0,
            collected: false,
        });
        let mut manager = PowerUpManager::new(&tuning);

        let got = collect_power_ups(&p, &mut world, &mut manager, 1_000);
        assert_eq!(got, vec![PowerUpKind::SlowFall]);
        assert!(manager.is_active(PowerUpKind::SlowFall));
        assert!(!manager.has_shield());
        assert_eq!(world.power_ups.len(), 1);
        assert_eq!(world.power_ups[0].id, 2);
    }

    #[test]
    fn test_enemy_hit_radius() {
        let p = player_at(100.0, 100.0, 0.0);
        let e = enemy_at(1, p.center() + Vec2::new(10.0, 0.0));
        assert!(hits_enemy(&p, &e));

        let reach = e.size / 2.0 + p.width / 3.0;
        let e = enemy_at(2, p.center() + Vec2::new(reach + 1.0, 0.0));
        assert!(!hits_enemy(&p, &e));
    }

    #[test]
    fn test_shield_absorbs_enemy() {
        let tuning = Tuning::default();
        let p = player_at(100.0, 100.0, 0.0);
        let mut world = World::default();
        world.enemies.push(enemy_at(3, p.center()));
        let mut manager = PowerUpManager::new(&tuning);
        manager.activate(PowerUpKind::Shield, 0);

        let outcome = resolve_enemies(&p, &mut world, &mut manager, &tuning, SCREEN.width);
        assert_eq!(outcome.absorbed, vec![3]);
        assert_eq!(outcome.fatal, None);
        assert!(!manager.has_shield());
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn test_enemy_without_shield_is_fatal() {
        let tuning = Tuning::default();
        let p = player_at(100.0, 100.0, 0.0);
        let mut world = World::default();
        world.enemies.push(enemy_at(4, p.center()));
        let mut manager = PowerUpManager::new(&tuning);

        let outcome = resolve_enemies(&p, &mut world, &mut manager, &tuning, SCREEN.width);
        assert_eq!(outcome.fatal, Some(4));
        assert_eq!(world.enemies.len(), 1);
    }

    #[test]
    fn test_bad_enemy_is_isolated() {
        let tuning = Tuning::default();
        let p = player_at(100.0, 100.0, 0.0);
        let mut world = World::default();
        let mut broken = enemy_at(5, Vec2::new(500.0, 900.0));
        broken.kind = EnemyKind::Asteroid;
        broken.fall_speed = f32::INFINITY;
        world.enemies.push(broken);
        world.enemies.push(enemy_at(6, Vec2::new(500.0, 600.0)));
        let mut manager = PowerUpManager::new(&tuning);

        let outcome = resolve_enemies(&p, &mut world, &mut manager, &tuning, SCREEN.width);
        assert_eq!(outcome.faulted, vec![5]);
        assert_eq!(outcome.fatal, None);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.enemies[0].id, 6);
    }
}
