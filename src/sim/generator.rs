//! Procedural level generation
//!
//! Platforms are laid out bottom to top with bounded random gaps, keeping
//! one screen height above the camera populated. Power-ups and enemies ride
//! along with new platforms.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{
    Enemy, EnemyKind, Platform, PlatformStyle, PowerUp, PowerUpKind, Screen, World, pick, random_in,
};
use crate::tuning::Tuning;

/// Lay down the start platform and fill the window above camera 0
pub fn populate_initial(world: &mut World, rng: &mut Pcg32, tuning: &Tuning, screen: Screen) {
    let id = world.next_entity_id();
    let start = Platform {
        id,
        pos: Vec2::new(
            screen.width / 2.0 - tuning.start_platform_width / 2.0,
            screen.height - tuning.start_platform_offset,
        ),
        width: tuning.start_platform_width,
        height: tuning.platform_height,
        style: pick(rng, &PlatformStyle::ALL),
    };
    world.last_generated_y = start.top();
    world.platforms.push(start);

    let generated = extend(world, rng, tuning, screen, 0.0);
    log::debug!("Initial level: {} platforms above start", generated);
}

/// The platform the player spawns over: the one resting at the start
/// offset, else the lowest one
pub fn start_platform<'a>(
    world: &'a World,
    tuning: &Tuning,
    screen: Screen,
) -> Option<&'a Platform> {
    let start_top = screen.height - tuning.start_platform_offset;
    world
        .platforms
        .iter()
        .find(|p| p.top() >= start_top)
        .or_else(|| world.platforms.first())
}

/// Generate until the lookahead window above `camera_y` is populated.
///
/// Returns how many platforms were added.
pub fn extend(
    world: &mut World,
    rng: &mut Pcg32,
    tuning: &Tuning,
    screen: Screen,
    camera_y: f32,
) -> usize {
    let ceiling = camera_y - screen.height;
    let mut generated = 0;
    while world.last_generated_y > ceiling {
        generate_platform(world, rng, tuning, screen);
        generated += 1;
    }
    generated
}

fn generate_platform(world: &mut World, rng: &mut Pcg32, tuning: &Tuning, screen: Screen) {
    let width = random_in(rng, tuning.platform_min_width, tuning.platform_max_width);
    let x = random_in(rng, 0.0, (screen.width - width).max(0.0));
    let spacing = random_in(
        rng,
        tuning.min_platform_spacing,
        tuning.max_platform_spacing,
    );
    let y = world.last_generated_y - spacing;

    let id = world.next_entity_id();
    world.platforms.push(Platform {
        id,
        pos: Vec2::new(x, y),
        width,
        height: tuning.platform_height,
        style: pick(rng, &PlatformStyle::ALL),
    });
    world.last_generated_y = y;

    if rng.random::<f32>() < tuning.power_up_chance {
        let kind: PowerUpKind = pick(rng, &PowerUpKind::ALL);
        let id = world.next_entity_id();
        world.power_ups.push(PowerUp {
            id,
            kind,
            pos: Vec2::new(
                x + width / 2.0 - tuning.power_up_size / 2.0,
                y - tuning.power_up_lift,
            ),
            size: tuning.power_up_size,
            collected: false,
        });
    }

    world.enemy_spawn_counter += 1;
    if world.enemy_spawn_counter >= tuning.enemy_min_platform_gap
        && rng.random::<f32>() < tuning.enemy_chance
    {
        let kind: EnemyKind = pick(rng, &EnemyKind::ALL);
        let ex = random_in(rng, 0.0, (screen.width - tuning.enemy_spawn_size).max(0.0));
        let id = world.next_entity_id();
        let enemy = Enemy::spawn(id, kind, Vec2::new(ex, y - tuning.enemy_lift), tuning, rng);
        world.enemies.push(enemy);
        world.enemy_spawn_counter = 0;
    }
}

/// Drop everything that fell more than a screen below the camera.
///
/// Culled platforms leave the landed set with them.
pub fn cull(world: &mut World, camera_y: f32, screen: Screen, margin: f32) {
    let limit = camera_y + screen.height + margin;

    let World {
        platforms, landed, ..
    } = &mut *world;
    platforms.retain(|p| {
        let keep = p.pos.y <= limit;
        if !keep {
            landed.remove(&p.id);
        }
        keep
    });
    world.enemies.retain(|e| e.pos.y <= limit);
    world.power_ups.retain(|p| p.pos.y <= limit);
}
