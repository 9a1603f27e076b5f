//! Fixed timestep simulation tick
//!
//! One call advances the game by one tick and drives the state machine:
//! Title -> Playing -> GameOver -> (restart) Playing.

use serde::{Deserialize, Serialize};

use super::collision;
use super::generator;
use super::state::{GamePhase, GameState, PowerUpKind};

/// Horizontal steering intent, latest value wins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveIntent {
    #[default]
    None,
    Left,
    Right,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held steering direction
    pub intent: MoveIntent,
    /// Dismiss the title screen
    pub start: bool,
    /// Begin a new run from GameOver
    pub restart: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    Enemy,
    Fell,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Restarted,
    Landed { platform_id: u32, scored: bool },
    PowerUpCollected(PowerUpKind),
    /// Shield spent; `enemy_id` is None for a saved fall
    ShieldAbsorbed { enemy_id: Option<u32> },
    GameOver { score: u32, best: u32, cause: LossCause },
}

/// Advance the game state by one tick.
///
/// `now_ms` is the session wall clock, used for power-up expiry only.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Title => {
            state.backdrop.update();
            state.title.blink();
            if input.start || input.idle_mode {
                state.phase = GamePhase::Playing;
                events.push(GameEvent::Started);
                log::info!("Game started (seed {})", state.seed);
            }
            return events;
        }
        GamePhase::GameOver => {
            state.title.fade();
            if input.restart || input.idle_mode {
                state.restart();
                events.push(GameEvent::Restarted);
            }
            return events;
        }
        GamePhase::Playing => {}
    }

    state.title.fade();
    state.backdrop.update();

    // Idle/demo mode - steer toward the next platform
    let intent = if input.idle_mode {
        autopilot_intent(state)
    } else {
        input.intent
    };
    match intent {
        MoveIntent::Left => state.player.move_left(),
        MoveIntent::Right => state.player.move_right(),
        MoveIntent::None => state.player.stop_moving(),
    }

    generator::extend(
        &mut state.world,
        &mut state.rng,
        &state.tuning,
        state.screen,
        state.camera.y,
    );

    state.power_ups.update(now_ms);
    state.player.apply_power_ups(&state.power_ups, &state.tuning);
    state.player.update(&state.tuning, state.screen.width);

    let landing =
        collision::resolve_landing(&mut state.player, &mut state.world, &mut state.score);
    if let Some(landing) = landing {
        if landing.scored {
            log::debug!(
                "Landed on platform {} (score {})",
                landing.platform_id,
                state.score.current
            );
        }
        events.push(GameEvent::Landed {
            platform_id: landing.platform_id,
            scored: landing.scored,
        });
    }

    let collected = collision::collect_power_ups(
        &state.player,
        &mut state.world,
        &mut state.power_ups,
        now_ms,
    );
    for kind in collected {
        log::debug!("Collected power-up: {:?}", kind);
        events.push(GameEvent::PowerUpCollected(kind));
    }

    let enemies = collision::resolve_enemies(
        &state.player,
        &mut state.world,
        &mut state.power_ups,
        &state.tuning,
        state.screen.width,
    );
    events.extend(
        enemies
            .absorbed
            .iter()
            .map(|&id| GameEvent::ShieldAbsorbed { enemy_id: Some(id) }),
    );
    if enemies.fatal.is_some() {
        end_run(state, LossCause::Enemy, &mut events);
        return events;
    }

    state.camera.follow(
        state.player.pos.y,
        state.screen.height,
        state.tuning.camera_smoothing,
    );

    generator::cull(
        &mut state.world,
        state.camera.y,
        state.screen,
        state.tuning.cull_margin,
    );

    // Fell off the bottom of the view
    if state.player.pos.y > state.camera.bottom(state.screen.height) {
        if state.power_ups.use_shield() {
            // Recentered mid-air; there may be no platform underneath
            state.player.pos.y = state.camera.y + state.screen.height / 2.0;
            state.player.vel.y = 0.0;
            events.push(GameEvent::ShieldAbsorbed { enemy_id: None });
            log::debug!("Shield saved the player");
        } else {
            end_run(state, LossCause::Fell, &mut events);
        }
    }

    events
}

fn end_run(state: &mut GameState, cause: LossCause, events: &mut Vec<GameEvent>) {
    state.phase = GamePhase::GameOver;
    state.score.merge_best(state.score.current);
    log::info!(
        "Game over ({:?}): score {}, best {}",
        cause,
        state.score.current,
        state.score.best
    );
    events.push(GameEvent::GameOver {
        score: state.score.current,
        best: state.score.best,
        cause,
    });
}

/// Steer toward the platform the player will meet next.
///
/// Rising: the lowest platform above the feet. Falling: the nearest one at
/// or below the feet.
fn autopilot_intent(state: &GameState) -> MoveIntent {
    let player = &state.player;
    let feet = player.bottom();
    let rising = player.vel.y < 0.0;

    let target = state
        .world
        .platforms
        .iter()
        .filter(|p| if rising { p.top() < feet } else { p.top() >= feet })
        .min_by(|a, b| (a.top() - feet).abs().total_cmp(&(b.top() - feet).abs()));

    let Some(target) = target else {
        return MoveIntent::None;
    };
    let offset = target.center_x() - player.center().x;
    let tolerance = (target.width - player.width).max(0.0) / 4.0;
    if offset < -tolerance {
        MoveIntent::Left
    } else if offset > tolerance {
        MoveIntent::Right
    } else {
        MoveIntent::None
    }
}
