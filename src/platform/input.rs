//! Pointer input mapping
//!
//! A touch or mouse pointer steers by where it is held relative to the
//! player; taps also drive the title and game-over screens.

use serde::{Deserialize, Serialize};

use crate::consts::INPUT_DEAD_ZONE;
use crate::sim::{GamePhase, MoveIntent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Pointer sample in screen x
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f32,
    pub phase: PointerPhase,
}

/// What a pointer event means for the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Steer(MoveIntent),
    Start,
    Restart,
}

/// Map a pointer event to a command.
///
/// Title starts on press, GameOver restarts on release. While playing a
/// held pointer steers toward its side of the player, with a dead zone
/// around the player's center; releasing stops steering. Returns None when
/// the event means nothing in the current phase.
pub fn map_pointer(event: PointerEvent, phase: GamePhase, player_center_x: f32) -> Option<Command> {
    match phase {
        GamePhase::Title => (event.phase == PointerPhase::Down).then_some(Command::Start),
        GamePhase::GameOver => (event.phase == PointerPhase::Up).then_some(Command::Restart),
        GamePhase::Playing => {
            let intent = match event.phase {
                PointerPhase::Up => MoveIntent::None,
                PointerPhase::Down | PointerPhase::Move => {
                    if event.x < player_center_x - INPUT_DEAD_ZONE {
                        MoveIntent::Left
                    } else if event.x > player_center_x + INPUT_DEAD_ZONE {
                        MoveIntent::Right
                    } else {
                        MoveIntent::None
                    }
                }
            };
            Some(Command::Steer(intent))
        }
    }
}
