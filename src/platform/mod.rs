//! Platform abstraction layer
//!
//! Keeps host differences out of the simulation:
//! - Time (monotonic wall clock in milliseconds)
//! - Input events (pointer to steering intent and commands)

pub mod input;
pub mod time;

pub use input::{Command, PointerEvent, PointerPhase, map_pointer};
pub use time::{Clock, ManualClock, SystemClock};
