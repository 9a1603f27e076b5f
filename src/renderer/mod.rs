//! Rendering boundary
//!
//! The game loop hands an immutable `Snapshot` to a `Renderer` once per
//! tick. Drawing itself happens outside this crate; the renderers here are
//! headless.

pub mod headless;
pub mod snapshot;

pub use headless::{JsonLinesRenderer, LogRenderer};
pub use snapshot::{EffectView, EnemyView, Snapshot};

/// Consumer of per-tick snapshots, called on the loop thread
pub trait Renderer: Send {
    fn present(&mut self, snapshot: &Snapshot);
}
