//! Headless renderers for the native binary and tests

use std::io::Write;

use super::{Renderer, Snapshot};
use crate::sim::GamePhase;

/// Logs phase changes and a periodic status line
#[derive(Debug)]
pub struct LogRenderer {
    /// Ticks between status lines (0 disables them)
    interval: u64,
    last_phase: Option<GamePhase>,
    frames: u64,
}

impl LogRenderer {
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            last_phase: None,
            frames: 0,
        }
    }

    /// Snapshots presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn present(&mut self, snapshot: &Snapshot) {
        self.frames += 1;

        if self.last_phase != Some(snapshot.phase) {
            log::info!(
                "[tick {}] {:?} (score {}, best {})",
                snapshot.tick,
                snapshot.phase,
                snapshot.score,
                snapshot.best
            );
            self.last_phase = Some(snapshot.phase);
        }

        if self.interval > 0 && self.frames % self.interval == 0 {
            let effects: Vec<String> = snapshot
                .effects
                .iter()
                .map(|e| format!("{:?} {}s", e.kind, e.time_left_secs))
                .collect();
            log::debug!(
                "[tick {}] score {} best {} | player y {:.0} (screen {:.0}) | {} platforms, {} enemies, {} power-ups | effects [{}]",
                snapshot.tick,
                snapshot.score,
                snapshot.best,
                snapshot.player.pos.y,
                snapshot.player_screen_y(),
                snapshot.platforms.len(),
                snapshot.enemies.len(),
                snapshot.power_ups.len(),
                effects.join(", ")
            );
        }
    }
}

/// Writes each snapshot as one line of JSON.
///
/// The first write error is logged and disables the renderer; a broken trace
/// file never stops the game.
pub struct JsonLinesRenderer<W: Write + Send> {
    out: Option<W>,
}

impl<W: Write + Send> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out: Some(out) }
    }

    /// Flush and hand back the writer, if it is still healthy
    pub fn into_inner(mut self) -> Option<W> {
        let mut out = self.out.take()?;
        out.flush().ok()?;
        Some(out)
    }

    fn write_line(out: &mut W, snapshot: &Snapshot) -> anyhow::Result<()> {
        serde_json::to_writer(&mut *out, snapshot)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write + Send> Renderer for JsonLinesRenderer<W> {
    fn present(&mut self, snapshot: &Snapshot) {
        let Some(out) = self.out.as_mut() else {
            return;
        };
        if let Err(e) = Self::write_line(out, snapshot) {
            log::warn!("Trace output failed, disabling it: {:#}", e);
            self.out = None;
        }
    }
}
