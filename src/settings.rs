//! Game settings and preferences
//!
//! Loaded from a JSON file next to the score file. Missing or malformed
//! files fall back to defaults so a bad config never stops a run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE_HZ;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Loop ===
    /// Simulation ticks per second
    pub tick_rate_hz: u32,
    /// Fixed RNG seed; a fresh seed is drawn per run when unset
    pub seed: Option<u64>,

    // === Persistence ===
    /// Leaderboard JSON file used by the local score store
    pub score_file: PathBuf,

    // === Demo ===
    /// How long the headless binary plays before exiting
    pub demo_seconds: u64,
    /// Let the autopilot steer
    pub autopilot: bool,
    /// Write every snapshot as a JSON line to this file
    pub trace_file: Option<PathBuf>,

    /// Gameplay balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 720.0,
            screen_height: 1280.0,

            tick_rate_hz: TICK_RATE_HZ,
            seed: None,

            score_file: PathBuf::from("space_jumper_scores.json"),

            demo_seconds: 30,
            autopilot: true,
            trace_file: None,

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({:#})", e);
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file, reporting why it failed
    pub fn try_load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&json)
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        Ok(settings.sanitized())
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing settings")?;
        fs::write(path, json).with_context(|| format!("writing settings file {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Clamp screen and loop values into usable ranges
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.screen_width > self.tuning.player_size) {
            log::warn!("screen_width {} too small, using default", self.screen_width);
            self.screen_width = defaults.screen_width;
        }
        if !(self.screen_height > 0.0) {
            log::warn!("screen_height {} invalid, using default", self.screen_height);
            self.screen_height = defaults.screen_height;
        }
        self.tick_rate_hz = self.tick_rate_hz.clamp(1, 1000);
        self.tuning = self.tuning.sanitized();
        self
    }

    /// Target duration of one tick
    pub fn tick_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }
}
