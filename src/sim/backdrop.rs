//! Cosmetic animation: star field and title screen fades
//!
//! None of this feeds back into gameplay. It is advanced by the tick so the
//! title screen has something to animate before play starts.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Screen, random_in};
use crate::consts::{TAP_ALPHA_MAX, TAP_ALPHA_MIN, TAP_ALPHA_STEP, TITLE_FADE_STEP};

/// One star layer: count, size range, brightness range, twinkle speed range
struct StarLayer {
    count: usize,
    size: (f32, f32),
    brightness: (u8, u8),
    twinkle: (f32, f32),
}

const LAYERS: [StarLayer; 3] = [
    StarLayer {
        count: 100,
        size: (1.0, 3.0),
        brightness: (100, 200),
        twinkle: (0.01, 0.03),
    },
    StarLayer {
        count: 50,
        size: (2.0, 5.0),
        brightness: (150, 255),
        twinkle: (0.02, 0.05),
    },
    StarLayer {
        count: 20,
        size: (3.0, 7.0),
        brightness: (255, 255),
        twinkle: (0.03, 0.07),
    },
];

/// A background star in screen space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub brightness: u8,
    pub twinkle_speed: f32,
    pub phase: f32,
}

impl Star {
    /// Current alpha (half to full brightness)
    pub fn alpha(&self) -> u8 {
        (self.brightness as f32 * (0.5 + 0.5 * self.phase.sin())).clamp(0.0, 255.0) as u8
    }
}

/// Twinkling star field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Backdrop {
    pub stars: Vec<Star>,
}

impl Backdrop {
    pub fn new(rng: &mut Pcg32, screen: Screen) -> Self {
        let mut stars = Vec::with_capacity(LAYERS.iter().map(|l| l.count).sum());
        for layer in &LAYERS {
            for _ in 0..layer.count {
                let (lo, hi) = layer.brightness;
                stars.push(Star {
                    x: random_in(rng, 0.0, screen.width),
                    y: random_in(rng, 0.0, screen.height),
                    size: random_in(rng, layer.size.0, layer.size.1),
                    brightness: rng.random_range(lo..=hi),
                    twinkle_speed: random_in(rng, layer.twinkle.0, layer.twinkle.1),
                    phase: random_in(rng, 0.0, std::f32::consts::TAU),
                });
            }
        }
        Self { stars }
    }

    pub fn update(&mut self) {
        for star in &mut self.stars {
            star.phase = (star.phase + star.twinkle_speed) % std::f32::consts::TAU;
        }
    }
}

/// Title overlay state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TitleFx {
    /// Title text opacity (0-255); fades once play starts
    pub title_alpha: f32,
    /// "Tap to start" opacity, blinking while on the title
    pub tap_alpha: i32,
    tap_step: i32,
}

impl Default for TitleFx {
    fn default() -> Self {
        Self {
            title_alpha: 255.0,
            tap_alpha: TAP_ALPHA_MAX,
            tap_step: -TAP_ALPHA_STEP,
        }
    }
}

impl TitleFx {
    /// Advance the blink while waiting on the title screen
    pub fn blink(&mut self) {
        self.tap_alpha += self.tap_step;
        if self.tap_alpha <= TAP_ALPHA_MIN || self.tap_alpha >= TAP_ALPHA_MAX {
            self.tap_step = -self.tap_step;
        }
        self.tap_alpha = self.tap_alpha.clamp(TAP_ALPHA_MIN, TAP_ALPHA_MAX);
    }

    /// Fade the title out after the first tap
    pub fn fade(&mut self) {
        self.title_alpha = (self.title_alpha - TITLE_FADE_STEP).max(0.0);
    }

    /// Restarts skip the title entirely
    pub fn skip(&mut self) {
        self.title_alpha = 0.0;
    }
}
