//! Vertical camera that follows upward progress only

use serde::{Deserialize, Serialize};

/// Scroll offset subtracted from world y to get screen y
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub y: f32,
    pub target_y: f32,
}

impl Camera {
    /// Retarget when the player rises above mid-screen, then ease toward the target.
    ///
    /// The target only moves up: while the view is still catching up, a player
    /// dropping back inside the upper half must not pull the target down.
    pub fn follow(&mut self, player_y: f32, screen_height: f32, smoothing: f32) {
        let half = screen_height / 2.0;
        if player_y - self.y < half {
            self.target_y = self.target_y.min(player_y - half);
        }
        self.y += (self.target_y - self.y) * smoothing;
    }

    /// World y of the bottom edge of the view
    pub fn bottom(&self, screen_height: f32) -> f32 {
        self.y + screen_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f32 = 1280.0;

    #[test]
    fn test_ignores_player_below_midpoint() {
        let mut cam = Camera::default();
        cam.follow(900.0, H, 0.15);
        assert_eq!(cam, Camera::default());
    }

    #[test]
    fn test_retargets_when_player_rises() {
        let mut cam = Camera::default();
        cam.follow(400.0, H, 0.15);
        assert_eq!(cam.target_y, 400.0 - H / 2.0);
        assert!((cam.y - cam.target_y * 0.15).abs() < 1e-4);
    }

    #[test]
    fn test_eases_without_overshoot() {
        let mut cam = Camera::default();
        cam.follow(100.0, H, 0.15);
        let target = cam.target_y;
        let mut last = cam.y;
        for _ in 0..200 {
            // Player now falling back down; target must hold
            cam.follow(2_000.0, H, 0.15);
            assert_eq!(cam.target_y, target);
            assert!(cam.y <= last && cam.y >= target);
            last = cam.y;
        }
        assert!((cam.y - target).abs() < 0.01);
    }

    #[test]
    fn test_target_never_moves_down() {
        let mut cam = Camera::default();
        let mut highest = f32::MAX;
        for y in [500.0, 300.0, 700.0, -200.0, 900.0, -100.0, -600.0] {
            cam.follow(y, H, 0.15);
            highest = highest.min(cam.target_y);
            assert!(cam.target_y <= highest + f32::EPSILON);
        }
    }
}
