//! Viewport-derived layout and physics constants
//!
//! Everything that scales with the window lives here so gameplay feel is
//! resolution-independent. Recomputed on every resize.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Layout constants derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Viewport width (floored to the minimum)
    pub width: f32,
    /// Viewport height (floored to the minimum)
    pub height: f32,
    /// Top of the ground strip
    pub ground_y: f32,
    pub ground_height: f32,
    /// Nominal vertical gap between pipe halves
    pub pipe_gap: f32,
    pub pipe_width: f32,
    /// Horizontal scroll speed (px/s)
    pub pipe_speed: f32,
    /// Seconds between pipe spawns
    pub spawn_interval: f32,
    pub bird_width: f32,
    pub bird_height: f32,
}

impl Metrics {
    /// Derive layout constants from viewport dimensions.
    ///
    /// Inputs are floored to 320x480; non-finite values fall back to the
    /// minimums rather than poisoning downstream math.
    pub fn resolve(width: f32, height: f32) -> Self {
        let width = if width.is_finite() {
            width.max(MIN_VIEW_WIDTH)
        } else {
            MIN_VIEW_WIDTH
        };
        let height = if height.is_finite() {
            height.max(MIN_VIEW_HEIGHT)
        } else {
            MIN_VIEW_HEIGHT
        };

        let ground_height = (height * 0.11).max(48.0);
        let bird_height = (height * 0.06).max(28.0);

        Self {
            width,
            height,
            ground_y: height - ground_height,
            ground_height,
            pipe_gap: (height * 0.32).max(180.0),
            pipe_width: (width * 0.09).max(44.0),
            pipe_speed: (width * 0.34).max(200.0),
            spawn_interval: SPAWN_INTERVAL,
            bird_width: bird_height * 1.25,
            bird_height,
        }
    }

    /// Resting x for the bird's left edge (leading quarter of the screen)
    pub fn bird_x(&self) -> f32 {
        self.width * 0.25 - self.bird_width / 2.0
    }
}

/// Physics constants, derived once per resize and immutable in between
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Downward acceleration (px/s^2)
    pub gravity: f32,
    /// Velocity set by a flap (negative = up)
    pub jump_velocity: f32,
    /// Terminal fall speed (px/s)
    pub max_fall_speed: f32,
    pub rotation_up: f32,
    pub rotation_down: f32,
}

impl PhysicsConfig {
    /// Scale physics with viewport height so the arc of a flap covers the
    /// same fraction of the screen at any resolution.
    pub fn derive(height: f32) -> Self {
        let height = if height.is_finite() {
            height.max(MIN_VIEW_HEIGHT)
        } else {
            MIN_VIEW_HEIGHT
        };
        Self {
            gravity: height * 5.6,
            jump_velocity: -height * 1.95,
            max_fall_speed: height * 3.3,
            rotation_up: ROTATION_UP,
            rotation_down: ROTATION_DOWN,
        }
    }
}
