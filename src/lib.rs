//! Skyflap - a viewport-scaled flappy arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, pipes, phase machine)
//! - `renderer`: Canvas-2d rendering (wasm only)
//! - `bestscore`: Persisted best score
//! - `settings`: Presentation preferences

pub mod bestscore;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use bestscore::BestScore;
pub use settings::Settings;

/// Game tuning constants
pub mod consts {
    /// Maximum frame delta fed to the simulation (guards frame hitches)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Smallest viewport the game is laid out for
    pub const MIN_VIEW_WIDTH: f32 = 320.0;
    pub const MIN_VIEW_HEIGHT: f32 = 480.0;

    /// Seconds between pipe spawns
    pub const SPAWN_INTERVAL: f32 = 1.4;
    /// Delay before the first pipe of a run
    pub const START_SPAWN_DELAY: f32 = 0.35;
    /// Collision immunity window after a run starts
    pub const GRACE_PERIOD: f32 = 0.45;

    /// Bird tilt when flapping (radians)
    pub const ROTATION_UP: f32 = -0.5;
    /// Bird tilt at terminal fall speed (radians)
    pub const ROTATION_DOWN: f32 = 0.85;
    /// Extra nose-down tilt while dying (cosmetic)
    pub const DYING_TILT_EXTRA: f32 = 0.35;
    /// Exponential easing rate toward the dying tilt (per second)
    pub const DYING_TILT_RATE: f32 = 6.0;
    /// Downward kick when a run ends, as a fraction of max fall speed
    pub const DYING_KICK_RATIO: f32 = 0.35;

    /// Idle float animation in the ready phase
    pub const READY_BOB_FREQ: f32 = 3.0;
    pub const READY_BOB_AMPLITUDE: f32 = 0.015;
    pub const READY_TILT_FREQ: f32 = 2.6;
    pub const READY_TILT_AMPLITUDE: f32 = 0.12;

    /// Impact shake presets (strength px, duration s)
    pub const SHAKE_PIPE_HIT: (f32, f32) = (14.0, 0.4);
    pub const SHAKE_GROUND_HIT: (f32, f32) = (18.0, 0.45);
    pub const SHAKE_LANDING: (f32, f32) = (20.0, 0.3);
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
