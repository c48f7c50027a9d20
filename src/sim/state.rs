//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in one owned aggregate,
//! `GameState`. There are no ambient globals; the driver owns the state and
//! every operation works on it explicitly.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::environment::{self, Cloud, Theme};
use super::metrics::{Metrics, PhysicsConfig};
use crate::consts::*;
use crate::lerp;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Idle float animation, waiting for the first input
    Ready,
    /// Active run
    Playing,
    /// Post-collision fall; input ignored, no scoring or spawning
    Dying,
    /// Terminal until the primary action restarts
    Over,
}

/// Side effects the driver must relay to external collaborators
/// (overlay controller, score display, persistence)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PhaseChanged(Phase),
    Scored { total: u32 },
    NewBest { score: u32 },
}

/// The controlled character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity (positive = down)
    pub velocity: f32,
    /// Visual tilt in radians (positive = nose down)
    pub rotation: f32,
}

impl Bird {
    /// Accelerate downward, clamped to terminal fall speed
    pub fn apply_gravity(&mut self, physics: &PhysicsConfig, dt: f32) {
        self.velocity = (self.velocity + physics.gravity * dt).min(physics.max_fall_speed);
    }

    /// Advance vertical position by the current velocity
    pub fn integrate(&mut self, dt: f32) {
        self.y += self.velocity * dt;
    }

    /// Sudden impulse response: velocity set, tilt snapped up
    pub fn flap(&mut self, physics: &PhysicsConfig) {
        self.velocity = physics.jump_velocity;
        self.rotation = physics.rotation_up;
    }

    /// Fraction of terminal fall speed, clamped to [0, 1]
    pub fn fall_ratio(&self, physics: &PhysicsConfig) -> f32 {
        (self.velocity / physics.max_fall_speed).clamp(0.0, 1.0)
    }

    /// Normal-flight tilt: interpolates nose-down as the fall speeds up
    pub fn update_tilt_falling(&mut self, physics: &PhysicsConfig) {
        self.rotation = lerp(
            physics.rotation_up,
            physics.rotation_down,
            self.fall_ratio(physics),
        );
    }

    /// Dying tilt: exponential ease toward an exaggerated nose-down
    pub fn ease_dying_tilt(&mut self, physics: &PhysicsConfig, dt: f32) {
        let target = physics.rotation_down + DYING_TILT_EXTRA;
        self.rotation = lerp(self.rotation, target, (dt * DYING_TILT_RATE).min(1.0));
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A gated obstacle scrolling in from the right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Bottom of the upper pipe half (top of the gap)
    pub top_height: f32,
    /// Top of the lower pipe half (bottom of the gap)
    pub bottom_y: f32,
    pub scored: bool,
}

impl Pipe {
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }
}

/// Transient impact shake; affects only the presentation offset
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Shake {
    pub strength: f32,
    pub duration: f32,
    pub time: f32,
}

impl Shake {
    /// Start (or strengthen) a shake. A stronger concurrent impact wins so
    /// big hits stay punchy.
    pub fn trigger(&mut self, strength: f32, duration: f32) {
        if strength <= 0.0 || duration <= 0.0 {
            *self = Self::default();
            return;
        }
        if self.duration > 0.0 {
            self.strength = self.strength.max(strength);
            self.duration = duration.max(self.duration - self.time);
            self.time = 0.0;
        } else {
            self.strength = strength;
            self.duration = duration;
            self.time = 0.0;
        }
    }

    /// Advance the shake and sample a presentation offset
    pub fn offset(&mut self, rng: &mut Pcg32, dt: f32) -> Vec2 {
        if self.duration <= 0.0 {
            return Vec2::ZERO;
        }

        self.time += dt;
        if self.time >= self.duration {
            *self = Self::default();
            return Vec2::ZERO;
        }

        let damping = 1.0 - self.time / self.duration;
        let magnitude = self.strength * damping;
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        Vec2::new(angle.cos(), angle.sin()) * magnitude
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: Phase,
    /// Score for the current run
    pub score: u32,
    /// Best score across runs (persisted by the driver)
    pub best: u32,
    pub bird: Bird,
    pub physics: PhysicsConfig,
    pub metrics: Metrics,
    /// Oldest pipe first; spatial order matches index order
    pub pipes: Vec<Pipe>,
    pub spawn_timer: f32,
    /// Elapsed time in the ready phase (drives the idle float)
    pub ready_time: f32,
    /// Collision immunity remaining after a run start
    pub grace_timer: f32,
    /// Scrolling ground texture offset (cosmetic)
    pub ground_offset: f32,
    pub shake: Shake,
    /// Presentation offset sampled from the shake this tick
    pub shake_offset: Vec2,
    pub theme: Theme,
    pub clouds: Vec<Cloud>,
    pub rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    pending_primary: bool,
}

impl GameState {
    /// Create a fresh game in the ready phase
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let metrics = Metrics::resolve(width, height);
        let physics = PhysicsConfig::derive(metrics.height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let theme = Theme::randomize(&mut rng, &metrics);
        let clouds = environment::generate_clouds(&mut rng, &metrics);

        let bird = Bird {
            x: metrics.bird_x(),
            y: metrics.height * 0.4,
            width: metrics.bird_width,
            height: metrics.bird_height,
            velocity: 0.0,
            rotation: 0.0,
        };

        Self {
            seed,
            phase: Phase::Ready,
            score: 0,
            best: 0,
            bird,
            physics,
            metrics,
            pipes: Vec::new(),
            spawn_timer: 0.0,
            ready_time: 0.0,
            grace_timer: 0.0,
            ground_offset: 0.0,
            shake: Shake::default(),
            shake_offset: Vec2::ZERO,
            theme,
            clouds,
            rng,
            events: vec![GameEvent::PhaseChanged(Phase::Ready)],
            pending_primary: false,
        }
    }

    /// Record one edge-triggered primary action for the next tick.
    /// Repeated presses within a frame collapse into one.
    pub fn handle_primary_action(&mut self) {
        self.pending_primary = true;
    }

    /// Advance one frame: drain the queued input edge and tick
    pub fn tick_frame(&mut self, dt: f32) {
        let input = super::tick::TickInput {
            primary: std::mem::take(&mut self.pending_primary),
        };
        super::tick::tick(self, &input, dt);
    }

    /// Viewport changed: re-derive metrics and physics, and restart the
    /// layout-dependent run state. An in-flight run drops back to ready.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.metrics = Metrics::resolve(width, height);
        self.physics = PhysicsConfig::derive(self.metrics.height);
        self.bird.width = self.metrics.bird_width;
        self.bird.height = self.metrics.bird_height;
        self.bird.x = self.metrics.bird_x();

        if matches!(self.phase, Phase::Playing | Phase::Dying) {
            self.set_phase(Phase::Ready);
        }
        self.reset_run();
        log::debug!(
            "resized to {}x{}",
            self.metrics.width,
            self.metrics.height
        );
    }

    /// Enter a phase and notify the driver. Entering ready also resets the
    /// idle pose.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        if phase == Phase::Ready {
            self.ready_time = 0.0;
            self.bird.y = self.metrics.height * 0.4;
            self.bird.velocity = 0.0;
            self.bird.rotation = 0.0;
        }
        self.events.push(GameEvent::PhaseChanged(phase));
    }

    /// Discard all per-run state and roll a fresh environment.
    /// The best score and current phase survive.
    pub fn reset_run(&mut self) {
        let metrics = self.metrics;
        self.theme = Theme::randomize(&mut self.rng, &metrics);
        self.clouds = environment::generate_clouds(&mut self.rng, &metrics);
        self.pipes.clear();
        self.score = 0;
        self.spawn_timer = 0.0;
        self.ground_offset = 0.0;
        self.grace_timer = 0.0;
        self.shake = Shake::default();
        self.shake_offset = Vec2::ZERO;
    }

    /// Spawn one pipe at the right edge. Gap height lands in
    /// [0.26, 0.44] of the viewport height; the gap position keeps a top
    /// margin and leaves room above the ground.
    pub fn spawn_pipe(&mut self) {
        let m = self.metrics;

        let gap = (m.pipe_gap * self.rng.random_range(0.86..1.12))
            .clamp(m.height * 0.26, m.height * 0.44);
        let min_top = m.height * 0.08;
        let max_top = (m.ground_y - gap - m.height * 0.09).max(min_top + 40.0);
        let top_height = self.rng.random_range(min_top..max_top);
        let width = (m.pipe_width * self.rng.random_range(0.92..1.06))
            .clamp(m.pipe_width * 0.85, m.pipe_width * 1.12);

        self.pipes.push(Pipe {
            x: m.width + width,
            width,
            top_height,
            bottom_y: top_height + gap,
            scored: false,
        });
    }

    /// Shift every pipe left by the scroll speed
    pub fn advance_pipes(&mut self, dt: f32) {
        let speed = self.metrics.pipe_speed;
        for pipe in &mut self.pipes {
            pipe.x -= speed * dt;
        }
    }

    /// Score pipes whose trailing edge has passed the bird's leading edge
    /// (exactly once each), then drop pipes fully off-screen. Order is
    /// preserved: oldest pipe stays first.
    pub fn score_and_prune(&mut self) {
        let leading_edge = self.bird.x;
        for pipe in &mut self.pipes {
            if !pipe.scored && pipe.trailing_edge() < leading_edge {
                pipe.scored = true;
                self.score += 1;
                self.events.push(GameEvent::Scored { total: self.score });
            }
        }
        self.pipes.retain(|p| p.trailing_edge() >= -p.width);
    }

    /// Take the events accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
