//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - One synchronous mutation per externally-driven tick
//! - No rendering or platform dependencies

pub mod collision;
pub mod environment;
pub mod metrics;
pub mod state;
pub mod tick;

pub use collision::bird_hits_pipe;
pub use environment::{Cloud, Theme};
pub use metrics::{Metrics, PhysicsConfig};
pub use state::{Bird, GameEvent, GameState, Phase, Pipe, Shake};
pub use tick::{TickInput, tick};
