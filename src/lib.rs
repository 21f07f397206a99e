//! Echo Runner - the simulation core of a voice-controlled platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, level generation)
//! - `audio`: Microphone capture hand-off and voice-level extraction
//! - `runner`: Fixed-timestep driver wiring audio, sim, and persistence
//! - `session`: Score bookkeeping and collaborator seams
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod runner;
pub mod session;
pub mod sim;
pub mod tuning;

pub use runner::{Controls, GameRunner};
pub use session::{BestScoreStore, ScoreSink, SessionSummary};
pub use sim::{GamePhase, GameState, Snapshot};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal tick rate (display-refresh cadence)
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep
    pub const TICK_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 6;

    /// World boundaries (y-down; the actor dies past the bottom)
    pub const TOP_BOUNDARY: f32 = 0.0;
    pub const BOTTOM_BOUNDARY: f32 = 700.0;

    /// Actor hitbox
    pub const ACTOR_W: f32 = 40.0;
    pub const ACTOR_H: f32 = 40.0;
    /// Actor spawn point at session start
    pub const ACTOR_START_X: f32 = 100.0;
    pub const ACTOR_START_Y: f32 = 300.0;

    /// Camera lead: how far the view sits ahead of / above the actor
    pub const CAMERA_OFFSET_X: f32 = 120.0;
    pub const CAMERA_OFFSET_Y: f32 = 300.0;
}

/// Wrap a phase counter to [0, 2π)
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    use std::f32::consts::TAU;
    phase.rem_euclid(TAU)
}
