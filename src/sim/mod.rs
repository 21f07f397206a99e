//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod physics;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionOutcome};
pub use level::LevelDelta;
pub use snapshot::Snapshot;
pub use state::{
    Actor, Camera, Collectible, GamePhase, GameState, Platform, PlatformKind, SessionStats,
};
pub use tick::{TickEvents, TickInput, tick};
