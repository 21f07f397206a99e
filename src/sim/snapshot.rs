//! Read-only view for an external renderer
//!
//! The core draws nothing; once per tick it exposes the live world as a
//! borrow so a renderer (or test harness) can read without copying.

use serde::Serialize;

use super::state::{Actor, Camera, Collectible, GamePhase, GameState, Platform, SessionStats};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub actor: &'a Actor,
    pub platforms: &'a [Platform],
    pub collectibles: &'a [Collectible],
    pub camera: Camera,
    pub stats: SessionStats,
}

impl GameState {
    /// Borrow the current frame for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            actor: &self.actor,
            platforms: &self.platforms,
            collectibles: &self.collectibles,
            camera: self.camera,
            stats: self.stats,
        }
    }
}
