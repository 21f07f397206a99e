//! Game state and core simulation types
//!
//! All state that must be persisted for replay/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::wrap_phase;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for an explicit start
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended; inert until an explicit reset
    GameOver,
}

/// The player-controlled runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Resting on a platform (gravity suspended while set)
    pub grounded: bool,
    /// Top edge at the start of the current tick, for one-sided landings
    #[serde(default)]
    pub prev_top: f32,
    /// Run-cycle animation phase
    #[serde(default)]
    pub anim_phase: f32,
}

impl Actor {
    /// Fresh actor at the session spawn point
    pub fn spawn() -> Self {
        Self {
            pos: Vec2::new(ACTOR_START_X, ACTOR_START_Y),
            vel: Vec2::ZERO,
            size: Vec2::new(ACTOR_W, ACTOR_H),
            grounded: false,
            prev_top: ACTOR_START_Y,
            anim_phase: 0.0,
        }
    }

    /// Bottom edge (feet) in world space
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Platform types
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Static,
    /// Bobs vertically around its spawn height
    Oscillating { origin_y: f32, phase: f32 },
}

/// A platform entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PlatformKind,
}

impl Platform {
    /// Advance oscillation by `k` ticks; static platforms don't move
    pub fn update_motion(&mut self, amplitude: f32, rate: f32, k: f32) {
        if let PlatformKind::Oscillating { origin_y, phase } = &mut self.kind {
            *phase = wrap_phase(*phase + rate * k);
            self.pos.y = *origin_y + amplitude * phase.sin();
        }
    }

    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A collectible entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Idle-spin phase for rendering
    #[serde(default)]
    pub spin: f32,
}

impl Collectible {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Pure projection state derived from the actor each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
}

impl Camera {
    /// Lead the actor horizontally; follow upward but never below the baseline
    pub fn follow(actor: &Actor) -> Self {
        Self {
            pos: Vec2::new(
                actor.pos.x - CAMERA_OFFSET_X,
                (actor.pos.y - CAMERA_OFFSET_Y).min(0.0),
            ),
        }
    }
}

/// Per-session counters handed to the persistence sink at game over
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Monotonic score (time survived plus collectible bonuses)
    pub score: u64,
    pub collectibles_collected: u32,
    /// Seconds spent in Playing
    pub elapsed_seconds: f32,
    /// Set on the tick the actor falls past the bottom boundary
    pub terminal: bool,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Level-generation RNG (serialized so a restored state replays)
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub actor: Actor,
    /// Live platforms (sorted by id for determinism)
    pub platforms: Vec<Platform>,
    /// Live collectibles (sorted by id for determinism)
    pub collectibles: Vec<Collectible>,
    /// View derived from the actor each tick
    pub camera: Camera,
    /// Session counters
    pub stats: SessionStats,
    /// Balance knobs (host-overridable, sanitized on construction)
    pub tuning: Tuning,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and balance knobs
    pub fn new(seed: u64, mut tuning: Tuning) -> Self {
        tuning.sanitize();
        let actor = Actor::spawn();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Ready,
            time_ticks: 0,
            camera: Camera::follow(&actor),
            actor,
            platforms: Vec::new(),
            collectibles: Vec::new(),
            stats: SessionStats::default(),
            tuning,
            next_id: 1,
        }
    }

    /// New state with default balance
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(seed, Tuning::default())
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Restart the RNG stream from the stored seed (new session, same run)
    pub fn reseed(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
    }

    /// Ensure level objects are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.platforms.sort_by_key(|p| p.id);
        self.collectibles.sort_by_key(|c| c.id);
    }
}
