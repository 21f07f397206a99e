//! Procedural runway generation
//!
//! Platforms spawn ahead of the actor and retire behind the camera, keeping
//! the live set small no matter how long a run lasts. All randomness comes
//! from the seeded RNG in `GameState`, so a run replays from its seed.

use glam::Vec2;
use rand::Rng;

use super::state::{Collectible, GameState, Platform, PlatformKind};
use crate::consts::{TICK_DT, TOP_BOUNDARY};
use crate::wrap_phase;

/// Spawn/retire counts for one advance pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelDelta {
    pub spawned: u32,
    pub retired: u32,
}

/// Lay out the starting runway: one wide platform directly under the spawn
/// point, then normal generation fills the view ahead
pub fn seed_runway(state: &mut GameState) {
    state.platforms.clear();
    state.collectibles.clear();

    let start_w = state.tuning.level.start_platform_w;
    let height = state.tuning.level.platform_h;
    let pos = Vec2::new(
        state.actor.pos.x + state.actor.size.x / 2.0 - start_w / 2.0,
        state.actor.bottom(),
    );
    let id = state.next_entity_id();
    state.platforms.push(Platform {
        id,
        pos,
        size: Vec2::new(start_w, height),
        kind: PlatformKind::Static,
    });

    advance(state);
    log::info!("Runway seeded: {} platforms ahead", state.platforms.len());
}

/// Keep the runway generated ahead of the actor and retire what has
/// scrolled behind the view
pub fn advance(state: &mut GameState) -> LevelDelta {
    let t = state.tuning.level.clone();
    let mut delta = LevelDelta::default();

    let behind = state.camera.pos.x - t.retire_margin;
    let before = state.platforms.len() + state.collectibles.len();
    state.platforms.retain(|p| p.right_edge() >= behind);
    state.collectibles.retain(|c| c.pos.x + c.size.x >= behind);
    delta.retired = (before - state.platforms.len() - state.collectibles.len()) as u32;

    let horizon = state.actor.pos.x + t.spawn_ahead;
    let mut rightmost = state
        .platforms
        .iter()
        .map(|p| p.right_edge())
        .fold(f32::MIN, f32::max);
    if state.platforms.is_empty() {
        // Fresh runway grows from the actor
        rightmost = state.actor.pos.x;
    }

    while rightmost < horizon {
        let gap = state.rng.random_range(t.gap_min..=t.gap_max);
        let width = state.rng.random_range(t.platform_w_min..=t.platform_w_max);
        let x = rightmost + gap;

        // Oscillating platforms need headroom for their whole swing
        let oscillating = state.rng.random_bool(t.oscillating_chance);
        let clearance = TOP_BOUNDARY
            + t.min_clearance
            + if oscillating { t.oscillation_amplitude } else { 0.0 };
        let origin_y = state
            .rng
            .random_range(t.platform_y_min..=t.platform_y_max)
            .max(clearance);

        let (kind, y) = if oscillating {
            let phase = state.rng.random_range(0.0..std::f32::consts::TAU);
            (
                PlatformKind::Oscillating { origin_y, phase },
                origin_y + t.oscillation_amplitude * phase.sin(),
            )
        } else {
            (PlatformKind::Static, origin_y)
        };

        let id = state.next_entity_id();
        state.platforms.push(Platform {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(width, t.platform_h),
            kind,
        });
        delta.spawned += 1;

        if state.rng.random_bool(t.collectible_chance) {
            let size = t.collectible_size;
            let id = state.next_entity_id();
            state.collectibles.push(Collectible {
                id,
                pos: Vec2::new(
                    x + width / 2.0 - size / 2.0,
                    origin_y - t.collectible_hover - size,
                ),
                size: Vec2::new(size, size),
                spin: 0.0,
            });
        }

        rightmost = x + width;
    }

    if delta.spawned > 0 || delta.retired > 0 {
        log::trace!(
            "Runway advance: +{} -{} ({} platforms live)",
            delta.spawned,
            delta.retired,
            state.platforms.len()
        );
    }

    delta
}

/// Per-tick motion for level objects: platform oscillation, collectible spin
pub fn update_motion(state: &mut GameState, dt: f32) {
    let k = dt / TICK_DT;
    if !k.is_finite() || k <= 0.0 {
        return;
    }

    let amplitude = state.tuning.level.oscillation_amplitude;
    let rate = state.tuning.level.oscillation_rate;
    let spin_rate = state.tuning.level.collectible_spin_rate;

    for platform in &mut state.platforms {
        platform.update_motion(amplitude, rate, k);
    }
    for collectible in &mut state.collectibles {
        collectible.spin = wrap_phase(collectible.spin + spin_rate * k);
    }
}
