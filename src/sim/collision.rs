//! Collision detection and response for the runway
//!
//! Everything here is an axis-aligned box. The part that needs care is the
//! one-sided landing rule: the actor lands only while descending, and only
//! if its top edge started the tick above the platform top, so rising or
//! sideways contact passes through instead of snapping.

use glam::Vec2;

use super::state::{Actor, Collectible, Platform};

/// Axis-aligned bounding box (top-left anchored, y-down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test; boxes that only touch at an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }

    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.pos.x < other.right() && self.right() > other.pos.x
    }
}

/// Result of a collision pass
#[derive(Debug, Clone)]
pub struct CollisionOutcome {
    /// Actor ended the tick resting on a platform
    pub grounded: bool,
    /// IDs of collectibles picked up this tick
    pub collected: Vec<u32>,
    /// Actor fell past the bottom boundary (terminal)
    pub fell_through: bool,
}

impl CollisionOutcome {
    pub fn none() -> Self {
        Self {
            grounded: false,
            collected: Vec::new(),
            fell_through: false,
        }
    }
}

/// Landing test against a single platform
///
/// Recognized only while descending (vy >= 0), with horizontal overlap, when
/// the actor's top edge started the tick at or above the platform top and its
/// feet have reached the platform top. The edge pair also catches a fall fast
/// enough to cross the whole platform in one tick.
pub fn landing(actor: &Actor, platform: &Platform) -> bool {
    actor.vel.y >= 0.0
        && actor.aabb().overlaps_x(&platform.aabb())
        && actor.prev_top <= platform.pos.y
        && actor.bottom() >= platform.pos.y
}

/// Resolve actor-vs-platform and actor-vs-collectible contacts
///
/// A recognized landing snaps the actor's feet to the platform top and zeroes
/// vertical velocity. Overlapped collectibles are removed here, in the same
/// pass that reports them, so a pickup can be scored at most once. The
/// grounded flag is re-derived every call; walking off an edge clears it.
pub fn resolve(
    actor: &mut Actor,
    platforms: &[Platform],
    collectibles: &mut Vec<Collectible>,
    bottom_boundary: f32,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::none();

    for platform in platforms {
        if landing(actor, platform) {
            actor.pos.y = platform.pos.y - actor.size.y;
            actor.vel.y = 0.0;
            outcome.grounded = true;
            break;
        }
    }
    actor.grounded = outcome.grounded;

    // Pickups test against the resolved position
    let hitbox = actor.aabb();
    collectibles.retain(|c| {
        if hitbox.overlaps(&c.aabb()) {
            outcome.collected.push(c.id);
            false
        } else {
            true
        }
    });

    // Past the bottom of the world: terminal, not an error
    if actor.pos.y > bottom_boundary {
        outcome.fell_through = true;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlatformKind;

    fn platform_at(x: f32, y: f32, w: f32) -> Platform {
        Platform {
            id: 1,
            pos: Vec2::new(x, y),
            size: Vec2::new(w, 20.0),
            kind: PlatformKind::Static,
        }
    }

    /// Actor mid-fall: top edge was `y - vy` last tick
    fn falling_actor(x: f32, y: f32, vy: f32) -> Actor {
        let mut actor = Actor::spawn();
        actor.pos = Vec2::new(x, y);
        actor.vel = Vec2::new(0.0, vy);
        actor.prev_top = y - vy;
        actor
    }

    #[test]
    fn test_landing_snaps_to_platform_top() {
        let platform = platform_at(80.0, 340.0, 120.0);
        let mut actor = falling_actor(100.0, 305.0, 6.0);

        let outcome = resolve(&mut actor, &[platform], &mut Vec::new(), 700.0);
        assert!(outcome.grounded);
        assert!(actor.grounded);
        assert!((actor.pos.y - 300.0).abs() < 0.001);
        assert!(actor.vel.y.abs() < 0.001);
    }

    #[test]
    fn test_no_landing_while_rising() {
        let platform = platform_at(80.0, 340.0, 120.0);
        // Jumping up through the platform from below
        let mut actor = falling_actor(100.0, 320.0, -12.0);

        let outcome = resolve(&mut actor, &[platform], &mut Vec::new(), 700.0);
        assert!(!outcome.grounded);
        assert!((actor.pos.y - 320.0).abs() < 0.001);
        assert!((actor.vel.y - (-12.0)).abs() < 0.001);
    }

    #[test]
    fn test_no_landing_from_below() {
        let platform = platform_at(80.0, 340.0, 120.0);
        // Falling, but the whole actor started under the platform top
        let mut actor = falling_actor(100.0, 400.0, 4.0);

        let outcome = resolve(&mut actor, &[platform], &mut Vec::new(), 700.0);
        assert!(!outcome.grounded);
        assert!((actor.pos.y - 400.0).abs() < 0.001);
    }

    #[test]
    fn test_fast_fall_cannot_tunnel() {
        let platform = platform_at(80.0, 340.0, 120.0);
        // One tick carried the feet from above the platform to far below it
        let mut actor = falling_actor(100.0, 330.0, 60.0);

        let outcome = resolve(&mut actor, &[platform], &mut Vec::new(), 700.0);
        assert!(outcome.grounded);
        assert!((actor.pos.y - 300.0).abs() < 0.001);
    }

    #[test]
    fn test_resting_actor_stays_grounded() {
        let platforms = [platform_at(80.0, 340.0, 120.0)];
        // At rest: feet exactly on the platform top, no motion this tick
        let mut actor = falling_actor(100.0, 300.0, 0.0);

        for _ in 0..3 {
            let outcome = resolve(&mut actor, &platforms, &mut Vec::new(), 700.0);
            assert!(outcome.grounded);
            assert!((actor.pos.y - 300.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_collectible_collected_once() {
        let mut actor = falling_actor(100.0, 300.0, 0.0);
        let mut collectibles = vec![Collectible {
            id: 7,
            pos: Vec2::new(110.0, 310.0),
            size: Vec2::new(24.0, 24.0),
            spin: 0.0,
        }];

        let outcome = resolve(&mut actor, &[], &mut collectibles, 700.0);
        assert_eq!(outcome.collected, vec![7]);
        assert!(collectibles.is_empty());

        // Gone for good; a second pass finds nothing
        let outcome = resolve(&mut actor, &[], &mut collectibles, 700.0);
        assert!(outcome.collected.is_empty());
    }

    #[test]
    fn test_fell_through_bottom_boundary() {
        let mut actor = falling_actor(100.0, 1000.0, 8.0);

        let outcome = resolve(&mut actor, &[], &mut Vec::new(), 700.0);
        assert!(outcome.fell_through);
        assert!(!outcome.grounded);
    }

    #[test]
    fn test_edge_touch_is_not_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&b));

        let c = Aabb::new(Vec2::new(9.0, 9.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&c));
    }
}
