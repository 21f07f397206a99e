//! Actor kinematics: voice-triggered jumps, gravity, boundary clamps
//!
//! Balance constants are per-tick quantities at the nominal 60 Hz step. `dt`
//! arrives in seconds and is converted to a tick fraction, so a fixed-rate
//! caller reproduces the reference arithmetic exactly and a variable-rate
//! caller time-scales.

use super::state::Actor;
use crate::consts::{TICK_DT, TOP_BOUNDARY};
use crate::tuning::PhysicsTuning;
use crate::wrap_phase;

/// Run-cycle phase advance per pixel of horizontal travel
const ANIM_RATE: f32 = 0.05;

/// Outcome of one physics step
#[derive(Debug, Clone, Copy, Default)]
pub struct StepResult {
    /// A jump impulse fired this step
    pub jumped: bool,
    /// Impulse strength actually applied
    pub jump_power: f32,
}

/// Advance the actor by `dt` seconds under the given voice level
pub fn step(actor: &mut Actor, voice_level: f32, dt: f32, tun: &PhysicsTuning) -> StepResult {
    let mut result = StepResult::default();

    // Tick fraction; invalid dt (negative, zero, NaN, inf) is a no-op
    let k = dt / TICK_DT;
    if !k.is_finite() || k <= 0.0 {
        return result;
    }
    let voice = voice_level.max(0.0);

    actor.prev_top = actor.pos.y;

    // Voice trigger: loud enough, not rising fast, not hugging the ceiling
    if voice > tun.voice_threshold
        && actor.vel.y > tun.jump_gate_vy
        && actor.pos.y > TOP_BOUNDARY + tun.top_safe_margin
    {
        let power = ((voice - tun.voice_threshold) * tun.voice_multiplier)
            .min(tun.jump_power_max)
            .max(tun.jump_power_min);
        actor.vel.y = -power;
        actor.vel.x += tun.forward_nudge;
        result.jumped = true;
        result.jump_power = power;
        // grounded is left alone here; the collision pass re-derives it
    }

    // Gravity only while airborne
    if !actor.grounded {
        actor.vel.y += tun.gravity * k;
    }

    actor.pos += actor.vel * k;

    // Hard ceiling: the actor never leaves the top of the world
    if actor.pos.y < TOP_BOUNDARY {
        actor.pos.y = TOP_BOUNDARY;
        if actor.vel.y < 0.0 {
            actor.vel.y = 0.0;
        }
    }

    actor.vel.x *= tun.damping.powf(k);

    // Run-cycle animation keyed to ground speed
    actor.anim_phase = wrap_phase(actor.anim_phase + actor.vel.x.abs() * ANIM_RATE * k);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn grounded_actor() -> Actor {
        let mut actor = Actor::spawn();
        actor.grounded = true;
        actor
    }

    #[test]
    fn test_strong_voice_jump_is_capped() {
        let tun = PhysicsTuning::default();
        let mut actor = grounded_actor();

        let result = step(&mut actor, 40.0, TICK_DT, &tun);
        assert!(result.jumped);
        // (40 - 25) * 3 = 45, capped at 18
        assert!((result.jump_power - 18.0).abs() < 1e-4);
        assert!((actor.vel.y - (-18.0)).abs() < 1e-4);
    }

    #[test]
    fn test_weak_voice_jump_is_floored() {
        let tun = PhysicsTuning::default();
        let mut actor = grounded_actor();

        let result = step(&mut actor, 26.0, TICK_DT, &tun);
        assert!(result.jumped);
        // (26 - 25) * 3 = 3, floored at 6
        assert!((actor.vel.y - (-6.0)).abs() < 1e-4);
    }

    #[test]
    fn test_airborne_rejump_takes_gravity_in_the_same_step() {
        let tun = PhysicsTuning::default();
        let mut actor = Actor::spawn();
        actor.grounded = false;
        // Near apex, inside the re-jump gate
        actor.vel.y = -2.0;

        let result = step(&mut actor, 26.0, TICK_DT, &tun);
        assert!(result.jumped);
        assert!((result.jump_power - 6.0).abs() < 1e-4);
        // Floored impulse, then the airborne gravity increment
        assert!((actor.vel.y - (-6.0 + tun.gravity)).abs() < 1e-4);
    }

    #[test]
    fn test_voice_at_threshold_does_not_trigger() {
        let tun = PhysicsTuning::default();
        let mut actor = grounded_actor();

        let result = step(&mut actor, tun.voice_threshold, TICK_DT, &tun);
        assert!(!result.jumped);
        assert!(actor.vel.y.abs() < 1e-6);
        assert!((actor.pos.y - 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_gravity_accumulates_while_airborne() {
        let tun = PhysicsTuning::default();
        let mut actor = Actor::spawn();
        actor.grounded = false;

        let mut last_y = actor.pos.y;
        for _ in 0..10 {
            step(&mut actor, 0.0, TICK_DT, &tun);
            assert!(actor.pos.y > last_y);
            last_y = actor.pos.y;
        }
        // vy = 10 * 0.8; y = 300 + 0.8 * (1 + 2 + ... + 10)
        assert!((actor.vel.y - 8.0).abs() < 1e-4);
        assert!((actor.pos.y - 344.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_gravity_while_grounded() {
        let tun = PhysicsTuning::default();
        let mut actor = grounded_actor();

        for _ in 0..60 {
            step(&mut actor, 0.0, TICK_DT, &tun);
        }
        assert!((actor.pos.y - 300.0).abs() < 1e-4);
        assert!(actor.vel.y.abs() < 1e-6);
    }

    #[test]
    fn test_top_boundary_clamp_kills_upward_velocity() {
        let tun = PhysicsTuning::default();
        let mut actor = Actor::spawn();
        actor.grounded = false;
        actor.pos.y = 5.0;
        actor.vel.y = -30.0;

        step(&mut actor, 0.0, TICK_DT, &tun);
        assert!((actor.pos.y - TOP_BOUNDARY).abs() < 1e-6);
        assert!(actor.vel.y >= 0.0);
    }

    #[test]
    fn test_jump_blocked_inside_top_safe_margin() {
        let tun = PhysicsTuning::default();
        let mut actor = Actor::spawn();
        actor.grounded = false;
        actor.pos.y = tun.top_safe_margin * 0.5;

        let result = step(&mut actor, 200.0, TICK_DT, &tun);
        assert!(!result.jumped);
    }

    #[test]
    fn test_jump_blocked_while_rising_fast() {
        let tun = PhysicsTuning::default();
        let mut actor = Actor::spawn();
        actor.grounded = false;
        actor.vel.y = -10.0;

        let result = step(&mut actor, 200.0, TICK_DT, &tun);
        assert!(!result.jumped);
        // Only gravity touched vy
        assert!((actor.vel.y - (-10.0 + tun.gravity)).abs() < 1e-4);
    }

    #[test]
    fn test_jump_nudges_forward_and_damps() {
        let tun = PhysicsTuning::default();
        let mut actor = grounded_actor();

        step(&mut actor, 40.0, TICK_DT, &tun);
        // Nudge applied before integration, damping after
        assert!((actor.pos.x - 104.0).abs() < 1e-3);
        assert!((actor.vel.x - 4.0 * 0.95).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_dt_is_a_no_op() {
        let tun = PhysicsTuning::default();
        let mut actor = Actor::spawn();
        actor.grounded = false;
        actor.vel = Vec2::new(3.0, -2.0);
        let before = actor.clone();

        for dt in [-1.0, 0.0, f32::NAN, f32::INFINITY] {
            step(&mut actor, 40.0, dt, &tun);
            assert_eq!(actor.pos, before.pos);
            assert_eq!(actor.vel, before.vel);
        }
    }
}
