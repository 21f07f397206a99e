//! Fixed timestep simulation tick
//!
//! The game state machine: Ready waits for an explicit start, Playing runs
//! the sample → physics → collision → level → stats pipeline, GameOver is
//! inert until an explicit reset.

use super::state::{Actor, Camera, GamePhase, GameState, SessionStats};
use super::{collision, level, physics};
use crate::consts::BOTTOM_BOUNDARY;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Voice level sampled this tick (0 when the mic is absent)
    pub voice_level: f32,
    /// Discrete fallback jump (keypress-equivalent)
    pub jump: bool,
    /// Begin a session from Ready
    pub start: bool,
    /// Return to Ready from GameOver
    pub reset: bool,
}

/// What happened during a tick, for the host (sound cues, persistence)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// A jump impulse fired
    pub jumped: bool,
    /// The actor touched down on a platform
    pub landed: bool,
    /// Collectibles picked up this tick
    pub collected: u32,
    /// The session just ended (Playing -> GameOver transition)
    pub game_over: bool,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickEvents {
    match state.phase {
        GamePhase::Ready => {
            if input.start {
                start_session(state);
            }
            TickEvents::default()
        }
        GamePhase::Playing => playing_tick(state, input, dt),
        GamePhase::GameOver => {
            if input.reset {
                state.phase = GamePhase::Ready;
                log::info!("Session reset");
            }
            TickEvents::default()
        }
    }
}

/// Ready -> Playing: fresh actor, fresh stats, reseeded runway
fn start_session(state: &mut GameState) {
    state.actor = Actor::spawn();
    state.stats = SessionStats::default();
    state.time_ticks = 0;
    state.reseed();
    // Camera first: runway retirement is measured against it
    state.camera = Camera::follow(&state.actor);
    level::seed_runway(state);
    // Spawned standing on the start platform
    state.actor.grounded = true;
    state.normalize_order();
    state.phase = GamePhase::Playing;
    log::info!("Session started (seed {})", state.seed);
}

fn playing_tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickEvents {
    let mut events = TickEvents::default();

    // A glitched frame delta must not corrupt the simulation clock
    if !dt.is_finite() || dt <= 0.0 {
        return events;
    }

    // The fallback input rides the same impulse path as a strong voice
    let mut voice = input.voice_level;
    if input.jump {
        voice = voice.max(state.tuning.voice.fallback_voice);
    }

    let was_grounded = state.actor.grounded;
    let step = physics::step(&mut state.actor, voice, dt, &state.tuning.physics);
    events.jumped = step.jumped;
    if step.jumped {
        log::debug!("Jump: voice {:.1} -> power {:.1}", voice, step.jump_power);
    }

    let outcome = collision::resolve(
        &mut state.actor,
        &state.platforms,
        &mut state.collectibles,
        BOTTOM_BOUNDARY,
    );
    events.landed = outcome.grounded && !was_grounded;
    events.collected = outcome.collected.len() as u32;

    // Move the world, then the window that generates it
    level::update_motion(state, dt);
    state.camera = Camera::follow(&state.actor);
    level::advance(state);

    // Survival bonus per tick plus pickup bonuses
    state.stats.score += state.tuning.scoring.score_per_tick
        + state.tuning.scoring.collectible_bonus * u64::from(events.collected);
    state.stats.collectibles_collected += events.collected;
    state.stats.elapsed_seconds += dt;
    state.time_ticks += 1;

    if outcome.fell_through {
        state.stats.terminal = true;
        state.phase = GamePhase::GameOver;
        events.game_over = true;
        log::info!(
            "Game over: score {} after {:.1}s ({} collectibles)",
            state.stats.score,
            state.stats.elapsed_seconds,
            state.stats.collectibles_collected
        );
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_DT;
    use crate::sim::state::Collectible;
    use glam::Vec2;

    fn started_state(seed: u64) -> GameState {
        let mut state = GameState::with_defaults(seed);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, TICK_DT);
        state
    }

    #[test]
    fn test_ready_waits_for_start() {
        let mut state = GameState::with_defaults(1);
        assert_eq!(state.phase, GamePhase::Ready);

        tick(&mut state, &TickInput::default(), TICK_DT);
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.platforms.is_empty());

        let state = started_state(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.platforms.is_empty());
        assert!(state.actor.grounded);
    }

    #[test]
    fn test_grounded_idle_holds_steady() {
        // A minute of silence with no fallback input: nothing moves
        let mut state = started_state(2);
        let y = state.actor.pos.y;

        for _ in 0..60 {
            let events = tick(&mut state, &TickInput::default(), TICK_DT);
            assert!(!events.jumped);
            assert!(state.actor.grounded);
            assert!((state.actor.pos.y - y).abs() < 1e-4);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_survival_score_accrues() {
        let mut state = started_state(3);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), TICK_DT);
        }
        assert_eq!(state.stats.score, 120);
        assert!((state.stats.elapsed_seconds - 2.0).abs() < 1e-3);
        assert_eq!(state.time_ticks, 120);
    }

    #[test]
    fn test_fall_past_bottom_ends_session() {
        let mut state = started_state(4);
        state.actor.pos.y = 1000.0;
        state.actor.grounded = false;
        state.platforms.clear();
        state.collectibles.clear();

        let events = tick(&mut state, &TickInput::default(), TICK_DT);
        assert!(events.game_over);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.stats.terminal);

        // Terminal state is inert, whatever the input
        let score = state.stats.score;
        let noisy = TickInput {
            voice_level: 200.0,
            jump: true,
            start: true,
            ..Default::default()
        };
        let events = tick(&mut state, &noisy, TICK_DT);
        assert_eq!(events, TickEvents::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.stats.score, score);
    }

    #[test]
    fn test_reset_then_start_zeroes_the_session() {
        let mut state = started_state(5);
        state.actor.pos.y = 1000.0;
        state.actor.grounded = false;
        state.platforms.clear();
        tick(&mut state, &TickInput::default(), TICK_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, TICK_DT);
        assert_eq!(state.phase, GamePhase::Ready);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, TICK_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.score, 0);
        assert!(!state.stats.terminal);
        assert!(state.actor.grounded);
    }

    #[test]
    fn test_restart_after_long_run_reseeds_ground_under_the_actor() {
        // Drag the actor far forward so the camera (and with it the
        // retirement window) sits well past the spawn point
        let mut state = started_state(9);
        state.actor.pos.x = 3000.0;
        tick(&mut state, &TickInput::default(), TICK_DT);
        assert!(state.camera.pos.x > 2500.0);

        state.actor.pos.y = 1000.0;
        state.actor.grounded = false;
        tick(&mut state, &TickInput::default(), TICK_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, TICK_DT);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, TICK_DT);
        assert_eq!(state.phase, GamePhase::Playing);

        // The fresh runway must hold its start platform under the spawn point
        let center_x = state.actor.pos.x + state.actor.size.x / 2.0;
        let feet = state.actor.bottom();
        assert!(state.platforms.iter().any(|p| {
            p.pos.x <= center_x && p.right_edge() >= center_x && (p.pos.y - feet).abs() < 1e-4
        }));

        // And silence keeps the actor standing there
        let y = state.actor.pos.y;
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), TICK_DT);
            assert!(state.actor.grounded);
            assert!((state.actor.pos.y - y).abs() < 1e-4);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_fallback_jump_matches_a_strong_voice() {
        let mut state = started_state(6);
        let press = TickInput {
            jump: true,
            ..Default::default()
        };
        let events = tick(&mut state, &press, TICK_DT);
        assert!(events.jumped);
        // fallback voice 60: (60 - 25) * 3 overshoots the 18 cap
        assert!((state.actor.vel.y - (-18.0)).abs() < 1e-4);
    }

    #[test]
    fn test_collecting_scores_bonus() {
        let mut state = started_state(7);
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            pos: state.actor.pos + Vec2::new(5.0, 5.0),
            size: Vec2::new(24.0, 24.0),
            spin: 0.0,
        });
        let before = state.stats.score;

        let events = tick(&mut state, &TickInput::default(), TICK_DT);
        assert_eq!(events.collected, 1);
        assert_eq!(state.stats.collectibles_collected, 1);
        assert_eq!(state.stats.score, before + 1 + 50);

        // Removed for good
        assert!(state.collectibles.iter().all(|c| c.id != id));
    }

    #[test]
    fn test_camera_follows_but_never_drops_below_baseline() {
        let mut state = started_state(8);
        tick(&mut state, &TickInput::default(), TICK_DT);
        let expected_x = state.actor.pos.x - crate::consts::CAMERA_OFFSET_X;
        assert!((state.camera.pos.x - expected_x).abs() < 1e-4);
        assert!((state.camera.pos.y - 0.0).abs() < 1e-4);

        // High in the air the camera tracks upward
        state.actor.pos.y = 80.0;
        state.actor.grounded = false;
        tick(&mut state, &TickInput::default(), TICK_DT);
        let expected_y = (state.actor.pos.y - crate::consts::CAMERA_OFFSET_Y).min(0.0);
        assert!((state.camera.pos.y - expected_y).abs() < 1e-4);
        assert!(state.camera.pos.y < 0.0);
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed must stay in lockstep
        let mut state1 = GameState::with_defaults(99999);
        let mut state2 = GameState::with_defaults(99999);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state1, &start, TICK_DT);
        tick(&mut state2, &start, TICK_DT);

        for i in 0..600u32 {
            let input = TickInput {
                voice_level: if i % 40 < 3 { 50.0 } else { 0.0 },
                jump: i % 97 == 0,
                ..Default::default()
            };
            tick(&mut state1, &input, TICK_DT);
            tick(&mut state2, &input, TICK_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.actor.pos, state2.actor.pos);
        assert_eq!(state1.platforms, state2.platforms);
        assert_eq!(state1.collectibles, state2.collectibles);
        assert_eq!(state1.stats.score, state2.stats.score);
    }
}
