//! Fixed-timestep driver around the sim
//!
//! Hosts call [`GameRunner::advance`] once per frame with wall-clock delta
//! time; the runner chops it into fixed ticks, samples the microphone once
//! per tick, and hands the end-of-session summary to the persistence
//! collaborators. One-shot inputs latch until a tick consumes them, so a
//! keypress on a short frame is never lost.

use crate::audio::{AudioCapture, VoiceInput};
use crate::consts::{MAX_SUBSTEPS, TICK_DT};
use crate::session::{self, BestScoreStore, ScoreSink, SessionRecorder};
use crate::sim::{tick, GamePhase, GameState, Snapshot, TickEvents, TickInput};
use crate::tuning::Tuning;

/// Host-side input for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    /// Fallback jump key
    pub jump: bool,
    /// Begin a session
    pub start: bool,
    /// Return to Ready after game over
    pub reset: bool,
}

/// Owns the game state and everything around it
pub struct GameRunner {
    state: GameState,
    recorder: SessionRecorder,
    voice: Option<VoiceInput>,
    score_sink: Box<dyn ScoreSink>,
    best_scores: Box<dyn BestScoreStore>,
    input: TickInput,
    accumulator: f32,
    stopped: bool,
}

impl GameRunner {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        score_sink: Box<dyn ScoreSink>,
        best_scores: Box<dyn BestScoreStore>,
    ) -> Self {
        Self {
            state: GameState::new(seed, tuning),
            recorder: SessionRecorder::new(),
            voice: None,
            score_sink,
            best_scores,
            input: TickInput::default(),
            accumulator: 0.0,
            stopped: false,
        }
    }

    /// Attach a microphone capture; until then jumps come from the keyboard
    pub fn attach_voice(&mut self, capture: AudioCapture) {
        self.voice = Some(VoiceInput::new(capture, &self.state.tuning.voice));
        log::info!("Microphone capture attached");
    }

    pub fn has_voice(&self) -> bool {
        self.voice.is_some()
    }

    /// Run sim ticks for one host frame
    ///
    /// Frame time is clamped before entering the accumulator, and the
    /// substep count is capped, so a long stall degrades to slow motion
    /// instead of a tick avalanche.
    pub fn advance(&mut self, frame_dt: f32, controls: Controls) -> TickEvents {
        let mut events = TickEvents::default();
        if self.stopped {
            return events;
        }

        self.input.jump |= controls.jump;
        self.input.start |= controls.start;
        self.input.reset |= controls.reset;

        let frame_dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        self.accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= TICK_DT && substeps < MAX_SUBSTEPS {
            self.input.voice_level = match self.voice.as_mut() {
                Some(voice) => voice.sample(),
                None => 0.0,
            };

            let was_playing = self.state.phase == GamePhase::Playing;
            let step = tick(&mut self.state, &self.input, TICK_DT);

            events.jumped |= step.jumped;
            events.landed |= step.landed;
            events.collected += step.collected;
            events.game_over |= step.game_over;

            self.accumulator -= TICK_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.start = false;
            self.input.reset = false;

            if !was_playing && self.state.phase == GamePhase::Playing {
                self.recorder.reset();
                if self.voice.is_none() {
                    log::warn!("No microphone capture - keyboard jumps only");
                }
            }
            if step.game_over {
                self.finish_session();
            }
        }

        events
    }

    /// Halt the runner and release the microphone; no ticks run afterwards
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        // Dropping the capture closes the channel, which releases the mic
        self.voice = None;
        log::info!("Runner stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn best_score(&mut self) -> Option<u64> {
        self.best_scores.best()
    }

    /// Playing -> GameOver hand-off: summary to the sink, best score check
    ///
    /// The recorder latch keeps a duplicate game-over signal from reaching
    /// the sink twice. Persistence failures are logged and swallowed; the
    /// final stats stay on the state for display either way.
    fn finish_session(&mut self) {
        let Some(summary) = self.recorder.finalize(&self.state.stats) else {
            return;
        };
        if let Err(e) = self.score_sink.submit(&summary) {
            log::warn!("Session summary not persisted: {}", e);
        }
        session::update_best(self.best_scores.as_mut(), summary.final_score);
    }
}
