//! Microphone input analysis
//!
//! Turns raw capture blocks into the 0-255 voice level the sim consumes.
//! The capture callback runs on an audio thread and hands blocks over a
//! bounded channel; the game drains to the newest block once per tick.
//! FFT plan, window, and work buffers are allocated once and reused, so
//! the per-tick path is allocation-free.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use thiserror::Error;

use crate::tuning::VoiceTuning;

/// Spectral loudness estimator for voice control
pub struct VoiceAnalyzer {
    tuning: VoiceTuning,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl VoiceAnalyzer {
    pub fn new(tuning: &VoiceTuning) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(tuning.fft_size);
        let scratch_len = fft.get_inplace_scratch_len();

        Self {
            tuning: tuning.clone(),
            fft,
            window: hann_window(tuning.fft_size),
            buffer: vec![Complex::new(0.0, 0.0); tuning.fft_size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            magnitudes: Vec::with_capacity(tuning.fft_size / 2),
        }
    }

    /// Voice level for one capture block
    ///
    /// Blocks shorter than the FFT size are zero-padded, longer ones
    /// truncated, so any callback granularity works.
    pub fn level_from_samples(&mut self, samples: &[f32]) -> f32 {
        let n = self.tuning.fft_size;
        for i in 0..n {
            let s = samples.get(i).copied().unwrap_or(0.0);
            self.buffer[i] = Complex::new(s * self.window[i], 0.0);
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        // Positive frequencies only, scaled into the byte-analyser range
        let half = n / 2;
        let scale = 2.0 / n as f32 * 255.0;
        self.magnitudes.clear();
        self.magnitudes
            .extend(self.buffer[..half].iter().map(|c| (c.norm() * scale).min(255.0)));

        self.level_from_spectrum(&self.magnitudes)
    }

    /// Blend mean and peak magnitude over the speech band
    ///
    /// The band is a fraction of the positive-frequency bins, which keeps
    /// the tuning independent of sample rate.
    pub fn level_from_spectrum(&self, magnitudes: &[f32]) -> f32 {
        if magnitudes.is_empty() {
            return 0.0;
        }
        let lo = ((magnitudes.len() as f32 * self.tuning.band_low) as usize)
            .min(magnitudes.len() - 1);
        let hi = ((magnitudes.len() as f32 * self.tuning.band_high) as usize)
            .max(lo + 1)
            .min(magnitudes.len());
        let band = &magnitudes[lo..hi];

        let mean = band.iter().sum::<f32>() / band.len() as f32;
        let peak = band.iter().fold(0.0_f32, |m, &v| m.max(v));

        (self.tuning.mean_weight * mean + self.tuning.max_weight * peak).clamp(0.0, 255.0)
    }
}

/// Capture channel closed by the consumer; the producer should stop
#[derive(Debug, Error)]
#[error("capture channel closed")]
pub struct CaptureClosed;

/// Producer half handed to the capture callback
#[derive(Clone)]
pub struct CaptureHandle {
    tx: Sender<Vec<f32>>,
}

impl CaptureHandle {
    /// Queue a block for the next poll
    ///
    /// A full queue drops the block rather than blocking the audio thread.
    pub fn push(&self, samples: Vec<f32>) -> Result<(), CaptureClosed> {
        match self.tx.try_send(samples) {
            Ok(()) | Err(TrySendError::Full(_)) => Ok(()),
            Err(TrySendError::Disconnected(_)) => Err(CaptureClosed),
        }
    }
}

/// Consumer half owned by the game
pub struct AudioCapture {
    rx: Receiver<Vec<f32>>,
}

impl AudioCapture {
    /// Take the newest pending block, discarding anything older
    pub fn poll(&mut self) -> Option<Vec<f32>> {
        let mut newest = None;
        while let Ok(block) = self.rx.try_recv() {
            newest = Some(block);
        }
        newest
    }
}

/// Build the capture hand-off pair
///
/// `depth` bounds the queue. Dropping the [`AudioCapture`] closes the
/// channel, which is how the microphone is released.
pub fn capture_channel(depth: usize) -> (CaptureHandle, AudioCapture) {
    let (tx, rx) = crossbeam_channel::bounded(depth.max(1));
    (CaptureHandle { tx }, AudioCapture { rx })
}

/// Per-tick voice sampling: capture plus analysis, holding the last level
/// over ticks where no new block arrived
pub struct VoiceInput {
    analyzer: VoiceAnalyzer,
    capture: AudioCapture,
    last_level: f32,
}

impl VoiceInput {
    pub fn new(capture: AudioCapture, tuning: &VoiceTuning) -> Self {
        Self {
            analyzer: VoiceAnalyzer::new(tuning),
            capture,
            last_level: 0.0,
        }
    }

    /// Voice level for the current tick
    pub fn sample(&mut self) -> f32 {
        if let Some(block) = self.capture.poll() {
            self.last_level = self.analyzer.level_from_samples(&block);
        }
        self.last_level
    }
}

/// Hann window coefficients
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}
