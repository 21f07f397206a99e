//! Data-driven game balance
//!
//! Every trial-tuned constant from the game lives here so a host can reshape
//! balance without recompiling. Host-supplied values are sanitized, never
//! rejected: a glitched config must degrade the feel, not take down the loop.

use serde::{Deserialize, Serialize};

use crate::consts::{ACTOR_W, BOTTOM_BOUNDARY, TOP_BOUNDARY};

/// Jump and movement balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Voice level that starts triggering jumps
    pub voice_threshold: f32,
    /// Jump power per unit of voice above the threshold
    pub voice_multiplier: f32,
    /// Jump power cap
    pub jump_power_max: f32,
    /// Weak triggers still jump at least this hard
    pub jump_power_min: f32,
    /// Jumps re-trigger only while vy is above this (grounded, or near apex)
    pub jump_gate_vy: f32,
    /// No jump triggers while the actor is this close to the top boundary
    pub top_safe_margin: f32,
    /// Forward push added with each jump
    pub forward_nudge: f32,
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Fraction of horizontal velocity kept each tick
    pub damping: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            voice_threshold: 25.0,
            voice_multiplier: 3.0,
            jump_power_max: 18.0,
            jump_power_min: 6.0,
            jump_gate_vy: -3.0,
            top_safe_margin: 60.0,
            forward_nudge: 4.0,
            gravity: 0.8,
            damping: 0.95,
        }
    }
}

impl PhysicsTuning {
    pub fn sanitize(&mut self) {
        let d = Self::default();
        self.voice_threshold = repair(self.voice_threshold, d.voice_threshold, 0.0, 255.0);
        self.voice_multiplier = repair(self.voice_multiplier, d.voice_multiplier, 0.0, 50.0);
        self.jump_power_max = repair(self.jump_power_max, d.jump_power_max, 1.0, 100.0);
        self.jump_power_min = repair(self.jump_power_min, d.jump_power_min, 0.0, self.jump_power_max);
        self.jump_gate_vy = repair(self.jump_gate_vy, d.jump_gate_vy, -100.0, 0.0);
        self.top_safe_margin = repair(self.top_safe_margin, d.top_safe_margin, 0.0, 300.0);
        self.forward_nudge = repair(self.forward_nudge, d.forward_nudge, 0.0, 20.0);
        self.gravity = repair(self.gravity, d.gravity, 0.0, 10.0);
        self.damping = repair(self.damping, d.damping, 0.0, 1.0);
    }
}

/// Voice-level extraction balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceTuning {
    /// FFT size (power of two); usable bins = fft_size / 2
    pub fft_size: usize,
    /// Sub-band of the bin range carrying voiced speech, as fractions
    pub band_low: f32,
    pub band_high: f32,
    /// Blend weights: mean for stability, max for sharp onsets
    pub mean_weight: f32,
    pub max_weight: f32,
    /// Voice level substituted when the discrete fallback input fires
    pub fallback_voice: f32,
}

impl Default for VoiceTuning {
    fn default() -> Self {
        Self {
            fft_size: 256,
            band_low: 0.2,
            band_high: 0.6,
            mean_weight: 0.7,
            max_weight: 0.3,
            fallback_voice: 60.0,
        }
    }
}

impl VoiceTuning {
    pub fn sanitize(&mut self) {
        let d = Self::default();
        if !self.fft_size.is_power_of_two() || !(32..=4096).contains(&self.fft_size) {
            self.fft_size = d.fft_size;
        }
        self.band_low = repair(self.band_low, d.band_low, 0.0, 1.0);
        self.band_high = repair(self.band_high, d.band_high, 0.0, 1.0);
        if self.band_high <= self.band_low {
            self.band_low = d.band_low;
            self.band_high = d.band_high;
        }
        self.mean_weight = repair(self.mean_weight, d.mean_weight, 0.0, 1.0);
        self.max_weight = repair(self.max_weight, d.max_weight, 0.0, 1.0);
        if self.mean_weight + self.max_weight == 0.0 {
            self.mean_weight = d.mean_weight;
            self.max_weight = d.max_weight;
        }
        self.fallback_voice = repair(self.fallback_voice, d.fallback_voice, 0.0, 255.0);
    }
}

/// Runway generation balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    /// Runway is kept generated this far ahead of the actor
    pub spawn_ahead: f32,
    /// Objects this far behind the camera are retired
    pub retire_margin: f32,
    /// Horizontal gap between consecutive platforms
    pub gap_min: f32,
    pub gap_max: f32,
    pub platform_w_min: f32,
    pub platform_w_max: f32,
    pub platform_h: f32,
    /// Platform top spawn range
    pub platform_y_min: f32,
    pub platform_y_max: f32,
    /// Platforms never generate closer to the top boundary than this
    pub min_clearance: f32,
    /// Chance a new platform oscillates
    pub oscillating_chance: f64,
    pub oscillation_amplitude: f32,
    /// Oscillation phase advance per tick (radians)
    pub oscillation_rate: f32,
    /// Chance a new platform carries a collectible
    pub collectible_chance: f64,
    pub collectible_size: f32,
    /// Collectible hover height above its platform top
    pub collectible_hover: f32,
    /// Collectible idle-spin per tick (radians)
    pub collectible_spin_rate: f32,
    /// Width of the first platform under the spawn point
    pub start_platform_w: f32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            spawn_ahead: 600.0,
            retire_margin: 200.0,
            gap_min: 60.0,
            gap_max: 140.0,
            platform_w_min: 90.0,
            platform_w_max: 200.0,
            platform_h: 20.0,
            platform_y_min: 250.0,
            platform_y_max: 560.0,
            min_clearance: 80.0,
            oscillating_chance: 0.3,
            oscillation_amplitude: 40.0,
            oscillation_rate: 0.05,
            collectible_chance: 0.35,
            collectible_size: 24.0,
            collectible_hover: 46.0,
            collectible_spin_rate: 0.1,
            start_platform_w: 240.0,
        }
    }
}

impl LevelTuning {
    pub fn sanitize(&mut self) {
        let d = Self::default();
        self.spawn_ahead = repair(self.spawn_ahead, d.spawn_ahead, 100.0, 5000.0);
        self.retire_margin = repair(self.retire_margin, d.retire_margin, 0.0, 5000.0);
        self.gap_min = repair(self.gap_min, d.gap_min, 1.0, 1000.0);
        self.gap_max = repair(self.gap_max, d.gap_max, self.gap_min, 1000.0);
        self.platform_w_min = repair(self.platform_w_min, d.platform_w_min, 10.0, 1000.0);
        self.platform_w_max = repair(self.platform_w_max, d.platform_w_max, self.platform_w_min, 1000.0);
        self.platform_h = repair(self.platform_h, d.platform_h, 4.0, 100.0);
        self.min_clearance = repair(self.min_clearance, d.min_clearance, 0.0, 300.0);
        self.oscillation_amplitude = repair(self.oscillation_amplitude, d.oscillation_amplitude, 0.0, 200.0);
        self.oscillation_rate = repair(self.oscillation_rate, d.oscillation_rate, 0.0, 1.0);

        // Spawn heights must leave the clearance band plus a landable margin
        // above the bottom of the world
        let y_floor = TOP_BOUNDARY + self.min_clearance;
        let y_ceil = BOTTOM_BOUNDARY - 100.0;
        self.platform_y_min = repair(self.platform_y_min, d.platform_y_min, y_floor, y_ceil);
        self.platform_y_max = repair(self.platform_y_max, d.platform_y_max, self.platform_y_min, y_ceil);

        self.oscillating_chance = repair_chance(self.oscillating_chance, d.oscillating_chance);
        self.collectible_chance = repair_chance(self.collectible_chance, d.collectible_chance);
        self.collectible_size = repair(self.collectible_size, d.collectible_size, 4.0, 100.0);
        self.collectible_hover = repair(self.collectible_hover, d.collectible_hover, 0.0, 300.0);
        self.collectible_spin_rate = repair(self.collectible_spin_rate, d.collectible_spin_rate, 0.0, 1.0);
        self.start_platform_w = repair(self.start_platform_w, d.start_platform_w, ACTOR_W, 1000.0);
    }
}

/// Score balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    /// Survival bonus per tick
    pub score_per_tick: u64,
    /// Bonus per collectible
    pub collectible_bonus: u64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            score_per_tick: 1,
            collectible_bonus: 50,
        }
    }
}

impl ScoringTuning {
    pub fn sanitize(&mut self) {
        self.score_per_tick = self.score_per_tick.min(1_000);
        self.collectible_bonus = self.collectible_bonus.min(1_000_000);
    }
}

/// All balance knobs in one host-overridable bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub voice: VoiceTuning,
    pub level: LevelTuning,
    pub scoring: ScoringTuning,
}

impl Tuning {
    /// Parse a host-supplied override; unusable JSON falls back to defaults
    pub fn from_json(json: &str) -> Self {
        let mut tuning: Tuning = serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Unusable tuning override ({}), using defaults", e);
            Tuning::default()
        });
        tuning.sanitize();
        tuning
    }

    /// Clamp out-of-range values in place
    pub fn sanitize(&mut self) {
        self.physics.sanitize();
        self.voice.sanitize();
        self.level.sanitize();
        self.scoring.sanitize();
    }
}

/// Clamp to a range, falling back to `default` for NaN/inf
fn repair(value: f32, default: f32, min: f32, max: f32) -> f32 {
    let v = if value.is_finite() { value } else { default };
    v.clamp(min, max)
}

fn repair_chance(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        default
    }
}
