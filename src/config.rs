//! Engine configuration
//!
//! Every section defaults to the compiled-in values from `constants.rs`.
//! Hosts may override any subset through `EngineConfig::from_json`; missing
//! fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::animation::ClipMatcher;
use crate::constants::*;
use crate::error::{EngineError, Result};

/// Bounded temporal window for the tracked head point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    pub window_ms: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: HISTORY_CAPACITY,
            window_ms: HISTORY_WINDOW_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub min_horizontal_px: f32,
    pub max_vertical_px: f32,
    pub min_wrist_confidence: f32,
    /// Gate on the mean confidence of each whole frame
    pub min_avg_confidence: f32,
    pub full_strength_px: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            min_horizontal_px: WAVE_MIN_HORIZONTAL_PX,
            max_vertical_px: WAVE_MAX_VERTICAL_PX,
            min_wrist_confidence: WAVE_MIN_WRIST_CONFIDENCE,
            min_avg_confidence: WAVE_MIN_AVG_CONFIDENCE,
            full_strength_px: WAVE_FULL_STRENGTH_PX,
        }
    }
}

/// Thresholds for one head axis (vertical for nods, horizontal for shakes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisThresholds {
    pub min_range: f32,
    pub full_strength_range: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadGestureConfig {
    /// Per-sample gate; kept separate from the wave frame-average gate
    pub min_sample_confidence: f32,
    pub min_samples: usize,
    pub analysis_window: usize,
    pub axis_dominance: f32,
    pub direction_fraction: f32,
    pub nod: AxisThresholds,
    pub shake: AxisThresholds,
}

impl Default for HeadGestureConfig {
    fn default() -> Self {
        Self {
            min_sample_confidence: NOSE_MIN_CONFIDENCE,
            min_samples: HEAD_MIN_SAMPLES,
            analysis_window: HEAD_ANALYSIS_WINDOW,
            axis_dominance: HEAD_AXIS_DOMINANCE,
            direction_fraction: HEAD_DIRECTION_FRACTION,
            nod: AxisThresholds {
                min_range: NOD_MIN_RANGE,
                full_strength_range: NOD_FULL_STRENGTH_RANGE,
            },
            shake: AxisThresholds {
                min_range: SHAKE_MIN_RANGE,
                full_strength_range: SHAKE_FULL_STRENGTH_RANGE,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    pub cooldown_ms: f64,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: GESTURE_COOLDOWN_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub low_band_end: f32,
    pub mid_band_end: f32,
    pub edge_low: f32,
    pub edge_high: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            low_band_end: LOW_BAND_END,
            mid_band_end: MID_BAND_END,
            edge_low: MOOD_EDGE_LOW,
            edge_high: MOOD_EDGE_HIGH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub startled_loudness: f32,
    pub curious_presence: f32,
    pub curious_loudness: f32,
    pub playful_presence: f32,
    pub playful_loudness: f32,
    pub recent_gesture_ms: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            startled_loudness: STARTLED_LOUDNESS,
            curious_presence: CURIOUS_PRESENCE,
            curious_loudness: CURIOUS_LOUDNESS,
            playful_presence: PLAYFUL_PRESENCE,
            playful_loudness: PLAYFUL_LOUDNESS,
            recent_gesture_ms: RECENT_GESTURE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub frame_width: usize,
    pub frame_height: usize,
    pub pixel_threshold: f32,
    pub side_ratio: f32,
    pub side_bias: f32,
    pub wave_min: f32,
    pub presence_edge_low: f32,
    pub presence_edge_high: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            frame_width: MOTION_FRAME_WIDTH,
            frame_height: MOTION_FRAME_HEIGHT,
            pixel_threshold: MOTION_PIXEL_THRESHOLD,
            side_ratio: MOTION_SIDE_RATIO,
            side_bias: MOTION_SIDE_BIAS,
            wave_min: MOTION_WAVE_MIN,
            presence_edge_low: PRESENCE_EDGE_LOW,
            presence_edge_high: PRESENCE_EDGE_HIGH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub light_min_scale: f32,
    pub light_max_scale: f32,
    pub fog_max_scale: f32,
    pub fog_loudness_weight: f32,
    pub emissive_min: f32,
    pub emissive_max: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            light_min_scale: LIGHT_MIN_SCALE,
            light_max_scale: LIGHT_MAX_SCALE,
            fog_max_scale: FOG_MAX_SCALE,
            fog_loudness_weight: FOG_LOUDNESS_WEIGHT,
            emissive_min: EMISSIVE_MIN,
            emissive_max: EMISSIVE_MAX,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub history: HistoryConfig,
    pub wave: WaveConfig,
    pub head: HeadGestureConfig,
    pub arbiter: ArbiterConfig,
    pub audio: AudioConfig,
    pub behavior: BehaviorConfig,
    pub motion: MotionConfig,
    pub environment: EnvironmentConfig,
    pub clip_matcher: ClipMatcher,
}

impl EngineConfig {
    /// Parse a (possibly partial) configuration and validate it.
    ///
    /// The overrides are merged onto the defaults at every nesting level, so
    /// `{"head":{"nod":{"min_range":10}}}` keeps the other nod threshold.
    /// Arrays (the clip matcher rules) replace the default list as a whole.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(EngineConfig::default())?;
        merge_json(&mut merged, overrides);

        let config: EngineConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(EngineError::InvalidConfig(msg.to_string()));

        if self.history.capacity == 0 {
            return invalid("history.capacity must be at least 1");
        }
        if !(self.history.window_ms > 0.0) {
            return invalid("history.window_ms must be positive");
        }
        if self.head.min_samples < 2 {
            return invalid("head.min_samples must be at least 2");
        }
        if self.head.analysis_window < self.head.min_samples {
            return invalid("head.analysis_window must be >= head.min_samples");
        }
        if !(self.arbiter.cooldown_ms >= 0.0) {
            return invalid("arbiter.cooldown_ms must be non-negative");
        }
        let audio = &self.audio;
        if !(0.0 < audio.low_band_end
            && audio.low_band_end < audio.mid_band_end
            && audio.mid_band_end < 1.0)
        {
            return invalid("audio band split must satisfy 0 < low_band_end < mid_band_end < 1");
        }
        if !(audio.edge_low < audio.edge_high) {
            return invalid("audio.edge_low must be below audio.edge_high");
        }
        if self.motion.frame_width == 0 || self.motion.frame_height == 0 {
            return invalid("motion frame dimensions must be non-zero");
        }
        if !(self.motion.presence_edge_low < self.motion.presence_edge_high) {
            return invalid("motion.presence_edge_low must be below motion.presence_edge_high");
        }
        Ok(())
    }
}

/// Recursively overlay `patch` onto `base`; non-object values replace
fn merge_json(base: &mut serde_json::Value, patch: serde_json::Value) {
    use serde_json::Value;

    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
