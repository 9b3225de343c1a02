//! Shared tuning constants used by both build.rs and runtime code.
//!
//! This module is included by the build script (asset validation) and by
//! `config.rs`, whose `Default` impls are built from these values.

// Some constants are only used by build.rs for validation
#![allow(dead_code)]

// --- Pose history ---

/// Maximum number of nose samples retained
pub const HISTORY_CAPACITY: usize = 20;
/// Samples older than this (relative to the newest tick) are pruned
pub const HISTORY_WINDOW_MS: f64 = 1000.0;

// --- Wave detector ---

/// Minimum lateral wrist displacement between consecutive frames (px, inclusive)
pub const WAVE_MIN_HORIZONTAL_PX: f32 = 30.0;
/// Vertical wrist displacement must stay below this (px)
pub const WAVE_MAX_VERTICAL_PX: f32 = 50.0;
/// Both wrist samples must be more confident than this
pub const WAVE_MIN_WRIST_CONFIDENCE: f32 = 0.1;
/// Both frames' mean keypoint confidence must exceed this
pub const WAVE_MIN_AVG_CONFIDENCE: f32 = 0.15;
/// Lateral displacement that maps to full strength
pub const WAVE_FULL_STRENGTH_PX: f32 = 150.0;

// --- Head gesture detector ---

/// Nose samples at or below this confidence are not recorded
pub const NOSE_MIN_CONFIDENCE: f32 = 0.2;
/// Fewer samples than this never produce a head gesture
pub const HEAD_MIN_SAMPLES: usize = 5;
/// Number of most recent samples analysed
pub const HEAD_ANALYSIS_WINDOW: usize = 10;
/// Dominant axis range must exceed the other axis range by this factor
pub const HEAD_AXIS_DOMINANCE: f32 = 1.5;
/// Half-window mean delta must exceed this fraction of the minimum range
pub const HEAD_DIRECTION_FRACTION: f32 = 0.6;
pub const NOD_MIN_RANGE: f32 = 15.0;
pub const NOD_FULL_STRENGTH_RANGE: f32 = 50.0;
pub const SHAKE_MIN_RANGE: f32 = 20.0;
pub const SHAKE_FULL_STRENGTH_RANGE: f32 = 60.0;

// --- Arbiter ---

/// Global cross-type debounce between gesture emissions
pub const GESTURE_COOLDOWN_MS: f64 = 500.0;

// --- Audio ---

/// Largest value a spectrum bin can hold
pub const SPECTRUM_MAX: f32 = 255.0;
/// Low band covers [0, LOW_BAND_END) of the bins
pub const LOW_BAND_END: f32 = 0.1;
/// Mid band covers [LOW_BAND_END, MID_BAND_END), high band the rest
pub const MID_BAND_END: f32 = 0.5;
pub const MOOD_EDGE_LOW: f32 = 0.1;
pub const MOOD_EDGE_HIGH: f32 = 0.8;

// --- Behavior ---

pub const STARTLED_LOUDNESS: f32 = 0.7;
pub const CURIOUS_PRESENCE: f32 = 0.5;
pub const CURIOUS_LOUDNESS: f32 = 0.3;
pub const PLAYFUL_PRESENCE: f32 = 0.2;
pub const PLAYFUL_LOUDNESS: f32 = 0.1;
/// A wave younger than this keeps the creature startled
pub const RECENT_GESTURE_MS: f64 = 2000.0;

// --- Motion detector ---

pub const MOTION_FRAME_WIDTH: usize = 160;
pub const MOTION_FRAME_HEIGHT: usize = 120;
/// Per-pixel mean channel difference that counts as motion
pub const MOTION_PIXEL_THRESHOLD: f32 = 30.0;
/// Side-vs-side motion ratio needed to report a wave
pub const MOTION_SIDE_RATIO: f32 = 2.0;
/// Added to the weaker side before taking the ratio
pub const MOTION_SIDE_BIAS: f32 = 0.1;
/// Overall motion needed to report a wave
pub const MOTION_WAVE_MIN: f32 = 0.1;
pub const PRESENCE_EDGE_LOW: f32 = 0.05;
pub const PRESENCE_EDGE_HIGH: f32 = 0.3;

// --- Environment response ---

pub const LIGHT_MIN_SCALE: f32 = 0.5;
pub const LIGHT_MAX_SCALE: f32 = 1.5;
pub const FOG_MAX_SCALE: f32 = 1.5;
pub const FOG_LOUDNESS_WEIGHT: f32 = 0.3;
pub const EMISSIVE_MIN: f32 = 0.3;
pub const EMISSIVE_MAX: f32 = 1.0;

// --- Biome asset bounds (checked by build.rs) ---

pub const MAX_FOG_DENSITY: f32 = 0.1;
pub const MAX_LIGHT_INTENSITY: f32 = 10.0;
pub const MAX_CREATURE_SCALE: f32 = 5.0;
