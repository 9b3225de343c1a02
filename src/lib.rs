//! Abyssarium Behavior Engine - Wasm Core
//!
//! Gesture recognition, audio mood extraction and the creature behavior state
//! machine, driven from the browser's frame and audio callbacks.

pub mod animation;
pub mod audio;
pub mod behavior;
pub mod config;
mod constants;
pub mod engine;
pub mod environment;
pub mod error;
pub mod gesture;
pub mod inference;
mod math;
pub mod motion;
pub mod pose;
#[cfg(target_arch = "wasm32")]
pub mod state;

use wasm_bindgen::prelude::*;

pub use animation::{AnimationController, AnimationLibrary, ClipInfo, ClipMatcher, ClipRole};
pub use audio::{AudioFeatureExtractor, AudioMood};
pub use behavior::{evaluate_state, BehaviorInputs, CreatureBehavior, CreatureState};
pub use config::EngineConfig;
pub use engine::{Engine, TickReport};
pub use environment::{BiomeCatalog, BiomePreset, EnvironmentResponse};
pub use error::{EngineError, Result};
pub use gesture::{GestureEvent, GestureKind, GesturePipeline, Side};
pub use inference::{
    initialize_pose, run_inference, run_with_permit, InferenceGate, InferencePermit, PoseEstimator,
};
pub use motion::{MotionDetector, MotionSample};
pub use pose::{Keypoint, KeypointName, Millis, PoseFrame, PoseHistory};

#[cfg(target_arch = "wasm32")]
pub use state::App;

/// Install the console logger and panic hook (browser only, idempotent).
/// Native hosts install their own `log` backend.
pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            console_error_panic_hook::set_once();
            console_log::init_with_level(log::Level::Info).ok();
        }
    }
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(msg: &str) {
    log::info!("{}", msg);
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;
    wasm_bindgen_test_configure!(run_in_browser);
}
