//! The engine instance: owns every detector, the behavior state, the
//! animation lock and the subscriber lists.
//!
//! Hosts drive it from two independent callbacks:
//! - per rendered frame: `process_pose` (when a pose is ready) then `update`
//! - per audio sample: `process_audio`
//!
//! Subscribers run synchronously inside the call that produced the event,
//! after internal routing has already been applied.

use serde::Serialize;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::animation::{AnimationController, AnimationLibrary, ClipRole};
use crate::audio::{AudioFeatureExtractor, AudioMood};
use crate::behavior::{CreatureBehavior, CreatureState};
use crate::config::EngineConfig;
use crate::environment::{BiomeCatalog, BiomePreset, EnvironmentResponse};
use crate::error::Result;
use crate::gesture::{GestureEvent, GesturePipeline, Side};
use crate::motion::{MotionDetector, MotionSample};
use crate::pose::{Millis, PoseFrame};

pub type GestureCallback = Box<dyn FnMut(&GestureEvent)>;
pub type AudioCallback = Box<dyn FnMut(&AudioMood)>;

/// Everything the rendering layer needs after one update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub state: CreatureState,
    pub state_changed: bool,
    pub locked: bool,
    /// Gesture clip that finished during this update
    pub completed_gesture: Option<String>,
    pub environment: EnvironmentResponse,
}

pub struct Engine {
    config: EngineConfig,
    gestures: GesturePipeline,
    audio: AudioFeatureExtractor,
    motion: MotionDetector,
    behavior: CreatureBehavior,
    animation: AnimationController,
    biomes: BiomeCatalog,
    biome: BiomePreset,
    mood: AudioMood,
    pose_available: bool,
    gesture_subscribers: Vec<GestureCallback>,
    audio_subscribers: Vec<AudioCallback>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let biomes = BiomeCatalog::bundled()?;
        let biome = biomes.fallback().clone();

        Ok(Self {
            gestures: GesturePipeline::new(&config),
            audio: AudioFeatureExtractor::new(config.audio.clone()),
            motion: MotionDetector::new(config.motion.clone()),
            behavior: CreatureBehavior::new(config.behavior.clone()),
            animation: AnimationController::new(config.clip_matcher.clone()),
            biomes,
            biome,
            mood: AudioMood::default(),
            pose_available: true,
            gesture_subscribers: Vec::new(),
            audio_subscribers: Vec::new(),
            config,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Subscribe to every emitted gesture
    pub fn on_gesture<F>(&mut self, callback: F)
    where
        F: FnMut(&GestureEvent) + 'static,
    {
        self.gesture_subscribers.push(Box::new(callback));
    }

    /// Subscribe to every extracted audio mood
    pub fn on_audio<F>(&mut self, callback: F)
    where
        F: FnMut(&AudioMood) + 'static,
    {
        self.audio_subscribers.push(Box::new(callback));
    }

    /// Mark whether a pose model is loaded. Without one the engine runs in
    /// audio-only mode and ignores pose input.
    pub fn set_pose_available(&mut self, available: bool) {
        if self.pose_available && !available {
            log::warn!("Pose model unavailable, continuing in audio-only mode");
        }
        self.pose_available = available;
    }

    pub fn pose_available(&self) -> bool {
        self.pose_available
    }

    /// Run gesture recognition on one estimate. `None` means nobody was
    /// detected this tick.
    pub fn process_pose(&mut self, frame: Option<PoseFrame>) -> Vec<GestureEvent> {
        if !self.pose_available {
            return Vec::new();
        }
        let Some(frame) = frame else {
            return Vec::new();
        };

        let events = self.gestures.process(frame);
        for event in &events {
            self.route_gesture(event);
        }
        for event in &events {
            for callback in self.gesture_subscribers.iter_mut() {
                callback(event);
            }
        }
        events
    }

    fn route_gesture(&mut self, event: &GestureEvent) {
        match event {
            GestureEvent::Wave {
                side,
                strength,
                confidence,
                timestamp,
            } => {
                log::info!(
                    "Gesture detected: wave side={} strength={:.2} confidence={:.2}",
                    side.as_str(),
                    strength,
                    confidence
                );
                self.behavior.record_wave(*timestamp);
            }
            GestureEvent::NodYes { confidence, .. } => {
                log::info!("Gesture detected: nod_yes confidence={:.2}", confidence);
                self.animation.trigger(ClipRole::Yes);
            }
            GestureEvent::NodNo { confidence, .. } => {
                log::info!("Gesture detected: nod_no confidence={:.2}", confidence);
                self.animation.trigger(ClipRole::No);
            }
            GestureEvent::Punch { .. } => {
                log::debug!("Punch gestures are not routed");
            }
        }
    }

    /// Extract the mood of one spectrum and notify audio subscribers.
    /// An empty spectrum leaves the previous mood in place.
    pub fn process_audio(&mut self, spectrum: &[u8]) -> Option<AudioMood> {
        let mood = self.audio.extract(spectrum)?;
        self.mood = mood;
        for callback in self.audio_subscribers.iter_mut() {
            callback(&mood);
        }
        Some(mood)
    }

    /// Feed one down-sampled camera frame to the motion detector
    pub fn process_motion(&mut self, rgba: &[u8], now: Millis) -> Option<MotionSample> {
        let sample = self.motion.process(rgba)?;
        self.update_presence(sample.presence);
        if let Some(side) = sample.wave {
            self.handle_wave(side, now);
        }
        Some(sample)
    }

    pub fn update_presence(&mut self, level: f32) {
        self.behavior.update_presence(level);
    }

    /// Externally detected wave; counts as a recent gesture
    pub fn handle_wave(&mut self, side: Side, now: Millis) {
        log::debug!("Wave injected on {} side", side.as_str());
        self.behavior.record_wave(now);
    }

    /// Per-frame update: re-evaluate the state, advance the animation lock
    /// and compute the environment response.
    pub fn update(&mut self, now: Millis, delta_seconds: f32) -> TickReport {
        let state_changed = self.behavior.update(now, self.mood.loudness).is_some();
        let completed_gesture = self.animation.advance(delta_seconds);

        TickReport {
            state: self.behavior.state(),
            state_changed,
            locked: self.animation.is_locked(),
            completed_gesture,
            environment: EnvironmentResponse::from_mood(
                &self.config.environment,
                &self.biome,
                &self.mood,
            ),
        }
    }

    pub fn play_gesture(&mut self, name: &str) -> bool {
        self.animation.play_gesture(name)
    }

    pub fn play_animations(&mut self, names: &[String]) -> bool {
        self.animation.play_animations(names)
    }

    pub fn is_locked(&self) -> bool {
        self.animation.is_locked()
    }

    pub fn state(&self) -> CreatureState {
        self.behavior.state()
    }

    pub fn mood(&self) -> AudioMood {
        self.mood
    }

    pub fn presence(&self) -> f32 {
        self.behavior.presence()
    }

    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }

    /// Replace the clip list when a new creature is loaded
    pub fn load_clips(&mut self, library: AnimationLibrary) {
        log::info!("Loaded {} animation clips", library.clips().len());
        self.animation.load_library(library);
    }

    pub fn biomes(&self) -> &BiomeCatalog {
        &self.biomes
    }

    pub fn biome(&self) -> &BiomePreset {
        &self.biome
    }

    /// Switch biome; unknown ids fall back to the first preset
    pub fn set_biome(&mut self, id: &str) -> &BiomePreset {
        self.biome = self.biomes.get(id).clone();
        log::info!("Biome set to {}", self.biome.name);
        &self.biome
    }

    /// Drop subscribers and discard every buffer. The engine stays usable
    /// and behaves as freshly constructed.
    pub fn dispose(&mut self) {
        self.gesture_subscribers.clear();
        self.audio_subscribers.clear();
        self.gestures.reset();
        self.motion.reset();
        self.behavior.reset();
        self.animation.load_library(AnimationLibrary::new());
        self.biome = self.biomes.fallback().clone();
        self.mood = AudioMood::default();
        self.pose_available = true;
        log::info!("Engine disposed");
    }
}


// App methods for the per-frame update
#[cfg(target_arch = "wasm32")]
use crate::state::App;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Call once per rendered frame. Returns the `TickReport` as a JS object.
    pub fn tick(&mut self) -> std::result::Result<JsValue, JsValue> {
        let now = crate::state::now_ms();
        let delta = self.last_tick.map_or(0.0, |last| ((now - last) / 1000.0) as f32);
        self.last_tick = Some(now);

        let report = self.engine.borrow_mut().update(now, delta);
        serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
