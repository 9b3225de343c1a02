//! Browser-facing application handle
//!
//! `App` is the only object JS holds. It shares the engine with in-flight
//! inference tasks through `Rc<RefCell<_>>`:
//! 1. Core logic lives on `Engine` and takes explicit arguments (time, input)
//! 2. `#[wasm_bindgen] impl App` blocks in each module are thin wrappers
//! 3. JS listeners are called only after the engine borrow is released, so
//!    a listener may call back into `App`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::audio::AudioMood;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::gesture::GestureEvent;
use crate::inference::InferenceGate;

/// Host clock in milliseconds (`performance.now()`, falling back to `Date.now()`)
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// JS callbacks registered through `on_gesture` / `on_audio`
#[derive(Default)]
pub struct Listeners {
    gesture: RefCell<Vec<js_sys::Function>>,
    audio: RefCell<Vec<js_sys::Function>>,
}

impl Listeners {
    fn call_all(callbacks: &RefCell<Vec<js_sys::Function>>, value: &JsValue) {
        // Snapshot so a callback can register another listener
        let callbacks = callbacks.borrow().clone();
        for callback in &callbacks {
            if let Err(e) = callback.call1(&JsValue::NULL, value) {
                log::error!("Listener threw: {:?}", e);
            }
        }
    }

    pub fn dispatch_gestures(&self, events: &[GestureEvent]) {
        if self.gesture.borrow().is_empty() {
            return;
        }
        for event in events {
            match serde_wasm_bindgen::to_value(&event.to_record()) {
                Ok(value) => Self::call_all(&self.gesture, &value),
                Err(e) => log::error!("Failed to serialize gesture: {}", e),
            }
        }
    }

    pub fn dispatch_audio(&self, mood: &AudioMood) {
        if self.audio.borrow().is_empty() {
            return;
        }
        match serde_wasm_bindgen::to_value(mood) {
            Ok(value) => Self::call_all(&self.audio, &value),
            Err(e) => log::error!("Failed to serialize audio mood: {}", e),
        }
    }

    fn clear(&self) {
        self.gesture.borrow_mut().clear();
        self.audio.borrow_mut().clear();
    }
}

#[wasm_bindgen]
pub struct App {
    pub(crate) engine: Rc<RefCell<Engine>>,
    pub(crate) listeners: Rc<Listeners>,
    pub(crate) gate: InferenceGate,
    pub(crate) last_tick: Option<f64>,
}

#[wasm_bindgen]
impl App {
    /// Create the engine. `config_json` may override any subset of the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<App, JsValue> {
        crate::init_logging();

        let config = match config_json {
            Some(json) => EngineConfig::from_json(&json)
                .map_err(|e| JsValue::from_str(&format!("Invalid engine config: {}", e)))?,
            None => EngineConfig::default(),
        };
        let engine = Engine::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Behavior engine created");
        Ok(App {
            engine: Rc::new(RefCell::new(engine)),
            listeners: Rc::new(Listeners::default()),
            gate: InferenceGate::new(),
            last_tick: None,
        })
    }

    /// Register a gesture listener: `({ type, side?, strength?, confidence, timestamp }) => void`
    pub fn on_gesture(&self, callback: js_sys::Function) {
        self.listeners.gesture.borrow_mut().push(callback);
    }

    /// Register an audio listener: `({ loudness, lowBand, midBand, highBand }) => void`
    pub fn on_audio(&self, callback: js_sys::Function) {
        self.listeners.audio.borrow_mut().push(callback);
    }

    /// Drop all listeners and buffers. The handle stays usable.
    pub fn dispose(&mut self) {
        self.listeners.clear();
        self.engine.borrow_mut().dispose();
        self.last_tick = None;
    }
}
