//! Pose inference scheduling
//!
//! Estimation is the only step that suspends. `InferenceGate` keeps at most
//! one request in flight; frames that arrive meanwhile are dropped rather
//! than queued. The engine is only borrowed after the estimate resolves, so
//! other callbacks can use it while inference is pending.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::engine::Engine;
use crate::error::Result;
use crate::gesture::GestureEvent;
use crate::pose::{Millis, PoseFrame};

/// Single-slot re-entrancy guard
#[derive(Debug, Clone, Default)]
pub struct InferenceGate {
    busy: Rc<Cell<bool>>,
}

/// Held while a request is in flight; releases the gate on drop
#[derive(Debug)]
pub struct InferencePermit {
    busy: Rc<Cell<bool>>,
}

impl Drop for InferencePermit {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

impl InferenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<InferencePermit> {
        if self.busy.replace(true) {
            return None;
        }
        Some(InferencePermit {
            busy: self.busy.clone(),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

/// External pose model
pub trait PoseEstimator {
    /// Whatever the model reads a frame from (a video element on the web)
    type Input: ?Sized;

    fn load(&mut self) -> impl Future<Output = Result<()>>;

    /// Estimate the most prominent pose. `Ok(None)` means nobody in view.
    fn estimate<'a>(
        &'a mut self,
        input: &'a Self::Input,
        timestamp: Millis,
    ) -> impl Future<Output = Result<Option<PoseFrame>>> + 'a;
}

#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutcome {
    /// Another request was still in flight
    Skipped,
    /// No usable pose this tick
    NoPose,
    Processed(Vec<GestureEvent>),
}

/// Load the model. On failure the engine switches to audio-only mode.
pub async fn initialize_pose<E: PoseEstimator>(engine: &RefCell<Engine>, estimator: &mut E) -> bool {
    match estimator.load().await {
        Ok(()) => {
            log::info!("Pose model loaded");
            engine.borrow_mut().set_pose_available(true);
            true
        }
        Err(e) => {
            log::warn!("Failed to initialize pose detection: {}", e);
            engine.borrow_mut().set_pose_available(false);
            false
        }
    }
}

/// Run one estimate and feed the result to the engine
pub async fn run_inference<E: PoseEstimator>(
    gate: &InferenceGate,
    engine: &RefCell<Engine>,
    estimator: &mut E,
    input: &E::Input,
    now: Millis,
) -> InferenceOutcome {
    let Some(permit) = gate.try_acquire() else {
        log::trace!("Pose inference already in flight, dropping frame");
        return InferenceOutcome::Skipped;
    };
    run_with_permit(permit, engine, estimator, input, now).await
}

/// Run one estimate under an already acquired permit. The gate reopens when
/// this future completes or is dropped.
pub async fn run_with_permit<E: PoseEstimator>(
    _permit: InferencePermit,
    engine: &RefCell<Engine>,
    estimator: &mut E,
    input: &E::Input,
    now: Millis,
) -> InferenceOutcome {
    if !engine.borrow().pose_available() {
        return InferenceOutcome::NoPose;
    }

    let frame = match estimator.estimate(input, now).await {
        Ok(Some(frame)) => frame,
        Ok(None) => return InferenceOutcome::NoPose,
        Err(e) => {
            log::debug!("{}", e);
            return InferenceOutcome::NoPose;
        }
    };

    InferenceOutcome::Processed(engine.borrow_mut().process_pose(Some(frame)))
}


/// Pose model implemented on the JS side.
///
/// `loader()` and `estimator(video)` may return plain values or promises; the
/// estimator resolves to an array of `{ name, x, y, score }` keypoints, or
/// null when nobody is in view.
#[cfg(target_arch = "wasm32")]
pub struct JsPoseModel {
    loader: Option<js_sys::Function>,
    estimator: Option<js_sys::Function>,
}

#[cfg(target_arch = "wasm32")]
impl JsPoseModel {
    pub fn loader(loader: js_sys::Function) -> Self {
        Self {
            loader: Some(loader),
            estimator: None,
        }
    }

    pub fn estimator(estimator: js_sys::Function) -> Self {
        Self {
            loader: None,
            estimator: Some(estimator),
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn resolve(value: JsValue) -> std::result::Result<JsValue, JsValue> {
    wasm_bindgen_futures::JsFuture::from(js_sys::Promise::resolve(&value)).await
}

#[cfg(target_arch = "wasm32")]
fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(target_arch = "wasm32")]
impl PoseEstimator for JsPoseModel {
    type Input = JsValue;

    async fn load(&mut self) -> Result<()> {
        use crate::error::EngineError;

        let Some(loader) = &self.loader else {
            return Ok(());
        };
        let pending = loader
            .call0(&JsValue::NULL)
            .map_err(|e| EngineError::PoseModel(describe(&e)))?;
        resolve(pending)
            .await
            .map_err(|e| EngineError::PoseModel(describe(&e)))?;
        Ok(())
    }

    fn estimate<'a>(
        &'a mut self,
        input: &'a JsValue,
        timestamp: Millis,
    ) -> impl Future<Output = Result<Option<PoseFrame>>> + 'a {
        async move {
            use crate::error::EngineError;
            use crate::pose::KeypointJson;

            let Some(estimator) = &self.estimator else {
                return Err(EngineError::Estimation("no estimator function".to_string()));
            };
            let pending = estimator
                .call1(&JsValue::NULL, input)
                .map_err(|e| EngineError::Estimation(describe(&e)))?;
            let value = resolve(pending)
                .await
                .map_err(|e| EngineError::Estimation(describe(&e)))?;
            if value.is_null() || value.is_undefined() {
                return Ok(None);
            }

            let keypoints: Vec<KeypointJson> = serde_wasm_bindgen::from_value(value)
                .map_err(|e| EngineError::Estimation(e.to_string()))?;
            Ok(Some(PoseFrame::from_keypoints_json(&keypoints, timestamp)))
        }
    }
}

// App methods for pose inference
#[cfg(target_arch = "wasm32")]
use crate::state::App;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Load the pose model. Resolves to false when loading failed and the
    /// engine continues in audio-only mode.
    pub fn init_pose(&self, loader: js_sys::Function) -> js_sys::Promise {
        let engine = self.engine.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            let mut model = JsPoseModel::loader(loader);
            let loaded = initialize_pose(&engine, &mut model).await;
            Ok(JsValue::from_bool(loaded))
        })
    }

    /// Start one estimate on `video`. Returns false if the previous one is
    /// still pending (the frame is dropped).
    pub fn pose_tick(&self, estimator: js_sys::Function, video: JsValue) -> bool {
        let Some(permit) = self.gate.try_acquire() else {
            log::trace!("Pose inference already in flight, dropping frame");
            return false;
        };

        let engine = self.engine.clone();
        let listeners = self.listeners.clone();
        let now = crate::state::now_ms();

        wasm_bindgen_futures::spawn_local(async move {
            let mut model = JsPoseModel::estimator(estimator);
            let outcome = run_with_permit(permit, &engine, &mut model, &video, now).await;
            if let InferenceOutcome::Processed(events) = outcome {
                listeners.dispatch_gestures(&events);
            }
        });
        true
    }

    /// Feed keypoints estimated elsewhere. Returns the number of gestures emitted.
    pub fn process_keypoints(&mut self, keypoints: JsValue, timestamp: f64) -> usize {
        let frame = if keypoints.is_null() || keypoints.is_undefined() {
            None
        } else {
            match serde_wasm_bindgen::from_value::<Vec<crate::pose::KeypointJson>>(keypoints) {
                Ok(list) => Some(PoseFrame::from_keypoints_json(&list, timestamp)),
                Err(e) => {
                    log::debug!("Ignoring malformed keypoints: {}", e);
                    None
                }
            }
        };

        let events = self.engine.borrow_mut().process_pose(frame);
        self.listeners.dispatch_gestures(&events);
        events.len()
    }
}
