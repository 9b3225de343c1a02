//! Creature behavior state machine
//!
//! The state is recomputed from scratch on every update, with no dwell time.
//! First matching rule wins:
//! 1. recent wave OR loud          -> Startled
//! 2. strong presence OR moderate  -> Curious
//! 3. weak presence OR quiet sound -> Playful
//! 4. otherwise                    -> Idle

use serde::Serialize;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::config::BehaviorConfig;
use crate::pose::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureState {
    #[default]
    Idle,
    Curious,
    Playful,
    Startled,
}

impl CreatureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatureState::Idle => "idle",
            CreatureState::Curious => "curious",
            CreatureState::Playful => "playful",
            CreatureState::Startled => "startled",
        }
    }
}

/// Inputs of a single evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BehaviorInputs {
    pub loudness: f32,
    pub presence: f32,
    pub has_recent_gesture: bool,
}

/// Pure transition function
pub fn evaluate_state(config: &BehaviorConfig, inputs: &BehaviorInputs) -> CreatureState {
    if inputs.has_recent_gesture || inputs.loudness > config.startled_loudness {
        CreatureState::Startled
    } else if inputs.presence > config.curious_presence || inputs.loudness > config.curious_loudness
    {
        CreatureState::Curious
    } else if inputs.presence > config.playful_presence || inputs.loudness > config.playful_loudness
    {
        CreatureState::Playful
    } else {
        CreatureState::Idle
    }
}

/// Owns the present-tense state plus the inputs it is derived from
#[derive(Debug, Clone)]
pub struct CreatureBehavior {
    config: BehaviorConfig,
    state: CreatureState,
    presence: f32,
    last_wave: Option<Millis>,
}

impl CreatureBehavior {
    pub fn new(config: BehaviorConfig) -> Self {
        Self {
            config,
            state: CreatureState::Idle,
            presence: 0.0,
            last_wave: None,
        }
    }

    /// Set the externally derived presence level (clamped to [0, 1])
    pub fn update_presence(&mut self, level: f32) {
        self.presence = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn presence(&self) -> f32 {
        self.presence
    }

    /// Mark a wave (detected or injected) at `now`
    pub fn record_wave(&mut self, now: Millis) {
        self.last_wave = Some(now);
    }

    pub fn has_recent_gesture(&self, now: Millis) -> bool {
        self.last_wave
            .is_some_and(|t| now - t < self.config.recent_gesture_ms)
    }

    /// Re-evaluate the state. Returns the previous state when it changed.
    pub fn update(&mut self, now: Millis, loudness: f32) -> Option<CreatureState> {
        let inputs = BehaviorInputs {
            loudness,
            presence: self.presence,
            has_recent_gesture: self.has_recent_gesture(now),
        };
        let next = evaluate_state(&self.config, &inputs);

        if next == self.state {
            return None;
        }

        log::debug!(
            "Creature state {} -> {} (loudness {:.2}, presence {:.2})",
            self.state.as_str(),
            next.as_str(),
            loudness,
            self.presence
        );
        Some(std::mem::replace(&mut self.state, next))
    }

    pub fn state(&self) -> CreatureState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = CreatureState::Idle;
        self.presence = 0.0;
        self.last_wave = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn eval(loudness: f32, presence: f32, has_recent_gesture: bool) -> CreatureState {
        evaluate_state(
            &BehaviorConfig::default(),
            &BehaviorInputs {
                loudness,
                presence,
                has_recent_gesture,
            },
        )
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_loudness_dominates_presence() {
        assert_eq!(eval(0.75, 0.9, false), CreatureState::Startled);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_rule_order() {
        assert_eq!(eval(0.0, 0.0, true), CreatureState::Startled);
        assert_eq!(eval(0.0, 0.6, false), CreatureState::Curious);
        assert_eq!(eval(0.35, 0.0, false), CreatureState::Curious);
        assert_eq!(eval(0.0, 0.3, false), CreatureState::Playful);
        assert_eq!(eval(0.15, 0.0, false), CreatureState::Playful);
        assert_eq!(eval(0.1, 0.2, false), CreatureState::Idle);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_recent_wave_window() {
        let mut behavior = CreatureBehavior::new(BehaviorConfig::default());
        assert!(!behavior.has_recent_gesture(0.0));

        behavior.record_wave(1000.0);
        assert!(behavior.has_recent_gesture(2999.0));
        assert!(!behavior.has_recent_gesture(3000.0));
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_update_reports_transitions() {
        let mut behavior = CreatureBehavior::new(BehaviorConfig::default());

        assert_eq!(behavior.update(0.0, 0.0), None);
        assert_eq!(behavior.state(), CreatureState::Idle);

        behavior.record_wave(100.0);
        assert_eq!(behavior.update(100.0, 0.0), Some(CreatureState::Idle));
        assert_eq!(behavior.state(), CreatureState::Startled);

        // Recency expires; state falls straight back without dwelling
        assert_eq!(behavior.update(2100.0, 0.0), Some(CreatureState::Startled));
        assert_eq!(behavior.state(), CreatureState::Idle);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_presence_clamped() {
        let mut behavior = CreatureBehavior::new(BehaviorConfig::default());
        behavior.update_presence(3.0);
        assert_eq!(behavior.presence(), 1.0);
        behavior.update_presence(f32::NAN);
        assert_eq!(behavior.presence(), 0.0);
    }
}

// App methods for behavior inputs
#[cfg(target_arch = "wasm32")]
use crate::state::App;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Set the presence level derived by the host (0..1)
    pub fn update_presence(&mut self, level: f32) {
        self.engine.borrow_mut().update_presence(level);
    }

    /// Inject a wave from an external detector ("left" or "right")
    pub fn handle_wave(&mut self, side: &str) -> bool {
        match crate::gesture::Side::parse(side) {
            Some(side) => {
                let now = crate::state::now_ms();
                self.engine.borrow_mut().handle_wave(side, now);
                true
            }
            None => {
                log::debug!("Ignoring wave with unknown side {:?}", side);
                false
            }
        }
    }

    /// Current creature state ("idle", "curious", "playful", "startled")
    pub fn state(&self) -> String {
        self.engine.borrow().state().as_str().to_string()
    }
}
