use serde::{Deserialize, Serialize};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::error::Result;

/// Metadata of one clip available on the loaded creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    pub name: String,
    /// Clip length in seconds
    pub duration: f32,
}

/// Animation library - loaded once per creature, read-only during playback
///
/// Keeps clips in load order so that name matching is deterministic.
#[derive(Debug, Clone, Default)]
pub struct AnimationLibrary {
    clips: Vec<ClipInfo>,
}

impl AnimationLibrary {
    /// Create empty animation library
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of `{ "name": .., "duration": .. }`
    pub fn from_json(json: &str) -> Result<Self> {
        let clips: Vec<ClipInfo> = serde_json::from_str(json)?;
        let mut library = Self::new();
        for clip in clips {
            library.add_clip(clip);
        }
        Ok(library)
    }

    /// Add a clip, replacing any clip with the same name
    pub fn add_clip(&mut self, clip: ClipInfo) {
        match self.clips.iter_mut().find(|c| c.name == clip.name) {
            Some(existing) => *existing = clip,
            None => self.clips.push(clip),
        }
    }

    /// Get a clip by exact name
    pub fn get_clip(&self, name: &str) -> Option<&ClipInfo> {
        self.clips.iter().find(|c| c.name == name)
    }

    /// Check if a clip exists
    pub fn has_clip(&self, name: &str) -> bool {
        self.get_clip(name).is_some()
    }

    pub fn clips(&self) -> &[ClipInfo] {
        &self.clips
    }

    pub fn names(&self) -> Vec<String> {
        self.clips.iter().map(|c| c.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Purpose a clip is picked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipRole {
    Idle,
    Yes,
    No,
}

/// Case-insensitive substring rule mapping clip names to a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRule {
    pub role: ClipRole,
    /// Any of these substrings qualifies the clip
    #[serde(default)]
    pub include: Vec<String>,
    /// Any of these substrings disqualifies it
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl MatchRule {
    pub fn new(role: ClipRole, include: &[&str], exclude: &[&str]) -> Self {
        Self {
            role,
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn matches(&self, clip_name: &str) -> bool {
        let name = clip_name.to_lowercase();
        let has = |needle: &String| name.contains(&needle.to_lowercase());
        self.include.iter().any(has) && !self.exclude.iter().any(has)
    }
}

/// Ordered list of name rules. Asset authors name clips freely, so role
/// lookup is data, not code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipMatcher {
    rules: Vec<MatchRule>,
}

impl Default for ClipMatcher {
    fn default() -> Self {
        Self {
            rules: vec![
                MatchRule::new(ClipRole::Idle, &["idle"], &[]),
                MatchRule::new(ClipRole::Yes, &["yes", "nod"], &["no"]),
                MatchRule::new(ClipRole::No, &["no", "shake"], &[]),
            ],
        }
    }
}

impl ClipMatcher {
    pub fn new(rules: Vec<MatchRule>) -> Self {
        Self { rules }
    }

    fn rules_for(&self, role: ClipRole) -> impl Iterator<Item = &MatchRule> {
        self.rules.iter().filter(move |r| r.role == role)
    }

    /// First clip matched by the first rule of `role` that matches anything
    pub fn find<'a>(&self, role: ClipRole, library: &'a AnimationLibrary) -> Option<&'a ClipInfo> {
        self.rules_for(role)
            .find_map(|rule| library.clips().iter().find(|c| rule.matches(&c.name)))
    }

    /// Every clip matched by any rule of `role`, in library order
    pub fn find_all<'a>(&self, role: ClipRole, library: &'a AnimationLibrary) -> Vec<&'a ClipInfo> {
        library
            .clips()
            .iter()
            .filter(|c| self.rules_for(role).any(|rule| rule.matches(&c.name)))
            .collect()
    }
}

/// What the creature is animating right now. Exactly one variant is active.
#[derive(Clone, Debug, PartialEq)]
pub enum Playback {
    /// Looping idle set
    Idle { clips: Vec<String> },
    /// One-shot gesture clip holding the animation lock
    Gesture {
        clip: String,
        duration: f32,
        /// Local playback time in seconds
        time: f32,
    },
}

impl Default for Playback {
    fn default() -> Self {
        Playback::Idle { clips: Vec::new() }
    }
}

impl Playback {
    /// Advance local time by delta (idle sets loop on the host side)
    pub fn advance(self, delta_seconds: f32) -> Playback {
        match self {
            Playback::Gesture {
                clip,
                duration,
                time,
            } => Playback::Gesture {
                clip,
                duration,
                time: time + delta_seconds,
            },
            idle => idle,
        }
    }

    /// A gesture clip whose local time reached its duration
    pub fn is_finished(&self) -> bool {
        matches!(self, Playback::Gesture { duration, time, .. } if time >= duration)
    }

    pub fn is_gesture(&self) -> bool {
        matches!(self, Playback::Gesture { .. })
    }
}

/// Gesture-priority animation lock.
///
/// While a gesture clip plays, idle-set changes and further gesture requests
/// are ignored. The lock releases itself once the clip reaches its duration
/// and the default idle set resumes.
#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    library: AnimationLibrary,
    matcher: ClipMatcher,
    playback: Playback,
}

impl AnimationController {
    pub fn new(matcher: ClipMatcher) -> Self {
        Self {
            library: AnimationLibrary::new(),
            matcher,
            playback: Playback::default(),
        }
    }

    /// Swap in the clips of a newly loaded creature and start its idle set.
    /// Any running gesture belongs to the old creature and is dropped.
    pub fn load_library(&mut self, library: AnimationLibrary) {
        self.library = library;
        self.playback = Playback::Idle {
            clips: self.default_idle_set(),
        };
    }

    /// Clips whose names match the idle role, else every clip
    pub fn default_idle_set(&self) -> Vec<String> {
        let idle: Vec<String> = self
            .matcher
            .find_all(ClipRole::Idle, &self.library)
            .into_iter()
            .map(|c| c.name.clone())
            .collect();
        if idle.is_empty() {
            self.library.names()
        } else {
            idle
        }
    }

    /// Replace the idle set. Empty `names` means all clips; unknown names
    /// are skipped. Returns false (no effect) while a gesture is locked.
    pub fn play_animations(&mut self, names: &[String]) -> bool {
        if self.is_locked() || self.library.is_empty() {
            return false;
        }

        let clips = if names.is_empty() {
            self.library.names()
        } else {
            names
                .iter()
                .filter(|n| self.library.has_clip(n))
                .cloned()
                .collect()
        };
        self.playback = Playback::Idle { clips };
        true
    }

    /// Start a one-shot clip by exact name. No-op if locked or missing.
    pub fn play_gesture(&mut self, name: &str) -> bool {
        if self.is_locked() {
            log::debug!("Gesture clip {} ignored: another gesture is playing", name);
            return false;
        }
        let Some(clip) = self.library.get_clip(name) else {
            log::debug!("No clip named {} on this creature", name);
            return false;
        };

        log::info!("Playing gesture animation: {}", clip.name);
        self.playback = Playback::Gesture {
            clip: clip.name.clone(),
            duration: clip.duration,
            time: 0.0,
        };
        true
    }

    /// Start the clip the matcher assigns to `role`, if the creature has one
    pub fn trigger(&mut self, role: ClipRole) -> bool {
        match self.matcher.find(role, &self.library) {
            Some(clip) => {
                let name = clip.name.clone();
                self.play_gesture(&name)
            }
            None => {
                log::debug!("No {:?} animation found in model", role);
                false
            }
        }
    }

    /// Advance playback; returns the gesture clip that completed this step
    pub fn advance(&mut self, delta_seconds: f32) -> Option<String> {
        self.playback = std::mem::take(&mut self.playback).advance(delta_seconds);

        if !self.playback.is_finished() {
            return None;
        }

        let finished = match std::mem::take(&mut self.playback) {
            Playback::Gesture { clip, .. } => clip,
            Playback::Idle { .. } => return None,
        };
        log::info!("Gesture animation finished: {}", finished);
        self.playback = Playback::Idle {
            clips: self.default_idle_set(),
        };
        Some(finished)
    }

    pub fn is_locked(&self) -> bool {
        self.playback.is_gesture()
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn library(&self) -> &AnimationLibrary {
        &self.library
    }

    /// Clip names for UI listing
    pub fn available_names(&self) -> Vec<String> {
        self.library.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn library(clips: &[(&str, f32)]) -> AnimationLibrary {
        let mut lib = AnimationLibrary::new();
        for (name, duration) in clips {
            lib.add_clip(ClipInfo {
                name: name.to_string(),
                duration: *duration,
            });
        }
        lib
    }

    fn controller(clips: &[(&str, f32)]) -> AnimationController {
        let mut ctrl = AnimationController::new(ClipMatcher::default());
        ctrl.load_library(library(clips));
        ctrl
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_idle_set_prefers_idle_clips() {
        let ctrl = controller(&[("Swim", 2.0), ("Idle_Float", 3.0), ("idle2", 1.0)]);
        assert_eq!(
            ctrl.playback(),
            &Playback::Idle {
                clips: vec!["Idle_Float".to_string(), "idle2".to_string()]
            }
        );
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_idle_set_falls_back_to_all_clips() {
        let ctrl = controller(&[("Swim", 2.0), ("Bite", 1.0)]);
        assert_eq!(ctrl.default_idle_set(), vec!["Swim", "Bite"]);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_gesture_lock_blocks_then_releases() {
        let mut ctrl = controller(&[("Idle", 2.0), ("Swim", 2.0), ("HeadYes", 1.2)]);

        assert!(ctrl.trigger(ClipRole::Yes));
        assert!(ctrl.is_locked());

        // t + 0.5s: idle request has no visible effect
        assert_eq!(ctrl.advance(0.5), None);
        assert!(!ctrl.play_animations(&["Swim".to_string()]));
        assert!(matches!(ctrl.playback(), Playback::Gesture { clip, .. } if clip == "HeadYes"));

        // t + 1.3s: lock released, idle set resumes on its own
        assert_eq!(ctrl.advance(0.8), Some("HeadYes".to_string()));
        assert!(!ctrl.is_locked());
        assert_eq!(
            ctrl.playback(),
            &Playback::Idle {
                clips: vec!["Idle".to_string()]
            }
        );
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_second_gesture_ignored_while_locked() {
        let mut ctrl = controller(&[("Yes", 1.0), ("Shake", 1.0)]);
        assert!(ctrl.trigger(ClipRole::Yes));
        assert!(!ctrl.trigger(ClipRole::No));
        assert!(matches!(ctrl.playback(), Playback::Gesture { clip, .. } if clip == "Yes"));
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_missing_clip_is_noop() {
        let mut ctrl = controller(&[("Idle", 2.0)]);
        assert!(!ctrl.trigger(ClipRole::No));
        assert!(!ctrl.play_gesture("Wiggle"));
        assert!(!ctrl.is_locked());
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_default_matcher_heuristics() {
        let matcher = ClipMatcher::default();
        let lib = library(&[("NodDown", 1.0), ("say_yes", 1.0), ("HeadShake", 1.0)]);

        // "NodDown" contains "no", so it never counts as a yes clip
        assert_eq!(matcher.find(ClipRole::Yes, &lib).unwrap().name, "say_yes");
        assert_eq!(matcher.find(ClipRole::No, &lib).unwrap().name, "NodDown");
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_custom_matcher_from_json() {
        let json = r#"[
            { "role": "yes", "include": ["agree"] },
            { "role": "no", "include": ["refuse"], "exclude": ["soft"] }
        ]"#;
        let matcher: ClipMatcher = serde_json::from_str(json).unwrap();
        let lib = library(&[("soft_refuse", 1.0), ("Refuse", 1.0), ("AGREE", 1.0)]);

        assert_eq!(matcher.find(ClipRole::Yes, &lib).unwrap().name, "AGREE");
        assert_eq!(matcher.find(ClipRole::No, &lib).unwrap().name, "Refuse");
        assert!(matcher.find(ClipRole::Idle, &lib).is_none());
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_zero_length_clip_completes_next_step() {
        let mut ctrl = controller(&[("yes", 0.0)]);
        assert!(ctrl.trigger(ClipRole::Yes));
        assert_eq!(ctrl.advance(0.0), Some("yes".to_string()));
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_play_animations_filters_unknown_and_empty_means_all() {
        let mut ctrl = controller(&[("Idle", 1.0), ("Swim", 1.0)]);

        assert!(ctrl.play_animations(&["Swim".to_string(), "Fly".to_string()]));
        assert_eq!(
            ctrl.playback(),
            &Playback::Idle {
                clips: vec!["Swim".to_string()]
            }
        );

        assert!(ctrl.play_animations(&[]));
        assert_eq!(
            ctrl.playback(),
            &Playback::Idle {
                clips: vec!["Idle".to_string(), "Swim".to_string()]
            }
        );
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_library_parsing() {
        let json = r#"[
            { "name": "Idle", "duration": 2.5 },
            { "name": "Yes", "duration": 1.2 }
        ]"#;

        let lib = AnimationLibrary::from_json(json).unwrap();
        assert_eq!(lib.names(), vec!["Idle", "Yes"]);
        assert_eq!(lib.get_clip("Yes").unwrap().duration, 1.2);
        assert!(AnimationLibrary::from_json("{}").is_err());
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_load_library_drops_running_gesture() {
        let mut ctrl = controller(&[("yes", 5.0)]);
        ctrl.trigger(ClipRole::Yes);
        ctrl.load_library(library(&[("Idle", 1.0)]));
        assert!(!ctrl.is_locked());
    }
}

// App methods for animation
#[cfg(target_arch = "wasm32")]
use crate::state::App;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Load the clip list of the current creature from JSON
    pub fn load_clips(&mut self, json_data: String) -> std::result::Result<(), JsValue> {
        let library = AnimationLibrary::from_json(&json_data)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse clips: {}", e)))?;
        self.engine.borrow_mut().load_clips(library);
        Ok(())
    }

    /// Names of the clips on the loaded creature
    pub fn available_animations(&self) -> Vec<String> {
        self.engine.borrow().animation().available_names()
    }

    /// Start a one-shot gesture clip by name
    pub fn play_gesture(&mut self, name: &str) -> bool {
        self.engine.borrow_mut().play_gesture(name)
    }

    /// Replace the idle set; ignored while a gesture clip holds the lock
    pub fn play_animations(&mut self, names: Vec<String>) -> bool {
        self.engine.borrow_mut().play_animations(&names)
    }

    pub fn is_locked(&self) -> bool {
        self.engine.borrow().is_locked()
    }
}
