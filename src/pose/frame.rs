use super::keypoint::{Keypoint, KeypointJson, KeypointName};
use crate::error::Result;

/// Monotonic host clock reading in milliseconds
pub type Millis = f64;

/// All keypoints detected at one instant.
///
/// Stored as a fixed array indexed by `KeypointName`; absent landmarks are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseFrame {
    keypoints: [Option<Keypoint>; KeypointName::COUNT],
    pub timestamp: Millis,
}

impl PoseFrame {
    /// Create an empty frame captured at `timestamp`
    pub fn new(timestamp: Millis) -> Self {
        Self {
            keypoints: [None; KeypointName::COUNT],
            timestamp,
        }
    }

    /// Builder-style insert (replaces an existing keypoint of the same name)
    pub fn with_keypoint(mut self, keypoint: Keypoint) -> Self {
        self.insert(keypoint);
        self
    }

    pub fn insert(&mut self, keypoint: Keypoint) {
        self.keypoints[keypoint.name.index()] = Some(keypoint);
    }

    /// Build a frame from an arbitrary set of keypoints
    pub fn from_keypoints<I>(keypoints: I, timestamp: Millis) -> Self
    where
        I: IntoIterator<Item = Keypoint>,
    {
        let mut frame = Self::new(timestamp);
        for kp in keypoints {
            frame.insert(kp);
        }
        frame
    }

    /// Build a frame from the pose model's keypoint list, skipping unknown entries
    pub fn from_keypoints_json(keypoints: &[KeypointJson], timestamp: Millis) -> Self {
        Self::from_keypoints(keypoints.iter().filter_map(KeypointJson::to_keypoint), timestamp)
    }

    /// Parse a JSON array of keypoints
    pub fn from_json(json: &str, timestamp: Millis) -> Result<Self> {
        let keypoints: Vec<KeypointJson> = serde_json::from_str(json)?;
        Ok(Self::from_keypoints_json(&keypoints, timestamp))
    }

    #[inline]
    pub fn get(&self, name: KeypointName) -> Option<&Keypoint> {
        self.keypoints[name.index()].as_ref()
    }

    /// Iterate over the keypoints present in this frame, in model order
    pub fn keypoints(&self) -> impl Iterator<Item = &Keypoint> {
        self.keypoints.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.keypoints().count()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.iter().all(Option::is_none)
    }

    /// Mean confidence over the keypoints present; 0.0 for an empty frame
    pub fn average_confidence(&self) -> f32 {
        crate::math::mean(self.keypoints().map(|kp| kp.confidence)).unwrap_or(0.0)
    }
}
