use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Anatomical landmark reported by the pose model.
/// Ordered as the single-pose model emits them (COCO order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum KeypointName {
    // Face
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,

    // Arms
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,

    // Legs
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointName {
    /// Total number of keypoints per frame
    pub const COUNT: usize = 17;

    /// Convert to array index
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// All keypoints in model order
    pub const ALL: [KeypointName; Self::COUNT] = [
        KeypointName::Nose,
        KeypointName::LeftEye,
        KeypointName::RightEye,
        KeypointName::LeftEar,
        KeypointName::RightEar,
        KeypointName::LeftShoulder,
        KeypointName::RightShoulder,
        KeypointName::LeftElbow,
        KeypointName::RightElbow,
        KeypointName::LeftWrist,
        KeypointName::RightWrist,
        KeypointName::LeftHip,
        KeypointName::RightHip,
        KeypointName::LeftKnee,
        KeypointName::RightKnee,
        KeypointName::LeftAnkle,
        KeypointName::RightAnkle,
    ];

    /// Name as the pose model spells it
    pub const fn as_str(self) -> &'static str {
        match self {
            KeypointName::Nose => "nose",
            KeypointName::LeftEye => "left_eye",
            KeypointName::RightEye => "right_eye",
            KeypointName::LeftEar => "left_ear",
            KeypointName::RightEar => "right_ear",
            KeypointName::LeftShoulder => "left_shoulder",
            KeypointName::RightShoulder => "right_shoulder",
            KeypointName::LeftElbow => "left_elbow",
            KeypointName::RightElbow => "right_elbow",
            KeypointName::LeftWrist => "left_wrist",
            KeypointName::RightWrist => "right_wrist",
            KeypointName::LeftHip => "left_hip",
            KeypointName::RightHip => "right_hip",
            KeypointName::LeftKnee => "left_knee",
            KeypointName::RightKnee => "right_knee",
            KeypointName::LeftAnkle => "left_ankle",
            KeypointName::RightAnkle => "right_ankle",
        }
    }

    /// Look up a keypoint by model name. Unknown names return None.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kp| kp.as_str() == name)
    }
}

static_assertions::const_assert_eq!(KeypointName::COUNT, KeypointName::ALL.len());
static_assertions::const_assert_eq!(KeypointName::RightAnkle as usize, KeypointName::COUNT - 1);

/// A single detected landmark. Immutable once captured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub name: KeypointName,
    /// Image-space position in pixels
    pub position: Vec2,
    /// Detection confidence in [0, 1]
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(name: KeypointName, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            name,
            position: Vec2::new(x, y),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Keypoint in the pose model's JSON shape
///
/// The model reports confidence as `score`; both spellings are accepted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeypointJson {
    #[serde(default)]
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
    #[serde(default, alias = "score")]
    pub confidence: Option<f32>,
}

impl KeypointJson {
    /// Convert to a runtime keypoint. Unnamed or unknown landmarks are dropped.
    pub fn to_keypoint(&self) -> Option<Keypoint> {
        let name = KeypointName::from_name(self.name.as_deref()?)?;
        if !self.x.is_finite() || !self.y.is_finite() {
            return None;
        }
        Some(Keypoint::new(
            name,
            self.x,
            self.y,
            self.confidence.unwrap_or(0.0),
        ))
    }
}
