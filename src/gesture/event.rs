use serde::Serialize;

use crate::pose::{KeypointName, Millis};

/// Which hand performed a one-sided gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Parse the host's side string ("left" / "right", case-insensitive)
    pub fn parse(s: &str) -> Option<Side> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Some(Side::Left),
            "right" => Some(Side::Right),
            _ => None,
        }
    }

    /// Wrist keypoint tracked for this side
    pub fn wrist(&self) -> KeypointName {
        match self {
            Side::Left => KeypointName::LeftWrist,
            Side::Right => KeypointName::RightWrist,
        }
    }
}

/// Discriminant of a gesture event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Wave,
    NodYes,
    NodNo,
    Punch,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureKind::Wave => "wave",
            GestureKind::NodYes => "nod_yes",
            GestureKind::NodNo => "nod_no",
            GestureKind::Punch => "punch",
        }
    }
}

/// A classified motion occurrence. Emitted once per qualifying detection,
/// never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    Wave {
        side: Side,
        strength: f32,
        confidence: f32,
        timestamp: Millis,
    },
    NodYes {
        confidence: f32,
        timestamp: Millis,
    },
    NodNo {
        confidence: f32,
        timestamp: Millis,
    },
    /// Reserved. Part of the event vocabulary but no detector emits it yet.
    Punch {
        side: Option<Side>,
        strength: Option<f32>,
        confidence: f32,
        timestamp: Millis,
    },
}

impl GestureEvent {
    pub fn kind(&self) -> GestureKind {
        match self {
            GestureEvent::Wave { .. } => GestureKind::Wave,
            GestureEvent::NodYes { .. } => GestureKind::NodYes,
            GestureEvent::NodNo { .. } => GestureKind::NodNo,
            GestureEvent::Punch { .. } => GestureKind::Punch,
        }
    }

    pub fn timestamp(&self) -> Millis {
        match *self {
            GestureEvent::Wave { timestamp, .. }
            | GestureEvent::NodYes { timestamp, .. }
            | GestureEvent::NodNo { timestamp, .. }
            | GestureEvent::Punch { timestamp, .. } => timestamp,
        }
    }

    pub fn confidence(&self) -> f32 {
        match *self {
            GestureEvent::Wave { confidence, .. }
            | GestureEvent::NodYes { confidence, .. }
            | GestureEvent::NodNo { confidence, .. }
            | GestureEvent::Punch { confidence, .. } => confidence,
        }
    }

    pub fn side(&self) -> Option<Side> {
        match *self {
            GestureEvent::Wave { side, .. } => Some(side),
            GestureEvent::Punch { side, .. } => side,
            _ => None,
        }
    }

    pub fn strength(&self) -> Option<f32> {
        match *self {
            GestureEvent::Wave { strength, .. } => Some(strength),
            GestureEvent::Punch { strength, .. } => strength,
            _ => None,
        }
    }

    /// Flat record handed to the rendering layer
    pub fn to_record(&self) -> GestureRecord {
        GestureRecord {
            kind: self.kind(),
            side: self.side(),
            strength: self.strength(),
            confidence: self.confidence(),
            timestamp: self.timestamp(),
        }
    }
}

/// Wire shape of a gesture event: `{type, side?, strength?, confidence, timestamp}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureRecord {
    #[serde(rename = "type")]
    pub kind: GestureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
    pub confidence: f32,
    pub timestamp: Millis,
}
