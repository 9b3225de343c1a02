//! Lateral wrist-motion classifier.
//!
//! Compares the wrists of two consecutive frames. Movement must be mostly
//! horizontal so that arm sway from a nod is not mistaken for a wave.

use super::event::{GestureEvent, Side};
use crate::config::WaveConfig;
use crate::pose::PoseFrame;

pub struct WaveDetector {
    config: WaveConfig,
}

impl WaveDetector {
    pub fn new(config: WaveConfig) -> Self {
        Self { config }
    }

    /// Classify each side independently; both may fire in the same call.
    /// Events carry the current frame's timestamp.
    pub fn detect(&self, current: &PoseFrame, previous: &PoseFrame) -> Vec<GestureEvent> {
        let current_avg = current.average_confidence();
        let previous_avg = previous.average_confidence();

        if current_avg <= self.config.min_avg_confidence
            || previous_avg <= self.config.min_avg_confidence
        {
            return Vec::new();
        }

        Side::BOTH
            .into_iter()
            .filter_map(|side| self.detect_side(side, current, previous, current_avg))
            .collect()
    }

    fn detect_side(
        &self,
        side: Side,
        current: &PoseFrame,
        previous: &PoseFrame,
        current_avg: f32,
    ) -> Option<GestureEvent> {
        let wrist = side.wrist();
        let now = current.get(wrist)?;
        let before = previous.get(wrist)?;

        let min_conf = self.config.min_wrist_confidence;
        if now.confidence <= min_conf || before.confidence <= min_conf {
            return None;
        }

        let delta = (now.position - before.position).abs();
        let (horizontal, vertical) = (delta.x, delta.y);

        if horizontal < self.config.min_horizontal_px || vertical >= self.config.max_vertical_px {
            return None;
        }

        Some(GestureEvent::Wave {
            side,
            strength: (horizontal / self.config.full_strength_px).min(1.0),
            confidence: (now.confidence + current_avg) / 2.0,
            timestamp: current.timestamp,
        })
    }
}
