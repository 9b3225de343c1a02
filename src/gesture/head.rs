//! Head nod ("yes") and shake ("no") classifier over the nose trajectory.
//!
//! ## Test per axis
//!
//! Over the newest `analysis_window` samples:
//! - range on the axis must exceed `min_range`
//! - range must exceed `axis_dominance` x the range on the other axis
//! - splitting the window at its midpoint, the two halves' means must differ
//!   by more than `direction_fraction` x `min_range`
//!
//! The last check requires an actual directional change, not just a wide range.

use glam::Vec2;

use super::event::GestureEvent;
use crate::config::{AxisThresholds, HeadGestureConfig, HistoryConfig};
use crate::pose::{KeypointName, Millis, PoseFrame, PoseHistory};

/// Spread of one coordinate across the analysed window
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisMotion {
    range: f32,
    /// |mean(first half) - mean(second half)|
    half_delta: f32,
}

impl AxisMotion {
    fn measure(values: &[f32]) -> Self {
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        let mid = values.len() / 2;
        let (first, second) = values.split_at(mid);
        let first_mean = crate::math::mean(first.iter().copied()).unwrap_or(0.0);
        let second_mean = crate::math::mean(second.iter().copied()).unwrap_or(0.0);

        Self {
            range: max - min,
            half_delta: (first_mean - second_mean).abs(),
        }
    }
}

pub struct HeadGestureDetector {
    config: HeadGestureConfig,
    history: PoseHistory,
}

impl HeadGestureDetector {
    pub fn new(config: HeadGestureConfig, history: &HistoryConfig) -> Self {
        Self {
            config,
            history: PoseHistory::new(history.capacity, history.window_ms),
        }
    }

    /// Record the frame's nose (if confident enough) and prune the window.
    /// Runs every tick regardless of cooldown.
    pub fn observe(&mut self, frame: &PoseFrame) {
        if let Some(nose) = frame.get(KeypointName::Nose) {
            if nose.confidence > self.config.min_sample_confidence {
                self.history.push(nose.position, frame.timestamp);
            }
        }
        self.history.prune(frame.timestamp);
    }

    /// Classify the current window. `confidence` is the current frame's
    /// average keypoint confidence and is copied onto the event.
    pub fn analyze(&self, confidence: f32, now: Millis) -> Option<GestureEvent> {
        if self.history.len() < self.config.min_samples {
            return None;
        }

        let window: Vec<Vec2> = self
            .history
            .recent(self.config.analysis_window)
            .map(|s| s.position)
            .collect();
        let xs: Vec<f32> = window.iter().map(|p| p.x).collect();
        let ys: Vec<f32> = window.iter().map(|p| p.y).collect();

        let vertical = AxisMotion::measure(&ys);
        let horizontal = AxisMotion::measure(&xs);

        if let Some(strength) = self.axis_strength(&vertical, &horizontal, &self.config.nod) {
            log::debug!("Head nod (yes) strength {:.2}", strength);
            return Some(GestureEvent::NodYes {
                confidence,
                timestamp: now,
            });
        }

        if let Some(strength) = self.axis_strength(&horizontal, &vertical, &self.config.shake) {
            log::debug!("Head shake (no) strength {:.2}", strength);
            return Some(GestureEvent::NodNo {
                confidence,
                timestamp: now,
            });
        }

        None
    }

    /// Strength in [0, 1] if `primary` qualifies against `other`
    fn axis_strength(
        &self,
        primary: &AxisMotion,
        other: &AxisMotion,
        thresholds: &AxisThresholds,
    ) -> Option<f32> {
        let dominant = primary.range > thresholds.min_range
            && primary.range > self.config.axis_dominance * other.range;
        let directional = primary.half_delta > self.config.direction_fraction * thresholds.min_range;

        (dominant && directional)
            .then(|| (primary.range / thresholds.full_strength_range).min(1.0))
    }

    pub fn history(&self) -> &PoseHistory {
        &self.history
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use crate::pose::Keypoint;

    fn detector() -> HeadGestureDetector {
        HeadGestureDetector::new(HeadGestureConfig::default(), &HistoryConfig::default())
    }

    fn nose_frame(t: f64, x: f32, y: f32, confidence: f32) -> PoseFrame {
        PoseFrame::new(t).with_keypoint(Keypoint::new(KeypointName::Nose, x, y, confidence))
    }

    /// Feed `n` samples along a straight line, 30 ms apart
    fn feed_line(det: &mut HeadGestureDetector, n: usize, dx: f32, dy: f32) -> f64 {
        let step = 1.0 / (n - 1) as f32;
        let mut t = 0.0;
        for i in 0..n {
            let f = i as f32 * step;
            t = i as f64 * 30.0;
            det.observe(&nose_frame(t, 200.0 + dx * f, 100.0 + dy * f, 0.9));
        }
        t
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_vertical_trajectory_is_yes_never_no() {
        let mut det = detector();
        let now = feed_line(&mut det, 10, 5.0, 20.0);

        let event = det.analyze(0.8, now);
        assert!(
            matches!(event, Some(GestureEvent::NodYes { .. })),
            "Expected nod_yes, got {:?}",
            event
        );
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_horizontal_trajectory_is_no() {
        let mut det = detector();
        let now = feed_line(&mut det, 10, 30.0, 4.0);

        let event = det.analyze(0.7, now);
        match event {
            Some(GestureEvent::NodNo {
                confidence,
                timestamp,
            }) => {
                assert_eq!(confidence, 0.7);
                assert_eq!(timestamp, now);
            }
            other => panic!("Expected nod_no, got {:?}", other),
        }
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_fewer_than_five_samples_is_silent() {
        let mut det = detector();
        let now = feed_line(&mut det, 4, 0.0, 40.0);
        assert_eq!(det.history().len(), 4);
        assert!(det.analyze(0.9, now).is_none());
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_range_without_direction_change_is_silent() {
        // Oscillating trajectory: wide range but the half means coincide
        let mut det = detector();
        let ys = [100.0, 120.0, 100.0, 120.0, 100.0, 120.0, 100.0, 120.0, 100.0, 120.0];
        for (i, y) in ys.iter().enumerate() {
            det.observe(&nose_frame(i as f64 * 30.0, 200.0, *y, 0.9));
        }

        assert!(det.analyze(0.9, 270.0).is_none());
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_low_confidence_nose_not_recorded() {
        let mut det = detector();
        det.observe(&nose_frame(0.0, 200.0, 100.0, 0.2));
        det.observe(&nose_frame(30.0, 200.0, 100.0, 0.5));
        det.observe(&PoseFrame::new(60.0));

        assert_eq!(det.history().len(), 1);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_stale_samples_pruned_by_frames_without_nose() {
        let mut det = detector();
        feed_line(&mut det, 6, 0.0, 30.0);
        det.observe(&PoseFrame::new(2000.0));

        assert!(det.history().is_empty());
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_axis_motion_measure() {
        let motion = AxisMotion::measure(&[0.0, 0.0, 10.0, 10.0]);
        assert_eq!(motion.range, 10.0);
        assert_eq!(motion.half_delta, 10.0);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_small_motion_is_silent() {
        let mut det = detector();
        let now = feed_line(&mut det, 10, 3.0, 10.0);
        assert!(det.analyze(0.9, now).is_none());
    }
}
