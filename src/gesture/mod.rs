//! Gesture recognition from per-frame keypoints.
//!
//! `GesturePipeline` runs one tick in a fixed order:
//! 1. Record the nose sample and prune the head history
//! 2. If the cooldown has elapsed, compare wrists against the previous frame
//! 3. If the cooldown is still elapsed, classify the head window and clear
//!    it on emission so one nod is reported once
//! 4. Remember the frame for the next tick's wrist comparison

pub mod arbiter;
pub mod event;
pub mod head;
pub mod wave;

pub use arbiter::*;
pub use event::*;
pub use head::*;
pub use wave::*;

use crate::config::EngineConfig;
use crate::pose::PoseFrame;

pub struct GesturePipeline {
    wave: WaveDetector,
    head: HeadGestureDetector,
    arbiter: GestureArbiter,
    previous: Option<PoseFrame>,
}

impl GesturePipeline {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            wave: WaveDetector::new(config.wave.clone()),
            head: HeadGestureDetector::new(config.head.clone(), &config.history),
            arbiter: GestureArbiter::new(config.arbiter.cooldown_ms),
            previous: None,
        }
    }

    /// Process one pose frame and return the gestures emitted this tick
    pub fn process(&mut self, frame: PoseFrame) -> Vec<GestureEvent> {
        let now = frame.timestamp;
        let mut events = Vec::new();

        self.head.observe(&frame);

        if self.arbiter.is_ready(now) {
            if let Some(previous) = &self.previous {
                events.extend(self.wave.detect(&frame, previous));
            }
            if !events.is_empty() {
                self.arbiter.record(now);
            }
        }

        if self.arbiter.is_ready(now) {
            if let Some(event) = self.head.analyze(frame.average_confidence(), now) {
                // The window now belongs to this gesture; start a fresh one
                self.head.reset();
                self.arbiter.record(now);
                events.push(event);
            }
        }

        self.previous = Some(frame);
        events
    }

    pub fn arbiter(&self) -> &GestureArbiter {
        &self.arbiter
    }

    pub fn head(&self) -> &HeadGestureDetector {
        &self.head
    }

    /// Discard all buffered state (history, previous frame, cooldown)
    pub fn reset(&mut self) {
        self.head.reset();
        self.arbiter.reset();
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use crate::pose::{Keypoint, KeypointName, Millis};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn pipeline() -> GesturePipeline {
        GesturePipeline::new(&EngineConfig::default())
    }

    fn wrist_frame(t: Millis, left_x: f32) -> PoseFrame {
        PoseFrame::new(t)
            .with_keypoint(Keypoint::new(KeypointName::Nose, 200.0, 100.0, 0.9))
            .with_keypoint(Keypoint::new(KeypointName::LeftWrist, left_x, 250.0, 0.9))
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_first_frame_never_waves() {
        let mut p = pipeline();
        assert!(p.process(wrist_frame(0.0, 100.0)).is_empty());
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_wave_then_cooldown_blocks_next_wave() {
        let mut p = pipeline();
        p.process(wrist_frame(0.0, 100.0));

        let events = p.process(wrist_frame(100.0, 160.0));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), GestureKind::Wave);

        // Still waving inside the cooldown window
        assert!(p.process(wrist_frame(200.0, 100.0)).is_empty());
        assert!(p.process(wrist_frame(600.0, 160.0)).is_empty());

        // 500 ms strictly elapsed
        let events = p.process(wrist_frame(601.0, 100.0));
        assert_eq!(events.len(), 1);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_cooldown_blocks_other_gesture_types() {
        let mut p = pipeline();

        // Wave at t=100 while the nose starts to nod
        p.process(wrist_frame(0.0, 100.0));
        assert_eq!(p.process(wrist_frame(100.0, 160.0)).len(), 1);

        // Nose nods through the cooldown window; wrists still
        let mut fired = Vec::new();
        for i in 0..10 {
            let t = 130.0 + i as f64 * 40.0;
            let frame = PoseFrame::new(t)
                .with_keypoint(Keypoint::new(
                    KeypointName::Nose,
                    200.0,
                    100.0 + i as f32 * 3.0,
                    0.9,
                ))
                .with_keypoint(Keypoint::new(KeypointName::LeftWrist, 160.0, 250.0, 0.9));
            fired.extend(p.process(frame));
        }

        // Last frame at t=490 is still inside the cooldown
        assert!(fired.is_empty(), "Expected no gestures, got {:?}", fired);

        // After the cooldown the buffered nod is reported
        let frame = PoseFrame::new(640.0)
            .with_keypoint(Keypoint::new(KeypointName::Nose, 200.0, 130.0, 0.9))
            .with_keypoint(Keypoint::new(KeypointName::LeftWrist, 160.0, 250.0, 0.9));
        let events = p.process(frame);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), GestureKind::NodYes);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_single_nod_reported_once() {
        let mut p = pipeline();
        let mut fired = Vec::new();

        // One nod over 400 ms, then the head holds still at 10 fps
        for i in 0..20 {
            let y = 100.0 + (i.min(4) as f32) * 10.0;
            let frame = PoseFrame::new(i as f64 * 100.0)
                .with_keypoint(Keypoint::new(KeypointName::Nose, 200.0, y, 0.9));
            fired.extend(p.process(frame));
        }

        assert_eq!(fired.len(), 1, "Expected one nod, got {:?}", fired);
        assert_eq!(fired[0].kind(), GestureKind::NodYes);
        assert_eq!(fired[0].timestamp(), 400.0);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_cooldown_exclusivity_random_streams() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..20 {
            let mut p = pipeline();
            let mut t = 0.0;
            let mut emission_times: Vec<Millis> = Vec::new();

            for _ in 0..400 {
                t += rng.random_range(10.0..60.0);
                let frame = PoseFrame::new(t)
                    .with_keypoint(Keypoint::new(
                        KeypointName::Nose,
                        rng.random_range(150.0..250.0),
                        rng.random_range(80.0..140.0),
                        rng.random_range(0.0..1.0),
                    ))
                    .with_keypoint(Keypoint::new(
                        KeypointName::LeftWrist,
                        rng.random_range(0.0..400.0),
                        rng.random_range(200.0..260.0),
                        rng.random_range(0.0..1.0),
                    ))
                    .with_keypoint(Keypoint::new(
                        KeypointName::RightWrist,
                        rng.random_range(0.0..400.0),
                        rng.random_range(200.0..260.0),
                        rng.random_range(0.0..1.0),
                    ));

                let events = p.process(frame);
                if let Some(first) = events.first() {
                    assert!(events.iter().all(|e| e.timestamp() == first.timestamp()));
                    emission_times.push(first.timestamp());
                }
            }

            assert!(!emission_times.is_empty(), "Random stream should emit something");
            for pair in emission_times.windows(2) {
                assert!(
                    pair[1] - pair[0] >= 500.0,
                    "Emissions {} and {} closer than cooldown",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_reset_clears_state() {
        let mut p = pipeline();
        p.process(wrist_frame(0.0, 100.0));
        p.process(wrist_frame(100.0, 160.0));
        assert!(p.arbiter().last_gesture().is_some());

        p.reset();
        assert!(p.arbiter().last_gesture().is_none());
        assert!(p.head().history().is_empty());
        // Previous frame dropped: no wave from the next single frame
        assert!(p.process(wrist_frame(150.0, 100.0)).is_empty());
    }
}
