use std::collections::VecDeque;

use glam::Vec2;

use super::frame::Millis;

/// One recorded position of the tracked point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySample {
    pub position: Vec2,
    pub timestamp: Millis,
}

/// Bounded, time-ordered window of samples for a single tracked point.
///
/// No analysis happens here. `prune` first drops samples older than the
/// window, then keeps only the newest `capacity` entries.
#[derive(Debug, Clone)]
pub struct PoseHistory {
    samples: VecDeque<HistorySample>,
    capacity: usize,
    window_ms: Millis,
}

impl PoseHistory {
    pub fn new(capacity: usize, window_ms: Millis) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
            window_ms,
        }
    }

    /// Append a sample (call `prune` afterwards to enforce the bounds)
    pub fn push(&mut self, position: Vec2, timestamp: Millis) {
        self.samples.push_back(HistorySample {
            position,
            timestamp,
        });
    }

    /// Drop samples older than the window relative to `now`, then truncate to capacity
    pub fn prune(&mut self, now: Millis) {
        let window = self.window_ms;
        self.samples.retain(|s| now - s.timestamp <= window);

        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The newest `n` samples (or all of them if fewer), oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistorySample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistorySample> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[test]

    #[wasm_bindgen_test]
    fn test_prune_drops_stale_samples() {
        let mut history = PoseHistory::new(20, 1000.0);
        history.push(Vec2::new(0.0, 0.0), 0.0);
        history.push(Vec2::new(1.0, 0.0), 500.0);
        history.push(Vec2::new(2.0, 0.0), 1200.0);

        history.prune(1200.0);

        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().next().unwrap().timestamp, 500.0);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_prune_truncates_to_capacity_keeping_newest() {
        let mut history = PoseHistory::new(20, 1000.0);
        for i in 0..30 {
            history.push(Vec2::new(i as f32, 0.0), i as f64 * 10.0);
        }

        history.prune(290.0);

        assert_eq!(history.len(), 20);
        assert_eq!(history.iter().next().unwrap().position.x, 10.0);
        assert_eq!(history.iter().last().unwrap().position.x, 29.0);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_age_filter_applies_before_truncation() {
        let mut history = PoseHistory::new(3, 100.0);
        for t in [0.0, 50.0, 150.0, 160.0] {
            history.push(Vec2::ZERO, t);
        }

        history.prune(160.0);

        // 0 and 50 are older than 100 ms, leaving 150 and 160
        let times: Vec<f64> = history.iter().map(|s| s.timestamp).collect();
        assert_eq!(times, vec![150.0, 160.0]);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_prune_on_empty_and_single() {
        let mut history = PoseHistory::new(20, 1000.0);
        history.prune(0.0);
        assert!(history.is_empty());

        history.push(Vec2::ONE, 5.0);
        history.prune(5.0);
        assert_eq!(history.len(), 1);
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_recent_returns_tail() {
        let mut history = PoseHistory::new(20, 1000.0);
        for i in 0..6 {
            history.push(Vec2::new(i as f32, 0.0), i as f64);
        }

        let xs: Vec<f32> = history.recent(4).map(|s| s.position.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0, 5.0]);

        assert_eq!(history.recent(10).count(), 6);
    }
}
