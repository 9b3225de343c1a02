use crate::pose::Millis;

/// Global cross-type debounce.
///
/// A single timestamp is shared by every gesture kind: any emission blocks
/// all detectors until the cooldown has strictly elapsed.
#[derive(Debug, Clone)]
pub struct GestureArbiter {
    cooldown_ms: Millis,
    last_gesture: Option<Millis>,
}

impl GestureArbiter {
    pub fn new(cooldown_ms: Millis) -> Self {
        Self {
            cooldown_ms,
            last_gesture: None,
        }
    }

    /// Whether detectors may run at `now`. True before the first emission.
    pub fn is_ready(&self, now: Millis) -> bool {
        match self.last_gesture {
            Some(last) => now - last > self.cooldown_ms,
            None => true,
        }
    }

    /// Mark an emission at `now`
    pub fn record(&mut self, now: Millis) {
        self.last_gesture = Some(now);
    }

    pub fn last_gesture(&self) -> Option<Millis> {
        self.last_gesture
    }

    pub fn reset(&mut self) {
        self.last_gesture = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[test]

    #[wasm_bindgen_test]
    fn test_ready_before_first_gesture() {
        let arbiter = GestureArbiter::new(500.0);
        assert!(arbiter.is_ready(0.0));
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_cooldown_is_strict() {
        let mut arbiter = GestureArbiter::new(500.0);
        arbiter.record(1000.0);

        assert!(!arbiter.is_ready(1000.0));
        assert!(!arbiter.is_ready(1499.0));
        assert!(!arbiter.is_ready(1500.0));
        assert!(arbiter.is_ready(1500.5));
    }

    #[test]

    #[wasm_bindgen_test]
    fn test_reset_clears_cooldown() {
        let mut arbiter = GestureArbiter::new(500.0);
        arbiter.record(10.0);
        arbiter.reset();
        assert!(arbiter.is_ready(11.0));
        assert_eq!(arbiter.last_gesture(), None);
    }
}
