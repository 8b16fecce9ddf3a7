use std::time::Duration;

/// Detects the same input repeated within a time window: double clicks on
/// the canvas, double selection of a toolbar button.
///
/// Timestamps are offsets from any fixed epoch chosen by the caller.
#[derive(Debug, Clone)]
pub struct RepeatDetector<K> {
    window: Duration,
    last: Option<(K, Duration)>,
}

impl<K: Copy + PartialEq> RepeatDetector<K> {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records an event and reports whether it repeats the previous one.
    ///
    /// A detected repeat is consumed: a third event inside the window
    /// starts a new sequence.
    pub fn register(&mut self, key: K, at: Duration) -> bool {
        let repeated = match self.last {
            Some((last_key, last_at)) => {
                last_key == key && at >= last_at && at - last_at <= self.window
            }
            None => false,
        };
        self.last = if repeated { None } else { Some((key, at)) };
        repeated
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn repeat_inside_window() {
        let mut d = RepeatDetector::new(ms(250));
        assert!(!d.register(1, ms(1000)));
        assert!(d.register(1, ms(1250)));
    }

    #[test]
    fn slow_repeat_is_a_new_sequence() {
        let mut d = RepeatDetector::new(ms(250));
        assert!(!d.register(1, ms(0)));
        assert!(!d.register(1, ms(251)));
        assert!(d.register(1, ms(400)));
    }

    #[test]
    fn different_key_breaks_sequence() {
        let mut d = RepeatDetector::new(ms(500));
        assert!(!d.register('a', ms(0)));
        assert!(!d.register('b', ms(10)));
        assert!(!d.register('a', ms(20)));
        assert!(d.register('a', ms(30)));
    }

    #[test]
    fn triple_counts_once() {
        let mut d = RepeatDetector::new(ms(500));
        assert!(!d.register(0, ms(0)));
        assert!(d.register(0, ms(100)));
        assert!(!d.register(0, ms(200)));
    }

    #[test]
    fn clock_going_backwards_is_not_a_repeat() {
        let mut d = RepeatDetector::new(ms(500));
        assert!(!d.register(0, ms(100)));
        assert!(!d.register(0, ms(50)));
    }
}
