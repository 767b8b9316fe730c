//! Inbound position and elapsed-time updates
//!
//! The adapter is shared between the subscription callbacks and the tick.
//! Each field sits behind its own lock so that a position is always
//! replaced as a whole and a reader never sees a half-written point.

use crate::common::types::Point3;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Countdown shown before the first elapsed-time update arrives
pub const DEFAULT_COUNTDOWN: i64 = 5;

/// What the composer reads on each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingState {
    pub reference: Point3,
    pub countdown: i64,
}

impl Default for TrackingState {
    fn default() -> Self {
        TrackingState {
            reference: Point3::origin(),
            countdown: DEFAULT_COUNTDOWN,
        }
    }
}

/// Reduces the inbound streams to the state read by the composer
#[derive(Debug)]
pub struct InputAdapter {
    reference: Mutex<Point3>,
    countdown: Mutex<i64>,
    max_smoothing_time: i64,
}

impl InputAdapter {
    pub fn new(max_smoothing_time: i64) -> Self {
        InputAdapter {
            reference: Mutex::new(Point3::origin()),
            countdown: Mutex::new(DEFAULT_COUNTDOWN),
            max_smoothing_time,
        }
    }

    /// Overwrite the reference position
    pub fn on_position(&self, position: Point3) {
        *self
            .reference
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = position;
    }

    /// Update the countdown from the controller's elapsed seconds.
    ///
    /// The value is truncated to whole seconds. Zero leaves the countdown
    /// as it was; it does not reset it.
    pub fn on_elapsed(&self, elapsed_seconds: f64) {
        let seconds = elapsed_seconds as i64;
        if seconds == 0 {
            return;
        }

        let count = self.max_smoothing_time.saturating_sub(seconds);
        *self
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = count;
        debug!("Countdown updated to {}", count);
    }

    pub fn reference(&self) -> Point3 {
        *self
            .reference
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn countdown(&self) -> i64 {
        *self
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state for one tick
    pub fn snapshot(&self) -> TrackingState {
        TrackingState {
            reference: self.reference(),
            countdown: self.countdown(),
        }
    }
}

impl Default for InputAdapter {
    fn default() -> Self {
        InputAdapter::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_at_defaults() {
        let adapter = InputAdapter::default();
        assert_eq!(adapter.snapshot(), TrackingState::default());
    }

    #[test]
    fn position_is_replaced_whole() {
        let adapter = InputAdapter::default();
        adapter.on_position(Point3::new(0.6, -0.1, 0.45));
        assert_eq!(adapter.reference(), Point3::new(0.6, -0.1, 0.45));
    }

    #[test]
    fn elapsed_sets_countdown() {
        let adapter = InputAdapter::new(5);
        adapter.on_elapsed(2.0);
        assert_eq!(adapter.countdown(), 3);

        adapter.on_elapsed(15.0);
        assert_eq!(adapter.countdown(), -10);
    }

    #[test]
    fn zero_elapsed_keeps_countdown() {
        let adapter = InputAdapter::new(5);
        adapter.on_elapsed(2.0);
        assert_eq!(adapter.countdown(), 3);

        adapter.on_elapsed(0.0);
        assert_eq!(adapter.countdown(), 3);

        // truncates to zero as well
        adapter.on_elapsed(0.7);
        assert_eq!(adapter.countdown(), 3);
    }

    #[test]
    fn fractional_elapsed_truncates() {
        let adapter = InputAdapter::new(5);
        adapter.on_elapsed(1.9);
        assert_eq!(adapter.countdown(), 4);

        adapter.on_elapsed(-1.5);
        assert_eq!(adapter.countdown(), 6);
    }

    #[test]
    fn extreme_elapsed_saturates() {
        let adapter = InputAdapter::new(5);
        adapter.on_elapsed(-1e30);
        assert_eq!(adapter.countdown(), i64::MAX);

        adapter.on_elapsed(f64::NEG_INFINITY);
        assert_eq!(adapter.countdown(), i64::MAX);

        adapter.on_elapsed(f64::INFINITY);
        assert_eq!(adapter.countdown(), 5 - i64::MAX);
    }

    #[test]
    fn readers_never_see_torn_positions() {
        let adapter = Arc::new(InputAdapter::default());

        let writer = {
            let adapter = Arc::clone(&adapter);
            thread::spawn(move || {
                for i in 1..=10_000 {
                    let v = i as f64;
                    adapter.on_position(Point3::new(v, v, v));
                }
            })
        };

        for _ in 0..10_000 {
            let p = adapter.reference();
            assert!(p.x == p.y && p.y == p.z);
        }

        writer.join().unwrap();
        assert_eq!(adapter.reference(), Point3::new(10_000.0, 10_000.0, 10_000.0));
    }
}
