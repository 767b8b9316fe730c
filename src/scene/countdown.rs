//! Countdown overlay shown while the controller smooths towards the start

use crate::common::{colors, Rgba};

/// Countdown value that means the task is over
pub const STOP_COUNT: i64 = -10;

/// What the countdown overlay shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownDisplay {
    /// Seconds left before the start
    Seconds(i64),
    Go,
    Stop,
}

impl CountdownDisplay {
    /// Display for a raw countdown value; `None` hides the overlay
    pub fn from_count(count: i64) -> Option<Self> {
        match count {
            STOP_COUNT => Some(CountdownDisplay::Stop),
            0 => Some(CountdownDisplay::Go),
            seconds if seconds > 0 => Some(CountdownDisplay::Seconds(seconds)),
            _ => None,
        }
    }

    pub fn text(&self) -> String {
        match self {
            CountdownDisplay::Seconds(seconds) => seconds.to_string(),
            CountdownDisplay::Go => "Go!".to_string(),
            CountdownDisplay::Stop => "Stop!".to_string(),
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            CountdownDisplay::Seconds(3..=5) => colors::RED,
            CountdownDisplay::Seconds(1 | 2) => colors::YELLOW,
            // only reachable with a negative elapsed time
            CountdownDisplay::Seconds(_) => colors::BLACK,
            CountdownDisplay::Go => colors::GREEN,
            CountdownDisplay::Stop => colors::RED,
        }
    }
}
