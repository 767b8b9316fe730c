//! Error types for the tracking markers

use crate::lifecycle::State;
use thiserror::Error;

/// Errors raised while configuring or running the marker publisher
#[derive(Debug, Error)]
pub enum MarkerError {
    /// Trajectory id outside the preset table
    #[error("Unknown trajectory id: {0}")]
    UnknownTrajectory(i64),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The trajectory curve has no points to fall back on
    #[error("Trajectory curve is empty")]
    EmptyTrajectory,

    /// A tick was requested while the publisher is not active
    #[error("Publisher is not active (state: {0:?})")]
    NotActive(State),

    /// Lifecycle transition not allowed from the current state
    #[error("Cannot {transition} from state {from:?}")]
    Lifecycle {
        transition: &'static str,
        from: State,
    },

    /// The messaging substrate rejected the scene
    #[error("Publish failed: {0}")]
    Publish(String),
}

impl MarkerError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a publish error.
    pub fn publish(msg: impl std::fmt::Display) -> Self {
        Self::Publish(msg.to_string())
    }
}
