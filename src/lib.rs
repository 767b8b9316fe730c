pub mod common;
pub mod config;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod publisher;
pub mod scene;
pub mod trajectory;

pub use crate::config::{MarkerConfig, StartupParams};
pub use crate::error::MarkerError;
pub use crate::publisher::{MarkerPublisher, SceneSink};
