//! Trajectory generation module
pub mod presets;
pub mod sampler;

pub use self::presets::{CurveSpec, TrajectoryPreset};
pub use self::sampler::{sample_curve, BoxDimensions};

use crate::common::types::Point3;
use crate::config::MarkerConfig;
use std::sync::Arc;

/// The sampled reference curve, immutable once built
///
/// Clones share the same point buffer, so handing the curve to every
/// snapshot does not copy it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryCurve {
    points: Arc<[Point3]>,
}

impl TrajectoryCurve {
    /// Sample the curve described by `spec` inside the configured box
    pub fn generate(spec: &CurveSpec, config: &MarkerConfig) -> Self {
        sample_curve(
            spec,
            config.origin,
            config.max_points,
            BoxDimensions {
                height: config.trajectory_height,
                width: config.trajectory_width,
                depth: config.trajectory_depth,
            },
        )
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn first(&self) -> Option<&Point3> {
        self.points.first()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<Point3>> for TrajectoryCurve {
    fn from(points: Vec<Point3>) -> Self {
        TrajectoryCurve {
            points: points.into(),
        }
    }
}
