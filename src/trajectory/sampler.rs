//! Sampling of the parametric reference curve

use super::presets::CurveSpec;
use super::TrajectoryCurve;
use crate::common::types::{Point3, Vector3};
use std::f64::consts::PI;

/// Height, width and depth of the box the curve is drawn in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDimensions {
    pub height: f64,
    pub width: f64,
    pub depth: f64,
}

/// Sample `max_points + 1` points of the curve, parametrized over `[0, 2pi]`.
///
/// The curve sweeps linearly across the width (y), oscillates in height (z)
/// and, with depth enabled, sweeps out and back across the depth (x).
pub fn sample_curve(
    spec: &CurveSpec,
    origin: Point3,
    max_points: usize,
    dims: BoxDimensions,
) -> TrajectoryCurve {
    let points: Vec<Point3> = (0..=max_points)
        .map(|count| origin + curve_offset(spec, parameter(count, max_points), dims))
        .collect();

    TrajectoryCurve::from(points)
}

// A single sample sits at t = 0
fn parameter(count: usize, max_points: usize) -> f64 {
    if max_points == 0 {
        return 0.0;
    }
    count as f64 / max_points as f64 * 2.0 * PI
}

fn curve_offset(spec: &CurveSpec, t: f64, dims: BoxDimensions) -> Vector3 {
    let x = if spec.use_depth {
        (t - PI).abs() / PI * dims.depth - dims.depth / 2.0
    } else {
        0.0
    };

    let y = t / (2.0 * PI) * dims.width - dims.width / 2.0;

    let shifted = t + spec.phase_shift;
    let z = (spec.height_scale * dims.height)
        * ((spec.pa * shifted).sin() + (spec.pb * shifted).sin() + (spec.pc * shifted).sin());

    Vector3::new(x, y, z)
}
