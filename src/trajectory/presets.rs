//! Shape presets for the reference trajectory

use crate::error::MarkerError;
use std::f64::consts::PI;
use tracing::warn;

/// One of the six fixed trajectory shapes, selected by integer id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrajectoryPreset {
    Preset0,
    Preset1,
    Preset2,
    Preset3,
    Preset4,
    Preset5,
}

impl TrajectoryPreset {
    pub const ALL: [TrajectoryPreset; 6] = [
        TrajectoryPreset::Preset0,
        TrajectoryPreset::Preset1,
        TrajectoryPreset::Preset2,
        TrajectoryPreset::Preset3,
        TrajectoryPreset::Preset4,
        TrajectoryPreset::Preset5,
    ];

    /// Integer id of the preset
    pub fn id(self) -> i64 {
        match self {
            TrajectoryPreset::Preset0 => 0,
            TrajectoryPreset::Preset1 => 1,
            TrajectoryPreset::Preset2 => 2,
            TrajectoryPreset::Preset3 => 3,
            TrajectoryPreset::Preset4 => 4,
            TrajectoryPreset::Preset5 => 5,
        }
    }

    /// Harmonics, phase shift and height scale of the preset
    fn coefficients(self) -> (f64, f64, f64, f64, f64) {
        match self {
            TrajectoryPreset::Preset0 => (1.0, 1.0, 4.0, PI, 0.25),
            TrajectoryPreset::Preset1 => (2.0, 3.0, 4.0, 4.0 * PI / 3.0, 0.25),
            TrajectoryPreset::Preset2 => (1.0, 3.0, 4.0, PI, 0.25),
            TrajectoryPreset::Preset3 => (2.0, 2.0, 5.0, PI, 0.2),
            TrajectoryPreset::Preset4 => (2.0, 3.0, 5.0, 8.0 * PI / 5.0, 0.2),
            TrajectoryPreset::Preset5 => (2.0, 4.0, 5.0, PI, 0.2),
        }
    }
}

impl TryFrom<i64> for TrajectoryPreset {
    type Error = MarkerError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(TrajectoryPreset::Preset0),
            1 => Ok(TrajectoryPreset::Preset1),
            2 => Ok(TrajectoryPreset::Preset2),
            3 => Ok(TrajectoryPreset::Preset3),
            4 => Ok(TrajectoryPreset::Preset4),
            5 => Ok(TrajectoryPreset::Preset5),
            other => Err(MarkerError::UnknownTrajectory(other)),
        }
    }
}

/// Coefficients of the parametric trajectory curve
///
/// The vertical offset is a sum of three sine harmonics `pa`, `pb`, `pc`,
/// all shifted by `phase_shift` and scaled by `height_scale` times the box
/// height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurveSpec {
    pub pa: f64,
    pub pb: f64,
    pub pc: f64,
    pub phase_shift: f64,
    pub height_scale: f64,
    pub use_depth: bool,
}

impl CurveSpec {
    /// Coefficients of a known preset
    pub fn from_preset(preset: TrajectoryPreset, use_depth: bool) -> Self {
        let (pa, pb, pc, phase_shift, height_scale) = preset.coefficients();
        CurveSpec {
            pa,
            pb,
            pc,
            phase_shift,
            height_scale,
            use_depth,
        }
    }

    /// All coefficients zero: a flat curve
    pub fn zero(use_depth: bool) -> Self {
        CurveSpec {
            use_depth,
            ..CurveSpec::default()
        }
    }

    /// Resolve a startup trajectory id.
    ///
    /// Ids outside the preset table are not rejected: they yield the zero
    /// spec, and the fallback is logged.
    pub fn from_trajectory_id(trajectory_id: i64, use_depth: bool) -> Self {
        match TrajectoryPreset::try_from(trajectory_id) {
            Ok(preset) => CurveSpec::from_preset(preset, use_depth),
            Err(e) => {
                warn!("{}, falling back to a flat trajectory", e);
                CurveSpec::zero(use_depth)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_ids_round_trip() {
        for preset in TrajectoryPreset::ALL {
            assert_eq!(TrajectoryPreset::try_from(preset.id()).unwrap(), preset);
        }
    }

    #[test]
    fn preset_zero_coefficients() {
        let spec = CurveSpec::from_trajectory_id(0, false);
        assert_eq!(spec.pa, 1.0);
        assert_eq!(spec.pb, 1.0);
        assert_eq!(spec.pc, 4.0);
        assert_eq!(spec.phase_shift, PI);
        assert_eq!(spec.height_scale, 0.25);
        assert!(!spec.use_depth);
    }

    #[test]
    fn preset_four_phase() {
        let spec = CurveSpec::from_trajectory_id(4, true);
        assert_eq!((spec.pa, spec.pb, spec.pc), (2.0, 3.0, 5.0));
        assert_eq!(spec.phase_shift, 8.0 * PI / 5.0);
        assert_eq!(spec.height_scale, 0.2);
        assert!(spec.use_depth);
    }

    #[test]
    fn unknown_id_is_flat() {
        for id in [-1, 6, 42, i64::MAX] {
            assert!(matches!(
                TrajectoryPreset::try_from(id),
                Err(MarkerError::UnknownTrajectory(got)) if got == id
            ));
            assert_eq!(CurveSpec::from_trajectory_id(id, true), CurveSpec::zero(true));
        }
    }
}
