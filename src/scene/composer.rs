//! Assembles the markers of one tick

use super::countdown::CountdownDisplay;
use super::{ElementId, MarkerShape, SceneSnapshot, VisualElement};
use crate::common::types::{Point3, Vector3};
use crate::common::{colors, Rgba};
use crate::config::{MarkerConfig, Naming};
use crate::error::MarkerError;
use crate::input::TrackingState;
use crate::trajectory::TrajectoryCurve;

/// Diameter of the tool marker and width of the trajectory line
const MARKER_DIAMETER: f64 = 0.015;
/// Height of the countdown glyphs
const TEXT_HEIGHT: f64 = 0.2;
/// Countdown text sits this far above the progress bar
const TEXT_LIFT: f64 = 0.05;
/// Depth progress used while no reference has been received
const IDLE_DEPTH_PROGRESS: f64 = 0.1;

const TRAJECTORY_COLOR: Rgba = colors::BLUE.with_alpha(0.2);
const TOOL_COLOR: Rgba = colors::RED;
const REFERENCE_COLOR: Rgba = colors::GREEN.with_alpha(0.35);

/// Builds a scene snapshot from the static curve and the current inputs
#[derive(Debug, Clone)]
pub struct SceneComposer {
    curve: TrajectoryCurve,
    start: Point3,
    origin: Point3,
    bar_center: Point3,
    naming: Naming,
}

impl SceneComposer {
    /// Create a composer for a sampled curve. The curve must not be empty:
    /// its first point is where the reference marker rests until a position
    /// arrives.
    pub fn new(curve: TrajectoryCurve, config: &MarkerConfig) -> Result<Self, MarkerError> {
        let start = *curve.first().ok_or(MarkerError::EmptyTrajectory)?;

        Ok(SceneComposer {
            curve,
            start,
            origin: config.origin,
            bar_center: config.bar_center,
            naming: config.naming.clone(),
        })
    }

    pub fn curve(&self) -> &TrajectoryCurve {
        &self.curve
    }

    /// Compose the scene for the given state
    pub fn compose(&self, state: &TrackingState) -> SceneSnapshot {
        let mut elements = Vec::with_capacity(4);

        elements.push(self.trajectory_element());
        elements.push(self.tool_element());
        elements.push(self.reference_element(state.reference));

        if let Some(display) = CountdownDisplay::from_count(state.countdown) {
            elements.push(self.countdown_element(display));
        }

        SceneSnapshot { elements }
    }

    fn element(
        &self,
        id: ElementId,
        frame_id: &str,
        shape: MarkerShape,
        scale: Vector3,
        color: Rgba,
        position: Point3,
    ) -> VisualElement {
        VisualElement {
            id,
            frame_id: frame_id.to_string(),
            namespace: self.naming.namespace.clone(),
            shape,
            scale,
            color,
            position,
        }
    }

    fn trajectory_element(&self) -> VisualElement {
        self.element(
            ElementId::TrajectoryLine,
            &self.naming.base_frame,
            MarkerShape::LineStrip(self.curve.clone()),
            Vector3::new(MARKER_DIAMETER, 0.0, 0.0),
            TRAJECTORY_COLOR,
            Point3::origin(),
        )
    }

    // Sits at the origin of the tool frame, the frame transform moves it
    fn tool_element(&self) -> VisualElement {
        self.element(
            ElementId::ToolMarker,
            &self.naming.tool_frame,
            MarkerShape::Sphere,
            Vector3::repeat(MARKER_DIAMETER),
            TOOL_COLOR,
            Point3::origin(),
        )
    }

    fn reference_element(&self, reference: Point3) -> VisualElement {
        // An x of exactly zero means no reference has been received yet
        let active = reference.x != 0.0;

        // 0.1 when closest, 0.0 when farthest
        let depth_progress = if active {
            reference.x - self.origin.x + 0.05
        } else {
            IDLE_DEPTH_PROGRESS
        };
        let size = MARKER_DIAMETER + depth_progress / 20.0;

        let position = if active { reference } else { self.start };

        self.element(
            ElementId::ReferenceMarker,
            &self.naming.base_frame,
            MarkerShape::Sphere,
            Vector3::repeat(size),
            REFERENCE_COLOR,
            position,
        )
    }

    fn countdown_element(&self, display: CountdownDisplay) -> VisualElement {
        self.element(
            ElementId::CountdownText,
            &self.naming.base_frame,
            MarkerShape::Text(display.text()),
            Vector3::new(0.0, 0.0, TEXT_HEIGHT),
            display.color(),
            self.bar_center + Vector3::new(0.0, 0.0, TEXT_LIFT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::CurveSpec;
    use approx::assert_abs_diff_eq;

    fn composer() -> SceneComposer {
        let config = MarkerConfig::default();
        let curve = TrajectoryCurve::generate(&CurveSpec::from_trajectory_id(1, true), &config);
        SceneComposer::new(curve, &config).unwrap()
    }

    fn state(reference: Point3, countdown: i64) -> TrackingState {
        TrackingState {
            reference,
            countdown,
        }
    }

    #[test]
    fn empty_curve_is_rejected() {
        let result = SceneComposer::new(TrajectoryCurve::from(Vec::new()), &MarkerConfig::default());
        assert!(matches!(result, Err(MarkerError::EmptyTrajectory)));
    }

    #[test]
    fn default_scene_has_four_elements_in_order() {
        let scene = composer().compose(&TrackingState::default());

        let ids: Vec<i32> = scene.iter().map(|e| e.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1, 0, 10]);
    }

    #[test]
    fn trajectory_is_unchanged_across_ticks() {
        let composer = composer();
        let a = composer.compose(&TrackingState::default());
        let b = composer.compose(&state(Point3::new(0.55, 0.1, 0.4), -3));

        let line_a = &a.get(ElementId::TrajectoryLine).unwrap().shape;
        let line_b = &b.get(ElementId::TrajectoryLine).unwrap().shape;
        assert_eq!(line_a, line_b);
        assert_eq!(line_a, &MarkerShape::LineStrip(composer.curve().clone()));
    }

    #[test]
    fn line_and_tool_styles() {
        let scene = composer().compose(&TrackingState::default());

        let line = scene.get(ElementId::TrajectoryLine).unwrap();
        assert_eq!(line.frame_id, "/panda_link0");
        assert_eq!(line.scale.x, 0.015);
        assert_eq!(line.color, Rgba::new(0.0, 0.0, 1.0, 0.2));

        let tool = scene.get(ElementId::ToolMarker).unwrap();
        assert_eq!(tool.frame_id, "/panda_hand_tcp");
        assert_eq!(tool.shape, MarkerShape::Sphere);
        assert_eq!(tool.position, Point3::origin());
        assert_eq!(tool.scale, Vector3::repeat(0.015));
        assert_eq!(tool.color, Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(tool.namespace, "marker_publisher");
    }

    #[test]
    fn reference_falls_back_to_curve_start() {
        let composer = composer();
        let scene = composer.compose(&TrackingState::default());

        let reference = scene.get(ElementId::ReferenceMarker).unwrap();
        assert_eq!(reference.position, composer.curve().points()[0]);
        assert_abs_diff_eq!(reference.scale.x, 0.015 + 0.1 / 20.0, epsilon = 1e-12);
        assert_eq!(reference.color, Rgba::new(0.0, 1.0, 0.0, 0.35));
    }

    #[test]
    fn reference_follows_position_and_scales_with_depth() {
        let target = Point3::new(0.5559, 0.02, 0.44);
        let scene = composer().compose(&state(target, 5));

        let reference = scene.get(ElementId::ReferenceMarker).unwrap();
        assert_eq!(reference.position, target);
        // d = 0.5559 - 0.5059 + 0.05 = 0.1
        let size = 0.015 + 0.1 / 20.0;
        assert_abs_diff_eq!(reference.scale.x, size, epsilon = 1e-12);
        assert_abs_diff_eq!(reference.scale.y, size, epsilon = 1e-12);
        assert_abs_diff_eq!(reference.scale.z, size, epsilon = 1e-12);
    }

    #[test]
    fn reference_with_zero_x_is_treated_as_idle() {
        let composer = composer();
        let scene = composer.compose(&state(Point3::new(0.0, 0.3, 0.3), 5));

        let reference = scene.get(ElementId::ReferenceMarker).unwrap();
        assert_eq!(reference.position, composer.curve().points()[0]);
    }

    #[test]
    fn countdown_presence() {
        let composer = composer();
        for count in [-10, 0, 1, 2, 3, 4, 5] {
            let scene = composer.compose(&state(Point3::origin(), count));
            assert!(scene.get(ElementId::CountdownText).is_some(), "{}", count);
            assert_eq!(scene.len(), 4);
        }
        for count in (-9..=-1).chain([-11, -100]) {
            let scene = composer.compose(&state(Point3::origin(), count));
            assert!(scene.get(ElementId::CountdownText).is_none(), "{}", count);
            assert_eq!(scene.len(), 3);
        }
    }

    #[test]
    fn countdown_text_placement() {
        let scene = composer().compose(&state(Point3::origin(), 0));

        let text = scene.get(ElementId::CountdownText).unwrap();
        assert_eq!(text.shape, MarkerShape::Text("Go!".to_string()));
        assert_eq!(text.color, colors::GREEN);
        assert_eq!(text.scale.z, 0.2);
        assert_abs_diff_eq!(text.position.x, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(text.position.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(text.position.z, 0.1, epsilon = 1e-12);
    }
}
