//! Scene snapshots handed to the messaging substrate on every tick
pub mod composer;
pub mod countdown;

pub use self::composer::SceneComposer;
pub use self::countdown::{CountdownDisplay, STOP_COUNT};

use crate::common::types::{Point3, Vector3};
use crate::common::Rgba;
use crate::trajectory::TrajectoryCurve;

/// Stable identifiers of the visual elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    ReferenceMarker,
    ToolMarker,
    TrajectoryLine,
    CountdownText,
}

impl ElementId {
    pub fn as_i32(self) -> i32 {
        match self {
            ElementId::ReferenceMarker => 0,
            ElementId::ToolMarker => 1,
            ElementId::TrajectoryLine => 2,
            ElementId::CountdownText => 10,
        }
    }
}

/// Shape of an element, with the geometry that goes with it
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerShape {
    Sphere,
    /// Polyline through the curve points; only `scale.x` (line width) is used
    LineStrip(TrajectoryCurve),
    /// Text facing the viewer; only `scale.z` (glyph height) is used
    Text(String),
}

/// One marker of a scene
#[derive(Debug, Clone, PartialEq)]
pub struct VisualElement {
    pub id: ElementId,
    pub frame_id: String,
    pub namespace: String,
    pub shape: MarkerShape,
    pub scale: Vector3,
    pub color: Rgba,
    pub position: Point3,
}

/// Everything published on one tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneSnapshot {
    pub elements: Vec<VisualElement>,
}

impl SceneSnapshot {
    pub fn get(&self, id: ElementId) -> Option<&VisualElement> {
        self.elements.iter().find(|element| element.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
