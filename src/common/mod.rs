//! Common utilities and types for the tracking markers

/// Common types and utilities used across the codebase
pub mod types {
    /// A point in a 3D frame, in meters
    pub type Point3 = nalgebra::Point3<f64>;

    /// A 3D extent or offset, in meters
    pub type Vector3 = nalgebra::Vector3<f64>;
}

/// RGBA color with channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Rgba { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: f32) -> Self {
        Rgba { a, ..self }
    }
}

/// Named colors used by the markers
pub mod colors {
    use super::Rgba;

    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Rgba = Rgba::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);
    // red + green
    pub const YELLOW: Rgba = Rgba::new(1.0, 1.0, 0.0, 1.0);
}
