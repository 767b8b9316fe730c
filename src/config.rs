//! Startup parameters and fixed geometry of the marker publisher
//!
//! The defaults must stay consistent with the real controller: the origin
//! and box dimensions here are the ones the tracking controller samples its
//! own reference from.

use crate::common::types::Point3;
use crate::error::MarkerError;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

/// The four integer parameters read once at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartupParams {
    pub use_depth: bool,
    /// Opaque, only shown to the operator
    pub participant_id: i64,
    /// Opaque, only shown to the operator
    pub alpha_id: i64,
    pub trajectory_id: i64,
}

impl StartupParams {
    /// Parameter names as declared on the node
    pub const NAMES: [&'static str; 4] = ["use_depth", "part_id", "alpha_id", "traj_id"];

    /// Build from raw integer parameter values; any non-zero depth flag enables depth
    pub fn from_raw(use_depth: i64, participant_id: i64, alpha_id: i64, trajectory_id: i64) -> Self {
        StartupParams {
            use_depth: use_depth != 0,
            participant_id,
            alpha_id,
            trajectory_id,
        }
    }

    /// Log the parameters for the operator
    pub fn log(&self) {
        info!("The current parameters [marker_publisher] are as follows:");
        info!("Use depth parameter = {}", self.use_depth as i64);
        info!("Participant ID = {}", self.participant_id);
        info!("Alpha ID = {}", self.alpha_id);
        info!("Trajectory ID = {}", self.trajectory_id);
    }
}

/// Coordinate frames, namespace and topics of the marker feed
#[derive(Debug, Clone, PartialEq)]
pub struct Naming {
    pub base_frame: String,
    pub tool_frame: String,
    pub namespace: String,
    pub marker_topic: String,
    pub position_topic: String,
    pub countdown_topic: String,
}

impl Default for Naming {
    fn default() -> Self {
        Naming {
            base_frame: "/panda_link0".to_string(),
            tool_frame: "/panda_hand_tcp".to_string(),
            namespace: "marker_publisher".to_string(),
            marker_topic: "visualization_marker_array".to_string(),
            position_topic: "tcp_position".to_string(),
            countdown_topic: "countdown".to_string(),
        }
    }
}

/// Geometry and timing of the marker feed
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerConfig {
    /// Center of the trajectory box in the base frame
    pub origin: Point3,
    /// Number of curve segments; the curve has `max_points + 1` points
    pub max_points: usize,
    pub trajectory_height: f64,
    pub trajectory_width: f64,
    pub trajectory_depth: f64,
    /// Center of the progress bar, the countdown text sits above it
    pub bar_center: Point3,
    pub publish_rate_hz: f64,
    /// Seconds of smoothing before the task starts
    pub max_smoothing_time: i64,
    pub naming: Naming,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        MarkerConfig {
            origin: Point3::new(0.5059, 0.0, 0.4346),
            max_points: 200,
            trajectory_height: 0.1,
            trajectory_width: 0.3,
            trajectory_depth: 0.1,
            bar_center: Point3::new(0.3, 0.0, 0.05),
            publish_rate_hz: 50.0,
            max_smoothing_time: 5,
            naming: Naming::default(),
        }
    }
}

impl MarkerConfig {
    /// Apply numeric overrides by key. Unknown keys are ignored.
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), MarkerError> {
        if let Some(&rate) = params.get("publish_rate_hz") {
            self.publish_rate_hz = rate;
        }
        if let Some(&height) = params.get("trajectory_height") {
            self.trajectory_height = height;
        }
        if let Some(&width) = params.get("trajectory_width") {
            self.trajectory_width = width;
        }
        if let Some(&depth) = params.get("trajectory_depth") {
            self.trajectory_depth = depth;
        }
        if let Some(&points) = params.get("max_points") {
            if !points.is_finite() || points < 0.0 || points.fract() != 0.0 {
                return Err(MarkerError::invalid_config(format!(
                    "max_points must be a non-negative integer, got {}",
                    points
                )));
            }
            self.max_points = points as usize;
        }
        if let Some(&seconds) = params.get("max_smoothing_time") {
            if !seconds.is_finite() || seconds.fract() != 0.0 {
                return Err(MarkerError::invalid_config(format!(
                    "max_smoothing_time must be whole seconds, got {}",
                    seconds
                )));
            }
            self.max_smoothing_time = seconds as i64;
        }

        self.validate()
    }

    /// Check that the geometry is finite and the publish rate is usable
    pub fn validate(&self) -> Result<(), MarkerError> {
        if !self.publish_rate_hz.is_finite() || self.publish_rate_hz <= 0.0 {
            return Err(MarkerError::invalid_config(format!(
                "publish_rate_hz must be positive, got {}",
                self.publish_rate_hz
            )));
        }
        match Duration::try_from_secs_f64(1.0 / self.publish_rate_hz) {
            Ok(period) if !period.is_zero() => {}
            _ => {
                return Err(MarkerError::invalid_config(format!(
                    "publish_rate_hz {} has no usable tick period",
                    self.publish_rate_hz
                )))
            }
        }

        let dimensions = [
            ("trajectory_height", self.trajectory_height),
            ("trajectory_width", self.trajectory_width),
            ("trajectory_depth", self.trajectory_depth),
        ];
        for (name, value) in dimensions {
            if !value.is_finite() {
                return Err(MarkerError::invalid_config(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        if !self.origin.coords.iter().all(|c| c.is_finite())
            || !self.bar_center.coords.iter().all(|c| c.is_finite())
        {
            return Err(MarkerError::invalid_config("anchor points must be finite"));
        }

        Ok(())
    }

    /// Time between two ticks; the rate must have passed `validate`
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.publish_rate_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tick_period_is_20ms() {
        let config = MarkerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_period(), Duration::from_millis(20));
    }

    #[test]
    fn configure_applies_known_keys() {
        let mut config = MarkerConfig::default();
        let mut params = HashMap::new();
        params.insert("trajectory_width".to_string(), 0.4);
        params.insert("max_points".to_string(), 50.0);
        params.insert("unrelated".to_string(), 1.0);

        config.configure(&params).unwrap();
        assert_eq!(config.trajectory_width, 0.4);
        assert_eq!(config.max_points, 50);
        assert_eq!(config.trajectory_height, 0.1);
    }

    #[test]
    fn configure_rejects_bad_rate() {
        let mut config = MarkerConfig::default();
        let mut params = HashMap::new();
        params.insert("publish_rate_hz".to_string(), 0.0);

        assert!(matches!(
            config.configure(&params),
            Err(MarkerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn configure_rejects_tiny_rate() {
        let mut config = MarkerConfig::default();
        let mut params = HashMap::new();
        params.insert("publish_rate_hz".to_string(), 1e-320);

        assert!(matches!(
            config.configure(&params),
            Err(MarkerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn validate_rejects_rate_with_zero_period() {
        let config = MarkerConfig {
            publish_rate_hz: 1e300,
            ..MarkerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn configure_rejects_fractional_point_count() {
        let mut config = MarkerConfig::default();
        let mut params = HashMap::new();
        params.insert("max_points".to_string(), 10.5);

        assert!(config.configure(&params).is_err());
    }

    #[test]
    fn startup_params_depth_flag() {
        assert!(StartupParams::from_raw(1, 7, 3, 2).use_depth);
        assert!(StartupParams::from_raw(-1, 0, 0, 0).use_depth);
        assert!(!StartupParams::from_raw(0, 0, 0, 0).use_depth);
    }
}
