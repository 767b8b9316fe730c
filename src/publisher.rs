//! The marker publisher core and its seam to the messaging substrate

use crate::config::{MarkerConfig, StartupParams};
use crate::error::MarkerError;
use crate::input::InputAdapter;
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use crate::scene::{SceneComposer, SceneSnapshot};
use crate::trajectory::{CurveSpec, TrajectoryCurve};
use std::sync::Arc;
use tracing::{error, info};

/// Where finished scenes go
pub trait SceneSink: Send + Sync {
    /// Hand one scene to the transport
    fn publish(&self, scene: &SceneSnapshot) -> Result<(), MarkerError>;
}

/// Owns the static curve, the shared input state and the tick
pub struct MarkerPublisher {
    base: LifecycleNodeBase,
    config: MarkerConfig,
    params: StartupParams,
    input: Arc<InputAdapter>,
    composer: Option<SceneComposer>,
}

impl MarkerPublisher {
    /// Create an unconfigured publisher
    pub fn new(config: MarkerConfig, params: StartupParams) -> Self {
        let input = Arc::new(InputAdapter::new(config.max_smoothing_time));
        MarkerPublisher {
            base: LifecycleNodeBase::new("marker_publisher"),
            config,
            params,
            input,
            composer: None,
        }
    }

    /// Configure and activate in one go
    pub fn start(config: MarkerConfig, params: StartupParams) -> Result<Self, MarkerError> {
        let mut publisher = MarkerPublisher::new(config, params);
        publisher.on_configure()?;
        publisher.on_activate()?;
        Ok(publisher)
    }

    pub fn config(&self) -> &MarkerConfig {
        &self.config
    }

    pub fn params(&self) -> &StartupParams {
        &self.params
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }

    /// Handle for the subscription callbacks
    pub fn input(&self) -> Arc<InputAdapter> {
        Arc::clone(&self.input)
    }

    /// The sampled curve, once configured
    pub fn curve(&self) -> Option<&TrajectoryCurve> {
        self.composer.as_ref().map(SceneComposer::curve)
    }

    /// Compose the scene for this tick
    pub fn tick(&self) -> Result<SceneSnapshot, MarkerError> {
        match (&self.composer, self.base.get_state()) {
            (Some(composer), State::Active) => Ok(composer.compose(&self.input.snapshot())),
            (_, state) => Err(MarkerError::NotActive(state)),
        }
    }

    /// Compose and publish one scene. Publish failures are logged and
    /// returned, the caller keeps ticking.
    pub fn publish_tick(&self, sink: &dyn SceneSink) -> Result<(), MarkerError> {
        let scene = self.tick()?;
        sink.publish(&scene).map_err(|e| {
            error!("Failed to publish markers: {}", e);
            e
        })
    }
}

impl LifecycleNode for MarkerPublisher {
    fn on_configure(&mut self) -> Result<(), MarkerError> {
        info!("Configuring {}", self.base.name);
        if self.base.get_state() != State::Unconfigured {
            return Err(MarkerError::Lifecycle {
                transition: "configure",
                from: self.base.get_state(),
            });
        }
        self.config.validate()?;
        self.params.log();

        let spec = CurveSpec::from_trajectory_id(self.params.trajectory_id, self.params.use_depth);
        let curve = TrajectoryCurve::generate(&spec, &self.config);
        info!("Generated trajectory with {} points", curve.len());

        self.composer = Some(SceneComposer::new(curve, &self.config)?);
        self.base
            .transition("configure", State::Unconfigured, State::Inactive)
    }

    fn on_activate(&mut self) -> Result<(), MarkerError> {
        info!("Activating {}", self.base.name);
        self.base
            .transition("activate", State::Inactive, State::Active)
    }

    fn on_deactivate(&mut self) -> Result<(), MarkerError> {
        info!("Deactivating {}", self.base.name);
        self.base
            .transition("deactivate", State::Active, State::Inactive)
    }

    fn on_cleanup(&mut self) -> Result<(), MarkerError> {
        info!("Cleaning up {}", self.base.name);
        self.base
            .transition("cleanup", State::Inactive, State::Unconfigured)?;
        self.composer = None;
        Ok(())
    }
}
