//! Lifecycle management for the marker publisher

use crate::error::MarkerError;

/// Trait for components that follow a lifecycle pattern
pub trait LifecycleNode: Send + Sync {
    /// Configure the node
    fn on_configure(&mut self) -> Result<(), MarkerError>;

    /// Activate the node
    fn on_activate(&mut self) -> Result<(), MarkerError>;

    /// Deactivate the node
    fn on_deactivate(&mut self) -> Result<(), MarkerError>;

    /// Clean up the node
    fn on_cleanup(&mut self) -> Result<(), MarkerError>;
}

/// Base implementation for lifecycle nodes
#[derive(Debug)]
pub struct LifecycleNodeBase {
    pub name: String,
    state: State,
}

/// State of a lifecycle node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Inactive,
    Active,
}

impl LifecycleNodeBase {
    /// Create a new lifecycle node base
    pub fn new(name: &str) -> Self {
        LifecycleNodeBase {
            name: name.to_string(),
            state: State::Unconfigured,
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> State {
        self.state
    }

    /// Move from `from` to `to`, or fail naming the transition
    pub fn transition(
        &mut self,
        transition: &'static str,
        from: State,
        to: State,
    ) -> Result<(), MarkerError> {
        if self.state != from {
            return Err(MarkerError::Lifecycle {
                transition,
                from: self.state,
            });
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_the_expected_order() {
        let mut base = LifecycleNodeBase::new("test");
        assert_eq!(base.get_state(), State::Unconfigured);

        base.transition("configure", State::Unconfigured, State::Inactive)
            .unwrap();
        base.transition("activate", State::Inactive, State::Active)
            .unwrap();
        assert_eq!(base.get_state(), State::Active);
    }

    #[test]
    fn wrong_source_state_is_rejected() {
        let mut base = LifecycleNodeBase::new("test");
        let err = base
            .transition("activate", State::Inactive, State::Active)
            .unwrap_err();

        assert!(matches!(
            err,
            MarkerError::Lifecycle {
                transition: "activate",
                from: State::Unconfigured
            }
        ));
        assert_eq!(base.get_state(), State::Unconfigured);
    }
}
