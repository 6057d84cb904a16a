//! Application state and dependency injection.

mod config;

use std::sync::Arc;

use medlens_core::{LifecycleManager, Orchestrator};

pub use crate::service::config::ServiceConfig;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    orchestrator: Orchestrator,
}

impl ServiceState {
    /// Builds application state around an explicitly constructed lifecycle.
    ///
    /// The lifecycle may still be uninitialized; requests needing an engine
    /// that is not loaded are answered with 503.
    pub fn from_config(config: &ServiceConfig, lifecycle: Arc<LifecycleManager>) -> Self {
        Self {
            orchestrator: Orchestrator::new(lifecycle, config.orchestrator_config()),
        }
    }

    /// The request orchestrator.
    #[inline]
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(orchestrator: Orchestrator);
