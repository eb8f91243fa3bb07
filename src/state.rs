use crate::config::EngineConfig;
use crate::registry::ClusterRegistry;
use crate::store::ConfigStore;
use std::sync::Arc;

/// Shared handle bundle every operation runs against.
///
/// Holds no mutable state of its own; the scheduler owns the only mutable
/// table in the engine.
pub struct EngineState {
    pub config: EngineConfig,
    pub registry: Arc<dyn ClusterRegistry>,
    pub store: Arc<dyn ConfigStore>,
}

impl EngineState {
    pub fn new(
        config: EngineConfig,
        registry: Arc<dyn ClusterRegistry>,
        store: Arc<dyn ConfigStore>,
    ) -> Self {
        Self {
            config,
            registry,
            store,
        }
    }
}
