//! Dependency bundle shared by every outcome handler

use std::fmt;
use std::sync::Arc;

use aura_core::{Config, InstanceApi};

use crate::error::OutcomeError;
use crate::registry::OutcomeRegistry;

/// Read-only snapshot built once at startup and passed by reference into
/// every handler call
pub struct Dependencies {
    /// Absent when credentials could not produce a client
    client: Option<Arc<dyn InstanceApi>>,
    config: Arc<Config>,
    registry: Arc<OutcomeRegistry>,
}

impl Dependencies {
    pub fn new(
        client: Option<Arc<dyn InstanceApi>>,
        config: Config,
        registry: OutcomeRegistry,
    ) -> Self {
        Self {
            client,
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    /// The Aura API client, or [`OutcomeError::ClientUnavailable`]
    pub fn client(&self) -> Result<&dyn InstanceApi, OutcomeError> {
        self.client.as_deref().ok_or(OutcomeError::ClientUnavailable)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &OutcomeRegistry {
        &self.registry
    }

    /// Check if write operations are allowed
    pub fn is_write_allowed(&self) -> bool {
        !self.config.read_only
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependencies")
            .field("has_client", &self.client.is_some())
            .field("read_only", &self.config.read_only)
            .field("outcomes", &self.registry.len())
            .finish()
    }
}
