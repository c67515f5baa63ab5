//! Shared application state

use std::sync::Arc;

use crate::config::HubConfig;
use crate::hub::{Hub, HubHandle};

/// State shared by every request handler
pub struct AppState {
    /// Handle to the running hub
    pub hub: HubHandle,

    /// Limits applied to each new connection
    pub hub_config: Arc<HubConfig>,
}

impl AppState {
    pub fn new(hub: HubHandle, hub_config: HubConfig) -> Self {
        Self {
            hub,
            hub_config: Arc::new(hub_config),
        }
    }

    /// Spawn a fresh hub on the current runtime and wrap it
    pub fn spawn(hub_config: HubConfig) -> Self {
        Self::new(Hub::spawn(), hub_config)
    }
}
