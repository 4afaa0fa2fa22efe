use std::sync::Arc;

use crate::stats::{StatsConfig, StatsSource};
use crate::zotero::ZoteroClient;

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backing store for dashboard statistics.
    pub stats_source: Arc<dyn StatsSource>,

    /// Feature configuration injected into each statistics request.
    pub stats_config: StatsConfig,

    /// Zotero client, when credentials were configured.
    pub zotero: Option<ZoteroClient>,
}

impl AppState {
    #[must_use]
    pub fn new(stats_source: Arc<dyn StatsSource>, stats_config: StatsConfig) -> Self {
        Self {
            stats_source,
            stats_config,
            zotero: None,
        }
    }

    /// Attaches a configured Zotero client.
    #[must_use]
    pub fn with_zotero(mut self, client: ZoteroClient) -> Self {
        self.zotero = Some(client);
        self
    }
}
