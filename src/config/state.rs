// Application state module
// Shared, read-only state handed to every connection

use super::types::Config;
use crate::store::SharedAlbumStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: SharedAlbumStore,
}

impl AppState {
    pub fn new(config: Config, store: SharedAlbumStore) -> Self {
        Self { config, store }
    }

    /// Whether access log lines should be emitted
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
