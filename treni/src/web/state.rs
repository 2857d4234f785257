//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedLookups;
use crate::stations::StationIndex;
use crate::viaggiatreno::ViaggiaTrenoClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Upstream client with cached statistics and train-number lookups
    pub lookups: Arc<CachedLookups>,

    /// National station list for fuzzy search
    pub stations: Arc<StationIndex>,
}

impl AppState {
    pub fn new(lookups: CachedLookups, stations: StationIndex) -> Self {
        Self {
            lookups: Arc::new(lookups),
            stations: Arc::new(stations),
        }
    }

    /// The upstream client, for requests that are never cached.
    pub fn client(&self) -> &ViaggiaTrenoClient {
        self.lookups.client()
    }
}
