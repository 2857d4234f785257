//! In-memory caching of slow-changing upstream lookups.
//!
//! The HTTP wrapper asks upstream for the same network statistics and the
//! same train-number searches over and over. Both change slowly, so they
//! are kept for a short TTL. Train progress is real-time and always goes
//! straight to upstream.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Stats, TrainInfo};
use crate::viaggiatreno::{ViaggiaTrenoClient, ViaggiaTrenoError};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached train-number searches.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Client wrapper caching statistics and train-number searches.
pub struct CachedLookups {
    client: ViaggiaTrenoClient,
    stats: MokaCache<(), Arc<Stats>>,
    train_numbers: MokaCache<u32, Arc<Vec<TrainInfo>>>,
}

impl CachedLookups {
    pub fn new(client: ViaggiaTrenoClient, config: &CacheConfig) -> Self {
        let stats = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(1)
            .build();
        let train_numbers = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            client,
            stats,
            train_numbers,
        }
    }

    /// Network statistics, from cache if fresh.
    pub async fn statistics(&self) -> Result<Arc<Stats>, ViaggiaTrenoError> {
        if let Some(cached) = self.stats.get(&()).await {
            return Ok(cached);
        }

        let stats = Arc::new(self.client.statistics().await?);
        self.stats.insert((), stats.clone()).await;
        Ok(stats)
    }

    /// Journeys with the given number, from cache if fresh.
    ///
    /// Empty results are cached too.
    pub async fn search_train_number(
        &self,
        number: u32,
    ) -> Result<Arc<Vec<TrainInfo>>, ViaggiaTrenoError> {
        if let Some(cached) = self.train_numbers.get(&number).await {
            return Ok(cached);
        }

        let found = Arc::new(self.client.search_train_number(number).await?);
        self.train_numbers.insert(number, found.clone()).await;
        Ok(found)
    }

    /// The underlying client, for requests that bypass the cache.
    pub fn client(&self) -> &ViaggiaTrenoClient {
        &self.client
    }

    /// Number of cached train-number searches.
    pub fn cache_entry_count(&self) -> u64 {
        self.train_numbers.entry_count()
    }

    pub fn invalidate_cache(&self) {
        self.stats.invalidate_all();
        self.train_numbers.invalidate_all();
    }
}
