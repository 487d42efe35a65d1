//! Composition root tying an executor to a cache and config.

use super::chain::QueryChain;
use crate::config::QueryConfig;
use crate::entity::{Entity, MetadataCache};
use crate::error::QueryError;
use crate::executor::QueryExecutor;
use std::sync::Arc;

/// Owns the executor, a metadata cache and builder defaults
///
/// Each context gets its own [`MetadataCache`] unless one is shared in with
/// [`with_cache`](Self::with_cache).
pub struct QueryContext<X> {
    executor: X,
    cache: Arc<MetadataCache>,
    config: QueryConfig,
}

impl<X: QueryExecutor> QueryContext<X> {
    pub fn new(executor: X) -> Self {
        Self {
            executor,
            cache: Arc::new(MetadataCache::new()),
            config: QueryConfig::default(),
        }
    }

    /// Share `cache` with other contexts
    pub fn with_cache(mut self, cache: Arc<MetadataCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Open a builder for `E`
    ///
    /// # Errors
    ///
    /// Returns `QueryError::MissingTable` if `E` declares no table name.
    pub fn query<E: Entity>(&self) -> Result<QueryChain<'_, E>, QueryError> {
        QueryChain::with_cache(&self.executor, &self.cache, &self.config)
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }

    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }
}
