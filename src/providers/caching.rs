use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::core::cache::Cache;
use crate::core::{Quote, QuoteSource};
use crate::store::MemoryCache;

/// Serves a source's last successful result until its freshness window expires.
///
/// Empty results are never stored, so a failing provider is retried on the
/// next call instead of being pinned to "no data" for a whole window.
pub struct CachedSource<S: QuoteSource> {
    inner: S,
    cache: Arc<dyn Cache<&'static str, Vec<Quote>>>,
}

impl<S: QuoteSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self::with_cache(inner, Arc::new(MemoryCache::new()))
    }

    pub fn with_cache(inner: S, cache: Arc<dyn Cache<&'static str, Vec<Quote>>>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<S: QuoteSource> QuoteSource for CachedSource<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn freshness(&self) -> Duration {
        self.inner.freshness()
    }

    async fn fetch_quotes(&self) -> Vec<Quote> {
        let key = self.inner.name();
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Serving cached quotes for {}", key);
            return cached;
        }

        let quotes = self.inner.fetch_quotes().await;
        if !quotes.is_empty() {
            self.cache
                .put(key, quotes.clone(), Some(self.inner.freshness()))
                .await;
        }
        quotes
    }
}
