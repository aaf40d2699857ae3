//! Provider abstraction

use async_trait::async_trait;
use std::time::Duration;

use super::quote::Quote;

/// A single upstream market data provider.
///
/// `fetch_quotes` cannot fail: implementations absorb and log every transport,
/// status and parse error and return an empty list instead, so callers can
/// run all sources unconditionally.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Short provider identifier, used for logging and cache keys.
    fn name(&self) -> &'static str;

    /// How long a successful result may be reused before refetching.
    fn freshness(&self) -> Duration;

    async fn fetch_quotes(&self) -> Vec<Quote>;
}
