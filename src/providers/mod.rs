pub mod altinkaynak;
pub mod binance;
pub mod caching;
pub mod truncgil;
pub mod util;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::core::config::ProvidersConfig;
use crate::core::{MarketService, Quote, cache::Cache};
use crate::store::MemoryCache;
use altinkaynak::AltinkaynakProvider;
use binance::BinanceProvider;
use caching::CachedSource;
use truncgil::TruncgilProvider;

/// Wires the three live providers, each behind its freshness cache.
pub fn market_service(config: &ProvidersConfig) -> Result<MarketService> {
    // One store for all providers, keyed by provider name
    let cache: Arc<dyn Cache<&'static str, Vec<Quote>>> = Arc::new(MemoryCache::new());

    let gold = AltinkaynakProvider::new(&config.altinkaynak)
        .context("Failed to build Altinkaynak client")?;
    let currency =
        TruncgilProvider::new(&config.truncgil).context("Failed to build Truncgil client")?;
    let crypto = BinanceProvider::new(&config.binance).context("Failed to build Binance client")?;

    Ok(MarketService::new(
        Arc::new(CachedSource::with_cache(gold, Arc::clone(&cache))),
        Arc::new(CachedSource::with_cache(currency, Arc::clone(&cache))),
        Arc::new(CachedSource::with_cache(crypto, cache)),
    ))
}
