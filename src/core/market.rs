//! Aggregation of all providers into one snapshot.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use super::fallback;
use super::quote::{LIVE_SOURCE, Snapshot};
use super::source::QuoteSource;

/// Fans out to the gold, currency and crypto sources and assembles a snapshot.
#[derive(Clone)]
pub struct MarketService {
    gold: Arc<dyn QuoteSource>,
    currency: Arc<dyn QuoteSource>,
    crypto: Arc<dyn QuoteSource>,
}

impl MarketService {
    pub fn new(
        gold: Arc<dyn QuoteSource>,
        currency: Arc<dyn QuoteSource>,
        crypto: Arc<dyn QuoteSource>,
    ) -> Self {
        Self {
            gold,
            currency,
            crypto,
        }
    }

    /// Fetches all sources concurrently and never fails.
    ///
    /// Any non-empty list makes the result live; only a total outage falls
    /// back to the embedded dataset. Dropping the returned future cancels every
    /// in-flight provider request.
    #[instrument(name = "MarketSnapshot", skip(self))]
    pub async fn snapshot(&self) -> Snapshot {
        let (golds, currencies, cryptos) = futures::join!(
            self.gold.fetch_quotes(),
            self.currency.fetch_quotes(),
            self.crypto.fetch_quotes(),
        );

        if golds.is_empty() && currencies.is_empty() && cryptos.is_empty() {
            info!("All providers returned no data, serving fallback snapshot");
            return fallback::snapshot();
        }

        info!(
            currencies = currencies.len(),
            golds = golds.len(),
            cryptos = cryptos.len(),
            "Assembled live snapshot"
        );

        Snapshot {
            currencies,
            golds,
            cryptos,
            timestamp: Utc::now(),
            source: LIVE_SOURCE.to_string(),
        }
    }
}
