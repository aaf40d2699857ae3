//! Normalized market data types shared by every provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Source tag of a snapshot assembled from live provider data.
pub const LIVE_SOURCE: &str = "altinkaynak+truncgil+binance";

/// Source tag of a snapshot served from the embedded dataset.
pub const FALLBACK_SOURCE: &str = "fallback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Currency,
    Gold,
    Crypto,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Category::Currency => "currency",
                Category::Gold => "gold",
                Category::Crypto => "crypto",
            }
        )
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "currency" => Ok(Category::Currency),
            "gold" => Ok(Category::Gold),
            "crypto" => Ok(Category::Crypto),
            _ => Err(anyhow::anyhow!("Invalid quote category: {}", s)),
        }
    }
}

/// Priced state of a single instrument.
///
/// `bid`/`ask` use `0.0` when the provider omitted the field. Crypto quotes
/// carry the USD last price in both and add `price_usd`/`price_try`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub code: String,
    pub display_name: String,
    pub bid: f64,
    pub ask: f64,
    pub change_percent: f64,
    pub category: Category,
    #[serde(rename = "priceUSD", default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
    #[serde(rename = "priceTRY", default, skip_serializing_if = "Option::is_none")]
    pub price_try: Option<f64>,
}

impl Quote {
    pub fn currency(code: &str, display_name: &str, bid: f64, ask: f64, change: f64) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
            bid,
            ask,
            change_percent: change,
            category: Category::Currency,
            price_usd: None,
            price_try: None,
        }
    }

    /// Gold providers never report a change, so it is always zero.
    pub fn gold(code: &str, display_name: &str, bid: f64, ask: f64) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
            bid,
            ask,
            change_percent: 0.0,
            category: Category::Gold,
            price_usd: None,
            price_try: None,
        }
    }

    pub fn crypto(code: &str, display_name: &str, price_usd: f64, usd_try: f64, change: f64) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
            bid: price_usd,
            ask: price_usd,
            change_percent: change,
            category: Category::Crypto,
            price_usd: Some(price_usd),
            price_try: Some(price_usd * usd_try),
        }
    }
}

/// Gold record as reported by the SOAP provider, before reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInstrumentRecord {
    pub provider_code: String,
    pub mapped_code: String,
    pub display_name: String,
    pub bid: f64,
    pub ask: f64,
}

/// Result of one aggregation cycle. Built once and replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub currencies: Vec<Quote>,
    pub golds: Vec<Quote>,
    pub cryptos: Vec<Quote>,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl Snapshot {
    pub fn is_fallback(&self) -> bool {
        self.source == FALLBACK_SOURCE
    }
}
