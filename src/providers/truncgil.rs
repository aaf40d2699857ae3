//! Exchange rates from the Truncgil finance JSON feed.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::{http_client, parse_decimal};
use crate::core::config::TruncgilProviderConfig;
use crate::core::error::ProviderError;
use crate::core::{Quote, QuoteSource};

const RATES_PATH: &str = "/today.json";

/// The only currencies served, in output order. The feed carries many more.
static CURRENCIES: &[(&str, &str)] = &[
    ("USD", "Amerikan Doları"),
    ("EUR", "Euro"),
    ("GBP", "İngiliz Sterlini"),
    ("CHF", "İsviçre Frangı"),
];

#[derive(Debug, Deserialize)]
struct TruncgilRate {
    #[serde(rename = "Buying")]
    buying: Option<Value>,
    #[serde(rename = "Selling")]
    selling: Option<Value>,
    #[serde(rename = "Change")]
    change: Option<Value>,
}

/// Feed values are usually strings but occasionally bare numbers.
fn value_to_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::String(s)) => parse_decimal(s),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    }
    .unwrap_or(0.0)
}

fn extract_currencies(feed: &HashMap<String, Value>) -> Vec<Quote> {
    CURRENCIES
        .iter()
        .filter_map(|&(code, name)| {
            let Some(entry) = feed.get(code) else {
                debug!(code, "Currency missing from feed");
                return None;
            };
            let rate = match TruncgilRate::deserialize(entry) {
                Ok(rate) => rate,
                Err(e) => {
                    debug!(code, error = %e, "Skipping malformed currency entry");
                    return None;
                }
            };
            Some(Quote::currency(
                code,
                name,
                value_to_f64(rate.buying.as_ref()),
                value_to_f64(rate.selling.as_ref()),
                value_to_f64(rate.change.as_ref()),
            ))
        })
        .collect()
}

pub struct TruncgilProvider {
    url: String,
    client: reqwest::Client,
    ttl: Duration,
}

impl TruncgilProvider {
    pub fn new(config: &TruncgilProviderConfig) -> reqwest::Result<Self> {
        Ok(Self {
            url: format!("{}{}", config.base_url.trim_end_matches('/'), RATES_PATH),
            client: http_client(config.timeout())?,
            ttl: config.ttl(),
        })
    }

    async fn request_quotes(&self) -> Result<Vec<Quote>, ProviderError> {
        debug!("Requesting currency rates from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::UpstreamStatus {
                status: response.status(),
            });
        }

        let text = response.text().await?;
        let feed: HashMap<String, Value> = serde_json::from_str(&text)?;
        Ok(extract_currencies(&feed))
    }
}

#[async_trait]
impl QuoteSource for TruncgilProvider {
    fn name(&self) -> &'static str {
        "truncgil"
    }

    fn freshness(&self) -> Duration {
        self.ttl
    }

    #[instrument(name = "TruncgilFetch", skip(self))]
    async fn fetch_quotes(&self) -> Vec<Quote> {
        match self.request_quotes().await {
            Ok(quotes) => {
                debug!(count = quotes.len(), "Received currency quotes");
                quotes
            }
            Err(e) => {
                e.report(self.name());
                Vec::new()
            }
        }
    }
}
