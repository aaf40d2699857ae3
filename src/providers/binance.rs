//! Crypto prices from the Binance 24h ticker statistics.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::util::{http_client, parse_decimal};
use crate::core::config::BinanceProviderConfig;
use crate::core::error::ProviderError;
use crate::core::fallback::FALLBACK_USDT_TRY_RATE;
use crate::core::{Quote, QuoteSource};

const TICKER_PATH: &str = "/api/v3/ticker/24hr";
const QUOTE_ASSET: &str = "USDT";
const TRY_RATE_SYMBOL: &str = "USDTTRY";

/// Base assets served, in output order.
static ASSETS: &[(&str, &str)] = &[
    ("BTC", "Bitcoin"),
    ("ETH", "Ethereum"),
    ("BNB", "BNB"),
    ("SOL", "Solana"),
    ("XRP", "XRP"),
    ("ADA", "Cardano"),
    ("DOGE", "Dogecoin"),
    ("AVAX", "Avalanche"),
    ("DOT", "Polkadot"),
    ("TRX", "TRON"),
    ("LINK", "Chainlink"),
    ("LTC", "Litecoin"),
    ("SHIB", "Shiba Inu"),
    ("ATOM", "Cosmos"),
    ("TON", "Toncoin"),
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24h {
    symbol: String,
    last_price: String,
    #[serde(default)]
    price_change_percent: Option<String>,
}

/// USDT→TRY multiplier from the ticker set, or the hardcoded fallback.
fn usdt_try_rate(tickers: &HashMap<&str, &Ticker24h>) -> f64 {
    match tickers
        .get(TRY_RATE_SYMBOL)
        .and_then(|t| parse_decimal(&t.last_price))
        .filter(|rate| *rate > 0.0)
    {
        Some(rate) => rate,
        None => {
            warn!(
                symbol = TRY_RATE_SYMBOL,
                fallback = FALLBACK_USDT_TRY_RATE,
                "TRY cross rate unavailable, using fallback rate"
            );
            FALLBACK_USDT_TRY_RATE
        }
    }
}

/// Decodes each ticker on its own so one odd record never sinks the whole list.
fn parse_tickers(records: Vec<serde_json::Value>) -> Vec<Ticker24h> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Ticker24h>(record) {
            Ok(ticker) => Some(ticker),
            Err(e) => {
                debug!(error = %e, "Skipping malformed ticker");
                None
            }
        })
        .collect()
}

fn build_quotes(tickers: &[Ticker24h]) -> Vec<Quote> {
    let by_symbol: HashMap<&str, &Ticker24h> =
        tickers.iter().map(|t| (t.symbol.as_str(), t)).collect();
    let rate = usdt_try_rate(&by_symbol);

    ASSETS
        .iter()
        .filter_map(|&(base, name)| {
            let symbol = format!("{base}{QUOTE_ASSET}");
            let Some(ticker) = by_symbol.get(symbol.as_str()) else {
                debug!(%symbol, "Symbol not listed, skipping");
                return None;
            };
            let Some(price_usd) = parse_decimal(&ticker.last_price) else {
                debug!(%symbol, price = %ticker.last_price, "Unparseable last price, skipping");
                return None;
            };
            let change = ticker
                .price_change_percent
                .as_deref()
                .and_then(parse_decimal)
                .unwrap_or(0.0);
            Some(Quote::crypto(base, name, price_usd, rate, change))
        })
        .collect()
}

pub struct BinanceProvider {
    url: String,
    client: reqwest::Client,
    ttl: Duration,
}

impl BinanceProvider {
    pub fn new(config: &BinanceProviderConfig) -> reqwest::Result<Self> {
        Ok(Self {
            url: format!("{}{}", config.base_url.trim_end_matches('/'), TICKER_PATH),
            client: http_client(config.timeout())?,
            ttl: config.ttl(),
        })
    }

    async fn request_quotes(&self) -> Result<Vec<Quote>, ProviderError> {
        debug!("Requesting ticker statistics from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::UpstreamStatus {
                status: response.status(),
            });
        }

        let text = response.text().await?;
        let records: Vec<serde_json::Value> = serde_json::from_str(&text)?;
        Ok(build_quotes(&parse_tickers(records)))
    }
}

#[async_trait]
impl QuoteSource for BinanceProvider {
    fn name(&self) -> &'static str {
        "binance"
    }

    fn freshness(&self) -> Duration {
        self.ttl
    }

    #[instrument(name = "BinanceFetch", skip(self))]
    async fn fetch_quotes(&self) -> Vec<Quote> {
        match self.request_quotes().await {
            Ok(quotes) => {
                debug!(count = quotes.len(), "Received crypto quotes");
                quotes
            }
            Err(e) => {
                e.report(self.name());
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Category;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"[
        {"symbol": "ETHBTC", "lastPrice": "0.03526", "priceChangePercent": "0.110"},
        {"symbol": "BTCUSDT", "lastPrice": "94989.00000000", "priceChangePercent": "1.250"},
        {"symbol": "ETHUSDT", "lastPrice": "3350.12000000", "priceChangePercent": "-0.840"},
        {"symbol": "USDTTRY", "lastPrice": "34.00000000", "priceChangePercent": "0.020"},
        {"symbol": "SOLUSDT", "lastPrice": "190.50000000"}
    ]"#;

    async fn create_mock_server(status_code: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(TICKER_PATH))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider_for(mock_server: &MockServer) -> BinanceProvider {
        let config = BinanceProviderConfig {
            base_url: mock_server.uri(),
            ..Default::default()
        };
        BinanceProvider::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_successful_ticker_fetch() {
        let mock_server = create_mock_server(200, MOCK_JSON).await;
        let provider = provider_for(&mock_server);

        let quotes = provider.fetch_quotes().await;

        let codes: Vec<_> = quotes.iter().map(|q| q.code.as_str()).collect();
        assert_eq!(codes, ["BTC", "ETH", "SOL"]);
        assert!(quotes.iter().all(|q| q.category == Category::Crypto));

        let btc = &quotes[0];
        assert_eq!(btc.display_name, "Bitcoin");
        assert_eq!(btc.price_usd, Some(94989.0));
        assert!((btc.price_try.unwrap() - 94989.0 * 34.0).abs() < 1e-6);
        assert_eq!(btc.change_percent, 1.25);

        assert_eq!(quotes[1].change_percent, -0.84);
        // Missing change is reported as zero
        assert_eq!(quotes[2].change_percent, 0.0);
    }

    #[tokio::test]
    async fn test_missing_try_rate_uses_fallback() {
        let body = r#"[{"symbol": "BTCUSDT", "lastPrice": "100000", "priceChangePercent": "0"}]"#;
        let mock_server = create_mock_server(200, body).await;
        let provider = provider_for(&mock_server);

        let quotes = provider.fetch_quotes().await;

        assert_eq!(quotes.len(), 1);
        assert!(
            (quotes[0].price_try.unwrap() - 100000.0 * FALLBACK_USDT_TRY_RATE).abs() < 1e-6
        );
    }

    #[tokio::test]
    async fn test_ticker_api_error_response() {
        let mock_server = create_mock_server(429, r#"{"code": -1003}"#).await;
        let provider = provider_for(&mock_server);

        assert!(provider.fetch_quotes().await.is_empty());
    }

    #[tokio::test]
    async fn test_ticker_api_malformed_response() {
        let mock_server = create_mock_server(200, r#"{"symbol": "BTCUSDT"}"#).await;
        let provider = provider_for(&mock_server);

        assert!(provider.fetch_quotes().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_ticker_does_not_drop_others() {
        let body = r#"[
            {"symbol": "USDTTRY", "lastPrice": "34.00"},
            {"symbol": "BTCUSDT", "lastPrice": "94989", "priceChangePercent": "1.0"},
            {"symbol": "XYZABC"},
            {"symbol": "ETHUSDT", "lastPrice": null},
            {"symbol": "SOLUSDT", "lastPrice": 190.5}
        ]"#;
        let mock_server = create_mock_server(200, body).await;
        let provider = provider_for(&mock_server);

        let quotes = provider.fetch_quotes().await;

        let codes: Vec<_> = quotes.iter().map(|q| q.code.as_str()).collect();
        assert_eq!(codes, ["BTC"]);
        assert!((quotes[0].price_try.unwrap() - 94989.0 * 34.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_ticker_unreachable_yields_empty() {
        let config = BinanceProviderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..Default::default()
        };
        let provider = BinanceProvider::new(&config).unwrap();

        assert!(provider.fetch_quotes().await.is_empty());
    }

    #[test]
    fn test_unparseable_price_is_skipped() {
        let tickers = vec![
            Ticker24h {
                symbol: "BTCUSDT".to_string(),
                last_price: "".to_string(),
                price_change_percent: None,
            },
            Ticker24h {
                symbol: "ETHUSDT".to_string(),
                last_price: "3000".to_string(),
                price_change_percent: Some("2.5".to_string()),
            },
        ];

        let quotes = build_quotes(&tickers);

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].code, "ETH");
    }
}
