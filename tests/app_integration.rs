use std::fs;
use tracing::info;

use piyasa::core::config::AppConfig;
use piyasa::providers::market_service;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const GOLD_INNER: &str = "<Kurlar>\
        <Kur><Kod>EC</Kod><Alis>4700</Alis><Satis>4800</Satis></Kur>\
        <Kur><Kod>C</Kod><Alis>4850</Alis><Satis>4960</Satis></Kur>\
        <Kur><Kod>GA</Kod><Alis>2950</Alis><Satis>2990</Satis></Kur>\
        </Kurlar>";

    pub const CURRENCY_JSON: &str = r#"{
        "USD": {"Buying": "34.2150", "Selling": "34.2650", "Change": "0.12"},
        "EUR": {"Buying": "37.1040", "Selling": "37.2010", "Change": "-0.08"}
    }"#;

    pub const TICKER_JSON: &str = r#"[
        {"symbol": "USDTTRY", "lastPrice": "34.00", "priceChangePercent": "0.01"},
        {"symbol": "BTCUSDT", "lastPrice": "94989.00", "priceChangePercent": "1.25"}
    ]"#;

    pub fn gold_envelope() -> String {
        let escaped = GOLD_INNER.replace('<', "&lt;").replace('>', "&gt;");
        format!(
            "<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\">\
             <soap:Body><GetGoldResponse xmlns=\"http://data.altinkaynak.com/\">\
             <GetGoldResult>{escaped}</GetGoldResult>\
             </GetGoldResponse></soap:Body></soap:Envelope>"
        )
    }

    /// Mounts all three upstreams on one server, each expected `hits` times.
    pub async fn create_market_mock_server(status_code: u16, hits: u64) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/DataService.asmx"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(gold_envelope()))
            .expect(hits)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/today.json"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(CURRENCY_JSON))
            .expect(hits)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3/ticker/24hr"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(TICKER_JSON))
            .expect(hits)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn config_yaml(base_url: &str) -> String {
        format!(
            r#"
server:
  listen_addr: "127.0.0.1:0"
providers:
  altinkaynak:
    base_url: "{base_url}"
    username: "AltinkaynakWebServis"
    password: "AltinkaynakWebServis"
    timeout_secs: 5
    ttl_secs: 60
  truncgil:
    base_url: "{base_url}"
    timeout_secs: 5
    ttl_secs: 60
  binance:
    base_url: "{base_url}"
    timeout_secs: 5
    ttl_secs: 30
"#
        )
    }
}

fn write_config(base_url: &str) -> tempfile::NamedTempFile {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), test_utils::config_yaml(base_url))
        .expect("Failed to write config file");
    config_file
}

#[test_log::test(tokio::test)]
async fn test_live_snapshot_from_all_providers() {
    let mock_server = test_utils::create_market_mock_server(200, 1).await;
    let config_file = write_config(&mock_server.uri());
    let config = AppConfig::load_from_path(config_file.path()).unwrap();

    let service = market_service(&config.providers).unwrap();
    let snapshot = service.snapshot().await;
    info!(?snapshot, "Received snapshot");

    assert_eq!(snapshot.source, "altinkaynak+truncgil+binance");

    let gold_codes: Vec<_> = snapshot.golds.iter().map(|q| q.code.as_str()).collect();
    assert_eq!(gold_codes, ["C", "GA"]);
    assert_eq!(snapshot.golds[0].bid, 4850.0);

    let currency_codes: Vec<_> = snapshot.currencies.iter().map(|q| q.code.as_str()).collect();
    assert_eq!(currency_codes, ["USD", "EUR"]);

    assert_eq!(snapshot.cryptos.len(), 1);
    let btc = &snapshot.cryptos[0];
    assert!((btc.price_try.unwrap() - 94989.0 * 34.0).abs() < 1e-6);
}

#[test_log::test(tokio::test)]
async fn test_second_snapshot_within_window_is_served_from_cache() {
    // Each upstream must be hit exactly once, verified when the server drops
    let mock_server = test_utils::create_market_mock_server(200, 1).await;
    let config_file = write_config(&mock_server.uri());
    let config = AppConfig::load_from_path(config_file.path()).unwrap();

    let service = market_service(&config.providers).unwrap();
    let first = service.snapshot().await;
    let second = service.snapshot().await;

    assert_eq!(first.golds, second.golds);
    assert_eq!(first.currencies, second.currencies);
    assert_eq!(first.cryptos, second.cryptos);
    assert!(!second.is_fallback());
}

#[test_log::test(tokio::test)]
async fn test_total_outage_serves_fallback() {
    // Failures are not cached, so both snapshots reach the upstreams
    let mock_server = test_utils::create_market_mock_server(500, 2).await;
    let config_file = write_config(&mock_server.uri());
    let config = AppConfig::load_from_path(config_file.path()).unwrap();

    let service = market_service(&config.providers).unwrap();
    for _ in 0..2 {
        let snapshot = service.snapshot().await;
        assert!(snapshot.is_fallback());
        assert_eq!(snapshot.golds, piyasa::core::fallback::golds());
        assert_eq!(snapshot.currencies, piyasa::core::fallback::currencies());
        assert_eq!(snapshot.cryptos, piyasa::core::fallback::cryptos());
    }
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_market_mock_server(200, 1).await;
    let config_file = write_config(&mock_server.uri());

    let result = piyasa::run_command(
        piyasa::AppCommand::Snapshot {
            category: None,
            json: true,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Snapshot command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_missing_config_path_fails() {
    let result = piyasa::run_command(
        piyasa::AppCommand::Snapshot {
            category: None,
            json: true,
        },
        Some("/nonexistent/piyasa/config.yaml"),
    )
    .await;
    assert!(result.is_err());
}
