//! Embedded last-known-good dataset served when every provider is down.
//!
//! These figures are deliberately static. They are not refreshed from live
//! data, so callers always have something plausible to render.

use chrono::Utc;

use super::quote::{FALLBACK_SOURCE, Quote, Snapshot};

/// USDT/TRY multiplier used when the exchange does not list `USDTTRY`.
///
/// Hardcoded with no update path. If the pair is delisted, crypto TRY prices
/// drift from reality until this is changed.
pub const FALLBACK_USDT_TRY_RATE: f64 = 34.0;

// (code, name, bid, ask, change %)
static CURRENCIES: &[(&str, &str, f64, f64, f64)] = &[
    ("USD", "Amerikan Doları", 34.2150, 34.2650, 0.12),
    ("EUR", "Euro", 37.1040, 37.2010, -0.08),
    ("GBP", "İngiliz Sterlini", 44.5120, 44.7030, 0.05),
    ("CHF", "İsviçre Frangı", 39.8210, 39.9870, -0.11),
];

// (code, name, bid, ask)
static GOLDS: &[(&str, &str, f64, f64)] = &[
    ("GA", "Gram Altın", 2950.00, 2990.00),
    ("C", "Çeyrek Altın", 4850.00, 4960.00),
    ("Y", "Yarım Altın", 9700.00, 9920.00),
    ("T", "Tam Altın", 19350.00, 19780.00),
    ("ATA", "Ata Cumhuriyet", 19900.00, 20350.00),
    ("HAS", "Has Altın", 2945.00, 2965.00),
];

// (code, name, USD price, 24h change %)
static CRYPTOS: &[(&str, &str, f64, f64)] = &[
    ("BTC", "Bitcoin", 94989.00, 1.25),
    ("ETH", "Ethereum", 3350.00, 0.84),
    ("BNB", "BNB", 610.00, -0.32),
    ("SOL", "Solana", 190.00, 2.10),
    ("XRP", "XRP", 2.15, -1.05),
];

pub fn currencies() -> Vec<Quote> {
    CURRENCIES
        .iter()
        .map(|&(code, name, bid, ask, change)| Quote::currency(code, name, bid, ask, change))
        .collect()
}

pub fn golds() -> Vec<Quote> {
    GOLDS
        .iter()
        .map(|&(code, name, bid, ask)| Quote::gold(code, name, bid, ask))
        .collect()
}

pub fn cryptos() -> Vec<Quote> {
    CRYPTOS
        .iter()
        .map(|&(code, name, usd, change)| {
            Quote::crypto(code, name, usd, FALLBACK_USDT_TRY_RATE, change)
        })
        .collect()
}

/// The embedded dataset stamped with the current time.
pub fn snapshot() -> Snapshot {
    Snapshot {
        currencies: currencies(),
        golds: golds(),
        cryptos: cryptos(),
        timestamp: Utc::now(),
        source: FALLBACK_SOURCE.to_string(),
    }
}
