use std::time::Duration;

/// Builds the HTTP client every provider uses, with a hard request deadline.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("piyasa/1.0")
        .timeout(timeout)
        .build()
}

/// Parses a provider price or change figure.
///
/// Accepts plain decimals (`34.1250`), a leading or trailing `%` (`%-0,45`) and
/// Turkish formatting with a comma decimal separator (`1.234,56`). Returns `None`
/// for anything else, including empty strings. Signs are kept, so bid and ask
/// values are not clamped to be non-negative.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_matches('%').trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
