use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::{MarketService, Snapshot};

#[derive(Debug, Serialize)]
pub struct MarketsResponse {
    pub success: bool,
    pub data: Snapshot,
}

/// Current market snapshot. Always 200: provider outages degrade to fallback data.
async fn get_markets(State(service): State<MarketService>) -> Json<MarketsResponse> {
    let data = service.snapshot().await;
    Json(MarketsResponse {
        success: true,
        data,
    })
}

pub fn router() -> Router<MarketService> {
    Router::new().route("/markets", get(get_markets))
}
