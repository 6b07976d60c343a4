//! Wire shapes of the CoinGecko v3 endpoints used here.

use serde::Deserialize;
use serde_json::Value;

/// One element of `GET /coins/markets`.
#[derive(Debug, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    pub image: String,
    // Upstream sometimes sends caps as floats (`1.2e12`).
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap_rank: u32,
}

/// Body of `GET /coins/{id}/market_chart[/range]`.
///
/// Points stay untyped so one malformed element does not reject the payload.
#[derive(Debug, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<Value>,
}
