//! Display strings for one list row.

use market::Asset;

/// Direction indicator next to the 24h change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    /// Changes down to -0.01% still count as "up".
    pub fn from_change(change: Option<f64>) -> Self {
        match change {
            None => Trend::Neutral,
            Some(c) if c >= -0.01 => Trend::Up,
            Some(_) => Trend::Down,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Neutral => "·",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetRow {
    pub id: String,
    pub rank: u32,
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub market_cap: String,
    pub change: String,
    pub trend: Trend,
    pub icon: String,
}

impl From<&Asset> for AssetRow {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            rank: asset.market_cap_rank,
            name: asset.name.clone(),
            symbol: asset.symbol.to_uppercase(),
            price: format_price(asset.current_price),
            market_cap: format_market_cap(asset.market_cap),
            change: format_change(asset.price_change_percentage_24h),
            trend: Trend::from_change(asset.price_change_percentage_24h),
            icon: asset.image.clone(),
        }
    }
}

pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

pub fn format_market_cap(cap: Option<u64>) -> String {
    match cap {
        Some(cap) => format!("${:.2}B", cap as f64 / 1_000_000_000.0),
        None => "Market Cap: N/A".to_string(),
    }
}

pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(c) => format!("{c:.2}%"),
        None => "24h: N/A".to_string(),
    }
}
