//! Market data boundary: the asset/series data model, the gateway trait the
//! rest of the workspace programs against, and the CoinGecko implementation.

pub mod coingecko;
pub mod gateway;
pub mod types;

pub use gateway::MarketDataGateway;
pub use types::{Asset, AssetId, PricePoint, Series, SeriesWindow};
