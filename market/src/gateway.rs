use async_trait::async_trait;

use crate::coingecko::MarketError;
use crate::types::{Asset, Series, SeriesWindow};

/// Read-only access to the upstream market API.
///
/// Pure I/O boundary: implementations perform no caching and no retries.
#[async_trait]
pub trait MarketDataGateway: Send + Sync + 'static {
    /// Snapshot listing, in upstream (rank-ascending) order. Never partial:
    /// any malformed element fails the whole call.
    async fn list_assets(&self) -> Result<Vec<Asset>, MarketError>;

    /// Price history of one asset over `window`.
    async fn fetch_series(&self, id: &str, window: SeriesWindow) -> Result<Series, MarketError>;
}
