use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, instrument};

use super::errors::MarketError;
use super::parser::{parse_market_chart, parse_markets};
use crate::gateway::MarketDataGateway;
use crate::types::{Asset, Series, SeriesWindow};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base: Url,
    vs_currency: String,
}

impl CoinGeckoClient {
    pub fn new(url: String, vs_currency: String, timeout: Duration) -> Result<Self, MarketError> {
        let base = Url::parse(&url).map_err(|e| MarketError::InvalidUrl(format!("{url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(MarketError::InvalidUrl(url));
        }

        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base,
            vs_currency,
        })
    }

    pub fn markets_url(&self) -> Result<Url, MarketError> {
        let mut url = self.endpoint(&["coins", "markets"])?;
        url.query_pairs_mut().append_pair("vs_currency", &self.vs_currency);
        Ok(url)
    }

    /// `id` is a single path segment; reserved characters are percent-encoded.
    pub fn chart_url(&self, id: &str, window: SeriesWindow) -> Result<Url, MarketError> {
        let mut url = match window {
            SeriesWindow::Last24Hours => self.endpoint(&["coins", id, "market_chart"])?,
            SeriesWindow::Range { .. } => self.endpoint(&["coins", id, "market_chart", "range"])?,
        };

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("vs_currency", &self.vs_currency);
            match window {
                SeriesWindow::Last24Hours => {
                    query.append_pair("days", "1");
                }
                SeriesWindow::Range { from, to } => {
                    query
                        .append_pair("from", &from.to_string())
                        .append_pair("to", &to.to_string());
                }
            }
        }

        Ok(url)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, MarketError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| MarketError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, MarketError> {
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MarketError::Status(status.as_u16()));
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

#[async_trait]
impl MarketDataGateway for CoinGeckoClient {
    #[instrument(skip(self), level = "debug")]
    async fn list_assets(&self) -> Result<Vec<Asset>, MarketError> {
        let body = self.get_bytes(self.markets_url()?).await?;
        let assets = parse_markets(&body)?;

        debug!(count = assets.len(), "coingecko listing fetched");

        Ok(assets)
    }

    #[instrument(skip(self), fields(asset_id = %id), level = "debug")]
    async fn fetch_series(&self, id: &str, window: SeriesWindow) -> Result<Series, MarketError> {
        let body = self.get_bytes(self.chart_url(id, window)?).await?;
        let series = parse_market_chart(&body)?;

        debug!(points = series.len(), "coingecko chart fetched");

        Ok(series)
    }
}
