//! Detail view chart loading.
//!
//! The detail view shows one asset over a selectable range. Each range change
//! issues a fresh load; `DetailView` keeps a generation counter so a load that
//! completes after the user picked another range is discarded.
//!
//! The 24h range shares the row cache: a cached series is reused and a
//! non-empty fetch populates it. The 1h range is an explicit window and is
//! never cached.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use market::{AssetId, MarketDataGateway, SeriesWindow};

use crate::cache::SeriesCache;
use crate::segments::DetailChart;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    Day,
    Hour,
}

impl TimeRange {
    pub fn window(&self, now_secs: i64) -> SeriesWindow {
        match self {
            TimeRange::Day => SeriesWindow::Last24Hours,
            TimeRange::Hour => SeriesWindow::last_hour(now_secs),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::Hour => "1h",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TimeRange::Day => "Price over 24h",
            TimeRange::Hour => "Price over 1h",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    pub asset_id: AssetId,
    pub range: TimeRange,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
pub enum DetailState {
    #[default]
    Loading,
    Ready(DetailChart),
    NoData,
}

/// Consumer-side state of one open detail view.
pub struct DetailView {
    asset_id: AssetId,
    range: TimeRange,
    generation: u64,
    state: DetailState,
}

impl DetailView {
    pub fn new(asset_id: impl Into<AssetId>) -> Self {
        Self {
            asset_id: asset_id.into(),
            range: TimeRange::Day,
            generation: 0,
            state: DetailState::Loading,
        }
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Select a range (re-selecting the current one reloads it) and return
    /// the ticket the load must carry.
    pub fn select_range(&mut self, range: TimeRange) -> DetailTicket {
        self.range = range;
        self.generation += 1;
        self.state = DetailState::Loading;

        DetailTicket {
            asset_id: self.asset_id.clone(),
            range,
            generation: self.generation,
        }
    }

    /// Apply a finished load. Returns false when a newer selection superseded it.
    pub fn apply(&mut self, ticket: &DetailTicket, chart: Option<DetailChart>) -> bool {
        if ticket.generation != self.generation || ticket.asset_id != self.asset_id {
            debug!(
                asset_id = %ticket.asset_id,
                range = ticket.range.label(),
                "stale detail load dropped"
            );
            return false;
        }

        self.state = match chart {
            Some(chart) => DetailState::Ready(chart),
            None => DetailState::NoData,
        };
        true
    }
}

pub struct DetailLoader<G> {
    gateway: Arc<G>,
    cache: Arc<SeriesCache>,
    timeout: Duration,
}

impl<G: MarketDataGateway> DetailLoader<G> {
    pub fn new(gateway: Arc<G>, cache: Arc<SeriesCache>, timeout: Duration) -> Self {
        Self {
            gateway,
            cache,
            timeout,
        }
    }

    pub async fn load(&self, ticket: &DetailTicket) -> Option<DetailChart> {
        self.load_at(ticket, common::time::now_secs()).await
    }

    /// Load the chart for `ticket` with an explicit clock. `None` means
    /// "no data": failure, timeout and empty responses alike.
    #[instrument(
        skip(self, ticket),
        fields(asset_id = %ticket.asset_id, range = ticket.range.label()),
        level = "debug"
    )]
    pub async fn load_at(&self, ticket: &DetailTicket, now_secs: i64) -> Option<DetailChart> {
        let window = ticket.range.window(now_secs);

        if window.is_cacheable() {
            if let Some(series) = self.cache.get_non_empty(&ticket.asset_id) {
                debug!("detail chart served from cache");
                return DetailChart::build(series);
            }
        }

        let result = tokio::time::timeout(
            self.timeout,
            self.gateway.fetch_series(&ticket.asset_id, window),
        )
        .await;

        let series = match result {
            Ok(Ok(series)) => series,
            Ok(Err(e)) => {
                warn!(error = %e, "detail series fetch failed");
                return None;
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "detail series fetch timed out"
                );
                return None;
            }
        };

        if series.is_empty() {
            info!("detail series empty");
            return None;
        }

        let series = if window.is_cacheable() {
            self.cache.put(&ticket.asset_id, series)
        } else {
            Arc::new(series)
        };

        DetailChart::build(series)
    }
}
