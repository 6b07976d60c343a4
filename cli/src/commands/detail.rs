use std::sync::Arc;

use tracing::warn;

use charts::SeriesCache;
use charts::detail::{DetailLoader, DetailState, DetailView};
use common::logger::annotate_span;
use favorites::{FavoritesManager, FavoritesStore};
use listing::AssetRow;
use market::MarketDataGateway;

use crate::cli::DetailArgs;
use crate::config::AppConfig;
use crate::render::detail_lines;

const CHART_WIDTH: usize = 48;

pub async fn run<G, S>(
    gateway: Arc<G>,
    favorites: &FavoritesManager<S>,
    cfg: &AppConfig,
    args: &DetailArgs,
) -> anyhow::Result<()>
where
    G: MarketDataGateway,
    S: FavoritesStore,
{
    annotate_span(&args.id);

    match gateway.list_assets().await {
        Ok(assets) => match assets.iter().find(|a| a.id == args.id) {
            Some(asset) => {
                let row = AssetRow::from(asset);
                let star = if favorites.is_favorite(&args.id).await { " ★" } else { "" };
                println!("{} ({}){star}", row.name, row.symbol);
                println!("{}  {} {}  {}", row.price, row.change, row.trend.arrow(), row.market_cap);
            }
            None => warn!("asset not in current listing"),
        },
        Err(e) => warn!(error = %e, "listing unavailable, showing chart only"),
    }

    let loader = DetailLoader::new(
        gateway,
        Arc::new(SeriesCache::new()),
        cfg.coordinator.fetch_timeout,
    );

    let mut view = DetailView::new(args.id.clone());
    let ticket = view.select_range(args.range.into());
    let chart = loader.load(&ticket).await;
    view.apply(&ticket, chart);

    println!("{} ({})", view.range().description(), view.range().label());
    match view.state() {
        DetailState::Ready(chart) => {
            for line in detail_lines(chart, CHART_WIDTH) {
                println!("{line}");
            }
        }
        DetailState::NoData => println!("No chart data available"),
        DetailState::Loading => {}
    }

    Ok(())
}
