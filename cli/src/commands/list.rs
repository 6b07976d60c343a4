use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::Receiver;
use tracing::{info, warn};

use charts::{ChartSink, Delivery, FetchCoordinator, SeriesCache, SlotTable};
use common::logger::warn_if_slow;
use favorites::{FavoritesManager, FavoritesStore};
use listing::{AssetRow, FilterMode, ListState, SeriesListController};
use market::{Asset, AssetId, MarketDataGateway};

use crate::cli::{ListArgs, sort_taps};
use crate::config::AppConfig;
use crate::render::TextSink;

const SPARK_WIDTH: usize = 24;
const LIST_SLOW: Duration = Duration::from_secs(3);

pub async fn run<G, S>(
    gateway: Arc<G>,
    favorites: &FavoritesManager<S>,
    cfg: &AppConfig,
    args: &ListArgs,
) -> anyhow::Result<()>
where
    G: MarketDataGateway,
    S: FavoritesStore,
{
    let favorite_ids = favorites.id_set().await;

    let mut list = SeriesListController::new();
    list.set_favorites(favorite_ids.clone());
    if args.favorites {
        list.set_filter(FilterMode::FavoritesOnly);
    }
    list.set_search(args.search.clone());
    for key in sort_taps(args.sort.into(), args.desc) {
        list.select_sort(key);
    }

    match warn_if_slow("list_assets", LIST_SLOW, gateway.list_assets()).await {
        Ok(assets) => list.set_assets(assets),
        Err(e) => list.listing_failed(e.to_string()),
    }

    if let Some(empty) = list.empty_state() {
        println!("{}", empty.message());
        if let ListState::Failed(reason) = list.state() {
            anyhow::bail!("asset listing failed: {reason}");
        }
        return Ok(());
    }

    let rows = args.rows.max(1);
    let (coordinator, mut deliveries) =
        FetchCoordinator::new(gateway, Arc::new(SeriesCache::new()), cfg.coordinator.clone());
    let mut table = SlotTable::new((0..rows).map(|_| TextSink::new(SPARK_WIDTH)));

    let budget = cfg.coordinator.stagger + cfg.coordinator.fetch_timeout + Duration::from_secs(1);

    let charts = chart_pages(
        &coordinator,
        &mut deliveries,
        &mut table,
        list.visible(),
        args.pages,
        budget,
    )
    .await;

    for (page, (chunk, lines)) in list.visible().chunks(rows).zip(&charts).enumerate() {
        if page > 0 {
            println!();
        }
        for (asset, chart) in chunk.iter().zip(lines) {
            print_row(&AssetRow::from(asset), &favorite_ids, chart);
        }
    }

    info!(
        visible = list.visible().len(),
        cached = coordinator.cache().len(),
        "listing rendered"
    );
    Ok(())
}

/// Bind `assets` to the slot pool one page at a time and collect the chart
/// line each row ended up with. Every page after the first recycles the same
/// slots through `rebind`.
async fn chart_pages<G: MarketDataGateway>(
    coordinator: &Arc<FetchCoordinator<G>>,
    deliveries: &mut Receiver<Delivery>,
    table: &mut SlotTable<TextSink>,
    assets: &[Asset],
    pages: usize,
    budget: Duration,
) -> Vec<Vec<String>> {
    let rows = table.len().max(1);
    let mut out = Vec::new();

    for chunk in assets.chunks(rows).take(pages.max(1)) {
        for (slot_id, asset) in chunk.iter().enumerate() {
            if let Some(slot) = table.get_mut(slot_id) {
                coordinator.rebind(slot, asset.id.clone());
            }
        }

        await_slots(table, deliveries, budget).await;

        let lines = (0..chunk.len())
            .map(|slot_id| {
                table
                    .get(slot_id)
                    .map(|s| s.sink().line().to_string())
                    .unwrap_or_default()
            })
            .collect();
        out.push(lines);
    }

    out
}

/// Apply deliveries until every bound slot has content or `budget` runs out.
async fn await_slots<S: ChartSink>(
    table: &mut SlotTable<S>,
    deliveries: &mut Receiver<Delivery>,
    budget: Duration,
) {
    let deadline = tokio::time::Instant::now() + budget;

    while table.unresolved() > 0 {
        match tokio::time::timeout_at(deadline, deliveries.recv()).await {
            Ok(Some(delivery)) => {
                table.apply(delivery);
            }
            Ok(None) => break,
            Err(_) => {
                warn!(unresolved = table.unresolved(), "sparklines still pending");
                break;
            }
        }
    }
}

fn print_row(row: &AssetRow, favorites: &HashSet<AssetId>, chart: &str) {
    let star = if favorites.contains(&row.id) { "★" } else { " " };
    let name: String = row.name.chars().take(18).collect();

    println!(
        "{:>4} {star} {:<6} {:<18} {:>14} {:>9} {} {:>16}  {chart}",
        format!("#{}", row.rank),
        row.symbol,
        name,
        row.price,
        row.change,
        row.trend.arrow(),
        row.market_cap,
    );
}
