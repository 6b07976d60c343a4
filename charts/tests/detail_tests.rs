use std::sync::Arc;
use std::time::Duration;

use charts::SeriesCache;
use charts::detail::{DetailLoader, DetailState, DetailView, TimeRange};
use market::SeriesWindow;

use mock_gateway::{MockGateway, Scripted, series_of};

const NOW: i64 = 1_700_003_600;

type Fixture = (Arc<MockGateway>, Arc<SeriesCache>, DetailLoader<MockGateway>);

fn loader(gateway: MockGateway) -> Fixture {
    let gateway = Arc::new(gateway);
    let cache = Arc::new(SeriesCache::new());
    let loader = DetailLoader::new(
        Arc::clone(&gateway),
        Arc::clone(&cache),
        Duration::from_secs(10),
    );
    (gateway, cache, loader)
}

#[tokio::test(start_paused = true)]
async fn day_range_reuses_row_cache() {
    let (gateway, cache, loader) = loader(MockGateway::new());
    cache.put("btc", series_of(&[10.0, 20.0]));

    let mut view = DetailView::new("btc");
    let ticket = view.select_range(TimeRange::Day);

    let chart = loader.load_at(&ticket, NOW).await;
    assert!(view.apply(&ticket, chart));

    let DetailState::Ready(chart) = view.state() else {
        panic!("expected chart");
    };
    assert_eq!(chart.average, 15.0);
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn day_range_miss_populates_row_cache() {
    let (gateway, cache, loader) = loader(MockGateway::new());

    let mut view = DetailView::new("eth");
    let ticket = view.select_range(TimeRange::Day);
    let chart = loader.load_at(&ticket, NOW).await;

    assert!(chart.is_some());
    assert_eq!(gateway.windows_for("eth"), vec![SeriesWindow::Last24Hours]);
    assert!(cache.get_non_empty("eth").is_some());
}

#[tokio::test(start_paused = true)]
async fn hour_range_fetches_explicit_window_and_is_never_cached() {
    let (gateway, cache, loader) = loader(MockGateway::new());

    let mut view = DetailView::new("sol");
    let ticket = view.select_range(TimeRange::Hour);

    assert!(loader.load_at(&ticket, NOW).await.is_some());
    assert!(loader.load_at(&ticket, NOW).await.is_some());

    assert_eq!(
        gateway.windows_for("sol"),
        vec![
            SeriesWindow::Range { from: NOW - 3_600, to: NOW },
            SeriesWindow::Range { from: NOW - 3_600, to: NOW }
        ]
    );
    assert!(!cache.contains("sol"));
}

#[tokio::test(start_paused = true)]
async fn failure_and_empty_yield_no_data() {
    let (_gateway, cache, loader) = loader(
        MockGateway::new()
            .script("doge", Scripted::Fail)
            .script("shib", Scripted::Points(vec![])),
    );

    for id in ["doge", "shib"] {
        let mut view = DetailView::new(id);
        let ticket = view.select_range(TimeRange::Day);
        let chart = loader.load_at(&ticket, NOW).await;
        assert!(view.apply(&ticket, chart));
        assert!(matches!(view.state(), DetailState::NoData));
        assert!(!cache.contains(id));
    }
}

#[tokio::test(start_paused = true)]
async fn hung_detail_load_times_out() {
    let (_gateway, _cache, loader) = loader(MockGateway::new().script("ada", Scripted::Hang));

    let mut view = DetailView::new("ada");
    let ticket = view.select_range(TimeRange::Hour);
    assert!(loader.load_at(&ticket, NOW).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn superseded_range_selection_is_dropped() {
    let (_gateway, _cache, loader) = loader(MockGateway::new());

    let mut view = DetailView::new("btc");
    let day = view.select_range(TimeRange::Day);
    let hour = view.select_range(TimeRange::Hour);

    let late = loader.load_at(&day, NOW).await;
    assert!(!view.apply(&day, late));
    assert!(matches!(view.state(), DetailState::Loading));

    let current = loader.load_at(&hour, NOW).await;
    assert!(view.apply(&hour, current));
    assert_eq!(view.range(), TimeRange::Hour);
    assert!(matches!(view.state(), DetailState::Ready(_)));
}
