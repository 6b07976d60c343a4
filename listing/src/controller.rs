//! List state holder. Every input change reruns [`project`] and replaces the
//! visible list.

use std::collections::HashSet;

use tracing::{debug, warn};

use market::{Asset, AssetId};

use crate::project::{FilterMode, project};
use crate::sort::{SortDirection, SortKey, SortState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListState {
    #[default]
    Loading,
    Ready,
    /// The last `list_assets` call failed. Assets from an earlier success stay
    /// visible.
    Failed(String),
}

/// Why the visible list is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    Loading,
    LoadFailed(String),
    /// Search text is set and nothing matches.
    NoResults,
    NoFavorites,
    NoAssets,
}

impl EmptyState {
    pub fn message(&self) -> String {
        match self {
            EmptyState::Loading => "Loading...".to_string(),
            EmptyState::LoadFailed(reason) => format!("Failed to load assets: {reason}"),
            EmptyState::NoResults => "No results found".to_string(),
            EmptyState::NoFavorites => "No favorites yet".to_string(),
            EmptyState::NoAssets => "No assets".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SeriesListController {
    assets: Vec<Asset>,
    favorites: HashSet<AssetId>,
    filter: FilterMode,
    search: String,
    sort: SortState,
    state: ListState,
    visible: Vec<Asset>,
}

impl SeriesListController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a fresh listing.
    pub fn set_assets(&mut self, assets: Vec<Asset>) {
        debug!(count = assets.len(), "asset listing replaced");
        self.assets = assets;
        self.state = ListState::Ready;
        self.refresh();
    }

    pub fn listing_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%reason, "asset listing failed");
        self.state = ListState::Failed(reason);
        self.refresh();
    }

    pub fn set_favorites(&mut self, favorites: HashSet<AssetId>) {
        self.favorites = favorites;
        self.refresh();
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
        self.refresh();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.refresh();
    }

    pub fn select_sort(&mut self, key: SortKey) {
        self.sort.select(key);
        self.refresh();
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort.active()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort.direction()
    }

    pub fn visible(&self) -> &[Asset] {
        &self.visible
    }

    /// Asset shown at `index` in the visible list.
    pub fn visible_at(&self, index: usize) -> Option<&Asset> {
        self.visible.get(index)
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.visible.is_empty() {
            return None;
        }
        let state = match &self.state {
            ListState::Loading => EmptyState::Loading,
            ListState::Failed(reason) if self.assets.is_empty() => {
                EmptyState::LoadFailed(reason.clone())
            }
            _ if !self.search.is_empty() => EmptyState::NoResults,
            _ if self.filter == FilterMode::FavoritesOnly => EmptyState::NoFavorites,
            _ => EmptyState::NoAssets,
        };
        Some(state)
    }

    pub fn refresh(&mut self) {
        self.visible = project(
            &self.assets,
            &self.favorites,
            self.filter,
            &self.search,
            self.sort.active(),
            self.sort.direction(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, rank: u32, cap: Option<u64>, price: f64) -> Asset {
        Asset {
            id: id.into(),
            name: id.to_uppercase(),
            symbol: id.into(),
            current_price: price,
            image: String::new(),
            market_cap: cap,
            price_change_percentage_24h: None,
            market_cap_rank: rank,
        }
    }

    fn ids(c: &SeriesListController) -> Vec<&str> {
        c.visible().iter().map(|a| a.id.as_str()).collect()
    }

    fn loaded() -> SeriesListController {
        let mut c = SeriesListController::new();
        c.set_assets(vec![
            asset("btc", 1, Some(500), 60_000.0),
            asset("eth", 2, Some(200), 3_000.0),
        ]);
        c
    }

    #[test]
    fn starts_loading() {
        let c = SeriesListController::new();
        assert_eq!(c.state(), &ListState::Loading);
        assert_eq!(c.empty_state(), Some(EmptyState::Loading));
    }

    #[test]
    fn market_cap_toggle_scenario() {
        let mut c = loaded();
        assert_eq!(ids(&c), vec!["btc", "eth"]);

        c.select_sort(SortKey::MarketCap);
        assert_eq!(ids(&c), vec!["eth", "btc"]);

        c.select_sort(SortKey::MarketCap);
        assert_eq!(ids(&c), vec!["btc", "eth"]);
        assert_eq!(c.sort_direction(), SortDirection::Descending);
    }

    #[test]
    fn search_with_no_match_reports_no_results() {
        let mut c = loaded();
        c.set_search("doge");
        assert!(c.visible().is_empty());
        assert_eq!(c.empty_state(), Some(EmptyState::NoResults));

        c.set_search("");
        assert_eq!(c.visible().len(), 2);
        assert_eq!(c.empty_state(), None);
    }

    #[test]
    fn favorites_filter_follows_membership_changes() {
        let mut c = loaded();
        c.set_filter(FilterMode::FavoritesOnly);
        assert_eq!(c.empty_state(), Some(EmptyState::NoFavorites));

        c.set_favorites(["eth".to_string()].into());
        assert_eq!(ids(&c), vec!["eth"]);
        assert_eq!(c.visible_at(0).map(|a| a.id.as_str()), Some("eth"));
    }

    #[test]
    fn failed_first_listing_is_visible() {
        let mut c = SeriesListController::new();
        c.listing_failed("status 429");
        assert_eq!(c.state(), &ListState::Failed("status 429".into()));
        assert_eq!(c.empty_state(), Some(EmptyState::LoadFailed("status 429".into())));
    }

    #[test]
    fn failed_refresh_keeps_previous_assets() {
        let mut c = loaded();
        c.listing_failed("timeout");
        assert_eq!(ids(&c), vec!["btc", "eth"]);
        assert_eq!(c.empty_state(), None);
    }
}
