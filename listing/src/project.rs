//! Visible-list projection.
//!
//! `project` is pure: same inputs, same output, no side effects. It runs on
//! every input change and its result fully replaces the visible list.
//!
//! Pipeline: favorites filter → search → stable sort. Ties keep upstream
//! order in both directions.

use std::collections::HashSet;

use market::{Asset, AssetId};

use crate::sort::{SortDirection, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    FavoritesOnly,
}

pub fn project(
    assets: &[Asset],
    favorites: &HashSet<AssetId>,
    filter: FilterMode,
    search: &str,
    key: SortKey,
    direction: SortDirection,
) -> Vec<Asset> {
    let needle = search.to_lowercase();

    let mut visible: Vec<Asset> = assets
        .iter()
        .filter(|a| match filter {
            FilterMode::All => true,
            FilterMode::FavoritesOnly => favorites.contains(&a.id),
        })
        .filter(|a| needle.is_empty() || matches_search(a, &needle))
        .cloned()
        .collect();

    visible.sort_by(|a, b| key.compare_directed(a, b, direction));
    visible
}

/// Case-insensitive substring match on name or symbol. `needle` is lowercase.
fn matches_search(asset: &Asset, needle: &str) -> bool {
    asset.name.to_lowercase().contains(needle) || asset.symbol.to_lowercase().contains(needle)
}
