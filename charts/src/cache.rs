use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use market::{AssetId, Series};

/// Process-lifetime map from asset id to its last-24h series.
///
/// Guarantees:
/// - A non-empty series, once stored, is never replaced or evicted.
/// - An empty series may be stored but is replaced by the first non-empty one.
/// - Reads never wait on a fetch; the lock is only held for the map access.
///
/// Constructed explicitly and shared via `Arc`, so tests get isolated instances.
#[derive(Default)]
pub struct SeriesCache {
    map: RwLock<HashMap<AssetId, Arc<Series>>>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Series>> {
        self.map.read().get(id).cloned()
    }

    /// Like `get`, but only returns a series that has points.
    pub fn get_non_empty(&self, id: &str) -> Option<Arc<Series>> {
        self.get(id).filter(|s| !s.is_empty())
    }

    /// Store `series` for `id` unless a non-empty series is already resident.
    ///
    /// Returns the series resident after the call, which is the earlier one
    /// when this write lost.
    pub fn put(&self, id: &str, series: Series) -> Arc<Series> {
        let mut map = self.map.write();

        if let Some(existing) = map.get(id) {
            if !existing.is_empty() {
                debug!(asset_id = %id, "series already cached; write ignored");
                return Arc::clone(existing);
            }
        }

        let stored = Arc::new(series);
        map.insert(id.to_string(), Arc::clone(&stored));
        debug!(asset_id = %id, points = stored.len(), "series cached");
        stored
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}
