use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::store::FavoritesStore;
use market::AssetId;

/// In-memory favorites set, written through to a store.
///
/// The set is restored from the store once at construction. Mutations persist
/// first and only then touch memory, so a failed write leaves both unchanged.
pub struct FavoritesManager<S: FavoritesStore> {
    ids: Arc<Mutex<HashSet<AssetId>>>,
    store: Arc<S>,
}

impl<S: FavoritesStore> FavoritesManager<S> {
    pub async fn new(store: Arc<S>) -> anyhow::Result<Self> {
        let manager = Self {
            ids: Arc::new(Mutex::new(HashSet::new())),
            store,
        };

        manager.restore_from_store().await?;
        Ok(manager)
    }

    async fn restore_from_store(&self) -> anyhow::Result<()> {
        let all = self.store.load_all().await?;
        let mut ids = self.ids.lock().await;
        ids.extend(all);
        Ok(())
    }

    pub async fn is_favorite(&self, id: &str) -> bool {
        self.ids.lock().await.contains(id)
    }

    /// Returns `false` if `id` was already a favorite.
    pub async fn add(&self, id: &str) -> anyhow::Result<bool> {
        let mut ids = self.ids.lock().await;
        if ids.contains(id) {
            return Ok(false);
        }

        self.store.save(id).await?;
        ids.insert(id.to_string());
        info!(asset_id = id, "favorite added");
        Ok(true)
    }

    /// Returns `false` if `id` was not a favorite.
    pub async fn remove(&self, id: &str) -> anyhow::Result<bool> {
        let mut ids = self.ids.lock().await;
        if !ids.contains(id) {
            return Ok(false);
        }

        self.store.delete(id).await?;
        ids.remove(id);
        info!(asset_id = id, "favorite removed");
        Ok(true)
    }

    /// Flip membership. Returns the new state.
    pub async fn toggle(&self, id: &str) -> anyhow::Result<bool> {
        if self.remove(id).await? {
            Ok(false)
        } else {
            self.add(id).await?;
            Ok(true)
        }
    }

    /// Snapshot of the set, sorted by id.
    pub async fn all_favorite_ids(&self) -> Vec<AssetId> {
        let ids = self.ids.lock().await;
        let mut out: Vec<AssetId> = ids.iter().cloned().collect();
        out.sort();
        out
    }

    /// Snapshot as a set, for list projection.
    pub async fn id_set(&self) -> HashSet<AssetId> {
        self.ids.lock().await.clone()
    }
}
