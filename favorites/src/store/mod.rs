pub mod sqlite_store;

use market::AssetId;

#[async_trait::async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Favorite ids, oldest first.
    async fn load_all(&self) -> anyhow::Result<Vec<AssetId>>;
    async fn save(&self, id: &str) -> anyhow::Result<()>;
    async fn delete(&self, id: &str) -> anyhow::Result<()>;
}
