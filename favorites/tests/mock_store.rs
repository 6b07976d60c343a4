use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use favorites::store::FavoritesStore;
use market::AssetId;

#[derive(Default)]
pub struct InMemoryFavoritesStore {
    pub ids: Arc<Mutex<Vec<AssetId>>>,
    pub fail_writes: AtomicBool,
}

impl InMemoryFavoritesStore {
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl FavoritesStore for InMemoryFavoritesStore {
    async fn load_all(&self) -> anyhow::Result<Vec<AssetId>> {
        Ok(self.ids.lock().await.clone())
    }

    async fn save(&self, id: &str) -> anyhow::Result<()> {
        self.check()?;
        let mut ids = self.ids.lock().await;
        if !ids.iter().any(|x| x == id) {
            ids.push(id.to_string());
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        self.check()?;
        self.ids.lock().await.retain(|x| x != id);
        Ok(())
    }
}
