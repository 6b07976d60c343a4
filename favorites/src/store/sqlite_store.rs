//! SQLite-backed `FavoritesStore`.
//!
//! One row per favorite asset id, stamped with the time it was added so the
//! list comes back in insertion order.
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::{Row, SqlitePool};

use super::FavoritesStore;
use market::AssetId;

static MIGRATOR: Migrator = sqlx::migrate!("db/migrations");

pub struct SQLiteFavoritesStore {
    pool: SqlitePool,
}

impl SQLiteFavoritesStore {
    /// Wrap an existing pool. The schema must already exist.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `url` and run migrations.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(url).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
        MIGRATOR.run(pool).await?;
        Ok(())
    }
}

#[async_trait]
impl FavoritesStore for SQLiteFavoritesStore {
    async fn load_all(&self) -> anyhow::Result<Vec<AssetId>> {
        let rows = sqlx::query("SELECT id FROM favorites ORDER BY added_at, rowid")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.get::<String, _>("id")).collect())
    }

    /// Saving an existing favorite keeps its original `added_at`.
    async fn save(&self, id: &str) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO favorites (id, added_at) VALUES (?, ?) ON CONFLICT(id) DO NOTHING")
            .bind(id)
            .bind(common::time::now_secs())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM favorites WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
