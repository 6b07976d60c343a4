use std::sync::Arc;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use favorites::manager::FavoritesManager;
use favorites::store::FavoritesStore;
use favorites::store::sqlite_store::SQLiteFavoritesStore;

/// In-memory databases are per connection, so the pool is pinned to one.
async fn memory_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    SQLiteFavoritesStore::migrate(&pool).await?;
    Ok(pool)
}

#[tokio::test]
async fn test_insert_and_load() -> anyhow::Result<()> {
    let store = SQLiteFavoritesStore::from_pool(memory_pool().await?);

    store.save("bitcoin").await?;
    store.save("ethereum").await?;

    let loaded = store.load_all().await?;
    assert_eq!(loaded, vec!["bitcoin".to_string(), "ethereum".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_save_twice_keeps_one_row() -> anyhow::Result<()> {
    let store = SQLiteFavoritesStore::from_pool(memory_pool().await?);

    store.save("solana").await?;
    store.save("solana").await?;

    assert_eq!(store.load_all().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_delete() -> anyhow::Result<()> {
    let store = SQLiteFavoritesStore::from_pool(memory_pool().await?);

    store.save("bitcoin").await?;
    store.delete("bitcoin").await?;
    store.delete("never-added").await?;

    assert!(store.load_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_migrations_are_rerunnable() -> anyhow::Result<()> {
    let pool = memory_pool().await?;
    SQLiteFavoritesStore::migrate(&pool).await?;

    let store = SQLiteFavoritesStore::from_pool(pool);
    store.save("cardano").await?;
    assert_eq!(store.load_all().await?, vec!["cardano".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_manager_with_real_sqlite() -> anyhow::Result<()> {
    let pool = memory_pool().await?;

    {
        let store = Arc::new(SQLiteFavoritesStore::from_pool(pool.clone()));
        let mgr = FavoritesManager::new(store).await?;
        mgr.add("bitcoin").await?;
        mgr.toggle("ripple").await?;
    }

    let store = Arc::new(SQLiteFavoritesStore::from_pool(pool));
    let restored = FavoritesManager::new(store).await?;
    assert_eq!(restored.all_favorite_ids().await, vec!["bitcoin", "ripple"]);
    Ok(())
}
