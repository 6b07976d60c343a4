pub mod manager;
pub mod store;

pub use manager::FavoritesManager;
pub use store::FavoritesStore;
pub use store::sqlite_store::SQLiteFavoritesStore;
