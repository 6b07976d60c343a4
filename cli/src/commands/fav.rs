use favorites::{FavoritesManager, FavoritesStore};

use crate::cli::FavCommand;

pub async fn run<S: FavoritesStore>(
    favorites: &FavoritesManager<S>,
    cmd: &FavCommand,
) -> anyhow::Result<()> {
    match cmd {
        FavCommand::Add { id } => {
            if favorites.add(id).await? {
                println!("★ {id} added to favorites");
            } else {
                println!("{id} is already a favorite");
            }
        }
        FavCommand::Remove { id } => {
            if favorites.remove(id).await? {
                println!("{id} removed from favorites");
            } else {
                println!("{id} is not a favorite");
            }
        }
        FavCommand::Toggle { id } => {
            if favorites.toggle(id).await? {
                println!("★ {id} added to favorites");
            } else {
                println!("{id} removed from favorites");
            }
        }
        FavCommand::List => {
            let ids = favorites.all_favorite_ids().await;
            if ids.is_empty() {
                println!("No favorites yet");
            }
            for id in ids {
                println!("★ {id}");
            }
        }
    }

    Ok(())
}
