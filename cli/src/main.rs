mod cli;
mod commands;
mod config;
mod render;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::Instrument;

use cli::{Cli, Command};
use common::logger::{TraceId, init_logger, root_span};
use config::AppConfig;
use favorites::{FavoritesManager, SQLiteFavoritesStore};
use market::coingecko::CoinGeckoClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::from_env()?;

    init_logger("tracker", cfg.json_logs());
    let trace_id = TraceId::default();

    let favorites = open_favorites(&cfg).await?;

    match &cli.command {
        Command::List(args) => {
            let gateway = Arc::new(gateway(&cfg)?);
            commands::list::run(gateway, &favorites, &cfg, args)
                .instrument(root_span("list", &trace_id))
                .await
        }
        Command::Detail(args) => {
            let gateway = Arc::new(gateway(&cfg)?);
            commands::detail::run(gateway, &favorites, &cfg, args)
                .instrument(root_span("detail", &trace_id))
                .await
        }
        Command::Fav(cmd) => {
            commands::fav::run(&favorites, cmd)
                .instrument(root_span("favorites", &trace_id))
                .await
        }
    }
}

fn gateway(cfg: &AppConfig) -> anyhow::Result<CoinGeckoClient> {
    let client = CoinGeckoClient::new(
        cfg.api_url.clone(),
        cfg.vs_currency.clone(),
        cfg.http_timeout,
    )?;
    Ok(client)
}

async fn open_favorites(cfg: &AppConfig) -> anyhow::Result<FavoritesManager<SQLiteFavoritesStore>> {
    let store = SQLiteFavoritesStore::new(&cfg.favorites_db_url)
        .await
        .with_context(|| format!("opening favorites store at {}", cfg.favorites_db_url))?;

    FavoritesManager::new(Arc::new(store)).await
}
