use std::time::Duration;

use anyhow::Context;

use charts::CoordinatorConfig;
use market::coingecko::client::DEFAULT_BASE_URL;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Market data API root.
    pub api_url: String,

    /// Quote currency for prices and market caps.
    pub vs_currency: String,

    /// SQLite connection string of the favorites store.
    pub favorites_db_url: String,

    /// Per-request timeout of the HTTP client.
    pub http_timeout: Duration,

    /// Row-chart fetch coordinator. `fetch_timeout` also bounds detail loads.
    pub coordinator: CoordinatorConfig,

    /// `production` switches logs to JSON.
    pub app_env: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let ms = |key: &str, default: u64| -> anyhow::Result<Duration> {
            match get(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .with_context(|| {
                        format!("{key} must be a whole number of milliseconds, got '{raw}'")
                    }),
                None => Ok(Duration::from_millis(default)),
            }
        };

        let defaults = CoordinatorConfig::default();

        Ok(Self {
            api_url: get("COINGECKO_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            vs_currency: get("VS_CURRENCY").unwrap_or_else(|| "usd".to_string()),
            favorites_db_url: get("FAVORITES_DB_URL")
                .unwrap_or_else(|| "sqlite://favorites.db?mode=rwc".to_string()),
            http_timeout: ms("HTTP_TIMEOUT_MS", 15_000)?,
            coordinator: CoordinatorConfig {
                stagger: ms("SPARKLINE_STAGGER_MS", defaults.stagger.as_millis() as u64)?,
                fetch_timeout: ms(
                    "SPARKLINE_TIMEOUT_MS",
                    defaults.fetch_timeout.as_millis() as u64,
                )?,
                delivery_capacity: defaults.delivery_capacity,
            },
            app_env: get("APP_ENV").unwrap_or_else(|| "development".to_string()),
        })
    }

    pub fn json_logs(&self) -> bool {
        self.app_env == "production"
    }
}
