use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("json decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid api url: {0}")]
    InvalidUrl(String),

    #[error("invalid response from coingecko: {0}")]
    InvalidResponse(String),
}
