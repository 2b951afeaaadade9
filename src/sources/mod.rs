pub mod coingecko;
pub mod dexscreener;
pub mod gecko;
pub mod helius;
pub mod holderscan;
pub mod news;

#[cfg(test)]
pub(crate) mod fake;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use thiserror::Error;

use crate::models::{AuthorityInfo, Candle, Chain, NewsItem, TradingPair};

pub use coingecko::NativeMarket;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{provider} error: {status}")]
    Status { provider: &'static str, status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SourceError {
    /// Drops the request URL, which can carry an API key in its query.
    pub fn network(err: reqwest::Error) -> Self {
        SourceError::Network(err.without_url().to_string())
    }

    pub fn parse(err: impl std::fmt::Display) -> Self {
        SourceError::Parse(err.to_string())
    }
}

/// Returns the response when the status is 2xx, otherwise a `Status` error.
pub(crate) fn ensure_success(provider: &'static str, resp: Response) -> Result<Response, SourceError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(SourceError::Status { provider, status: resp.status().as_u16() })
    }
}

/// One client shared by every provider, so they all honour the same timeout.
pub fn build_http_client(timeout: Duration) -> Result<Client, SourceError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("token-analyzer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(SourceError::network)
}

/// All trading pairs known for a token address. Mandatory for token chains.
#[async_trait]
pub trait PairSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_pairs(&self, address: &str) -> Result<Vec<TradingPair>, SourceError>;
}

/// Mint/freeze authorities of a Solana mint.
#[async_trait]
pub trait AuthoritySource: Send + Sync {
    fn is_configured(&self) -> bool;
    async fn fetch_authorities(&self, mint: &str) -> Result<AuthorityInfo, SourceError>;
}

/// Oldest on-chain activity of a Solana address.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    fn is_configured(&self) -> bool;
    async fn fetch_earliest_activity(&self, address: &str) -> Result<Option<DateTime<Utc>>, SourceError>;
}

#[async_trait]
pub trait HolderSource: Send + Sync {
    fn is_configured(&self) -> bool;
    async fn fetch_holder_count(&self, mint: &str) -> Result<Option<u64>, SourceError>;
}

/// Daily candles for a pool, newest first.
#[async_trait]
pub trait CandleSource: Send + Sync {
    async fn fetch_daily_candles(&self, network: &str, pool_address: &str) -> Result<Vec<Candle>, SourceError>;
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_news(&self, query: &str) -> Result<Vec<NewsItem>, SourceError>;
}

/// Market data for a chain's native asset. Mandatory for the native branch.
#[async_trait]
pub trait ReferenceMarketSource: Send + Sync {
    async fn fetch_native_market(&self, chain: Chain) -> Result<NativeMarket, SourceError>;
}
