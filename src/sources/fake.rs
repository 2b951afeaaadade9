//! In-memory providers for orchestrator and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::*;

/// Counts calls and replays one canned outcome.
pub struct Fake<T> {
    outcome: Result<T, String>,
    configured: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl<T: Clone> Fake<T> {
    pub fn ok(value: T) -> Self {
        Self { outcome: Ok(value), configured: true, calls: AtomicUsize::new(0), queries: Mutex::new(Vec::new()) }
    }

    pub fn failing(err: SourceError) -> Self {
        Self { outcome: Err(err.to_string()), configured: true, calls: AtomicUsize::new(0), queries: Mutex::new(Vec::new()) }
    }

    pub fn unconfigured(default: T) -> Self {
        Self { configured: false, ..Self::ok(default) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Search terms received, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn next(&self) -> Result<T, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(SourceError::Network)
    }
}

#[async_trait]
impl PairSource for Fake<Vec<TradingPair>> {
    fn name(&self) -> &'static str {
        "DexScreener"
    }
    async fn fetch_pairs(&self, _address: &str) -> Result<Vec<TradingPair>, SourceError> {
        self.next()
    }
}

#[async_trait]
impl AuthoritySource for Fake<AuthorityInfo> {
    fn is_configured(&self) -> bool {
        self.configured
    }
    async fn fetch_authorities(&self, _mint: &str) -> Result<AuthorityInfo, SourceError> {
        self.next()
    }
}

#[async_trait]
impl ActivitySource for Fake<Option<DateTime<Utc>>> {
    fn is_configured(&self) -> bool {
        self.configured
    }
    async fn fetch_earliest_activity(&self, _address: &str) -> Result<Option<DateTime<Utc>>, SourceError> {
        self.next()
    }
}

#[async_trait]
impl HolderSource for Fake<Option<u64>> {
    fn is_configured(&self) -> bool {
        self.configured
    }
    async fn fetch_holder_count(&self, _mint: &str) -> Result<Option<u64>, SourceError> {
        self.next()
    }
}

#[async_trait]
impl CandleSource for Fake<Vec<Candle>> {
    async fn fetch_daily_candles(&self, _network: &str, _pool_address: &str) -> Result<Vec<Candle>, SourceError> {
        self.next()
    }
}

#[async_trait]
impl NewsSource for Fake<Vec<NewsItem>> {
    async fn fetch_news(&self, query: &str) -> Result<Vec<NewsItem>, SourceError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.next()
    }
}

#[async_trait]
impl ReferenceMarketSource for Fake<NativeMarket> {
    async fn fetch_native_market(&self, _chain: Chain) -> Result<NativeMarket, SourceError> {
        self.next()
    }
}
