use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{ensure_success, PairSource, SourceError};
use crate::models::TradingPair;

const BASE_URL: &str = "https://api.dexscreener.com/latest/dex/tokens";

/// DexScreener - pairs for a token address across every DEX it tracks.
pub struct DexScreenerSource {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct DexScreenerResponse {
    pairs: Option<Vec<Value>>,
}

impl DexScreenerSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Pairs that fail to deserialize are dropped one by one; the rest survive.
    fn parse_pairs(body: DexScreenerResponse) -> Vec<TradingPair> {
        body.pairs
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<TradingPair>(raw) {
                Ok(pair) => Some(pair),
                Err(e) => {
                    tracing::debug!("Skipping malformed DexScreener pair: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl PairSource for DexScreenerSource {
    fn name(&self) -> &'static str {
        "DexScreener"
    }

    async fn fetch_pairs(&self, address: &str) -> Result<Vec<TradingPair>, SourceError> {
        let url = format!("{}/{}", BASE_URL, address);

        let resp = self.client.get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(SourceError::network)?;
        let resp = ensure_success(self.name(), resp)?;

        let body: DexScreenerResponse = resp.json()
            .await
            .map_err(SourceError::parse)?;

        let pairs = Self::parse_pairs(body);
        tracing::debug!("DexScreener returned {} pairs for {}", pairs.len(), address);
        Ok(pairs)
    }
}
