use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{ensure_success, HolderSource, SourceError};
use crate::models::numeric::parse_u64;

const BASE_URL: &str = "https://api.holderscan.com/v0/solana/tokens";

/// Field names HolderScan has used for the total, in lookup order.
const COUNT_FIELDS: &[&str] = &["total", "total_holders", "holder_count", "holders", "count"];

pub struct HolderScanClient {
    client: Client,
    api_key: Option<String>,
}

impl HolderScanClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

/// Finds the holder total at the top level or under `data`.
fn parse_holder_count(body: &Value) -> Option<u64> {
    [Some(body), body.get("data")]
        .into_iter()
        .flatten()
        .flat_map(|scope| COUNT_FIELDS.iter().filter_map(move |field| scope.get(*field)))
        .find_map(parse_u64)
}

#[async_trait]
impl HolderSource for HolderScanClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_holder_count(&self, mint: &str) -> Result<Option<u64>, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let url = format!("{}/{}/holders?limit=1", BASE_URL, mint);
        let resp = self.client.get(&url)
            .header("X-API-KEY", api_key)
            .send()
            .await
            .map_err(SourceError::network)?;
        let resp = ensure_success("HolderScan", resp)?;

        let body: Value = resp.json().await.map_err(SourceError::parse)?;
        let count = parse_holder_count(&body);
        if count.is_none() {
            tracing::debug!("HolderScan response for {} has no holder total", mint);
        }
        Ok(count)
    }
}
