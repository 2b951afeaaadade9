use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{ensure_success, CandleSource, SourceError};
use crate::models::Candle;

const BASE_URL: &str = "https://api.geckoterminal.com/api/v2/networks";
/// Days of history requested per pool.
pub const CANDLE_LIMIT: usize = 30;

pub struct GeckoTerminal {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GeckoOhlcvResponse {
    data: Option<GeckoOhlcvData>,
}

#[derive(Debug, Deserialize)]
struct GeckoOhlcvData {
    attributes: Option<GeckoOhlcvAttributes>,
}

#[derive(Debug, Deserialize)]
struct GeckoOhlcvAttributes {
    ohlcv_list: Option<Vec<Value>>,
}

impl GeckoTerminal {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn parse_candles(body: GeckoOhlcvResponse) -> Vec<Candle> {
        body.data
            .and_then(|d| d.attributes)
            .and_then(|a| a.ohlcv_list)
            .unwrap_or_default()
            .iter()
            .take(CANDLE_LIMIT)
            .map(Candle::from_row)
            .collect()
    }
}

#[async_trait]
impl CandleSource for GeckoTerminal {
    async fn fetch_daily_candles(&self, network: &str, pool_address: &str) -> Result<Vec<Candle>, SourceError> {
        let url = format!(
            "{}/{}/pools/{}/ohlcv/day?limit={}",
            BASE_URL, network, pool_address, CANDLE_LIMIT
        );

        let resp = self.client.get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(SourceError::network)?;
        let resp = ensure_success("GeckoTerminal", resp)?;

        let data: GeckoOhlcvResponse = resp.json()
            .await
            .map_err(SourceError::parse)?;

        Ok(Self::parse_candles(data))
    }
}
