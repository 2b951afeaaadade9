use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::{ensure_success, ReferenceMarketSource, SourceError};
use crate::models::numeric::lenient_f64;
use crate::models::Chain;

const COINS_URL: &str = "https://api.coingecko.com/api/v3/coins";

/// Market snapshot of a chain's native asset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeMarket {
    pub price_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub price_change_24h_percent: Option<f64>,
    pub volume_24h_usd: Option<f64>,
    pub genesis: Option<DateTime<Utc>>,
}

pub struct CoinGeckoClient {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct CoinResponse {
    #[serde(default)]
    market_data: Option<CoinMarketData>,
    #[serde(default)]
    genesis_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoinMarketData {
    #[serde(default)]
    current_price: Option<UsdQuote>,
    #[serde(default)]
    market_cap: Option<UsdQuote>,
    #[serde(default)]
    total_volume: Option<UsdQuote>,
    #[serde(default, deserialize_with = "lenient_f64")]
    price_change_percentage_24h: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    #[serde(default, deserialize_with = "lenient_f64")]
    usd: Option<f64>,
}

impl CoinGeckoClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn coin_id(chain: Chain) -> Result<&'static str, SourceError> {
        match chain {
            Chain::Bitcoin => Ok("bitcoin"),
            other => Err(SourceError::Parse(format!("no native market for {}", other))),
        }
    }
}

impl From<CoinResponse> for NativeMarket {
    fn from(coin: CoinResponse) -> Self {
        let usd = |q: Option<UsdQuote>| q.and_then(|q| q.usd);
        let (price_usd, market_cap_usd, volume_24h_usd, price_change_24h_percent) = match coin.market_data {
            Some(m) => (usd(m.current_price), usd(m.market_cap), usd(m.total_volume), m.price_change_percentage_24h),
            None => (None, None, None, None),
        };
        let genesis = coin
            .genesis_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());

        Self { price_usd, market_cap_usd, price_change_24h_percent, volume_24h_usd, genesis }
    }
}

#[async_trait]
impl ReferenceMarketSource for CoinGeckoClient {
    async fn fetch_native_market(&self, chain: Chain) -> Result<NativeMarket, SourceError> {
        let url = format!("{}/{}", COINS_URL, Self::coin_id(chain)?);

        let resp = self.client.get(&url)
            .query(&[
                ("localization", "false"),
                ("tickers", "false"),
                ("market_data", "true"),
                ("community_data", "false"),
                ("developer_data", "false"),
                ("sparkline", "false"),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(SourceError::network)?;
        let resp = ensure_success("CoinGecko", resp)?;

        let coin: CoinResponse = resp.json().await.map_err(SourceError::parse)?;
        Ok(coin.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_bitcoin_market_data() {
        let coin: CoinResponse = serde_json::from_value(json!({
            "id": "bitcoin",
            "genesis_date": "2009-01-03",
            "market_data": {
                "current_price": {"usd": 64250.12, "eur": 59000.0},
                "market_cap": {"usd": 1265000000000.0},
                "total_volume": {"usd": 28000000000.0},
                "price_change_percentage_24h": -1.234
            }
        }))
        .unwrap();

        let market = NativeMarket::from(coin);
        assert_eq!(market.price_usd, Some(64250.12));
        assert_eq!(market.volume_24h_usd, Some(28000000000.0));
        assert_eq!(market.price_change_24h_percent, Some(-1.234));
        assert_eq!(market.genesis.unwrap().to_rfc3339(), "2009-01-03T00:00:00+00:00");
    }

    #[test]
    fn missing_sections_become_none() {
        let coin: CoinResponse = serde_json::from_value(json!({"id": "bitcoin", "genesis_date": null})).unwrap();
        assert_eq!(NativeMarket::from(coin), NativeMarket::default());
    }

    #[test]
    fn only_bitcoin_has_a_native_market() {
        assert!(CoinGeckoClient::coin_id(Chain::Bitcoin).is_ok());
        assert!(CoinGeckoClient::coin_id(Chain::Solana).is_err());
    }
}
