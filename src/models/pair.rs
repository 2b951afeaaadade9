use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::numeric::{lenient_f64, lenient_u64, null_as_default, positive};

/// One market pair as reported by DexScreener.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingPair {
    pub dex_id: Option<String>,
    pub url: Option<String>,
    pub chain_id: Option<String>,
    pub pair_address: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_token: TokenInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quote_token: TokenInfo,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_usd: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price_change: PriceChange,
    #[serde(default, deserialize_with = "null_as_default")]
    pub liquidity: Liquidity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volume: VolumeWindows,
    #[serde(default, deserialize_with = "null_as_default")]
    pub txns: TxnWindows,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fdv: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub market_cap: Option<f64>,
    /// Unix milliseconds.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pair_created_at: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub m5: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub h1: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub h6: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Liquidity {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub usd: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct VolumeWindows {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TxnCount {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub buys: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub sells: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TxnWindows {
    pub m5: Option<TxnCount>,
    pub h1: Option<TxnCount>,
    pub h6: Option<TxnCount>,
    pub h24: Option<TxnCount>,
}

impl TradingPair {
    /// Pool liquidity in USD; unknown liquidity counts as none.
    pub fn liquidity_usd(&self) -> f64 {
        self.liquidity.usd.unwrap_or(0.0)
    }

    /// FDV, falling back to market cap. A reported zero survives only when
    /// neither figure is positive.
    pub fn market_cap_usd(&self) -> Option<f64> {
        positive(self.fdv)
            .or(positive(self.market_cap))
            .or(self.fdv)
            .or(self.market_cap)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let millis = self.pair_created_at?;
        Utc.timestamp_millis_opt(millis as i64).single()
    }

    pub fn symbol(&self) -> Option<&str> {
        self.base_token.symbol.as_deref().filter(|s| !s.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.base_token.name.as_deref().filter(|s| !s.is_empty())
    }
}
