use serde::Serialize;

use super::chain::Chain;
use super::pair::{PriceChange, TokenInfo, TradingPair, TxnWindows};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLevel {
    Medium,
    High,
}

impl SignalLevel {
    pub fn weight(self) -> u32 {
        match self {
            SignalLevel::High => 2,
            SignalLevel::Medium => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSignal {
    pub level: SignalLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub label: RiskLabel,
    pub signals: Vec<RiskSignal>,
}

impl RiskAssessment {
    pub fn none() -> Self {
        Self { label: RiskLabel::Low, signals: Vec::new() }
    }
}

/// Mint and freeze authorities of an SPL token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorityInfo {
    pub mint_authority: Option<String>,
    pub freeze_authority: Option<String>,
}

/// Aggregates over the daily candle window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeSeries {
    pub volume_7d_usd: Option<f64>,
    pub volume_30d_usd: Option<f64>,
    pub volatility_7d_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSignals {
    pub txns: Option<TxnWindows>,
    pub price_change_percent: PriceChange,
    pub liquidity_to_mcap_ratio: Option<f64>,
    pub pool_age_days: Option<f64>,
    pub avg_daily_volume_7d_usd: Option<f64>,
    pub volume_trend_24h_vs_7d_ratio: Option<f64>,
    pub volatility_7d_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub published_at: Option<String>,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartUrls {
    pub dex_url: Option<String>,
    pub embed_url: Option<String>,
}

impl ChartUrls {
    /// DexScreener chart links, only when the pair names both its chain and address.
    pub fn for_pair(pair: Option<&TradingPair>) -> Self {
        let Some(pair) = pair else {
            return Self::default();
        };
        match (pair.chain_id.as_deref(), pair.pair_address.as_deref()) {
            (Some(chain_id), Some(address)) if !chain_id.is_empty() && !address.is_empty() => {
                let dex_url = format!("https://dexscreener.com/{}/{}", chain_id, address);
                Self {
                    embed_url: Some(format!("{}?embed=1&theme=light", dex_url)),
                    dex_url: Some(dex_url),
                }
            }
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPairSummary {
    pub dex_id: Option<String>,
    pub url: Option<String>,
    pub chain_id: Option<String>,
    pub pair_address: Option<String>,
    pub liquidity_usd: f64,
    pub base_token: TokenInfo,
    pub quote_token: TokenInfo,
}

impl From<&TradingPair> for DexPairSummary {
    fn from(pair: &TradingPair) -> Self {
        Self {
            dex_id: pair.dex_id.clone(),
            url: pair.url.clone(),
            chain_id: pair.chain_id.clone(),
            pair_address: pair.pair_address.clone(),
            liquidity_usd: pair.liquidity_usd(),
            base_token: pair.base_token.clone(),
            quote_token: pair.quote_token.clone(),
        }
    }
}

/// Which providers fed this report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFlags {
    pub dex_screener: bool,
    pub holder_scan: bool,
    pub helius: bool,
    pub gecko_terminal: bool,
    pub news: bool,
}

/// The response body handed to the browser. Every key is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub chain: Chain,
    pub mint: String,
    pub price_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub daily_change_percent: Option<f64>,
    pub volume_24h_usd: Option<f64>,
    pub volume_7d_usd: Option<f64>,
    pub volume_30d_usd: Option<f64>,
    pub first_minted_at: Option<String>,
    pub holders: Option<u64>,
    pub mint_authority: Option<String>,
    pub freeze_authority: Option<String>,
    pub dex_pair: Option<DexPairSummary>,
    pub chart: ChartUrls,
    pub risk: RiskAssessment,
    pub market: MarketSignals,
    pub news: Vec<NewsItem>,
    pub sources: SourceFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisBody {
    Report(Box<AnalysisReport>),
    Error(ErrorBody),
}

/// Transport-agnostic outcome of one analysis: an HTTP-style status and a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub status: u16,
    pub body: AnalysisBody,
}

impl AnalysisResponse {
    pub fn ok(report: AnalysisReport) -> Self {
        Self { status: 200, body: AnalysisBody::Report(Box::new(report)) }
    }

    pub fn error(status: u16, error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status,
            body: AnalysisBody::Error(ErrorBody { error: error.into(), details }),
        }
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match &self.body {
            AnalysisBody::Report(report) => Some(report),
            AnalysisBody::Error(_) => None,
        }
    }

    pub fn error_body(&self) -> Option<&ErrorBody> {
        match &self.body {
            AnalysisBody::Error(body) => Some(body),
            AnalysisBody::Report(_) => None,
        }
    }
}
