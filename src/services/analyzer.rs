use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::OptionFuture;
use thiserror::Error;

use super::pair_selector::select_best_pair;
use super::signals::{self, MarketInputs, RiskInputs};
use crate::config::ProviderConfig;
use crate::models::{
    AnalysisReport, AnalysisResponse, Chain, ChainFamily, ChartUrls, DexPairSummary,
    MarketSignals, PriceChange, RiskAssessment, SourceFlags,
};
use crate::sources::coingecko::CoinGeckoClient;
use crate::sources::dexscreener::DexScreenerSource;
use crate::sources::gecko::GeckoTerminal;
use crate::sources::helius::HeliusClient;
use crate::sources::holderscan::HolderScanClient;
use crate::sources::news::{token_query, GoogleNewsClient};
use crate::sources::{
    build_http_client, ActivitySource, AuthoritySource, CandleSource, HolderSource, NewsSource,
    PairSource, ReferenceMarketSource, SourceError,
};

const TOKEN_FAILURE: &str = "Failed to analyze this token right now.";
const NATIVE_FAILURE: &str = "Failed to fetch BTC market data.";
const NATIVE_NEWS_QUERY: &str = "Bitcoin OR BTC";

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{message}")]
    MandatoryUpstream {
        message: &'static str,
        #[source]
        source: SourceError,
    },
}

impl AnalyzeError {
    pub fn status(&self) -> u16 {
        match self {
            AnalyzeError::InvalidInput(_) => 400,
            AnalyzeError::MandatoryUpstream { .. } => 500,
        }
    }
}

impl From<AnalyzeError> for AnalysisResponse {
    fn from(err: AnalyzeError) -> Self {
        let status = err.status();
        match err {
            AnalyzeError::InvalidInput(message) => AnalysisResponse::error(status, message, None),
            AnalyzeError::MandatoryUpstream { message, source } => {
                AnalysisResponse::error(status, message, Some(source.to_string()))
            }
        }
    }
}

/// Every upstream the analyzer talks to.
pub struct Providers {
    pub pairs: Arc<dyn PairSource>,
    pub authorities: Arc<dyn AuthoritySource>,
    pub activity: Arc<dyn ActivitySource>,
    pub holders: Arc<dyn HolderSource>,
    pub candles: Arc<dyn CandleSource>,
    pub news: Arc<dyn NewsSource>,
    pub reference: Arc<dyn ReferenceMarketSource>,
}

impl Providers {
    /// Production clients sharing one HTTP client.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, SourceError> {
        let client = build_http_client(Duration::from_secs(config.timeout_secs))?;
        let helius = Arc::new(HeliusClient::new(client.clone(), config.helius_api_key.clone()));

        Ok(Self {
            pairs: Arc::new(DexScreenerSource::new(client.clone())),
            authorities: helius.clone(),
            activity: helius,
            holders: Arc::new(HolderScanClient::new(client.clone(), config.holderscan_api_key.clone())),
            candles: Arc::new(GeckoTerminal::new(client.clone())),
            news: Arc::new(GoogleNewsClient::new(client.clone())),
            reference: Arc::new(CoinGeckoClient::new(client)),
        })
    }
}

/// Falls back to the default for an optional provider that was skipped or failed.
fn absorb<T: Default>(provider: &str, outcome: Option<Result<T, SourceError>>) -> T {
    match outcome {
        Some(Ok(value)) => value,
        Some(Err(e)) => {
            tracing::warn!("{} unavailable, continuing without it: {}", provider, e);
            T::default()
        }
        None => T::default(),
    }
}

fn iso_instant(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}


/// Turns `(chain, address)` into a report. Shared by every transport.
pub struct Analyzer {
    providers: Providers,
}

impl Analyzer {
    pub fn new(providers: Providers) -> Self {
        Self { providers }
    }

    /// Runs one analysis and maps the outcome to a status and JSON body:
    /// 200 report, 400 bad input, 500 mandatory upstream failure.
    pub async fn analyze(&self, chain: &str, address: &str) -> AnalysisResponse {
        match self.try_analyze(chain, address).await {
            Ok(report) => AnalysisResponse::ok(report),
            Err(e) => {
                match &e {
                    AnalyzeError::InvalidInput(msg) => tracing::debug!("Rejected input: {}", msg),
                    AnalyzeError::MandatoryUpstream { source, .. } => {
                        tracing::error!("Analysis failed for {} {}: {}", chain, address, source)
                    }
                }
                e.into()
            }
        }
    }

    pub async fn try_analyze(&self, chain: &str, address: &str) -> Result<AnalysisReport, AnalyzeError> {
        let parsed = Chain::parse(chain)
            .ok_or_else(|| AnalyzeError::InvalidInput(format!("Unsupported chain: {}", chain.trim())))?;
        let address = address.trim();
        parsed
            .validate_address(address)
            .map_err(|msg| AnalyzeError::InvalidInput(msg.to_string()))?;

        match parsed.family() {
            ChainFamily::Native => self.analyze_native(parsed).await,
            ChainFamily::Solana | ChainFamily::Evm => self.analyze_token(parsed, address).await,
        }
    }

    async fn analyze_native(&self, chain: Chain) -> Result<AnalysisReport, AnalyzeError> {
        let p = &self.providers;
        let (market, news) = tokio::join!(
            p.reference.fetch_native_market(chain),
            p.news.fetch_news(NATIVE_NEWS_QUERY),
        );
        let market = market.map_err(|source| AnalyzeError::MandatoryUpstream { message: NATIVE_FAILURE, source })?;
        let news = absorb("News", Some(news));

        tracing::info!("✓ {} market loaded (price: {:?})", chain, market.price_usd);

        Ok(AnalysisReport {
            chain,
            mint: "BTC".to_string(),
            price_usd: market.price_usd,
            market_cap_usd: market.market_cap_usd,
            daily_change_percent: market.price_change_24h_percent,
            volume_24h_usd: market.volume_24h_usd,
            volume_7d_usd: None,
            volume_30d_usd: None,
            first_minted_at: market.genesis.map(iso_instant),
            holders: None,
            mint_authority: None,
            freeze_authority: None,
            dex_pair: None,
            chart: ChartUrls::default(),
            risk: RiskAssessment::none(),
            market: MarketSignals {
                price_change_percent: PriceChange {
                    h24: market.price_change_24h_percent,
                    ..Default::default()
                },
                ..Default::default()
            },
            news,
            sources: SourceFlags { news: true, ..Default::default() },
        })
    }

    async fn analyze_token(&self, chain: Chain, address: &str) -> Result<AnalysisReport, AnalyzeError> {
        let p = &self.providers;
        let is_solana = chain.is_solana();

        // Independent calls first; Solana-only providers are not called elsewhere.
        let (pairs, holders, authorities, activity) = tokio::join!(
            p.pairs.fetch_pairs(address),
            OptionFuture::from(is_solana.then(|| p.holders.fetch_holder_count(address))),
            OptionFuture::from(is_solana.then(|| p.authorities.fetch_authorities(address))),
            OptionFuture::from(is_solana.then(|| p.activity.fetch_earliest_activity(address))),
        );
        let pairs = pairs.map_err(|source| AnalyzeError::MandatoryUpstream { message: TOKEN_FAILURE, source })?;
        let holders = absorb("HolderScan", holders);
        let authorities = absorb("Helius authorities", authorities);
        let activity = absorb("Helius signatures", activity);

        let best = select_best_pair(&pairs);
        tracing::debug!(
            "{} candidate pairs for {}, selected {:?}",
            pairs.len(),
            address,
            best.and_then(|b| b.pair_address.as_deref())
        );

        // Candles need the selected pool; news needs its symbol and name.
        let pool = best
            .and_then(|b| b.pair_address.as_deref())
            .filter(|a| !a.is_empty());
        let candles = OptionFuture::from(
            chain
                .gecko_network()
                .zip(pool)
                .map(|(network, pool)| p.candles.fetch_daily_candles(network, pool)),
        );
        let query = token_query(
            best.and_then(|b| b.name()),
            best.and_then(|b| b.symbol()),
            address,
        );
        let (candles, news) = tokio::join!(candles, p.news.fetch_news(&query));
        let candles = absorb("GeckoTerminal", candles);
        let news = absorb("News", Some(news));

        let series = signals::summarize_candles(&candles);
        let market_cap_usd = best.and_then(|b| b.market_cap_usd());
        let volume_24h_usd = best.and_then(|b| b.volume.h24);

        let risk = signals::assess_risk(&RiskInputs {
            pair: best,
            holder_count: holders,
            mint_authority: authorities.mint_authority.as_deref(),
            freeze_authority: authorities.freeze_authority.as_deref(),
        });
        let market = signals::market_signals(&MarketInputs {
            pair: best,
            market_cap_usd,
            volume_24h_usd,
            volume_7d_usd: series.volume_7d_usd,
            volatility_7d_percent: series.volatility_7d_percent,
            now: Utc::now(),
        });

        let first_minted_at = activity
            .or_else(|| best.and_then(|b| b.created_at()))
            .map(iso_instant);

        tracing::info!(
            "✓ {} {} analyzed: risk {:?}, {} news, {} candles",
            chain,
            address,
            risk.label,
            news.len(),
            candles.len()
        );

        Ok(AnalysisReport {
            chain,
            mint: address.to_string(),
            price_usd: best.and_then(|b| b.price_usd),
            market_cap_usd,
            daily_change_percent: best.and_then(|b| b.price_change.h24),
            volume_24h_usd,
            volume_7d_usd: series.volume_7d_usd,
            volume_30d_usd: series.volume_30d_usd,
            first_minted_at,
            holders,
            mint_authority: authorities.mint_authority,
            freeze_authority: authorities.freeze_authority,
            dex_pair: best.map(DexPairSummary::from),
            chart: ChartUrls::for_pair(best),
            risk,
            market,
            news,
            sources: SourceFlags {
                dex_screener: true,
                holder_scan: is_solana && p.holders.is_configured(),
                helius: is_solana && p.authorities.is_configured(),
                gecko_terminal: !candles.is_empty(),
                news: true,
            },
        })
    }
}
