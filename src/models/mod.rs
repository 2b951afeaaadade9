pub mod candle;
pub mod chain;
pub mod numeric;
pub mod pair;
pub mod report;

pub use candle::Candle;
pub use chain::{Chain, ChainFamily};
pub use pair::{PriceChange, TokenInfo, TradingPair, TxnCount, TxnWindows};
pub use report::{
    AnalysisBody, AnalysisReport, AnalysisResponse, AuthorityInfo, ChartUrls, DexPairSummary,
    ErrorBody, MarketSignals, NewsItem, RiskAssessment, RiskLabel, RiskSignal, SignalLevel,
    SourceFlags, VolumeSeries,
};
