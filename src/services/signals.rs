//! Risk and market-health signals. Everything here is pure: the same
//! inputs always give the same report fragment.

use chrono::{DateTime, Utc};

use crate::models::numeric::{positive, ratio};
use crate::models::{
    Candle, MarketSignals, RiskAssessment, RiskLabel, RiskSignal, SignalLevel, TradingPair,
    VolumeSeries,
};

/// Holder counts at or below this are flagged.
pub const LOW_HOLDER_COUNT: u64 = 50;
/// Pools with less USD liquidity than this are flagged.
pub const LOW_LIQUIDITY_USD: f64 = 5_000.0;
pub const HIGH_RISK_SCORE: u32 = 4;
pub const MEDIUM_RISK_SCORE: u32 = 2;

const SHORT_WINDOW_DAYS: usize = 7;
const LONG_WINDOW_DAYS: usize = 30;
const MS_PER_DAY: f64 = 86_400_000.0;

pub struct RiskInputs<'a> {
    pub pair: Option<&'a TradingPair>,
    pub holder_count: Option<u64>,
    pub mint_authority: Option<&'a str>,
    pub freeze_authority: Option<&'a str>,
}

fn signal(level: SignalLevel, message: &str) -> RiskSignal {
    RiskSignal { level, message: message.to_string() }
}

pub fn mint_authority_signal() -> RiskSignal {
    signal(SignalLevel::High, "Mint authority is still enabled (token supply can be increased).")
}

pub fn freeze_authority_signal() -> RiskSignal {
    signal(SignalLevel::Medium, "Freeze authority is enabled (accounts can be frozen).")
}

pub fn low_holders_signal() -> RiskSignal {
    signal(SignalLevel::Medium, "Very low holder count (<= 50).")
}

pub fn low_liquidity_signal() -> RiskSignal {
    signal(SignalLevel::Medium, "Low DEX liquidity (< $5k).")
}

pub fn no_pair_signal() -> RiskSignal {
    signal(SignalLevel::High, "No active DEX pair found for this mint.")
}

fn is_present(authority: Option<&str>) -> bool {
    authority.is_some_and(|a| !a.is_empty())
}

pub fn assess_risk(inputs: &RiskInputs<'_>) -> RiskAssessment {
    let mut signals = Vec::new();

    if is_present(inputs.mint_authority) {
        signals.push(mint_authority_signal());
    }
    if is_present(inputs.freeze_authority) {
        signals.push(freeze_authority_signal());
    }
    if inputs.holder_count.is_some_and(|n| n <= LOW_HOLDER_COUNT) {
        signals.push(low_holders_signal());
    }
    match inputs.pair {
        Some(pair) if pair.liquidity_usd() < LOW_LIQUIDITY_USD => signals.push(low_liquidity_signal()),
        Some(_) => {}
        None => signals.push(no_pair_signal()),
    }

    rate(signals)
}

pub fn risk_score(signals: &[RiskSignal]) -> u32 {
    signals.iter().map(|s| s.level.weight()).sum()
}

pub fn label_for_score(score: u32) -> RiskLabel {
    if score >= HIGH_RISK_SCORE {
        RiskLabel::High
    } else if score >= MEDIUM_RISK_SCORE {
        RiskLabel::Medium
    } else {
        RiskLabel::Low
    }
}

/// Labels a signal list by its weighted score.
pub fn rate(signals: Vec<RiskSignal>) -> RiskAssessment {
    let label = label_for_score(risk_score(&signals));
    RiskAssessment { label, signals }
}

/// Mean intraday range of the most recent week, skipping days with no usable open.
pub fn volatility_percent(candles: &[Candle]) -> Option<f64> {
    let ranges: Vec<f64> = candles
        .iter()
        .take(SHORT_WINDOW_DAYS)
        .filter_map(Candle::range_percent)
        .collect();
    if ranges.is_empty() {
        return None;
    }
    Some(ranges.iter().sum::<f64>() / ranges.len() as f64)
}

fn window_volume(candles: &[Candle], days: usize) -> Option<f64> {
    let volumes: Vec<f64> = candles
        .iter()
        .take(days)
        .map(|c| c.volume)
        .filter(|v| v.is_finite())
        .collect();
    (!volumes.is_empty()).then(|| volumes.iter().sum())
}

/// 7/30-day volume and 7-day volatility from newest-first daily candles.
pub fn summarize_candles(candles: &[Candle]) -> VolumeSeries {
    VolumeSeries {
        volume_7d_usd: window_volume(candles, SHORT_WINDOW_DAYS),
        volume_30d_usd: window_volume(candles, LONG_WINDOW_DAYS),
        volatility_7d_percent: volatility_percent(candles),
    }
}

/// Days since the pool was created. Future timestamps clamp to zero.
pub fn pool_age_days(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<f64> {
    let created_at = created_at?;
    let age_ms = (now - created_at).num_milliseconds() as f64;
    Some((age_ms / MS_PER_DAY).max(0.0))
}

pub struct MarketInputs<'a> {
    pub pair: Option<&'a TradingPair>,
    pub market_cap_usd: Option<f64>,
    pub volume_24h_usd: Option<f64>,
    pub volume_7d_usd: Option<f64>,
    pub volatility_7d_percent: Option<f64>,
    pub now: DateTime<Utc>,
}

pub fn market_signals(inputs: &MarketInputs<'_>) -> MarketSignals {
    let pair = inputs.pair;
    let liquidity = pair.and_then(|p| positive(p.liquidity.usd));
    let avg_daily_volume = inputs.volume_7d_usd.map(|v| v / SHORT_WINDOW_DAYS as f64);

    MarketSignals {
        txns: pair.map(|p| p.txns),
        price_change_percent: pair.map(|p| p.price_change).unwrap_or_default(),
        liquidity_to_mcap_ratio: ratio(liquidity, positive(inputs.market_cap_usd)),
        pool_age_days: pool_age_days(pair.and_then(TradingPair::created_at), inputs.now),
        avg_daily_volume_7d_usd: avg_daily_volume,
        volume_trend_24h_vs_7d_ratio: ratio(inputs.volume_24h_usd, avg_daily_volume),
        volatility_7d_percent: inputs.volatility_7d_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pair::Liquidity;
    use crate::models::PriceChange;
    use chrono::{Duration, TimeZone};

    fn pair_with_liquidity(usd: f64) -> TradingPair {
        TradingPair {
            pair_address: Some("pool".into()),
            liquidity: Liquidity { usd: Some(usd) },
            ..Default::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    // ---------------------------------------------------------
    // Risk
    // ---------------------------------------------------------

    #[test]
    fn label_thresholds() {
        assert_eq!(label_for_score(0), RiskLabel::Low);
        assert_eq!(label_for_score(1), RiskLabel::Low);
        assert_eq!(label_for_score(2), RiskLabel::Medium);
        assert_eq!(label_for_score(3), RiskLabel::Medium);
        assert_eq!(label_for_score(4), RiskLabel::High);
        assert_eq!(label_for_score(7), RiskLabel::High);
    }

    #[test]
    fn every_signal_combination_is_labelled_by_score() {
        let all = [
            mint_authority_signal(),
            freeze_authority_signal(),
            low_holders_signal(),
            low_liquidity_signal(),
            no_pair_signal(),
        ];

        for mask in 0u32..32 {
            let signals: Vec<_> = (0..5)
                .filter(|bit| mask & (1 << bit) != 0)
                .map(|bit| all[bit].clone())
                .collect();
            let expected_score: u32 = signals
                .iter()
                .map(|s| if s.level == SignalLevel::High { 2 } else { 1 })
                .sum();
            let expected = if expected_score >= 4 {
                RiskLabel::High
            } else if expected_score >= 2 {
                RiskLabel::Medium
            } else {
                RiskLabel::Low
            };

            let assessment = rate(signals.clone());
            assert_eq!(assessment.label, expected, "mask {mask:05b}");
            assert_eq!(assessment.signals, signals);

            // adding any missing signal never lowers the label
            for bit in 0..5 {
                if mask & (1 << bit) == 0 {
                    let mut more = signals.clone();
                    more.push(all[bit].clone());
                    assert!(rate(more).label >= assessment.label, "mask {mask:05b} + {bit}");
                }
            }
        }
    }

    #[test]
    fn low_liquidity_alone_is_low_risk() {
        let pair = pair_with_liquidity(3_000.0);
        let risk = assess_risk(&RiskInputs {
            pair: Some(&pair),
            holder_count: Some(500),
            mint_authority: None,
            freeze_authority: None,
        });

        assert_eq!(risk.signals, vec![low_liquidity_signal()]);
        assert_eq!(risk_score(&risk.signals), 1);
        assert_eq!(risk.label, RiskLabel::Low);
    }

    #[test]
    fn missing_pair_is_a_high_signal() {
        let risk = assess_risk(&RiskInputs {
            pair: None,
            holder_count: None,
            mint_authority: None,
            freeze_authority: None,
        });
        assert_eq!(risk.signals, vec![no_pair_signal()]);
        assert_eq!(risk.label, RiskLabel::Medium);
    }

    #[test]
    fn authorities_and_holders_stack() {
        let pair = pair_with_liquidity(80_000.0);
        let risk = assess_risk(&RiskInputs {
            pair: Some(&pair),
            holder_count: Some(50),
            mint_authority: Some("MintAuth"),
            freeze_authority: Some("FreezeAuth"),
        });
        assert_eq!(
            risk.signals,
            vec![mint_authority_signal(), freeze_authority_signal(), low_holders_signal()]
        );
        assert_eq!(risk.label, RiskLabel::High);
    }

    #[test]
    fn empty_authority_and_unknown_holders_are_not_flagged() {
        let pair = pair_with_liquidity(5_000.0);
        let risk = assess_risk(&RiskInputs {
            pair: Some(&pair),
            holder_count: None,
            mint_authority: Some(""),
            freeze_authority: None,
        });
        assert!(risk.signals.is_empty());
        assert_eq!(risk.label, RiskLabel::Low);
    }

    // ---------------------------------------------------------
    // Candles
    // ---------------------------------------------------------

    fn synthetic_month() -> Vec<Candle> {
        (0..30)
            .map(|i| {
                let day = i as f64;
                Candle::new(1_700_000_000.0 - day * 86_400.0, 10.0, 11.0, 9.0, 10.5, 100.0 + day)
            })
            .collect()
    }

    #[test]
    fn volume_windows_sum_rows() {
        let candles = synthetic_month();
        let series = summarize_candles(&candles);

        let first_week: f64 = candles[..7].iter().map(|c| c.volume).sum();
        let month: f64 = candles.iter().map(|c| c.volume).sum();
        assert_eq!(series.volume_7d_usd, Some(first_week));
        assert_eq!(series.volume_30d_usd, Some(month));
        assert_eq!(first_week, 721.0);
        assert_eq!(month, 3435.0);
    }

    #[test]
    fn no_candles_no_aggregates() {
        assert_eq!(summarize_candles(&[]), VolumeSeries::default());
    }

    #[test]
    fn non_finite_volumes_are_skipped() {
        let candles = vec![
            Candle::new(3.0, 1.0, 1.0, 1.0, 1.0, f64::NAN),
            Candle::new(2.0, 1.0, 1.0, 1.0, 1.0, 40.0),
        ];
        assert_eq!(summarize_candles(&candles).volume_7d_usd, Some(40.0));
    }

    #[test]
    fn volatility_uses_latest_week_and_valid_opens() {
        let mut candles = vec![
            Candle::new(0.0, 100.0, 110.0, 90.0, 100.0, 1.0), // 20%
            Candle::new(0.0, 0.0, 5.0, 1.0, 1.0, 1.0),        // skipped
            Candle::new(0.0, 50.0, 55.0, 50.0, 52.0, 1.0),    // 10%
            Candle::new(0.0, f64::NAN, 5.0, 1.0, 1.0, 1.0),   // skipped
        ];
        assert_eq!(volatility_percent(&candles), Some(15.0));

        // days beyond the first seven never count
        candles.extend((0..10).map(|_| Candle::new(0.0, 1.0, 100.0, 0.0, 1.0, 1.0)));
        let week = &candles[..7];
        let expected = (20.0 + 10.0 + 3.0 * 10_000.0) / 5.0;
        assert_eq!(volatility_percent(&candles), volatility_percent(week));
        assert_eq!(volatility_percent(&candles), Some(expected));
    }

    #[test]
    fn volatility_without_valid_candles_is_none() {
        let candles = vec![Candle::new(0.0, -1.0, 2.0, 1.0, 1.0, 1.0)];
        assert_eq!(volatility_percent(&candles), None);
    }

    // ---------------------------------------------------------
    // Market signals
    // ---------------------------------------------------------

    #[test]
    fn pool_age_is_never_negative() {
        let created = now() - Duration::hours(36);
        assert_eq!(pool_age_days(Some(created), now()), Some(1.5));

        let future = now() + Duration::days(3);
        assert_eq!(pool_age_days(Some(future), now()), Some(0.0));

        assert_eq!(pool_age_days(None, now()), None);
    }

    fn inputs<'a>(pair: Option<&'a TradingPair>) -> MarketInputs<'a> {
        MarketInputs {
            pair,
            market_cap_usd: None,
            volume_24h_usd: None,
            volume_7d_usd: None,
            volatility_7d_percent: None,
            now: now(),
        }
    }

    #[test]
    fn trend_requires_known_non_zero_week() {
        let base = inputs(None);

        let missing_week = MarketInputs { volume_24h_usd: Some(700.0), ..base };
        assert_eq!(market_signals(&missing_week).volume_trend_24h_vs_7d_ratio, None);

        let zero_week = MarketInputs { volume_24h_usd: Some(700.0), volume_7d_usd: Some(0.0), ..inputs(None) };
        let signals = market_signals(&zero_week);
        assert_eq!(signals.avg_daily_volume_7d_usd, Some(0.0));
        assert_eq!(signals.volume_trend_24h_vs_7d_ratio, None);

        let busy = MarketInputs { volume_24h_usd: Some(700.0), volume_7d_usd: Some(1_400.0), ..inputs(None) };
        let signals = market_signals(&busy);
        assert_eq!(signals.avg_daily_volume_7d_usd, Some(200.0));
        assert_eq!(signals.volume_trend_24h_vs_7d_ratio, Some(3.5));
    }

    #[test]
    fn liquidity_ratio_needs_positive_sides() {
        let pair = pair_with_liquidity(50_000.0);

        let with_cap = MarketInputs { market_cap_usd: Some(1_000_000.0), ..inputs(Some(&pair)) };
        assert_eq!(market_signals(&with_cap).liquidity_to_mcap_ratio, Some(0.05));

        let zero_cap = MarketInputs { market_cap_usd: Some(0.0), ..inputs(Some(&pair)) };
        assert_eq!(market_signals(&zero_cap).liquidity_to_mcap_ratio, None);

        let no_cap = inputs(Some(&pair));
        assert_eq!(market_signals(&no_cap).liquidity_to_mcap_ratio, None);
    }

    #[test]
    fn pair_fields_pass_through_unknowns() {
        let pair = TradingPair {
            price_change: PriceChange { m5: None, h1: Some(0.0), h6: Some(-2.5), h24: None },
            pair_created_at: Some((now() - Duration::days(10)).timestamp_millis() as f64),
            ..Default::default()
        };
        let signals = market_signals(&MarketInputs { volatility_7d_percent: Some(4.2), ..inputs(Some(&pair)) });

        assert_eq!(signals.price_change_percent.m5, None);
        assert_eq!(signals.price_change_percent.h1, Some(0.0));
        assert_eq!(signals.txns, Some(Default::default()));
        assert_eq!(signals.pool_age_days, Some(10.0));
        assert_eq!(signals.volatility_7d_percent, Some(4.2));

        let nothing = market_signals(&inputs(None));
        assert_eq!(nothing.txns, None);
        assert_eq!(nothing.price_change_percent, PriceChange::default());
        assert_eq!(nothing.pool_age_days, None);
    }
}
