use crate::models::TradingPair;

/// Picks the canonical pair: highest USD liquidity, first one wins on ties.
/// Unknown liquidity counts as zero. An empty slice gives `None`.
pub fn select_best_pair(pairs: &[TradingPair]) -> Option<&TradingPair> {
    let (first, rest) = pairs.split_first()?;
    Some(rest.iter().fold(first, |best, pair| {
        if pair.liquidity_usd() > best.liquidity_usd() {
            pair
        } else {
            best
        }
    }))
}
