use serde_json::Value;

use super::numeric::parse_f64;

/// One daily OHLCV row. Unparseable fields are kept as `NaN` so the
/// aggregation code can skip them field by field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub timestamp: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: f64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self { timestamp, open, high, low, close, volume }
    }

    /// Reads a `[timestamp, open, high, low, close, volume]` row.
    /// A row that is not an array becomes an all-`NaN` candle so it still
    /// occupies its day in the window.
    pub fn from_row(row: &Value) -> Self {
        let cells = row.as_array().map(Vec::as_slice).unwrap_or_default();
        let cell = |i: usize| cells.get(i).and_then(parse_f64).unwrap_or(f64::NAN);
        Self::new(cell(0), cell(1), cell(2), cell(3), cell(4), cell(5))
    }

    /// Intraday range as a percentage of the open, if the open is usable.
    pub fn range_percent(&self) -> Option<f64> {
        if !self.open.is_finite() || self.open <= 0.0 {
            return None;
        }
        let pct = (self.high - self.low) / self.open * 100.0;
        pct.is_finite().then_some(pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_numeric_and_string_cells() {
        let candle = Candle::from_row(&json!([1700000000, "1.0", 1.5, 0.5, 1.2, "1000"]));
        assert_eq!(candle.open, 1.0);
        assert_eq!(candle.volume, 1000.0);
        assert_eq!(candle.range_percent(), Some(100.0));
    }

    #[test]
    fn short_rows_leave_nan() {
        let candle = Candle::from_row(&json!([1700000000, 2.0]));
        assert!(candle.volume.is_nan());
        assert_eq!(candle.range_percent(), None);
    }

    #[test]
    fn non_array_row_is_all_nan() {
        let candle = Candle::from_row(&json!({"open": 1}));
        assert!(candle.timestamp.is_nan());
        assert!(candle.volume.is_nan());
        assert_eq!(candle.range_percent(), None);
    }

    #[test]
    fn zero_open_has_no_range() {
        assert_eq!(Candle::new(0.0, 0.0, 1.0, 0.5, 1.0, 1.0).range_percent(), None);
        assert_eq!(Candle::new(0.0, -1.0, 1.0, 0.5, 1.0, 1.0).range_percent(), None);
    }
}
