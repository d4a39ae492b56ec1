use anyhow::ensure;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const PERIODS: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];
const INTERVALS: &[&str] = &["1d", "5d", "1wk", "1mo", "3mo"];

/// What to load: one symbol over a lookback period at a sampling interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchRequest {
    pub symbol: String,
    pub period: String,
    pub interval: String,
}

impl FetchRequest {
    pub fn try_new(symbol: &str, period: &str, interval: &str) -> anyhow::Result<Self> {
        let symbol = symbol.trim().to_string();
        ensure!(!symbol.is_empty(), "symbol must be non-empty");

        let period = period.trim().to_ascii_lowercase();
        ensure!(
            PERIODS.contains(&period.as_str()),
            "unsupported lookback period: {period} (expected one of {PERIODS:?})"
        );

        // Intraday intervals would break the one-point-per-date invariant of the series.
        let interval = interval.trim().to_ascii_lowercase();
        ensure!(
            INTERVALS.contains(&interval.as_str()),
            "unsupported sampling interval: {interval} (expected one of {INTERVALS:?})"
        );

        Ok(Self {
            symbol,
            period,
            interval,
        })
    }
}

/// Provider output before normalization: a date index plus labelled value columns.
///
/// A label may carry several levels (field, then ticker), as multi-ticker downloads do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    pub index: Vec<NaiveDate>,
    pub columns: Vec<RawColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub label: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl RawColumn {
    pub fn new(label: &[&str], values: Vec<Option<f64>>) -> Self {
        Self {
            label: label.iter().map(|s| s.to_string()).collect(),
            values,
        }
    }

    /// First non-empty label level, which names the field.
    pub fn field_name(&self) -> Option<&str> {
        self.label
            .iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_request_tokens() {
        let req = FetchRequest::try_new(" ^NSEI ", "5Y", "1D").unwrap();
        assert_eq!(req.symbol, "^NSEI");
        assert_eq!(req.period, "5y");
        assert_eq!(req.interval, "1d");
    }

    #[test]
    fn rejects_intraday_interval_and_unknown_period() {
        assert!(FetchRequest::try_new("^NSEI", "5y", "1h").is_err());
        assert!(FetchRequest::try_new("^NSEI", "7y", "1d").is_err());
        assert!(FetchRequest::try_new("  ", "5y", "1d").is_err());
    }

    #[test]
    fn field_name_uses_first_label_level() {
        let col = RawColumn::new(&["Close", "^NSEI"], vec![]);
        assert_eq!(col.field_name(), Some("Close"));

        let flat = RawColumn::new(&["", "Volume"], vec![]);
        assert_eq!(flat.field_name(), Some("Volume"));
    }
}
