use crate::domain::series::{PricePoint, Series};
use crate::error::PipelineError;
use crate::ingest::types::RawFrame;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Turns a provider frame into the canonical series.
///
/// Rows without a usable close are dropped, as are rows with negative prices. Missing
/// open/high/low fall back to the close and missing volume counts as zero. For duplicate
/// dates the later row wins.
pub fn normalize_frame(symbol: &str, frame: RawFrame) -> Result<Series, PipelineError> {
    if frame.index.is_empty() {
        return Err(PipelineError::data_unavailable(
            symbol,
            "provider returned no records",
        ));
    }

    let mut fields: BTreeMap<String, &[Option<f64>]> = BTreeMap::new();
    for col in &frame.columns {
        if let Some(name) = col.field_name() {
            fields
                .entry(name.to_ascii_lowercase())
                .or_insert(col.values.as_slice());
        }
    }

    let Some(close) = fields.get("close").copied() else {
        let found: Vec<&str> = frame.columns.iter().filter_map(|c| c.field_name()).collect();
        return Err(PipelineError::data_unavailable(
            symbol,
            format!("'Close' field missing; fields found: {found:?}"),
        ));
    };

    let value_at = |name: &str, i: usize| -> Option<f64> {
        fields
            .get(name)
            .and_then(|col| col.get(i).copied().flatten())
            .filter(|v| v.is_finite())
    };

    let mut by_date: BTreeMap<NaiveDate, PricePoint> = BTreeMap::new();
    let mut missing_close: usize = 0;
    let mut negative: usize = 0;

    for (i, &timestamp) in frame.index.iter().enumerate() {
        let Some(c) = close.get(i).copied().flatten().filter(|v| v.is_finite()) else {
            missing_close += 1;
            continue;
        };

        let point = PricePoint {
            timestamp,
            open: value_at("open", i).unwrap_or(c),
            high: value_at("high", i).unwrap_or(c),
            low: value_at("low", i).unwrap_or(c),
            close: c,
            volume: value_at("volume", i)
                .filter(|v| *v >= 0.0)
                .map(|v| v.round() as u64)
                .unwrap_or(0),
        };

        if [point.open, point.high, point.low, point.close]
            .iter()
            .any(|v| *v < 0.0)
        {
            negative += 1;
            continue;
        }

        by_date.insert(timestamp, point);
    }

    if negative > 0 {
        tracing::warn!(symbol, negative, "dropped rows with negative prices");
    }
    if missing_close > 0 {
        tracing::debug!(symbol, missing_close, "dropped rows without a close");
    }

    if by_date.is_empty() {
        return Err(PipelineError::data_unavailable(
            symbol,
            format!(
                "no usable rows among {} provider records",
                frame.index.len()
            ),
        ));
    }

    Series::try_new(symbol, by_date.into_values().collect())
        .map_err(|err| PipelineError::data_unavailable(symbol, format!("{err:#}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::RawColumn;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn frame(index: Vec<NaiveDate>, cols: Vec<RawColumn>) -> RawFrame {
        RawFrame {
            index,
            columns: cols,
        }
    }

    #[test]
    fn zero_records_is_data_unavailable() {
        let err = normalize_frame("^NSEI", RawFrame::default()).unwrap_err();
        assert!(matches!(err, PipelineError::DataUnavailable { .. }));
    }

    #[test]
    fn missing_close_field_is_data_unavailable() {
        let f = frame(
            vec![d(1, 2)],
            vec![
                RawColumn::new(&["Open", "^NSEI"], vec![Some(1.0)]),
                RawColumn::new(&["Adj Close", "^NSEI"], vec![Some(1.0)]),
            ],
        );
        let err = normalize_frame("^NSEI", f).unwrap_err();
        match err {
            PipelineError::DataUnavailable { symbol, detail } => {
                assert_eq!(symbol, "^NSEI");
                assert!(detail.contains("Close"), "{detail}");
                assert!(detail.contains("Adj Close"), "{detail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn collapses_multi_level_labels_and_matches_case_insensitively() {
        let f = frame(
            vec![d(1, 2), d(1, 3)],
            vec![
                RawColumn::new(&["OPEN", "^NSEI"], vec![Some(10.0), Some(11.0)]),
                RawColumn::new(&["high", "^NSEI"], vec![Some(12.0), Some(13.0)]),
                RawColumn::new(&["Low", "^NSEI"], vec![Some(9.0), Some(10.0)]),
                RawColumn::new(&["Close", "^NSEI"], vec![Some(11.0), Some(12.5)]),
                RawColumn::new(&["Volume", "^NSEI"], vec![Some(100.0), Some(250.4)]),
            ],
        );
        let s = normalize_frame("^NSEI", f).unwrap();
        assert_eq!(s.len(), 2);
        let last = s.latest().unwrap();
        assert_eq!(last.timestamp, d(1, 3));
        assert_eq!(last.open, 11.0);
        assert_eq!(last.high, 13.0);
        assert_eq!(last.low, 10.0);
        assert_eq!(last.close, 12.5);
        assert_eq!(last.volume, 250);
    }

    #[test]
    fn sorts_dedupes_and_fills_gaps() {
        let f = frame(
            vec![d(1, 4), d(1, 2), d(1, 4), d(1, 3)],
            vec![
                RawColumn::new(&["Close"], vec![Some(4.0), Some(2.0), Some(4.5), None]),
                RawColumn::new(&["Open"], vec![None, Some(1.5), None, Some(3.0)]),
            ],
        );
        let s = normalize_frame("^NSEI", f).unwrap();
        let dates: Vec<NaiveDate> = s.points().iter().map(|p| p.timestamp).collect();
        assert_eq!(dates, vec![d(1, 2), d(1, 4)]);
        assert_eq!(s.points()[0].open, 1.5);
        assert_eq!(s.points()[1].close, 4.5);
        assert_eq!(s.points()[1].open, 4.5);
        assert_eq!(s.points()[1].volume, 0);
    }

    #[test]
    fn all_closes_missing_is_data_unavailable() {
        let f = frame(
            vec![d(1, 2), d(1, 3)],
            vec![RawColumn::new(&["Close"], vec![None, Some(f64::NAN)])],
        );
        assert!(matches!(
            normalize_frame("^NSEI", f),
            Err(PipelineError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn drops_rows_with_negative_prices() {
        let f = frame(
            vec![d(1, 2), d(1, 3)],
            vec![
                RawColumn::new(&["Close"], vec![Some(10.0), Some(11.0)]),
                RawColumn::new(&["Low"], vec![Some(-1.0), Some(10.5)]),
            ],
        );
        let s = normalize_frame("^NSEI", f).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.points()[0].timestamp, d(1, 3));
    }
}
