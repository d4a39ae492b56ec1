use crate::error::PipelineError;
use anyhow::ensure;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Canonical daily series for one symbol: unique, strictly ascending dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    points: Vec<PricePoint>,
}

impl Series {
    pub fn try_new(symbol: impl Into<String>, points: Vec<PricePoint>) -> anyhow::Result<Self> {
        let symbol = symbol.into();
        ensure!(!symbol.trim().is_empty(), "series symbol must be non-empty");

        for pair in points.windows(2) {
            ensure!(
                pair[0].timestamp < pair[1].timestamp,
                "series timestamps must be strictly increasing ({} then {})",
                pair[0].timestamp,
                pair[1].timestamp
            );
        }

        for p in &points {
            ensure!(
                [p.open, p.high, p.low, p.close]
                    .iter()
                    .all(|v| v.is_finite() && *v >= 0.0),
                "price fields must be finite and non-negative at {}",
                p.timestamp
            );
        }

        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.latest().map(|p| p.close)
    }

    /// Last `n` points, oldest first.
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    pub const COARSE: [Granularity; 3] = [
        Granularity::Monthly,
        Granularity::Quarterly,
        Granularity::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Monthly => "Monthly",
            Granularity::Quarterly => "Quarterly",
            Granularity::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Granularity::Daily),
            "monthly" | "m" => Ok(Granularity::Monthly),
            "quarterly" | "q" => Ok(Granularity::Quarterly),
            "yearly" | "y" => Ok(Granularity::Yearly),
            other => anyhow::bail!("unknown granularity: {other}"),
        }
    }
}

/// A series bucketed at one granularity. Each point is labelled with its bucket's period end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResampledSeries {
    pub granularity: Granularity,
    pub points: Vec<PricePoint>,
}

impl ResampledSeries {
    pub fn empty(granularity: Granularity) -> Self {
        Self {
            granularity,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn require_data(&self) -> Result<&[PricePoint], PipelineError> {
        if self.points.is_empty() {
            return Err(PipelineError::NoDataForTimeframe {
                granularity: self.granularity,
            });
        }
        Ok(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(y: i32, m: u32, d: u32, close: f64) -> PricePoint {
        PricePoint {
            timestamp: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1,
        }
    }

    #[test]
    fn rejects_out_of_order_or_duplicate_dates() {
        let dup = vec![point(2024, 1, 2, 1.0), point(2024, 1, 2, 2.0)];
        assert!(Series::try_new("^NSEI", dup).is_err());

        let backwards = vec![point(2024, 1, 3, 1.0), point(2024, 1, 2, 2.0)];
        assert!(Series::try_new("^NSEI", backwards).is_err());
    }

    #[test]
    fn rejects_negative_prices() {
        let mut p = point(2024, 1, 2, 10.0);
        p.low = -1.0;
        assert!(Series::try_new("^NSEI", vec![p]).is_err());
    }

    #[test]
    fn tail_returns_most_recent_points_in_order() {
        let s = Series::try_new(
            "^NSEI",
            vec![
                point(2024, 1, 2, 1.0),
                point(2024, 1, 3, 2.0),
                point(2024, 1, 4, 3.0),
            ],
        )
        .unwrap();

        let closes: Vec<f64> = s.tail(2).iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![2.0, 3.0]);
        assert_eq!(s.tail(10).len(), 3);
        assert_eq!(s.latest_close(), Some(3.0));
    }

    #[test]
    fn parses_granularity_names() {
        assert_eq!("Monthly".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert_eq!(" yearly ".parse::<Granularity>().unwrap(), Granularity::Yearly);
        assert!("weekly".parse::<Granularity>().is_err());
    }

    #[test]
    fn empty_resampled_series_signals_no_data() {
        let r = ResampledSeries::empty(Granularity::Quarterly);
        assert_eq!(
            r.require_data().unwrap_err(),
            PipelineError::NoDataForTimeframe {
                granularity: Granularity::Quarterly
            }
        );
    }
}
