use crate::domain::series::Granularity;
use std::fmt;

/// Terminal conditions of a pipeline run. None of them are retried.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The provider returned no records, lacked a close field, or could not be reached.
    DataUnavailable { symbol: String, detail: String },
    /// A resampled view has no buckets. Only the affected view is skipped.
    NoDataForTimeframe { granularity: Granularity },
    EmptyHeadlineSet,
    InvalidPrice { price: f64 },
}

impl PipelineError {
    pub fn data_unavailable(symbol: &str, detail: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbol: symbol.to_string(),
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } => "data_unavailable",
            Self::NoDataForTimeframe { .. } => "no_data_for_timeframe",
            Self::EmptyHeadlineSet => "empty_headline_set",
            Self::InvalidPrice { .. } => "invalid_price",
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataUnavailable { symbol, detail } => {
                write!(f, "market data unavailable for {symbol}: {detail}")
            }
            Self::NoDataForTimeframe { granularity } => {
                write!(f, "no data available for {granularity} view")
            }
            Self::EmptyHeadlineSet => write!(f, "sentiment scoring requires at least one headline"),
            Self::InvalidPrice { price } => {
                write!(f, "latest close must be a positive number (got {price})")
            }
        }
    }
}

impl std::error::Error for PipelineError {}
