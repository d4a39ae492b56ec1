use crate::domain::series::{Granularity, PricePoint, ResampledSeries, Series};
use crate::time::calendar::period_end;

/// Buckets the daily series into calendar periods.
///
/// open = first open, high = max high, low = min low, close = last close, volume = sum.
/// Only periods containing at least one point produce a bucket.
pub fn resample(series: &Series, granularity: Granularity) -> ResampledSeries {
    if granularity == Granularity::Daily {
        return ResampledSeries {
            granularity,
            points: series.points().to_vec(),
        };
    }

    let mut out: Vec<PricePoint> = Vec::new();
    for p in series.points() {
        let label = period_end(p.timestamp, granularity).unwrap_or(p.timestamp);

        match out.last_mut() {
            Some(bucket) if bucket.timestamp == label => {
                bucket.high = bucket.high.max(p.high);
                bucket.low = bucket.low.min(p.low);
                bucket.close = p.close;
                bucket.volume = bucket.volume.saturating_add(p.volume);
            }
            _ => out.push(PricePoint {
                timestamp: label,
                ..*p
            }),
        }
    }

    if out.is_empty() {
        tracing::debug!(symbol = series.symbol(), %granularity, "no buckets for timeframe");
    }

    ResampledSeries {
        granularity,
        points: out,
    }
}

/// Monthly, quarterly and yearly views, in that order.
pub fn resample_all(series: &Series) -> Vec<ResampledSeries> {
    Granularity::COARSE
        .iter()
        .map(|g| resample(series, *g))
        .collect()
}
