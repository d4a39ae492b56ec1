use crate::domain::outlook::{Outlook, SentimentResult};
use crate::domain::series::{Granularity, PricePoint, ResampledSeries, Series};
use crate::error::PipelineError;
use crate::ingest::load_series;
use crate::ingest::provider::MarketDataProvider;
use crate::ingest::types::FetchRequest;
use crate::outlook::{generate_outlook_with, FixedDriftForecaster, Forecaster};
use crate::resample::resample_all;
use crate::sentiment::feed::HeadlineFeed;
use crate::sentiment::lexicon::LexiconPolarity;
use crate::sentiment::score_headlines;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Daily view length shown alongside the coarser timeframes.
pub const DAILY_VIEW_POINTS: usize = 60;

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub request: FetchRequest,
    pub latest_date: NaiveDate,
    pub series_len: usize,
    /// The full loaded series; the Daily view below is only its tail.
    pub series: Series,
    /// Daily (last 60 points), then monthly, quarterly and yearly views.
    pub timeframes: Vec<ResampledSeries>,
    pub headlines: Vec<String>,
    pub sentiment: SentimentResult,
    pub forecaster: &'static str,
    pub outlook: Outlook,
}

impl PipelineReport {
    pub fn timeframe(&self, granularity: Granularity) -> Result<&[PricePoint], PipelineError> {
        self.timeframes
            .iter()
            .find(|t| t.granularity == granularity)
            .map(|t| t.require_data())
            .unwrap_or(Err(PipelineError::NoDataForTimeframe { granularity }))
    }
}

/// One full run: load, then derive. A failed load stops the run before anything else executes.
pub async fn run_pipeline(
    provider: &dyn MarketDataProvider,
    feed: &dyn HeadlineFeed,
    request: &FetchRequest,
) -> anyhow::Result<PipelineReport> {
    let series = load_series(provider, request).await?;
    build_report(request, &series, feed).await
}

/// Derivations over an already loaded series.
pub async fn build_report(
    request: &FetchRequest,
    series: &Series,
    feed: &dyn HeadlineFeed,
) -> anyhow::Result<PipelineReport> {
    let latest = series
        .latest()
        .copied()
        .ok_or_else(|| PipelineError::data_unavailable(series.symbol(), "series is empty"))?;

    let mut timeframes = Vec::with_capacity(4);
    timeframes.push(ResampledSeries {
        granularity: Granularity::Daily,
        points: series.tail(DAILY_VIEW_POINTS).to_vec(),
    });
    timeframes.extend(resample_all(series));

    let headlines = feed
        .headlines()
        .await
        .with_context(|| format!("headline feed '{}' failed", feed.feed_name()))?;
    let sentiment = score_headlines(&LexiconPolarity::new(), &headlines)?;
    let forecaster = FixedDriftForecaster::default();
    let outlook = generate_outlook_with(&forecaster, latest.close, sentiment)?;

    let report = PipelineReport {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        request: request.clone(),
        latest_date: latest.timestamp,
        series_len: series.len(),
        series: series.clone(),
        timeframes,
        headlines,
        sentiment,
        forecaster: forecaster.name(),
        outlook,
    };

    tracing::info!(
        run_id = %report.run_id,
        symbol = %request.symbol,
        latest_date = %report.latest_date,
        latest_close = report.outlook.latest_close,
        predicted_next = report.outlook.predicted_next,
        forecaster = report.forecaster,
        sentiment_score = report.sentiment.score,
        alert_level = ?report.outlook.alert_level,
        "pipeline run complete"
    );

    Ok(report)
}
