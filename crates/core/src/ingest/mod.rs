pub mod normalize;
pub mod provider;
pub mod types;

use crate::domain::series::Series;
use crate::error::PipelineError;
use provider::MarketDataProvider;
use types::FetchRequest;

/// Performs the single provider call of a run and normalizes the result. Not retried.
pub async fn load_series(
    provider: &dyn MarketDataProvider,
    request: &FetchRequest,
) -> Result<Series, PipelineError> {
    let frame = provider.fetch_history(request).await.map_err(|err| {
        tracing::warn!(
            provider = provider.provider_name(),
            symbol = %request.symbol,
            error = %err,
            "market data fetch failed"
        );
        PipelineError::data_unavailable(&request.symbol, format!("{err:#}"))
    })?;

    let records = frame.index.len();
    let series = normalize::normalize_frame(&request.symbol, frame)?;

    tracing::info!(
        provider = provider.provider_name(),
        symbol = %request.symbol,
        period = %request.period,
        interval = %request.interval,
        records,
        points = series.len(),
        "loaded price history"
    );

    Ok(series)
}
