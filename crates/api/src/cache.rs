use chrono::{DateTime, Duration, Utc};
use marketsense_core::domain::series::Series;
use marketsense_core::error::PipelineError;
use marketsense_core::ingest::load_series;
use marketsense_core::ingest::provider::MarketDataProvider;
use marketsense_core::ingest::types::FetchRequest;
use std::collections::HashMap;
use std::sync::Arc;

const MAX_TTL_SECS: u64 = 366 * 24 * 3600;

#[derive(Debug, Clone)]
struct CachedSeries {
    series: Arc<Series>,
    fetched_at: DateTime<Utc>,
}

/// Memoizes loaded series per (symbol, period, interval) for `ttl`.
///
/// Failed loads are not cached, so the next request goes back to the provider.
#[derive(Debug)]
pub struct SeriesCache {
    ttl: Duration,
    entries: tokio::sync::Mutex<HashMap<FetchRequest, CachedSeries>>,
}

impl SeriesCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64),
            entries: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// The map lock is released while the provider is called, so a slow load only
    /// delays requests for its own key. Concurrent cold loads of one key may both
    /// reach the provider; the later result wins.
    pub async fn get_or_load(
        &self,
        provider: &dyn MarketDataProvider,
        request: &FetchRequest,
    ) -> Result<Arc<Series>, PipelineError> {
        if let Some(series) = self.fresh(request).await {
            return Ok(series);
        }

        let fetched_at = Utc::now();
        let series = Arc::new(load_series(provider, request).await?);
        self.entries.lock().await.insert(
            request.clone(),
            CachedSeries {
                series: series.clone(),
                fetched_at,
            },
        );
        Ok(series)
    }

    async fn fresh(&self, request: &FetchRequest) -> Option<Arc<Series>> {
        let guard = self.entries.lock().await;
        let cached = guard.get(request)?;
        (Utc::now() - cached.fetched_at < self.ttl).then(|| cached.series.clone())
    }

    /// Drops every memoized series; returns how many were dropped.
    pub async fn invalidate(&self) -> usize {
        let mut guard = self.entries.lock().await;
        let n = guard.len();
        guard.clear();
        n
    }
}
