use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marketsense_core::domain::outlook::UserRole;
use marketsense_core::domain::series::{Granularity, ResampledSeries};
use marketsense_core::error::PipelineError;
use marketsense_core::ingest::provider::{MarketDataProvider, YahooChartProvider};
use marketsense_core::ingest::types::FetchRequest;
use marketsense_core::pipeline::{self, PipelineReport};
use marketsense_core::resample::resample;
use marketsense_core::sentiment::feed::{HeadlineFeed, StaticHeadlines};

mod cache;

use cache::SeriesCache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = marketsense_core::config::Settings::from_env()?;
    let cache_ttl_secs = marketsense_core::config::cache_ttl_secs_from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let request = settings.fetch_request()?;
    let provider = YahooChartProvider::from_settings(&settings)?;
    let feed = StaticHeadlines::from_config(settings.headlines.clone());

    let state = AppState {
        provider: Arc::new(provider),
        feed: Arc::new(feed),
        request,
        cache: Arc::new(SeriesCache::new(cache_ttl_secs)),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/outlook", get(get_outlook))
        .route("/v1/timeframes/:granularity", get(get_timeframe))
        .route("/v1/cache/invalidate", post(invalidate_cache))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(
        %addr,
        symbol = %settings.symbol,
        cache_ttl_secs,
        "api listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    provider: Arc<dyn MarketDataProvider>,
    feed: Arc<dyn HeadlineFeed>,
    request: FetchRequest,
    cache: Arc<SeriesCache>,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: &'static str,
    message: String,
}

struct ApiFailure(StatusCode, ApiError);

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

impl From<anyhow::Error> for ApiFailure {
    fn from(err: anyhow::Error) -> Self {
        let (status, kind) = match err.downcast_ref::<PipelineError>() {
            Some(e) => (status_for(e), e.kind()),
            None => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        if status.is_server_error() {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "request failed");
        }
        ApiFailure(
            status,
            ApiError {
                error: kind,
                message: format!("{err:#}"),
            },
        )
    }
}

impl From<PipelineError> for ApiFailure {
    fn from(err: PipelineError) -> Self {
        anyhow::Error::new(err).into()
    }
}

fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::DataUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        PipelineError::NoDataForTimeframe { .. } => StatusCode::NOT_FOUND,
        PipelineError::EmptyHeadlineSet => StatusCode::INTERNAL_SERVER_ERROR,
        PipelineError::InvalidPrice { .. } => StatusCode::BAD_GATEWAY,
    }
}

#[derive(Debug, Deserialize)]
struct OutlookQuery {
    #[serde(default)]
    role: UserRole,
}

#[derive(Debug, Serialize)]
struct ApiOutlook {
    role: &'static str,
    alert_message: &'static str,
    report: PipelineReport,
}

async fn get_outlook(
    State(state): State<AppState>,
    Query(q): Query<OutlookQuery>,
) -> Result<Json<ApiOutlook>, ApiFailure> {
    let series = state
        .cache
        .get_or_load(state.provider.as_ref(), &state.request)
        .await?;
    let report = pipeline::build_report(&state.request, &series, state.feed.as_ref()).await?;

    Ok(Json(ApiOutlook {
        role: q.role.label(),
        alert_message: report.outlook.alert_level.message(),
        report,
    }))
}

async fn get_timeframe(
    State(state): State<AppState>,
    Path(granularity): Path<String>,
) -> Result<Json<ResampledSeries>, ApiFailure> {
    let granularity: Granularity = granularity.parse().map_err(|e: anyhow::Error| {
        ApiFailure(
            StatusCode::BAD_REQUEST,
            ApiError {
                error: "bad_request",
                message: e.to_string(),
            },
        )
    })?;

    let series = state
        .cache
        .get_or_load(state.provider.as_ref(), &state.request)
        .await?;

    let view = match granularity {
        Granularity::Daily => ResampledSeries {
            granularity,
            points: series.tail(pipeline::DAILY_VIEW_POINTS).to_vec(),
        },
        g => resample(&series, g),
    };
    view.require_data()?;

    Ok(Json(view))
}

#[derive(Debug, Serialize)]
struct InvalidateResponse {
    dropped: usize,
}

async fn invalidate_cache(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let dropped = state.cache.invalidate().await;
    tracing::info!(dropped, "series cache invalidated");
    Json(InvalidateResponse { dropped })
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &marketsense_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
