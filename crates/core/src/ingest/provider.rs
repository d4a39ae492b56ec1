use crate::config::Settings;
use crate::ingest::types::{FetchRequest, RawColumn, RawFrame};
use crate::time::calendar::exchange_local_date;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; marketsense/0.1)";

#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_history(&self, request: &FetchRequest) -> Result<RawFrame>;
}

/// Daily bars from the Yahoo Finance v8 chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooChartProvider {
    http: reqwest::Client,
    base_url: String,
}

impl YahooChartProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .market_data_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("MARKET_DATA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let user_agent = std::env::var("MARKET_DATA_USER_AGENT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .context("failed to build market data http client")?;

        Ok(Self { http, base_url })
    }

    fn url(&self, symbol: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("invalid MARKET_DATA_BASE_URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("MARKET_DATA_BASE_URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooChartProvider {
    fn provider_name(&self) -> &'static str {
        "yahoo_chart"
    }

    async fn fetch_history(&self, request: &FetchRequest) -> Result<RawFrame> {
        let url = self.url(&request.symbol)?;

        let res = self
            .http
            .get(url)
            .query(&[
                ("range", request.period.as_str()),
                ("interval", request.interval.as_str()),
                ("events", "div,splits"),
            ])
            .send()
            .await
            .context("market data request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read market data response")?;

        // Yahoo reports unknown symbols as a 404 with a chart.error body; prefer that message.
        let parsed = serde_json::from_str::<ChartResponse>(&text);
        if let Ok(ChartResponse {
            chart: ChartEnvelope {
                error: Some(err), ..
            },
        }) = &parsed
        {
            anyhow::bail!("market data provider error ({}): {}", err.code, err.description);
        }
        if !status.is_success() {
            anyhow::bail!("market data HTTP {status}: {text}");
        }

        let parsed = parsed.context("failed to parse market data chart response")?;
        chart_to_frame(&request.symbol, parsed)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

// Any field may be absent; a missing close is reported by the normalizer, not here.
#[derive(Debug, Clone, Default, Deserialize)]
struct ChartQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

fn chart_to_frame(symbol: &str, resp: ChartResponse) -> Result<RawFrame> {
    let Some(result) = resp.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(RawFrame::default());
    };

    let gmtoffset = result.meta.gmtoffset;
    let index = result
        .timestamp
        .iter()
        .map(|&ts| {
            exchange_local_date(ts, gmtoffset)
                .with_context(|| format!("invalid bar timestamp {ts} (gmtoffset {gmtoffset})"))
        })
        .collect::<Result<Vec<_>>>()?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut columns = Vec::new();
    for (field, values) in [
        ("Open", quote.open),
        ("High", quote.high),
        ("Low", quote.low),
        ("Close", quote.close),
        ("Volume", quote.volume),
    ] {
        if let Some(values) = values {
            columns.push(RawColumn::new(&[field, symbol], values));
        }
    }

    Ok(RawFrame { index, columns })
}
