use anyhow::Context;
use clap::{Parser, ValueEnum};
use marketsense_core::domain::outlook::UserRole;
use marketsense_core::error::PipelineError;
use marketsense_core::ingest::provider::{MarketDataProvider, YahooChartProvider};
use marketsense_core::ingest::types::FetchRequest;
use marketsense_core::sentiment::feed::StaticHeadlines;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    RetailInvestor,
    Analyst,
    InstitutionalUser,
}

impl From<RoleArg> for UserRole {
    fn from(r: RoleArg) -> Self {
        match r {
            RoleArg::RetailInvestor => UserRole::RetailInvestor,
            RoleArg::Analyst => UserRole::Analyst,
            RoleArg::InstitutionalUser => UserRole::InstitutionalUser,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "marketsense_worker")]
struct Args {
    /// Index or ticker symbol. Defaults to MARKETSENSE_SYMBOL or ^NSEI.
    #[arg(long)]
    symbol: Option<String>,

    /// Lookback period (e.g. 1y, 5y, max).
    #[arg(long)]
    period: Option<String>,

    /// Sampling interval (1d, 1wk, 1mo...).
    #[arg(long)]
    interval: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,

    #[arg(long, value_enum, default_value_t = RoleArg::RetailInvestor)]
    role: RoleArg,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    let settings = marketsense_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let request = FetchRequest::try_new(
        args.symbol.as_deref().unwrap_or(&settings.symbol),
        args.period.as_deref().unwrap_or(&settings.period),
        args.interval.as_deref().unwrap_or(&settings.interval),
    )?;

    let provider = YahooChartProvider::from_settings(&settings)?;
    let feed = StaticHeadlines::from_config(settings.headlines.clone());

    tracing::info!(
        symbol = %request.symbol,
        period = %request.period,
        interval = %request.interval,
        provider = provider.provider_name(),
        "starting pipeline run"
    );

    let report = match marketsense_core::pipeline::run_pipeline(&provider, &feed, &request).await
    {
        Ok(report) => report,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            if let Some(PipelineError::DataUnavailable { .. }) = err.downcast_ref::<PipelineError>() {
                tracing::error!(symbol = %request.symbol, error = %err, "unable to fetch market data; outlook skipped");
            } else {
                tracing::error!(symbol = %request.symbol, error = %err, "pipeline run failed");
            }
            return Err(err);
        }
    };

    let out = match args.format {
        OutputFormat::Json if args.pretty => {
            serde_json::to_string_pretty(&report).context("serialize report failed")?
        }
        OutputFormat::Json => serde_json::to_string(&report).context("serialize report failed")?,
        OutputFormat::Text => render::render_text(&report, args.role.into()),
    };
    println!("{out}");

    Ok(())
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
