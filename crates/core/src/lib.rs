pub mod domain;
pub mod error;
pub mod ingest;
pub mod outlook;
pub mod pipeline;
pub mod resample;
pub mod sentiment;
pub mod time;

pub mod config {
    use crate::ingest::types::FetchRequest;
    use anyhow::Context;

    pub const DEFAULT_SYMBOL: &str = "^NSEI";
    pub const DEFAULT_PERIOD: &str = "5y";
    pub const DEFAULT_INTERVAL: &str = "1d";
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 900;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub symbol: String,
        pub period: String,
        pub interval: String,
        pub headlines: Option<Vec<String>>,
        pub market_data_base_url: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                symbol: env_or("MARKETSENSE_SYMBOL", DEFAULT_SYMBOL),
                period: env_or("MARKETSENSE_PERIOD", DEFAULT_PERIOD),
                interval: env_or("MARKETSENSE_INTERVAL", DEFAULT_INTERVAL),
                headlines: std::env::var("MARKETSENSE_HEADLINES")
                    .ok()
                    .map(|s| parse_headlines(&s))
                    .filter(|v| !v.is_empty()),
                market_data_base_url: std::env::var("MARKET_DATA_BASE_URL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn fetch_request(&self) -> anyhow::Result<FetchRequest> {
            FetchRequest::try_new(&self.symbol, &self.period, &self.interval)
                .context("invalid market data request in settings")
        }
    }

    /// Series cache TTL for the API. Kept out of `Settings` so one-shot runs never read it.
    pub fn cache_ttl_secs_from_env() -> anyhow::Result<u64> {
        parse_cache_ttl(std::env::var("SERIES_CACHE_TTL_SECS").ok().as_deref())
    }

    fn parse_cache_ttl(raw: Option<&str>) -> anyhow::Result<u64> {
        match raw {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .with_context(|| format!("SERIES_CACHE_TTL_SECS must be an integer (got {s})")),
            None => Ok(DEFAULT_CACHE_TTL_SECS),
        }
    }

    fn env_or(key: &str, default: &str) -> String {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Headlines are `|`-separated so that commas can appear inside a headline.
    pub fn parse_headlines(s: &str) -> Vec<String> {
        s.split('|')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn splits_headlines_on_pipes_and_drops_blanks() {
            let parsed = parse_headlines(" Markets rally, again | | Rupee weakens ");
            assert_eq!(parsed, vec!["Markets rally, again", "Rupee weakens"]);
        }

        #[test]
        fn cache_ttl_defaults_and_rejects_garbage() {
            assert_eq!(parse_cache_ttl(None).unwrap(), DEFAULT_CACHE_TTL_SECS);
            assert_eq!(parse_cache_ttl(Some(" 60 ")).unwrap(), 60);
            assert!(parse_cache_ttl(Some("soon")).is_err());
        }

        #[test]
        fn settings_ignore_cache_ttl() {
            std::env::set_var("SERIES_CACHE_TTL_SECS", "not-a-number");
            let settings = Settings::from_env();
            let ttl = cache_ttl_secs_from_env();
            std::env::remove_var("SERIES_CACHE_TTL_SECS");

            assert!(settings.is_ok());
            assert!(ttl.is_err());
        }
    }
}
