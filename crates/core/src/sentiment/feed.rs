pub const DEFAULT_HEADLINES: [&str; 3] = [
    "Market shows resilience",
    "NIFTY hits new high",
    "Global stocks rally",
];

/// Source of headlines to score. The scorer does not care where they come from.
#[async_trait::async_trait]
pub trait HeadlineFeed: Send + Sync {
    fn feed_name(&self) -> &'static str;

    async fn headlines(&self) -> anyhow::Result<Vec<String>>;
}

/// A fixed, configured headline list.
#[derive(Debug, Clone)]
pub struct StaticHeadlines {
    headlines: Vec<String>,
}

impl Default for StaticHeadlines {
    fn default() -> Self {
        Self::new(DEFAULT_HEADLINES.iter().map(|s| s.to_string()).collect())
    }
}

impl StaticHeadlines {
    pub fn new(headlines: Vec<String>) -> Self {
        Self { headlines }
    }

    /// Configured headlines, or the built-in list when none are configured.
    pub fn from_config(headlines: Option<Vec<String>>) -> Self {
        headlines.map(Self::new).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl HeadlineFeed for StaticHeadlines {
    fn feed_name(&self) -> &'static str {
        "static"
    }

    async fn headlines(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.headlines.clone())
    }
}
