use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Strictly positive scores are Positive; zero falls to Negative.
    pub fn from_score(score: f64) -> Self {
        if score > 0.0 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => f.pad("Positive"),
            SentimentLabel::Negative => f.pad("Negative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,
    pub label: SentimentLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    Calm,
    Warning,
}

impl AlertLevel {
    pub fn from_sentiment(sentiment: &SentimentResult) -> Self {
        if sentiment.score > 0.0 {
            AlertLevel::Calm
        } else {
            AlertLevel::Warning
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AlertLevel::Calm => "Market Confidence: High.",
            AlertLevel::Warning => "Volatility Warning: Low sentiment detected.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlook {
    pub latest_close: f64,
    pub predicted_next: f64,
    pub sentiment: SentimentResult,
    pub alert_level: AlertLevel,
}

impl Outlook {
    pub fn change_pct(&self) -> f64 {
        (self.predicted_next / self.latest_close - 1.0) * 100.0
    }
}

/// Viewer role shown next to the dashboard. A label only; nothing is gated on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    #[default]
    RetailInvestor,
    Analyst,
    InstitutionalUser,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::RetailInvestor => "Retail Investor",
            UserRole::Analyst => "Analyst",
            UserRole::InstitutionalUser => "Institutional User",
        }
    }
}
