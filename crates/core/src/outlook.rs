use crate::domain::outlook::{AlertLevel, Outlook, SentimentResult};
use crate::error::PipelineError;

pub const DEFAULT_DRIFT: f64 = 0.005;

/// Next-period price estimate from the latest close.
pub trait Forecaster: Send + Sync {
    fn name(&self) -> &'static str;

    fn predict_next(&self, latest_close: f64) -> f64;
}

/// Placeholder forecast: the latest close moved by a fixed fraction.
#[derive(Debug, Clone, Copy)]
pub struct FixedDriftForecaster {
    drift: f64,
}

impl Default for FixedDriftForecaster {
    fn default() -> Self {
        Self {
            drift: DEFAULT_DRIFT,
        }
    }
}

impl FixedDriftForecaster {
    pub fn new(drift: f64) -> Self {
        Self { drift }
    }
}

impl Forecaster for FixedDriftForecaster {
    fn name(&self) -> &'static str {
        "fixed_drift"
    }

    fn predict_next(&self, latest_close: f64) -> f64 {
        // close + close * drift keeps round inputs exact (20000 -> 20100), unlike close * 1.005.
        latest_close + latest_close * self.drift
    }
}

pub fn generate_outlook(
    latest_close: f64,
    sentiment: SentimentResult,
) -> Result<Outlook, PipelineError> {
    generate_outlook_with(&FixedDriftForecaster::default(), latest_close, sentiment)
}

pub fn generate_outlook_with(
    forecaster: &dyn Forecaster,
    latest_close: f64,
    sentiment: SentimentResult,
) -> Result<Outlook, PipelineError> {
    if !latest_close.is_finite() || latest_close <= 0.0 {
        return Err(PipelineError::InvalidPrice {
            price: latest_close,
        });
    }

    Ok(Outlook {
        latest_close,
        predicted_next: forecaster.predict_next(latest_close),
        alert_level: AlertLevel::from_sentiment(&sentiment),
        sentiment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::outlook::SentimentLabel;

    fn sentiment(score: f64) -> SentimentResult {
        SentimentResult {
            score,
            label: SentimentLabel::from_score(score),
        }
    }

    #[test]
    fn predicts_half_percent_above_close() {
        let outlook = generate_outlook(20000.00, sentiment(0.1)).unwrap();
        assert_eq!(outlook.predicted_next, 20100.00);
        assert_eq!(outlook.latest_close, 20000.00);

        for close in [1.0, 123.45, 22_147.9, 98_765.4321] {
            let o = generate_outlook(close, sentiment(0.1)).unwrap();
            assert!((o.predicted_next - close * 1.005).abs() < 1e-9 * close);
            assert!((o.change_pct() - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn alert_levels_follow_sentiment() {
        let warning = generate_outlook(100.0, sentiment(-0.3)).unwrap();
        assert_eq!(warning.alert_level, AlertLevel::Warning);

        let calm = generate_outlook(100.0, sentiment(0.4)).unwrap();
        assert_eq!(calm.alert_level, AlertLevel::Calm);

        let zero = generate_outlook(100.0, sentiment(0.0)).unwrap();
        assert_eq!(zero.alert_level, AlertLevel::Warning);
    }

    #[test]
    fn rejects_non_positive_prices() {
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = generate_outlook(price, sentiment(0.2)).unwrap_err();
            assert!(matches!(err, PipelineError::InvalidPrice { .. }), "{price}");
        }
    }

    #[test]
    fn forecaster_is_swappable() {
        struct Flat;
        impl Forecaster for Flat {
            fn name(&self) -> &'static str {
                "flat"
            }
            fn predict_next(&self, latest_close: f64) -> f64 {
                latest_close
            }
        }

        let o = generate_outlook_with(&Flat, 50.0, sentiment(0.2)).unwrap();
        assert_eq!(o.predicted_next, 50.0);
        assert_eq!(o.alert_level, AlertLevel::Calm);

        let o = generate_outlook_with(&FixedDriftForecaster::new(-0.01), 200.0, sentiment(0.2))
            .unwrap();
        assert!((o.predicted_next - 198.0).abs() < 1e-9);
    }
}
