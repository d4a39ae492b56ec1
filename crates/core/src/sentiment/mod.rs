pub mod feed;
pub mod lexicon;

use crate::domain::outlook::{SentimentLabel, SentimentResult};
use crate::error::PipelineError;
use lexicon::PolarityEstimator;

/// Mean polarity across headlines. A score of exactly zero is labelled Negative.
///
/// Non-finite estimates count as neutral (0.0).
pub fn score_headlines<S: AsRef<str>>(
    estimator: &dyn PolarityEstimator,
    headlines: &[S],
) -> Result<SentimentResult, PipelineError> {
    if headlines.is_empty() {
        return Err(PipelineError::EmptyHeadlineSet);
    }

    let total: f64 = headlines
        .iter()
        .map(|h| bounded(estimator.polarity(h.as_ref())))
        .sum();
    let score = total / headlines.len() as f64;

    Ok(SentimentResult {
        score,
        label: SentimentLabel::from_score(score),
    })
}

fn bounded(polarity: f64) -> f64 {
    if polarity.is_finite() {
        polarity.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::feed::DEFAULT_HEADLINES;
    use crate::sentiment::lexicon::LexiconPolarity;

    struct Constant(f64);

    impl PolarityEstimator for Constant {
        fn polarity(&self, _text: &str) -> f64 {
            self.0
        }
    }

    #[test]
    fn empty_headlines_are_rejected() {
        let headlines: Vec<String> = vec![];
        let err = score_headlines(&LexiconPolarity::new(), &headlines).unwrap_err();
        assert_eq!(err, PipelineError::EmptyHeadlineSet);
    }

    #[test]
    fn all_neutral_headlines_are_negative() {
        let result = score_headlines(&Constant(0.0), &["a", "b", "c"]).unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn score_is_arithmetic_mean() {
        struct ByText;
        impl PolarityEstimator for ByText {
            fn polarity(&self, text: &str) -> f64 {
                match text {
                    "up" => 0.6,
                    "down" => -0.2,
                    _ => 0.0,
                }
            }
        }

        let result = score_headlines(&ByText, &["up", "down", "flat"]).unwrap();
        assert!((result.score - 0.4 / 3.0).abs() < 1e-12);
        assert_eq!(result.label, SentimentLabel::Positive);
    }

    #[test]
    fn out_of_range_estimates_are_clamped() {
        let result = score_headlines(&Constant(-3.0), &["x"]).unwrap();
        assert_eq!(result.score, -1.0);
    }

    #[test]
    fn non_finite_estimates_count_as_neutral() {
        let result = score_headlines(&Constant(f64::NAN), &["x", "y"]).unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::Negative);

        struct Mixed;
        impl PolarityEstimator for Mixed {
            fn polarity(&self, text: &str) -> f64 {
                match text {
                    "nan" => f64::NAN,
                    "inf" => f64::INFINITY,
                    _ => 0.6,
                }
            }
        }

        let result = score_headlines(&Mixed, &["nan", "inf", "up"]).unwrap();
        assert!(result.score.is_finite());
        assert!((result.score - 0.2).abs() < 1e-12);
        assert_eq!(result.label, SentimentLabel::Positive);
    }

    #[test]
    fn default_headlines_read_positive() {
        let result = score_headlines(&LexiconPolarity::new(), &DEFAULT_HEADLINES).unwrap();
        assert!(result.score > 0.0);
        assert_eq!(result.label, SentimentLabel::Positive);
    }
}
