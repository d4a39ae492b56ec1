use std::collections::HashMap;

/// Maps one piece of text to a polarity in [-1, 1].
pub trait PolarityEstimator: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

// Word polarities for market headlines. Values follow the adjective-lexicon convention:
// mild words sit near ±0.1-0.3, strong words near ±0.7-1.0.
const LEXICON: &[(&str, f64)] = &[
    ("best", 1.0),
    ("great", 0.8),
    ("good", 0.7),
    ("bullish", 0.6),
    ("rally", 0.5),
    ("rallies", 0.5),
    ("surge", 0.5),
    ("surges", 0.5),
    ("soar", 0.6),
    ("soars", 0.6),
    ("optimism", 0.5),
    ("optimistic", 0.5),
    ("strong", 0.433),
    ("gain", 0.4),
    ("gains", 0.4),
    ("profit", 0.4),
    ("profits", 0.4),
    ("boost", 0.4),
    ("upgrade", 0.4),
    ("resilience", 0.4),
    ("resilient", 0.4),
    ("record", 0.3),
    ("recovery", 0.3),
    ("recovers", 0.3),
    ("growth", 0.3),
    ("confidence", 0.3),
    ("beat", 0.3),
    ("beats", 0.3),
    ("positive", 0.227),
    ("rise", 0.2),
    ("rises", 0.2),
    ("stable", 0.2),
    ("high", 0.16),
    ("new", 0.136),
    ("worst", -1.0),
    ("crash", -0.8),
    ("crashes", -0.8),
    ("bad", -0.7),
    ("crisis", -0.7),
    ("plunge", -0.7),
    ("plunges", -0.7),
    ("recession", -0.7),
    ("slump", -0.6),
    ("slumps", -0.6),
    ("tumble", -0.6),
    ("tumbles", -0.6),
    ("bearish", -0.6),
    ("selloff", -0.5),
    ("fear", -0.5),
    ("fears", -0.5),
    ("panic", -0.5),
    ("loss", -0.4),
    ("losses", -0.4),
    ("decline", -0.4),
    ("declines", -0.4),
    ("downgrade", -0.4),
    ("slowdown", -0.4),
    ("weak", -0.375),
    ("weakens", -0.375),
    ("negative", -0.3),
    ("fall", -0.3),
    ("falls", -0.3),
    ("drop", -0.3),
    ("drops", -0.3),
    ("volatile", -0.3),
    ("volatility", -0.3),
    ("uncertain", -0.3),
    ("uncertainty", -0.3),
    ("risk", -0.2),
    ("inflation", -0.2),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("extremely", 1.5),
    ("very", 1.3),
    ("highly", 1.3),
    ("really", 1.2),
    ("somewhat", 0.7),
    ("slightly", 0.5),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "nor", "without"];

/// Bag-of-words polarity: the mean polarity of lexicon words found in the text.
///
/// An intensifier scales the next lexicon word; a negation flips it and halves its weight.
/// Text with no lexicon words scores 0.
#[derive(Debug, Clone)]
pub struct LexiconPolarity {
    words: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconPolarity {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconPolarity {
    pub fn new() -> Self {
        Self {
            words: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }
}

impl PolarityEstimator for LexiconPolarity {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty());

        let mut scale = 1.0;
        let mut negated = false;
        let mut sum = 0.0;
        let mut matched: usize = 0;

        for token in tokens {
            if NEGATIONS.contains(&token) {
                negated = !negated;
                continue;
            }
            if let Some(m) = self.intensifiers.get(token) {
                scale *= m;
                continue;
            }
            let Some(p) = self.words.get(token) else {
                continue;
            };

            let mut v = p * scale;
            if negated {
                v *= -0.5;
            }
            sum += v.clamp(-1.0, 1.0);
            matched += 1;

            scale = 1.0;
            negated = false;
        }

        if matched == 0 {
            return 0.0;
        }
        (sum / matched as f64).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn averages_matched_words() {
        let lex = LexiconPolarity::new();
        assert!(approx(lex.polarity("NIFTY hits new high"), (0.136 + 0.16) / 2.0));
        assert!(approx(lex.polarity("Global stocks rally"), 0.5));
    }

    #[test]
    fn unknown_words_score_zero() {
        let lex = LexiconPolarity::new();
        assert_eq!(lex.polarity("Index closes at 22,000"), 0.0);
        assert_eq!(lex.polarity(""), 0.0);
    }

    #[test]
    fn negation_flips_and_dampens() {
        let lex = LexiconPolarity::new();
        assert!(approx(lex.polarity("not good"), -0.35));
        assert!(approx(lex.polarity("Not a bad session"), 0.35));
    }

    #[test]
    fn intensifier_scales_and_clamps() {
        let lex = LexiconPolarity::new();
        assert!(approx(lex.polarity("very good"), 0.91));
        assert!(approx(lex.polarity("extremely best"), 1.0));
        assert!(approx(lex.polarity("slightly weak"), -0.1875));
    }

    #[test]
    fn scores_stay_in_range() {
        let lex = LexiconPolarity::new();
        for text in [
            "very very very extremely great",
            "extremely extremely worst crash",
            "no no no bad",
        ] {
            let p = lex.polarity(text);
            assert!((-1.0..=1.0).contains(&p), "{text}: {p}");
        }
    }
}
