//! Lexicon polarity scorer for housing and property text.
//!
//! Produces a compound score in `[-1.0, 1.0]` the way valence lexicons do:
//! per-word valences are summed (with short-range negation), then squashed
//! with `sum / sqrt(sum^2 + ALPHA)`.

use hdbwatch_core::Sentiment;

/// Normalization constant for the compound squash.
const ALPHA: f64 = 15.0;

/// Valence multiplier applied to a word preceded by a negator.
const NEGATION_SCALAR: f64 = -0.74;

/// How many preceding tokens are checked for a negator.
const NEGATION_WINDOW: usize = 3;

/// Word valences on a `[-4, 4]` scale. Keys are lowercase single words.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("best", 3.2),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("like", 1.5),
    ("nice", 1.8),
    ("happy", 2.7),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("convenient", 1.8),
    ("accessible", 1.3),
    ("peaceful", 2.2),
    ("quiet", 1.0),
    ("clean", 1.7),
    ("safe", 1.9),
    ("friendly", 2.2),
    ("vibrant", 2.0),
    ("spacious", 1.4),
    ("affordable", 1.5),
    ("recommend", 1.5),
    ("worth", 0.9),
    ("improve", 1.9),
    ("improved", 2.1),
    ("upgrade", 1.5),
    ("boost", 1.7),
    ("growth", 1.6),
    ("benefit", 2.0),
    ("benefits", 1.9),
    ("success", 2.7),
    ("successful", 2.8),
    ("win", 2.8),
    ("wins", 2.7),
    ("award", 2.5),
    ("popular", 1.8),
    ("green", 0.6),
    ("support", 1.7),
    ("helpful", 1.8),
    ("perfect", 2.7),
    ("beautiful", 2.9),
    // Negative signals
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("hate", -2.7),
    ("poor", -2.1),
    ("noisy", -1.6),
    ("crowded", -1.3),
    ("cramped", -1.3),
    ("dirty", -1.9),
    ("unsafe", -2.1),
    ("inconvenient", -1.6),
    ("expensive", -1.1),
    ("disappointed", -2.1),
    ("disappointing", -2.2),
    ("regret", -2.0),
    ("problem", -1.7),
    ("problems", -1.7),
    ("issue", -0.9),
    ("concern", -1.0),
    ("concerns", -1.1),
    ("complaint", -1.5),
    ("delay", -1.3),
    ("delayed", -1.3),
    ("decline", -1.4),
    ("drop", -1.1),
    ("fall", -1.0),
    ("slump", -1.8),
    ("shortage", -1.5),
    ("crisis", -3.1),
    ("cancel", -1.3),
    ("cancelled", -1.5),
    ("fail", -2.3),
    ("failed", -2.3),
    ("risk", -1.1),
    ("fears", -2.0),
    ("dispute", -1.7),
    ("leak", -1.2),
    ("stress", -1.8),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "neither", "nor", "without", "isnt", "wasnt",
    "dont", "doesnt", "didnt", "cant", "cannot", "wont", "aint", "arent",
];

/// A polarity function returning a compound score in `[-1.0, 1.0]`.
pub trait PolarityScorer {
    fn compound(&self, text: &str) -> f64;
}

/// The built-in housing-domain lexicon scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl PolarityScorer for LexiconScorer {
    fn compound(&self, text: &str) -> f64 {
        compound_score(text)
    }
}

/// Score a text string using the domain lexicon.
///
/// Returns `0.0` for empty or unknown text.
#[must_use]
pub fn compound_score(text: &str) -> f64 {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphabetic())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    let mut sum = 0.0_f64;
    for (i, token) in tokens.iter().enumerate() {
        let Some(&(_, valence)) = LEXICON.iter().find(|(w, _)| w == token) else {
            continue;
        };
        let start = i.saturating_sub(NEGATION_WINDOW);
        let negated = tokens[start..i]
            .iter()
            .any(|prev| NEGATORS.contains(&prev.as_str()));
        sum += if negated {
            valence * NEGATION_SCALAR
        } else {
            valence
        };
    }

    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Score and label `text` with the built-in lexicon.
#[must_use]
pub fn analyze_sentiment(text: &str) -> Sentiment {
    score_with(&LexiconScorer, text)
}

/// Score and label `text` with any polarity function.
#[must_use]
pub fn score_with<S: PolarityScorer + ?Sized>(scorer: &S, text: &str) -> Sentiment {
    Sentiment::from_compound(scorer.compound(text))
}
