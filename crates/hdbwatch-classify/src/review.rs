//! Heuristics for living-experience posts: quality gate, text cleanup,
//! pros/cons extraction and star rating.

use std::sync::LazyLock;

use hdbwatch_core::Sentiment;
use regex::Regex;

use crate::gazetteer::TOWNS;
use crate::relevance::contains_word;
use crate::scorer::PolarityScorer;

const MIN_POST_CHARS: usize = 150;
const MAX_POST_CHARS: usize = 10_000;
const LONG_POST_CHARS: usize = 300;
const MIN_REQUIRED_PHRASES: usize = 2;
const MAX_POINTS: usize = 5;
/// Comments beyond this many are ignored by pros/cons extraction.
const MAX_COMMENTS_SCANNED: usize = 15;

/// Topics that disqualify a post. Matched as whole words.
const BLACKLIST: &[&str] = &[
    // politics
    "opposition", "pap", "election", "ge2025", "ge 2025", "mp", "minister", "voting", "vote",
    "candidate", "party", "rally", "grc", "smc", "wp", "workers party", "workers' party",
    "government", "parliament", "mps",
    // crime and accidents
    "dies", "died", "death", "dead", "killed", "murder", "assault", "stabbed", "fire",
    "evacuated", "accident", "crash", "suicide", "rape", "molest", "abuse", "arrest", "police",
    "scam", "cheat", "fraud",
    // news events
    "breaking", "breaking news", "update", "latest", "just now", "checkpoint", "queue", "delay",
    "closure", "closed", "shutdown", "malfunction",
    // unrelated services
    "blocking", "blocked", "dbs", "posb", "bank", "insurance", "agent", "real estate agent",
    "property agent", "lawyer", "legal", "inheritance", "stadium", "football", "soccer",
    "sports", "match", "game",
    // noise
    "ice cream", "haircut", "massage", "clinic", "tcm", "pet shop", "stray cat", "rat", "bird",
    "animal", "durian", "food court",
];

/// At least two of these must appear. Matched as substrings.
const REQUIRED_PHRASES: &[&str] = &[
    "living in", "live in", "stay in", "staying in", "moved to", "relocate", "bought", "buying",
    "purchase", "worth it", "should i", "advice", "recommend", "thoughts", "opinion", "how is",
    "anyone living", "anyone staying", " vs ", " or ", "better", "worse", "compare",
    "comparison", "pros and cons", "pros cons", "good and bad", "like and dislike",
    "advantages", "disadvantages", "review", "bto", "resale", "flat", "hdb",
];

const EXPERIENCE_MARKERS: &[&str] = &[
    "i live", "i stayed", "we live", "been living", "moved", "grew up", "living here",
    "staying here",
];

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+").expect("valid regex"));
static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,!?-]").expect("valid regex"));

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("valid regex"))
        .collect()
}

static PRO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"pros?[:\s]+([^.!?\n]{20,200})",
        r"good[:\s]+([^.!?\n]{20,200})",
        r"(?:love|like)[:\s]+([^.!?\n]{20,200})",
        r"advantages?[:\s]+([^.!?\n]{20,200})",
        r"convenient[^.!?\n]{15,150}",
        r"accessible[^.!?\n]{15,150}",
    ])
});

static CON_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"cons?[:\s]+([^.!?\n]{20,200})",
        r"bad[:\s]+([^.!?\n]{20,200})",
        r"(?:hate|dislike)[:\s]+([^.!?\n]{20,200})",
        r"disadvantages?[:\s]+([^.!?\n]{20,200})",
        r"far from[^.!?\n]{15,150}",
        r"no (?:mrt|mall)[^.!?\n]{15,150}",
    ])
});

/// Whether a post reads like a genuine living-experience review.
///
/// Requires a length within bounds, a town mention, two or more review
/// phrases, no blacklisted topic, and either a first-person experience
/// marker or a longer body.
#[must_use]
pub fn is_quality_review(title: &str, body: &str) -> bool {
    let text = format!("{title} {body}").to_lowercase();
    let len = text.chars().count();
    if !(MIN_POST_CHARS..=MAX_POST_CHARS).contains(&len) {
        return false;
    }

    let upper = text.to_uppercase();
    if !TOWNS.iter().any(|town| upper.contains(town)) {
        return false;
    }

    let phrase_hits = REQUIRED_PHRASES
        .iter()
        .filter(|p| text.contains(*p))
        .count();
    if phrase_hits < MIN_REQUIRED_PHRASES {
        return false;
    }

    if BLACKLIST.iter().any(|kw| contains_word(&text, kw)) {
        return false;
    }

    EXPERIENCE_MARKERS.iter().any(|m| text.contains(m)) || len > LONG_POST_CHARS
}

/// Strip links and symbols, keeping words and basic punctuation.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let without_urls = URL_RE.replace_all(text, "");
    SYMBOL_RE.replace_all(&without_urls, "").trim().to_string()
}

fn collect_points(patterns: &[Regex], text: &str) -> Vec<String> {
    let mut points: Vec<String> = Vec::new();
    for re in patterns {
        for caps in re.captures_iter(text) {
            let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
                continue;
            };
            let point = m.as_str().trim();
            let len = point.chars().count();
            if (20..=200).contains(&len) && !points.iter().any(|p| p == point) {
                points.push(point.to_string());
            }
        }
    }
    points.truncate(MAX_POINTS);
    points
}

/// Pros and cons phrases from a post and its first comments, up to five each.
#[must_use]
pub fn extract_pros_cons(text: &str, comments: &[String]) -> (Vec<String>, Vec<String>) {
    let scanned: Vec<&str> = comments
        .iter()
        .take(MAX_COMMENTS_SCANNED)
        .map(String::as_str)
        .collect();
    let full = format!("{text} {}", scanned.join(" ")).to_lowercase();
    (
        collect_points(&PRO_PATTERNS, &full),
        collect_points(&CON_PATTERNS, &full),
    )
}

/// Map a compound score to a 1..=5 star rating.
#[must_use]
pub fn rating_from_compound(compound: f64) -> u8 {
    if compound >= 0.6 {
        5
    } else if compound >= 0.3 {
        4
    } else if compound >= -0.1 {
        3
    } else if compound >= -0.4 {
        2
    } else {
        1
    }
}

/// Ranking score: half the number of pros and cons plus sentiment strength.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn review_quality_score(pros: usize, cons: usize, compound: f64) -> f64 {
    let raw = (pros + cons) as f64 / 2.0 + compound.abs();
    (raw * 100.0).round() / 100.0
}

/// Everything derived from a review's text.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewAssessment {
    pub sentiment: Sentiment,
    pub rating: u8,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub quality_score: f64,
}

/// Score a post's text and mine its comments for pros and cons.
#[must_use]
pub fn assess_review<S: PolarityScorer + ?Sized>(
    scorer: &S,
    text: &str,
    comments: &[String],
) -> ReviewAssessment {
    let compound = scorer.compound(text);
    let compound = if compound.is_finite() {
        compound.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let (pros, cons) = extract_pros_cons(text, comments);
    let quality_score = review_quality_score(pros.len(), cons.len(), compound);
    ReviewAssessment {
        sentiment: Sentiment::from_compound(compound),
        rating: rating_from_compound(compound),
        pros,
        cons,
        quality_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::LexiconScorer;

    const GOOD_POST_TITLE: &str = "Living in Punggol for 3 years, worth it?";
    const GOOD_POST_BODY: &str = "I live near the waterway with my family. \
        We bought a resale flat after comparing it with Sengkang. \
        Pros: the park connector and waterway walks are lovely on weekends. \
        Cons: the LRT gets packed during the morning peak every single day.";

    #[test]
    fn genuine_post_passes_gate() {
        assert!(is_quality_review(GOOD_POST_TITLE, GOOD_POST_BODY));
    }

    #[test]
    fn short_post_fails_gate() {
        assert!(!is_quality_review("Living in Punggol", "worth it?"));
    }

    #[test]
    fn post_without_town_fails_gate() {
        let body = GOOD_POST_BODY
            .replace("Sengkang", "the next town")
            .replace("Punggol", "here");
        assert!(!is_quality_review("Living here for 3 years, worth it?", &body));
    }

    #[test]
    fn blacklisted_topic_fails_gate() {
        let body = format!("{GOOD_POST_BODY} The MP visited our block last week.");
        assert!(!is_quality_review(GOOD_POST_TITLE, &body));
    }

    #[test]
    fn blacklist_matches_whole_words_only() {
        // "rating" and "separate" contain blacklisted fragments
        let body = format!("{GOOD_POST_BODY} My rating is a separate matter.");
        assert!(is_quality_review(GOOD_POST_TITLE, &body));
    }

    #[test]
    fn clean_text_strips_links_and_symbols() {
        assert_eq!(
            clean_text("See https://example.com/x ★ great place!! #hdb "),
            "See   great place!! hdb"
        );
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn pros_and_cons_are_extracted() {
        let (pros, cons) = extract_pros_cons(GOOD_POST_BODY, &[]);
        assert_eq!(
            pros,
            vec!["the park connector and waterway walks are lovely on weekends"]
        );
        assert_eq!(
            cons,
            vec!["the lrt gets packed during the morning peak every single day"]
        );
    }

    #[test]
    fn comments_feed_pros_and_cons() {
        let comments = vec!["Far from the city centre but we got used to it".to_string()];
        let (_, cons) = extract_pros_cons("short", &comments);
        assert_eq!(cons, vec!["far from the city centre but we got used to it"]);
    }

    #[test]
    fn points_are_capped_at_five() {
        let text = (0..8)
            .map(|i| format!("pros: point number {i} is about the lovely park nearby."))
            .collect::<String>();
        let (pros, _) = extract_pros_cons(&text, &[]);
        assert_eq!(pros.len(), 5);
    }

    #[test]
    fn rating_boundaries() {
        assert_eq!(rating_from_compound(0.6), 5);
        assert_eq!(rating_from_compound(0.59), 4);
        assert_eq!(rating_from_compound(0.3), 4);
        assert_eq!(rating_from_compound(0.0), 3);
        assert_eq!(rating_from_compound(-0.1), 3);
        assert_eq!(rating_from_compound(-0.2), 2);
        assert_eq!(rating_from_compound(-0.41), 1);
    }

    #[test]
    fn quality_score_rounds() {
        assert!((review_quality_score(1, 2, -0.333) - 1.83).abs() < 1e-9);
        assert!(review_quality_score(0, 0, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn assessment_ties_rating_to_sentiment() {
        let text = format!("{GOOD_POST_TITLE} {GOOD_POST_BODY}");
        let a = assess_review(&LexiconScorer, &text, &[]);
        assert_eq!(a.pros.len(), 1);
        assert_eq!(a.cons.len(), 1);
        assert!(a.sentiment.score > 0.0);
        assert!(a.rating >= 3);
    }
}
