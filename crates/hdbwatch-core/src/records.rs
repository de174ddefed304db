//! Documents written to the store by the scrapers.
//!
//! Field names match the stored JSON documents, so renaming a field here is a
//! schema change for every consumer of the collections.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Location sentinel used when no gazetteer place name matched.
pub const NATIONWIDE: &str = "NATIONWIDE";

/// Compound score at or above which text is labeled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Compound score at or below which text is labeled negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Label a compound polarity score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(format!("unknown sentiment label: {other}")),
        }
    }
}

/// A labeled compound score. `score` is rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

impl Sentiment {
    /// Build from a raw compound score in `[-1, 1]`.
    ///
    /// The label is taken from the unrounded score. Non-finite input is
    /// treated as `0.0`.
    #[must_use]
    pub fn from_compound(compound: f64) -> Self {
        let compound = if compound.is_finite() {
            compound.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            label: SentimentLabel::from_score(compound),
            score: (compound * 100.0).round() / 100.0,
        }
    }

    #[must_use]
    pub fn neutral() -> Self {
        Self::from_compound(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Government,
    PropertyPortal,
    NewsMedia,
    NewsAggregator,
}

impl SourceType {
    /// Relevance weight stored on articles from this kind of source.
    #[must_use]
    pub fn relevance_score(self) -> f64 {
        match self {
            Self::Government => 0.95,
            Self::PropertyPortal => 0.90,
            Self::NewsMedia => 0.85,
            Self::NewsAggregator => 0.80,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Government => "government",
            Self::PropertyPortal => "property_portal",
            Self::NewsMedia => "news_media",
            Self::NewsAggregator => "news_aggregator",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical publisher of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
}

impl SourceInfo {
    #[must_use]
    pub fn new(name: &str, url: &str, source_type: SourceType) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            source_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictedImpact {
    HighPositive,
    ModeratePositive,
    Neutral,
    ModerateNegative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    pub predicted_impact: PredictedImpact,
    pub affected_areas: Vec<String>,
    pub timeframe: String,
}

/// A news or press-release article in the `newsarticles` collection.
///
/// `url` is the de-duplication key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: SourceInfo,
    pub published_at: DateTime<Utc>,
    pub locations: Vec<String>,
    pub categories: Vec<String>,
    pub sentiment: Sentiment,
    pub impact_assessment: ImpactAssessment,
    pub keywords: Vec<String>,
    pub relevance_score: f64,
    #[serde(default)]
    pub view_count: u64,
    pub is_active: bool,
    pub scraped_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Where a review came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSource {
    /// `Reddit` or `Lemon8`.
    pub platform: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_handle: Option<String>,
}

/// A living-experience review in the `reviews` collection.
///
/// `review_id` is derived from the external post id and is the upsert key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    pub user_id: String,
    pub username: String,
    /// Primary estate for sources that tag one (Lemon8).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estate: Option<String>,
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub rating: u8,
    pub title: String,
    pub body: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub sentiment: Sentiment,
    /// Label proposed by the external analyzer, kept beside the lexicon label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_sentiment: Option<SentimentLabel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_points: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub amenities_mentioned: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hashtags: Vec<String>,
    pub helpful_count: i64,
    pub comment_count: i64,
    pub status: String,
    pub source: ReviewSource,
    pub quality_score: f64,
    pub created_at: DateTime<Utc>,
    pub scraped_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// A Lemon8 post staged for the analysis phase (`lemon8_raw_posts`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    pub post_id: String,
    pub estate: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub full_text: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub account_handle: String,
    #[serde(default)]
    pub post_url: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub processed: bool,
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error: Option<String>,
    pub collected_at: DateTime<Utc>,
}

impl RawPost {
    /// Text handed to analysis: `full_text` when present, else title and content.
    #[must_use]
    pub fn text(&self) -> String {
        if self.full_text.trim().is_empty() {
            format!("{} {}", self.title, self.content).trim().to_string()
        } else {
            self.full_text.clone()
        }
    }
}

/// A raw post quarantined by the analysis phase (`lemon8_dirty_data`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyData {
    pub raw_post_id: String,
    pub estate: String,
    pub reason: String,
    pub title: String,
    pub flagged_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_thresholds() {
        assert_eq!(SentimentLabel::from_score(0.5), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.5), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(0.1), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(-0.1), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(0.09), SentimentLabel::Neutral);
    }

    #[test]
    fn compound_is_rounded_to_two_decimals() {
        let s = Sentiment::from_compound(0.456_78);
        assert!((s.score - 0.46).abs() < f64::EPSILON);
        assert_eq!(s.label, SentimentLabel::Positive);
    }

    #[test]
    fn non_finite_compound_is_neutral() {
        let s = Sentiment::from_compound(f64::NAN);
        assert_eq!(s.label, SentimentLabel::Neutral);
        assert!(s.score.abs() < f64::EPSILON);
    }

    #[test]
    fn label_parses_case_insensitively() {
        assert_eq!(
            "Positive".parse::<SentimentLabel>(),
            Ok(SentimentLabel::Positive)
        );
        assert!("mixed".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn source_info_serializes_type_field() {
        let info = SourceInfo::new("HDB", "https://www.hdb.gov.sg", SourceType::Government);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "government");
    }

    #[test]
    fn raw_post_text_falls_back_to_title_and_content() {
        let post = RawPost {
            post_id: "p1".to_string(),
            estate: "Punggol".to_string(),
            title: "Living in Punggol".to_string(),
            content: "Quiet and green".to_string(),
            full_text: String::new(),
            account_name: String::new(),
            account_handle: String::new(),
            post_url: String::new(),
            hashtags: vec![],
            processed: false,
            analyzed_at: None,
            error: None,
            collected_at: Utc::now(),
        };
        assert_eq!(post.text(), "Living in Punggol Quiet and green");
    }
}
