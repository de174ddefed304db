//! Lemon8 analysis phase: staged raw posts are judged by an AI messages API
//! and genuine housing reviews become `Review` documents.

use std::future::Future;

use chrono::{DateTime, Utc};
use hdbwatch_classify::amenities::{extract_amenities, mentioned_estates, post_quality_score};
use hdbwatch_classify::review::rating_from_compound;
use hdbwatch_classify::{match_locations, merge_locations, region_for, PolarityScorer};
use hdbwatch_core::{AppConfig, RawPost, Review, ReviewSource, Sentiment, SentimentLabel};
use serde::Deserialize;

use crate::client::{check_status, FetchClient};
use crate::error::ScraperError;
use crate::html::truncate_chars;

pub const LEMON8_PLATFORM: &str = "Lemon8";

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 500;

const LIST_LIMIT: usize = 5;
const HASHTAG_LIMIT: usize = 10;
const TITLE_CHARS: usize = 200;
const CONTENT_CHARS: usize = 1000;
const DEFAULT_REJECT_REASON: &str = "Not a housing review";

/// The analyzer's verdict on one post. Missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostAnalysis {
    pub is_review: bool,
    pub reason: Option<String>,
    pub sentiment: Option<String>,
    pub key_points: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Prompt asking whether `post_text` is a genuine review of living in `estate`.
#[must_use]
pub fn build_prompt(post_text: &str, estate: &str) -> String {
    format!(
        r#"Analyze this Lemon8 post about {estate} and determine if it's a GENUINE HDB/housing review.

POST CONTENT:
"{post_text}"

TASK: Respond ONLY with a JSON object (no markdown, no code blocks):
{{
    "is_review": true/false,
    "reason": "Brief reason why it is/isn't a review",
    "sentiment": "positive/neutral/negative",
    "key_points": ["list", "of", "key", "observations"],
    "pros": ["list", "of", "positive", "aspects"],
    "cons": ["list", "of", "negative", "aspects"]
}}

CRITERIA for IS_REVIEW=true:
- Discusses actual living experience in the HDB estate
- Mentions housing, amenities, neighbors, environment
- NOT just a product review (makeup, food, gadgets)
- NOT just promotional content
- Contains genuine opinions/experiences

CRITERIA for IS_REVIEW=false:
- Pure product/food review (makeup, skincare, snacks)
- Tourist guide (just listing places)
- Unrelated content (school reviews, product unboxing)
- Spam or promotional garbage
- No connection to housing/living experience

Sentiment should reflect OVERALL tone about living in that area."#
    )
}

fn fenced_json(text: &str) -> Option<&str> {
    let (_, rest) = text.split_once("```json")?;
    let body = rest.split_once("```").map_or(rest, |(body, _)| body);
    Some(body.trim())
}

fn outer_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Decode the analyzer's reply: raw JSON first, then a ```json fence, then
/// the outermost `{...}` span.
///
/// # Errors
///
/// Returns [`ScraperError::Analyzer`] when no JSON object can be recovered.
pub fn parse_analysis(text: &str) -> Result<PostAnalysis, ScraperError> {
    let text = text.trim();
    if let Ok(analysis) = serde_json::from_str(text) {
        return Ok(analysis);
    }
    let candidate = if text.contains("```json") {
        fenced_json(text)
    } else {
        outer_braces(text)
    };
    let candidate =
        candidate.ok_or_else(|| ScraperError::Analyzer("reply contains no JSON object".to_string()))?;
    serde_json::from_str(candidate).map_err(|source| ScraperError::Deserialize {
        context: "analyzer reply".to_string(),
        source,
    })
}

/// Judges whether a post is a genuine housing review.
pub trait PostAnalyzer {
    fn analyze(
        &self,
        post_text: &str,
        estate: &str,
    ) -> impl Future<Output = Result<PostAnalysis, ScraperError>> + Send;
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// [`PostAnalyzer`] backed by the Anthropic messages API.
pub struct AnthropicAnalyzer {
    fetch: FetchClient,
    api_key: String,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for AnthropicAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicAnalyzer")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl AnthropicAnalyzer {
    #[must_use]
    pub fn new(fetch: FetchClient, api_key: &str, model: &str) -> Self {
        Self::with_endpoint(fetch, api_key, model, MESSAGES_URL)
    }

    #[must_use]
    pub fn with_endpoint(fetch: FetchClient, api_key: &str, model: &str, endpoint: &str) -> Self {
        Self {
            fetch,
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: endpoint.to_string(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::Analyzer`] if `ANTHROPIC_API_KEY` is unset.
    pub fn from_config(fetch: FetchClient, config: &AppConfig) -> Result<Self, ScraperError> {
        let api_key = config
            .anthropic_api_key
            .as_deref()
            .ok_or_else(|| ScraperError::Analyzer("ANTHROPIC_API_KEY is not set".to_string()))?;
        Ok(Self::new(fetch, api_key, &config.analyzer_model))
    }

    async fn request(&self, prompt: String) -> Result<String, ScraperError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": prompt }],
        });
        let response = self
            .fetch
            .http()
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;
        let raw = check_status(response, &self.endpoint)?.text().await?;
        let reply: MessagesResponse =
            serde_json::from_str(&raw).map_err(|source| ScraperError::Deserialize {
                context: "messages response".to_string(),
                source,
            })?;
        reply
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| ScraperError::Analyzer("empty messages response".to_string()))
    }
}

impl PostAnalyzer for AnthropicAnalyzer {
    async fn analyze(&self, post_text: &str, estate: &str) -> Result<PostAnalysis, ScraperError> {
        let text = self.request(build_prompt(post_text, estate)).await?;
        parse_analysis(&text)
    }
}

fn capped(items: &[String], limit: usize) -> Vec<String> {
    items.iter().take(limit).cloned().collect()
}

/// Build a review from a raw post and its analysis.
///
/// # Errors
///
/// Returns the analyzer's reason, or a default one, when the post is not a review.
pub fn review_from_analysis<S: PolarityScorer + ?Sized>(
    raw: &RawPost,
    analysis: &PostAnalysis,
    scorer: &S,
    now: DateTime<Utc>,
) -> Result<Review, String> {
    if !analysis.is_review {
        return Err(analysis
            .reason
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REJECT_REASON.to_string()));
    }

    let text = raw.text();
    let estates: Vec<String> = mentioned_estates(&text)
        .iter()
        .map(|e| e.to_uppercase())
        .collect();
    let locations = merge_locations(&match_locations(&raw.estate), &estates);
    let amenities = extract_amenities(&text);
    let compound = scorer.compound(&text);
    let sentiment = Sentiment::from_compound(compound);

    Ok(Review {
        review_id: format!("lemon8-{}", raw.post_id),
        user_id: raw.account_handle.clone(),
        username: raw.account_name.clone(),
        estate: Some(raw.estate.clone()),
        region: region_for(&locations).map(str::to_string),
        locations,
        rating: rating_from_compound(compound),
        title: truncate_chars(&raw.title, TITLE_CHARS),
        body: truncate_chars(&raw.content, CONTENT_CHARS),
        pros: capped(&analysis.pros, LIST_LIMIT),
        cons: capped(&analysis.cons, LIST_LIMIT),
        sentiment,
        analysis_sentiment: analysis
            .sentiment
            .as_deref()
            .and_then(|s| s.parse::<SentimentLabel>().ok()),
        key_points: capped(&analysis.key_points, LIST_LIMIT),
        quality_score: f64::from(post_quality_score(&text, !amenities.is_empty())),
        amenities_mentioned: amenities,
        hashtags: capped(&raw.hashtags, HASHTAG_LIMIT),
        helpful_count: 0,
        comment_count: 0,
        status: "approved".to_string(),
        source: ReviewSource {
            platform: LEMON8_PLATFORM.to_string(),
            url: raw.post_url.clone(),
            subreddit: None,
            account_name: Some(raw.account_name.clone()),
            account_handle: Some(raw.account_handle.clone()),
        },
        created_at: raw.collected_at,
        scraped_at: raw.collected_at,
        analyzed_at: Some(now),
        is_active: true,
    })
}

/// Analyze one raw post. `Err` carries the dirty-data reason.
pub async fn analyze_raw_post<A, S>(
    analyzer: &A,
    scorer: &S,
    raw: &RawPost,
    now: DateTime<Utc>,
) -> Result<Review, String>
where
    A: PostAnalyzer + ?Sized,
    S: PolarityScorer + ?Sized,
{
    match analyzer.analyze(&raw.text(), &raw.estate).await {
        Ok(analysis) => review_from_analysis(raw, &analysis, scorer, now),
        Err(e) => {
            tracing::warn!(post_id = %raw.post_id, error = %e, "analyzer call failed");
            Err(format!("Failed to analyze post: {e}"))
        }
    }
}
