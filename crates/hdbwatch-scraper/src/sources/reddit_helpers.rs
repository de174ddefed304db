//! Reddit review helpers: search-query generation and post conversion.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use hdbwatch_classify::gazetteer::REGIONS;
use hdbwatch_classify::review::{assess_review, clean_text};
use hdbwatch_classify::{extract_locations, region_for, PolarityScorer};
use hdbwatch_core::{Review, ReviewSource};

use super::reddit::PostData;
use crate::html::truncate_chars;

pub const REDDIT_PLATFORM: &str = "Reddit";

const TOWNS_PER_REGION: usize = 3;
const TITLE_CHARS: usize = 255;
const BODY_CHARS: usize = 2000;
const DELETED_USER_ID: &str = "deleted";
const DELETED_USERNAME: &str = "[deleted]";

const FIXED_QUERIES: &[&str] = &[
    "Punggol vs Sengkang",
    "Bishan vs Toa Payoh",
    "Tampines vs Bedok",
    "East vs North-East HDB",
    "mature vs new estate",
    "which town has best MRT",
    "cheapest HDB area",
    "HDB living experience",
    "HDB flat review",
    "BTO or resale",
    "HDB amenities worth it",
    "HDB neighborhood review",
    "HDB transport access",
    "family friendly HDB area",
    "young professionals HDB",
];

fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Region-targeted search queries followed by cross-region and general ones.
///
/// For each region: "living in", "worth it" and "moving to" queries for its
/// first three towns, then comparisons of neighbouring towns. Duplicates are
/// dropped, keeping the first occurrence.
#[must_use]
pub fn build_queries() -> Vec<String> {
    let mut queries = Vec::new();

    for (_, towns) in REGIONS {
        let towns: Vec<String> = towns.iter().map(|t| title_case(t)).collect();
        for town in towns.iter().take(TOWNS_PER_REGION) {
            queries.push(format!("living in {town}"));
            queries.push(format!("is {town} worth it"));
            queries.push(format!("thinking of moving to {town}"));
        }
        if let [first, second, ..] = towns.as_slice() {
            queries.push(format!("{first} vs {second}"));
        }
        if let [_, second, third, ..] = towns.as_slice() {
            queries.push(format!("{second} vs {third}"));
        }
    }
    queries.extend(FIXED_QUERIES.iter().map(|q| (*q).to_string()));

    let mut seen = HashSet::new();
    queries.retain(|q| seen.insert(q.to_lowercase()));
    queries
}

/// Turn a post that passed the quality gate into a review.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn review_from_post<S: PolarityScorer + ?Sized>(
    scorer: &S,
    post: &PostData,
    subreddit: &str,
    comments: &[String],
    now: DateTime<Utc>,
) -> Review {
    let locations = extract_locations(&format!("{} {}", post.title, post.selftext));
    let title = truncate_chars(&post.title, TITLE_CHARS);
    let body = truncate_chars(&clean_text(&post.selftext), BODY_CHARS);
    let assessment = assess_review(scorer, &format!("{title} {body}"), comments);

    let (user_id, username) = match post.author.as_deref() {
        Some(author) if !author.is_empty() && author != DELETED_USERNAME => {
            (author.to_string(), author.to_string())
        }
        _ => (DELETED_USER_ID.to_string(), DELETED_USERNAME.to_string()),
    };

    Review {
        review_id: format!("reddit-{}", post.id),
        user_id,
        username,
        estate: None,
        region: region_for(&locations).map(str::to_string),
        locations,
        rating: assessment.rating,
        title,
        body,
        pros: assessment.pros,
        cons: assessment.cons,
        sentiment: assessment.sentiment,
        analysis_sentiment: None,
        key_points: Vec::new(),
        amenities_mentioned: std::collections::BTreeMap::new(),
        hashtags: Vec::new(),
        helpful_count: post.score,
        comment_count: post.num_comments,
        status: "approved".to_string(),
        source: ReviewSource {
            platform: REDDIT_PLATFORM.to_string(),
            url: format!("https://reddit.com{}", post.permalink),
            subreddit: Some(subreddit.to_string()),
            account_name: None,
            account_handle: None,
        },
        quality_score: assessment.quality_score,
        created_at: DateTime::from_timestamp(post.created_utc as i64, 0).unwrap_or(now),
        scraped_at: now,
        analyzed_at: None,
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use hdbwatch_classify::LexiconScorer;
    use hdbwatch_core::SentimentLabel;

    use super::*;

    #[test]
    fn queries_cover_regions_and_fixed_set() {
        let queries = build_queries();
        assert_eq!(queries[0], "living in Bishan");
        assert!(queries.contains(&"is Ang Mo Kio worth it".to_string()));
        assert!(queries.contains(&"Hougang vs Punggol".to_string()));
        assert!(queries.contains(&"Punggol vs Sengkang".to_string()));
        assert!(queries.contains(&"thinking of moving to Choa Chu Kang".to_string()));
        assert_eq!(queries.last().map(String::as_str), Some("young professionals HDB"));

        let unique: HashSet<String> = queries.iter().map(|q| q.to_lowercase()).collect();
        assert_eq!(unique.len(), queries.len());
    }

    #[test]
    fn title_case_handles_multi_word_towns() {
        assert_eq!(title_case("CHOA CHU KANG"), "Choa Chu Kang");
        assert_eq!(title_case("NORTH-EAST"), "North-east");
    }

    fn post(author: Option<&str>) -> PostData {
        PostData {
            id: "abc123".to_string(),
            title: "Living in Punggol, is it worth it?".to_string(),
            selftext: "We moved to Punggol two years ago and love the waterway. \
                Pros: the park connector makes evening walks lovely for the kids. \
                https://example.com/photo"
                .to_string(),
            author: author.map(str::to_string),
            permalink: "/r/askSingapore/comments/abc123/living_in_punggol/".to_string(),
            score: 42,
            num_comments: 7,
            created_utc: 1_767_225_600.0,
        }
    }

    #[test]
    fn converts_post_to_review() {
        let now = Utc::now();
        let review = review_from_post(&LexiconScorer, &post(Some("sgdad")), "askSingapore", &[], now);

        assert_eq!(review.review_id, "reddit-abc123");
        assert_eq!(review.username, "sgdad");
        assert_eq!(review.locations, vec!["PUNGGOL"]);
        assert_eq!(review.region.as_deref(), Some("North-East"));
        assert_eq!(
            review.source.url,
            "https://reddit.com/r/askSingapore/comments/abc123/living_in_punggol/"
        );
        assert_eq!(review.source.subreddit.as_deref(), Some("askSingapore"));
        assert!(!review.body.contains("https://"));
        assert_eq!(review.helpful_count, 42);
        assert_eq!(review.comment_count, 7);
        assert_eq!(review.created_at.timestamp(), 1_767_225_600);
        assert_eq!(review.sentiment.label, SentimentLabel::Positive);
        assert!(review.rating >= 4);
        assert_eq!(review.status, "approved");
    }

    #[test]
    fn deleted_author_is_normalized() {
        let now = Utc::now();
        for author in [None, Some("[deleted]")] {
            let review = review_from_post(&LexiconScorer, &post(author), "singapore", &[], now);
            assert_eq!(review.user_id, "deleted");
            assert_eq!(review.username, "[deleted]");
        }
    }
}
