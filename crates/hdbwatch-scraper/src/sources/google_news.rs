//! Google News RSS collector.
//!
//! Each feed item is attributed to its real publisher via the item's
//! `<source>` element, enriched with the linked page's description and body
//! locations, and run through the market-news pipeline.

use chrono::{DateTime, Utc};
use hdbwatch_classify::{extract_keywords, identify_source, match_locations, merge_locations, Pipeline};
use hdbwatch_core::Article;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::client::FetchClient;
use crate::error::ScraperError;
use crate::feed::{parse_feed, FeedItem};
use crate::html::{parse_article_page, truncate_chars, ArticlePage};
use crate::ids::timestamped_id;

/// Search terms, one feed each.
pub const QUERIES: &[&str] = &[
    "Singapore HDB resale",
    "Singapore HDB BTO",
    "Singapore HDB property",
];
pub const ITEMS_PER_FEED: usize = 7;
pub const MAX_AGE_DAYS: i64 = 60;

const ID_PREFIX: &str = "gnews";
const DESCRIPTION_CHARS: usize = 500;

/// Google News RSS search URL for `query`, Singapore edition.
#[must_use]
pub fn feed_url(query: &str) -> String {
    let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
    format!("https://news.google.com/rss/search?q={encoded}&hl=en-SG&gl=SG&ceid=SG:en")
}

#[must_use]
pub fn default_feeds() -> Vec<String> {
    QUERIES.iter().map(|q| feed_url(q)).collect()
}

/// Whether an item published at `published` is young enough to keep.
#[must_use]
pub fn is_recent(published: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (now - published).num_days() <= MAX_AGE_DAYS
}

/// Build an article from a feed item and its fetched page.
///
/// Returns `None` when the item fails the relevance filter.
#[must_use]
pub fn build_article(item: &FeedItem, page: &ArticlePage, now: DateTime<Utc>) -> Option<Article> {
    let pipeline = Pipeline::MARKET;
    if !pipeline.filter.is_relevant(&item.title, &page.description) {
        tracing::debug!(title = %item.title, "skipping irrelevant feed item");
        return None;
    }

    let source = identify_source(item.source.as_deref().unwrap_or_default(), &item.link);
    let locations = merge_locations(
        &match_locations(&item.title),
        &match_locations(&page.content),
    );
    let classification = pipeline.classify_relevant(&item.title, &page.description, locations);
    let published_at = item.published_at().unwrap_or(now);

    let description = if page.description.is_empty() {
        format!("Article from {}", source.name)
    } else {
        truncate_chars(&page.description, DESCRIPTION_CHARS)
    };

    Some(Article {
        article_id: timestamped_id(ID_PREFIX, published_at, &item.link),
        title: item.title.clone(),
        description,
        url: item.link.clone(),
        relevance_score: source.source_type.relevance_score(),
        source,
        published_at,
        locations: classification.locations,
        categories: classification.categories,
        sentiment: classification.sentiment,
        impact_assessment: classification.impact,
        keywords: extract_keywords(&item.title),
        view_count: 0,
        is_active: true,
        scraped_at: now,
        last_updated: now,
    })
}

async fn fetch_page(client: &FetchClient, url: &str) -> Result<ArticlePage, ScraperError> {
    let html = client.get_text(url).await?;
    parse_article_page(&html)
}

/// Collect articles from every feed in `feeds`.
///
/// A failing feed is logged and skipped. A failing article page leaves the
/// item with an empty description and title-only locations.
pub async fn collect_google_news(client: &FetchClient, feeds: &[String]) -> Vec<Article> {
    let now = Utc::now();
    let mut articles = Vec::new();

    for feed in feeds {
        let items = match client.get_text(feed).await {
            Ok(xml) => parse_feed(&xml, ITEMS_PER_FEED),
            Err(e) => Err(e),
        };
        let items = match items {
            Ok(items) => items,
            Err(e) => {
                client.pacing().after_error(feed, &e).await;
                continue;
            }
        };
        tracing::info!(feed = %feed, items = items.len(), "fetched news feed");

        for item in items {
            if !item.published_at().is_none_or(|at| is_recent(at, now)) {
                tracing::debug!(title = %item.title, "skipping stale feed item");
                continue;
            }

            let page = fetch_page(client, &item.link).await.unwrap_or_else(|e| {
                tracing::debug!(url = %item.link, error = %e, "article page unavailable");
                ArticlePage::default()
            });

            if let Some(article) = build_article(&item, &page, now) {
                tracing::debug!(
                    title = %article.title,
                    source = %article.source.name,
                    sentiment = %article.sentiment.label,
                    "classified article"
                );
                articles.push(article);
            }
        }

        client.pacing().between_requests().await;
    }

    tracing::info!(source = "google_news", count = articles.len(), "collection finished");
    articles
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use hdbwatch_core::{SourceType, NATIONWIDE};

    use super::*;

    fn item(title: &str, source: Option<&str>) -> FeedItem {
        FeedItem {
            title: title.to_string(),
            link: "https://news.google.com/rss/articles/abc".to_string(),
            description: String::new(),
            pub_date: Some("Mon, 05 Jan 2026 08:30:00 GMT".to_string()),
            source: source.map(str::to_string),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn feed_url_encodes_query() {
        assert_eq!(
            feed_url("Singapore HDB BTO"),
            "https://news.google.com/rss/search?q=Singapore%20HDB%20BTO&hl=en-SG&gl=SG&ceid=SG:en"
        );
        assert_eq!(default_feeds().len(), 3);
    }

    #[test]
    fn recency_window_is_sixty_days() {
        assert!(is_recent(now() - Duration::days(60), now()));
        assert!(!is_recent(now() - Duration::days(61), now()));
    }

    #[test]
    fn merges_title_and_body_locations_and_attributes_source() {
        let page = ArticlePage {
            description: "Resale flats in Sengkang saw record prices".to_string(),
            content: "Flats in Sengkang and Punggol changed hands".to_string(),
        };
        let article = build_article(
            &item("HDB resale prices climb in Punggol", Some("CNA")),
            &page,
            now(),
        )
        .expect("relevant");

        assert_eq!(article.locations, vec!["PUNGGOL", "SENGKANG"]);
        assert_eq!(article.source.name, "CNA");
        assert_eq!(article.source.source_type, SourceType::NewsMedia);
        assert!((article.relevance_score - 0.85).abs() < f64::EPSILON);
        assert!(article.article_id.starts_with("gnews-"));
        assert_eq!(article.published_at.timestamp(), 1_767_601_800);
        assert!(article.categories.contains(&"market_trend".to_string()));
    }

    #[test]
    fn missing_page_falls_back_to_source_description() {
        let article = build_article(
            &item("HDB BTO launch announced", Some("Mothership")),
            &ArticlePage::default(),
            now(),
        )
        .expect("relevant");
        assert_eq!(article.description, "Article from Mothership");
        assert_eq!(article.locations, vec![NATIONWIDE]);
        assert_eq!(article.source.source_type, SourceType::NewsAggregator);
    }

    #[test]
    fn long_description_is_truncated() {
        let page = ArticlePage {
            description: "HDB ".repeat(200),
            content: String::new(),
        };
        let article = build_article(&item("HDB resale update", None), &page, now())
            .expect("relevant");
        assert_eq!(article.description.chars().count(), 500);
    }

    #[test]
    fn irrelevant_item_is_dropped() {
        assert!(build_article(
            &item("Stocks close higher on Wall Street", None),
            &ArticlePage::default(),
            now(),
        )
        .is_none());
    }
}
