use chrono::{Duration, TimeZone, Utc};
use hdbwatch_core::{
    Article, ImpactAssessment, PredictedImpact, Sentiment, SourceInfo, SourceType,
};

use super::*;
use crate::MemoryStore;

fn article(id: &str, url: &str, locations: &[&str]) -> Article {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    Article {
        article_id: id.to_string(),
        title: "New BTO launch in Punggol".to_string(),
        description: "Article from CNA".to_string(),
        url: url.to_string(),
        source: SourceInfo::new("CNA", "https://www.channelnewsasia.com", SourceType::NewsMedia),
        published_at: at,
        locations: locations.iter().map(|l| (*l).to_string()).collect(),
        categories: vec!["new_development".to_string()],
        sentiment: Sentiment::neutral(),
        impact_assessment: ImpactAssessment {
            predicted_impact: PredictedImpact::ModeratePositive,
            affected_areas: vec!["PUNGGOL".to_string()],
            timeframe: "2025-2030".to_string(),
        },
        keywords: vec!["launch".to_string(), "punggol".to_string()],
        relevance_score: 0.85,
        view_count: 0,
        is_active: true,
        scraped_at: at,
        last_updated: at,
    }
}

#[tokio::test]
async fn saving_same_article_twice_stores_one_document() {
    let store = MemoryStore::new();
    let a = article("gnews-1-00001", "https://cna.com/a", &["PUNGGOL"]);

    let first = save_article(&store, &a, ArticleRefresh::Timestamp).await.unwrap();
    let second = save_article(&store, &a, ArticleRefresh::Timestamp).await.unwrap();

    assert_eq!(first, UpsertOutcome::Inserted);
    assert_eq!(second, UpsertOutcome::Updated);
    assert_eq!(count_articles(&store).await.unwrap(), 1);
}

#[tokio::test]
async fn rescrape_refreshes_timestamp_and_locations() {
    let store = MemoryStore::new();
    let original = article("gnews-1-00001", "https://cna.com/a", &["NATIONWIDE"]);
    save_article(&store, &original, ArticleRefresh::TimestampAndLocations)
        .await
        .unwrap();

    // same URL, new id and locations
    let rescraped = article("gnews-2-00001", "https://cna.com/a", &["PUNGGOL", "SENGKANG"]);
    save_article(&store, &rescraped, ArticleRefresh::TimestampAndLocations)
        .await
        .unwrap();

    let stored = store
        .find_one(Collection::NewsArticles, &json!({"url": "https://cna.com/a"}))
        .await
        .unwrap()
        .unwrap();
    let stored: Article = serde_json::from_value(stored).unwrap();
    assert_eq!(stored.article_id, "gnews-1-00001");
    assert_eq!(stored.locations, vec!["PUNGGOL", "SENGKANG"]);
    assert!(stored.last_updated > original.last_updated + Duration::days(1));
}

#[tokio::test]
async fn timestamp_refresh_keeps_locations() {
    let store = MemoryStore::new();
    let original = article("hdb-gov-1-00001", "https://hdb.gov.sg/x", &["BEDOK"]);
    save_article(&store, &original, ArticleRefresh::Timestamp)
        .await
        .unwrap();
    let rescraped = article("hdb-gov-2-00001", "https://hdb.gov.sg/x", &["TAMPINES"]);
    save_article(&store, &rescraped, ArticleRefresh::Timestamp)
        .await
        .unwrap();

    let stored = store
        .find_one(Collection::NewsArticles, &json!({"url": "https://hdb.gov.sg/x"}))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["locations"], json!(["BEDOK"]));
}

#[tokio::test]
async fn upsert_article_is_idempotent() {
    let store = MemoryStore::new();
    let a = article("0123456789abcdef", "https://www.straitstimes.com/x", &["BISHAN"]);

    assert_eq!(upsert_article(&store, &a).await.unwrap(), UpsertOutcome::Inserted);
    assert_eq!(upsert_article(&store, &a).await.unwrap(), UpsertOutcome::Updated);
    assert_eq!(count_articles(&store).await.unwrap(), 1);
}
