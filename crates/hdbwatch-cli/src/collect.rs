//! Scraper command handlers.
//!
//! Each handler runs one collector to completion, saves what it found, and
//! prints a summary. Per-item failures are handled inside the collectors;
//! store failures abort the run.

use hdbwatch_classify::LexiconScorer;
use hdbwatch_core::{AppConfig, Article};
use hdbwatch_db::{ArticleRefresh, DocumentStore, UpsertOutcome};
use hdbwatch_scraper::sources::{google_news, official, premium, reddit};
use hdbwatch_scraper::FetchClient;

use crate::summary::{
    print_article_summary, print_review_summary, summarize_articles, summarize_reviews, SaveCounts,
};

/// How a collector's articles are written.
#[derive(Debug, Clone, Copy)]
enum SaveMode {
    /// Insert new URLs; refresh known ones.
    ByUrl(ArticleRefresh),
    /// Insert or merge by article id.
    ById,
}

pub(crate) fn build_fetch_client(config: &AppConfig) -> anyhow::Result<FetchClient> {
    FetchClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))
}

async fn save_articles<S: DocumentStore>(
    store: &S,
    articles: &[Article],
    mode: SaveMode,
) -> anyhow::Result<SaveCounts> {
    let mut counts = SaveCounts::default();
    for article in articles {
        let outcome: UpsertOutcome = match mode {
            SaveMode::ByUrl(refresh) => hdbwatch_db::save_article(store, article, refresh).await?,
            SaveMode::ById => hdbwatch_db::upsert_article(store, article).await?,
        };
        counts.record(outcome);
    }
    Ok(counts)
}

async fn finish_articles<S: DocumentStore>(
    store: &S,
    label: &str,
    articles: &[Article],
    mode: SaveMode,
) -> anyhow::Result<()> {
    let saved = save_articles(store, articles, mode).await?;
    let total = hdbwatch_db::count_articles(store).await?;
    tracing::info!(
        source = label,
        found = articles.len(),
        inserted = saved.inserted,
        updated = saved.updated,
        "run complete"
    );
    print_article_summary(label, &summarize_articles(articles), saved, total);
    Ok(())
}

/// Google News RSS: three query feeds, publisher attribution, page enrichment.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or a store call fails.
pub(crate) async fn run_google_news<S: DocumentStore>(
    store: &S,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let client = build_fetch_client(config)?;
    let articles = google_news::collect_google_news(&client, &google_news::default_feeds()).await;
    finish_articles(
        store,
        "google news",
        &articles,
        SaveMode::ByUrl(ArticleRefresh::TimestampAndLocations),
    )
    .await
}

/// HDB, URA and LTA press releases.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or a store call fails.
pub(crate) async fn run_official<S: DocumentStore>(
    store: &S,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let client = build_fetch_client(config)?;
    let articles = official::collect_official(&client, &official::default_sources()).await;
    finish_articles(
        store,
        "official sources",
        &articles,
        SaveMode::ByUrl(ArticleRefresh::Timestamp),
    )
    .await
}

/// Premium news-site listing pages.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or a store call fails.
pub(crate) async fn run_premium<S: DocumentStore>(
    store: &S,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let client = build_fetch_client(config)?;
    let articles = premium::collect_premium(&client, &premium::default_sites()).await;
    finish_articles(store, "premium news", &articles, SaveMode::ById).await
}

/// Reddit living-experience reviews.
///
/// # Errors
///
/// Returns an error if Reddit credentials are missing, the token exchange
/// fails, or a store call fails.
pub(crate) async fn run_reddit<S: DocumentStore>(
    store: &S,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let creds = reddit::RedditCredentials::from_config(config)?;
    let client = reddit::RedditClient::connect(build_fetch_client(config)?, &creds).await?;

    let queries = hdbwatch_scraper::sources::build_queries();
    tracing::info!(
        subreddits = reddit::SUBREDDITS.len(),
        queries = queries.len(),
        "starting reddit search"
    );
    let run = client
        .collect_reviews(&LexiconScorer, reddit::SUBREDDITS, &queries)
        .await;

    let mut saved = SaveCounts::default();
    for review in &run.reviews {
        saved.record(hdbwatch_db::upsert_review(store, review).await?);
    }
    let total = hdbwatch_db::count_reviews(store).await?;

    tracing::info!(
        found = run.reviews.len(),
        skipped = run.skipped,
        inserted = saved.inserted,
        updated = saved.updated,
        "reddit run complete"
    );
    println!("posts rejected by quality gate: {}", run.skipped);
    print_review_summary("reddit", &summarize_reviews(&run.reviews), saved, total);
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use hdbwatch_core::{ImpactAssessment, PredictedImpact, Sentiment, SourceInfo, SourceType};
    use hdbwatch_db::MemoryStore;

    use super::*;

    fn article(id: &str, url: &str) -> Article {
        let now = Utc::now();
        Article {
            article_id: id.to_string(),
            title: "HDB resale prices climb".to_string(),
            description: "d".to_string(),
            url: url.to_string(),
            source: SourceInfo::new("CNA", "https://www.channelnewsasia.com", SourceType::NewsMedia),
            published_at: now,
            locations: vec!["PUNGGOL".to_string()],
            categories: vec!["market_trend".to_string()],
            sentiment: Sentiment::from_compound(0.4),
            impact_assessment: ImpactAssessment {
                predicted_impact: PredictedImpact::ModeratePositive,
                affected_areas: vec!["PUNGGOL".to_string()],
                timeframe: "short_term".to_string(),
            },
            keywords: vec![],
            relevance_score: 0.85,
            view_count: 0,
            is_active: true,
            scraped_at: now,
            last_updated: now,
        }
    }

    #[tokio::test]
    async fn saving_same_url_twice_keeps_one_document() {
        let store = MemoryStore::new();
        let batch = vec![article("gnews-1", "https://x/1"), article("gnews-2", "https://x/1")];
        let counts = save_articles(
            &store,
            &batch,
            SaveMode::ByUrl(ArticleRefresh::TimestampAndLocations),
        )
        .await
        .unwrap();

        assert_eq!(counts.inserted, 1);
        assert_eq!(counts.updated, 1);
        assert_eq!(hdbwatch_db::count_articles(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn by_id_mode_upserts_on_article_id() {
        let store = MemoryStore::new();
        let a = article("abcdef0123456789", "https://x/2");
        save_articles(&store, std::slice::from_ref(&a), SaveMode::ById)
            .await
            .unwrap();
        let counts = save_articles(&store, &[a], SaveMode::ById).await.unwrap();
        assert_eq!(counts.updated, 1);
        assert_eq!(hdbwatch_db::count_articles(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rescraped_undated_premium_card_keeps_one_document() {
        use chrono::TimeZone;
        use premium::{build_article, Card, BUSINESS_TIMES};

        let card = Card {
            title: "HDB resale prices in Punggol edge up".to_string(),
            url: "https://www.businesstimes.com.sg/property/x".to_string(),
            description: "Resale flat prices rose again".to_string(),
            published: None,
        };
        let first_run = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let second_run = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();

        let store = MemoryStore::new();
        for run in [first_run, second_run] {
            let article = build_article(&BUSINESS_TIMES, &card, run).expect("relevant");
            save_articles(&store, &[article], SaveMode::ById).await.unwrap();
        }
        assert_eq!(hdbwatch_db::count_articles(&store).await.unwrap(), 1);
    }
}
