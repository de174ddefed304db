//! Lemon8 two-phase pipeline: staging raw posts, AI analysis, and reset.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use hdbwatch_classify::LexiconScorer;
use hdbwatch_core::{AppConfig, DirtyData, RawPost};
use hdbwatch_db::{DocumentStore, Lemon8Counts};
use hdbwatch_scraper::sources::lemon8::{analyze_raw_post, AnthropicAnalyzer, PostAnalyzer};
use serde::Deserialize;
use uuid::Uuid;

use crate::collect::build_fetch_client;
use crate::summary::print_review_breakdown;

/// One post as exported by the collection phase. Only `estate` is required.
#[derive(Debug, Deserialize)]
struct ExportedPost {
    #[serde(default, alias = "_id")]
    post_id: Option<String>,
    estate: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    full_text: String,
    #[serde(default)]
    account_name: String,
    #[serde(default)]
    account_handle: String,
    #[serde(default)]
    post_url: String,
    #[serde(default)]
    hashtags: Vec<String>,
    #[serde(default)]
    collected_at: Option<DateTime<Utc>>,
}

impl ExportedPost {
    fn into_raw_post(self, now: DateTime<Utc>) -> RawPost {
        RawPost {
            post_id: self
                .post_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            estate: self.estate,
            title: self.title,
            content: self.content,
            full_text: self.full_text,
            account_name: self.account_name,
            account_handle: self.account_handle,
            post_url: self.post_url,
            hashtags: self.hashtags,
            processed: false,
            analyzed_at: None,
            error: None,
            collected_at: self.collected_at.unwrap_or(now),
        }
    }
}

/// Parse a JSON array of exported posts into unprocessed raw posts.
///
/// # Errors
///
/// Returns an error if `json` is not an array of post objects.
pub(crate) fn raw_posts_from_json(json: &str, now: DateTime<Utc>) -> anyhow::Result<Vec<RawPost>> {
    let posts: Vec<ExportedPost> =
        serde_json::from_str(json).context("expected a JSON array of Lemon8 posts")?;
    Ok(posts.into_iter().map(|p| p.into_raw_post(now)).collect())
}

/// Stage posts from an exported JSON file. Already staged ids are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a store call fails.
pub(crate) async fn run_stage<S: DocumentStore>(store: &S, file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let posts = raw_posts_from_json(&raw, Utc::now())?;

    let mut staged = 0usize;
    for post in &posts {
        if hdbwatch_db::insert_raw_post(store, post).await? {
            staged += 1;
        }
    }

    tracing::info!(file = %file.display(), read = posts.len(), staged, "staged raw posts");
    println!(
        "staged {staged} of {} posts ({} already present)",
        posts.len(),
        posts.len() - staged
    );
    print_counts(&hdbwatch_db::lemon8_counts(store).await?);
    Ok(())
}

/// Totals of one analysis pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AnalyzeReport {
    pub processed: usize,
    pub reviews_created: usize,
    /// Non-reviews, analyzer failures, and duplicates.
    pub dirty: usize,
}

/// Analyze every unprocessed raw post once.
///
/// Each post ends up either as a new review or as dirty data, except that a
/// review whose post URL is already stored is counted as dirty without a
/// dirty-data record. Every post is marked processed.
///
/// # Errors
///
/// Returns an error only if a store call fails.
pub(crate) async fn analyze_pending<S, A>(store: &S, analyzer: &A) -> anyhow::Result<AnalyzeReport>
where
    S: DocumentStore,
    A: PostAnalyzer,
{
    let pending = hdbwatch_db::list_unprocessed_raw_posts(store).await?;
    let total = pending.len();
    let mut report = AnalyzeReport::default();

    for (i, post) in pending.iter().enumerate() {
        if i % 50 == 0 {
            tracing::info!(progress = i + 1, total, estate = %post.estate, "analyzing posts");
        }

        let outcome = analyze_raw_post(analyzer, &LexiconScorer, post, Utc::now()).await;
        let error = match outcome {
            Ok(review) => {
                if hdbwatch_db::insert_review_if_new(store, &review).await? {
                    report.reviews_created += 1;
                } else {
                    tracing::debug!(post_id = %post.post_id, "duplicate review skipped");
                    report.dirty += 1;
                }
                None
            }
            Err(reason) => {
                let record = DirtyData {
                    raw_post_id: post.post_id.clone(),
                    estate: post.estate.clone(),
                    reason: reason.clone(),
                    title: post.title.clone(),
                    flagged_at: Utc::now(),
                };
                hdbwatch_db::insert_dirty_data(store, &record).await?;
                report.dirty += 1;
                Some(reason)
            }
        };

        hdbwatch_db::mark_raw_post_processed(store, &post.post_id, error.as_deref()).await?;
        report.processed += 1;
    }

    Ok(report)
}

/// # Errors
///
/// Returns an error if the analyzer is not configured or a store call fails.
pub(crate) async fn run_analyze<S: DocumentStore>(
    store: &S,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let before = hdbwatch_db::lemon8_counts(store).await?;
    print_counts(&before);
    if before.unprocessed == 0 {
        println!("no unprocessed posts; stage posts with `lemon8 stage <file>` first");
        return Ok(());
    }

    let analyzer = AnthropicAnalyzer::from_config(build_fetch_client(config)?, config)?;
    let report = analyze_pending(store, &analyzer).await?;

    tracing::info!(
        processed = report.processed,
        reviews_created = report.reviews_created,
        dirty = report.dirty,
        "lemon8 analysis complete"
    );
    println!("processed: {}", report.processed);
    println!("reviews created: {}", report.reviews_created);
    println!("dirty data: {}", report.dirty);
    if report.processed > 0 {
        let rate = report.reviews_created * 100 / report.processed;
        println!("success rate: {rate}%");
    }

    let reviews =
        hdbwatch_db::list_reviews_by_source(store, hdbwatch_db::LEMON8_PLATFORM).await?;
    println!("lemon8 review breakdown:");
    print_review_breakdown(&reviews);
    Ok(())
}

/// # Errors
///
/// Returns an error if a store call fails.
pub(crate) async fn run_reset<S: DocumentStore>(store: &S) -> anyhow::Result<()> {
    println!("before:");
    print_counts(&hdbwatch_db::lemon8_counts(store).await?);

    let report = hdbwatch_db::reset_lemon8(store).await?;
    println!(
        "deleted {} reviews | reset {} raw posts | cleared {} dirty records",
        report.reviews_deleted, report.raw_posts_reset, report.dirty_cleared
    );

    println!("after:");
    print_counts(&hdbwatch_db::lemon8_counts(store).await?);
    Ok(())
}

fn print_counts(counts: &Lemon8Counts) {
    println!(
        "  reviews: {} | raw posts: {} (processed {}, unprocessed {}) | dirty: {}",
        counts.reviews, counts.raw_posts, counts.processed, counts.unprocessed, counts.dirty
    );
}
