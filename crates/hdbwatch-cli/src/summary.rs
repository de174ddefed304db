//! Human-readable run summaries printed after each scraper finishes.

use std::collections::BTreeMap;

use hdbwatch_core::{Article, Review, SentimentLabel, NATIONWIDE};

const TOP_LOCATIONS: usize = 10;

/// Per-label counts in a fixed positive/neutral/negative order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }
}

/// `(name, count)` pairs sorted by count descending, then name.
fn ranked(counts: BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

fn top_locations<'a>(lists: impl Iterator<Item = &'a Vec<String>>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for loc in lists.flatten().filter(|l| l.as_str() != NATIONWIDE) {
        *counts.entry(loc.clone()).or_default() += 1;
    }
    let mut pairs = ranked(counts);
    pairs.truncate(TOP_LOCATIONS);
    pairs
}

#[derive(Debug, Default)]
pub(crate) struct ArticleSummary {
    pub found: usize,
    pub sentiment: SentimentCounts,
    pub by_source: Vec<(String, usize)>,
    pub top_locations: Vec<(String, usize)>,
}

pub(crate) fn summarize_articles(articles: &[Article]) -> ArticleSummary {
    let mut sentiment = SentimentCounts::default();
    let mut sources: BTreeMap<String, usize> = BTreeMap::new();
    for article in articles {
        sentiment.add(article.sentiment.label);
        *sources.entry(article.source.name.clone()).or_default() += 1;
    }
    ArticleSummary {
        found: articles.len(),
        sentiment,
        by_source: ranked(sources),
        top_locations: top_locations(articles.iter().map(|a| &a.locations)),
    }
}

#[derive(Debug, Default)]
pub(crate) struct ReviewSummary {
    pub found: usize,
    pub sentiment: SentimentCounts,
    /// Index 0 holds 1-star reviews.
    pub ratings: [usize; 5],
    pub top_locations: Vec<(String, usize)>,
}

pub(crate) fn summarize_reviews(reviews: &[Review]) -> ReviewSummary {
    let mut summary = ReviewSummary {
        found: reviews.len(),
        top_locations: top_locations(reviews.iter().map(|r| &r.locations)),
        ..ReviewSummary::default()
    };
    for review in reviews {
        summary.sentiment.add(review.sentiment.label);
        let star = usize::from(review.rating.clamp(1, 5)) - 1;
        summary.ratings[star] += 1;
    }
    summary
}

fn print_sentiment(counts: SentimentCounts) {
    println!(
        "sentiment: positive {} | neutral {} | negative {}",
        counts.positive, counts.neutral, counts.negative
    );
}

fn print_locations(locations: &[(String, usize)]) {
    if locations.is_empty() {
        return;
    }
    println!("top locations:");
    for (name, count) in locations {
        println!("  {name}: {count}");
    }
}

pub(crate) fn print_article_summary(label: &str, summary: &ArticleSummary, saved: SaveCounts, total: u64) {
    println!("{label}: found {} articles", summary.found);
    println!("saved {} new | {} updated", saved.inserted, saved.updated);
    if summary.found > 0 {
        print_sentiment(summary.sentiment);
        println!("by source:");
        for (name, count) in &summary.by_source {
            println!("  {name}: {count}");
        }
        print_locations(&summary.top_locations);
    }
    println!("total articles in store: {total}");
}

pub(crate) fn print_review_summary(label: &str, summary: &ReviewSummary, saved: SaveCounts, total: u64) {
    println!("{label}: found {} reviews", summary.found);
    println!("saved {} new | {} updated", saved.inserted, saved.updated);
    if summary.found > 0 {
        print_sentiment(summary.sentiment);
        println!("ratings:");
        for (i, count) in summary.ratings.iter().enumerate().rev() {
            println!("  {} star: {count}", i + 1);
        }
        print_locations(&summary.top_locations);
    }
    println!("total reviews in store: {total}");
}

/// Amenity categories by the number of reviews mentioning them, top ten.
pub(crate) fn top_amenities(reviews: &[Review]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for category in reviews.iter().flat_map(|r| r.amenities_mentioned.keys()) {
        *counts.entry(category.clone()).or_default() += 1;
    }
    let mut pairs = ranked(counts);
    pairs.truncate(TOP_LOCATIONS);
    pairs
}

/// Sentiment breakdown and most-mentioned amenities across stored reviews.
pub(crate) fn print_review_breakdown(reviews: &[Review]) {
    let summary = summarize_reviews(reviews);
    println!("total reviews: {}", summary.found);
    print_sentiment(summary.sentiment);

    let amenities = top_amenities(reviews);
    if !amenities.is_empty() {
        println!("top amenities mentioned:");
        for (rank, (category, count)) in amenities.iter().enumerate() {
            println!("  {}. {category}: {count}", rank + 1);
        }
    }
}

/// Outcome tally of a save loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SaveCounts {
    pub inserted: usize,
    pub updated: usize,
}

impl SaveCounts {
    pub(crate) fn record(&mut self, outcome: hdbwatch_db::UpsertOutcome) {
        match outcome {
            hdbwatch_db::UpsertOutcome::Inserted => self.inserted += 1,
            hdbwatch_db::UpsertOutcome::Updated => self.updated += 1,
        }
    }
}
