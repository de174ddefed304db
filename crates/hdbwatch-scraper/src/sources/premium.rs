//! Premium news-site collectors: listing pages parsed with per-site card
//! selectors.

use chrono::{DateTime, Utc};
use hdbwatch_classify::{analyze_sentiment, assess_impact, Pipeline, RelevanceFilter};
use hdbwatch_core::{Article, SourceInfo, SourceType};
use scraper::Html;

use crate::client::FetchClient;
use crate::error::ScraperError;
use crate::html::{element_text, parse_base, resolve_link, selector};
use crate::ids::digest_id;

const KEYWORD_LIMIT: usize = 5;

/// Where a site lists its housing stories and how to read a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PremiumSite {
    pub name: &'static str,
    pub homepage: &'static str,
    pub listing_url: &'static str,
    pub source_type: SourceType,
    cards: &'static str,
    title: &'static str,
    description: &'static str,
    /// Cards examined per run, counted before filtering.
    pub limit: usize,
    pub relevance_score: f64,
}

pub const BUSINESS_TIMES: PremiumSite = PremiumSite {
    name: "Business Times",
    homepage: "https://www.businesstimes.com.sg",
    listing_url: "https://www.businesstimes.com.sg/keywords/hdb",
    source_type: SourceType::NewsMedia,
    cards: "div.media-card, article.story-card",
    title: "h2.card-title, h3.card-title, a.headline",
    description: "p.card-text, div.description",
    limit: 15,
    relevance_score: 0.9,
};

pub const STRAITS_TIMES: PremiumSite = PremiumSite {
    name: "The Straits Times",
    homepage: "https://www.straitstimes.com",
    listing_url: "https://www.straitstimes.com/search?searchkey=hdb&sort=relevancydate",
    source_type: SourceType::NewsMedia,
    cards: "div.card-list-item, article.story-card",
    title: "h3.card-headline, a.headline",
    description: "p.card-description, div.description",
    limit: 15,
    relevance_score: 0.9,
};

pub const CNA: PremiumSite = PremiumSite {
    name: "CNA",
    homepage: "https://www.channelnewsasia.com",
    listing_url: "https://www.channelnewsasia.com/topic/hdb",
    source_type: SourceType::NewsMedia,
    cards: "div.list-object, article.teaser",
    title: "h3, h6, a.title",
    description: "p.description, div.teaser__description",
    limit: 15,
    relevance_score: 0.9,
};

pub const PROPERTY_GURU: PremiumSite = PremiumSite {
    name: "PropertyGuru",
    homepage: "https://www.propertyguru.com.sg",
    listing_url: "https://www.propertyguru.com.sg/property-management-news",
    source_type: SourceType::PropertyPortal,
    cards: "article.news-card, div.article-item",
    title: "h2, h3, a.title",
    description: "p, div.description",
    limit: 10,
    relevance_score: 0.95,
};

pub const SITES: [PremiumSite; 4] = [BUSINESS_TIMES, STRAITS_TIMES, CNA, PROPERTY_GURU];

/// One story card lifted from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub url: String,
    /// Card blurb, or the title when the card has none.
    pub description: String,
    /// Raw `datetime` attribute of the card's `<time>`/date element.
    pub published: Option<String>,
}

/// The first `site.limit` cards on a listing page that have a title and link.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] or [`ScraperError::InvalidUrl`] only if
/// the site's built-in selectors or homepage fail to parse.
pub fn parse_cards(site: &PremiumSite, html: &str) -> Result<Vec<Card>, ScraperError> {
    let document = Html::parse_document(html);
    let base = parse_base(site.homepage)?;
    let card_sel = selector(site.cards)?;
    let title_sel = selector(site.title)?;
    let desc_sel = selector(site.description)?;
    let link_sel = selector("a[href]")?;
    let date_sel = selector("time, span.date")?;

    let mut cards = Vec::new();
    for card in document.select(&card_sel).take(site.limit) {
        let Some(title) = card
            .select(&title_sel)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
        else {
            continue;
        };
        let Some(url) = card
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_link(&base, href))
        else {
            continue;
        };
        let description = card
            .select(&desc_sel)
            .next()
            .map(element_text)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| title.clone());
        let published = card
            .select(&date_sel)
            .next()
            .and_then(|d| d.value().attr("datetime"))
            .map(str::to_string);

        cards.push(Card {
            title,
            url,
            description,
            published,
        });
    }

    Ok(cards)
}

/// Classify one card; `None` when it fails the news relevance filter.
///
/// Sentiment covers title and description together.
#[must_use]
pub fn build_article(site: &PremiumSite, card: &Card, now: DateTime<Utc>) -> Option<Article> {
    let pipeline = Pipeline::PREMIUM;
    let mut classification = pipeline.run(&card.title, &card.description)?;
    let combined = format!("{} {}", card.title, card.description);
    classification.sentiment = analyze_sentiment(&combined);
    classification.impact = assess_impact(
        pipeline.impact,
        &classification.categories,
        &classification.sentiment,
        &classification.locations,
    );

    let published_raw = card.published.as_deref().unwrap_or_default();
    let published_at = DateTime::parse_from_rfc3339(published_raw)
        .map_or(now, |dt| dt.with_timezone(&Utc));

    Some(Article {
        // run time never enters the id; an undated card keys on site and URL
        article_id: digest_id(site.name, &card.url, published_raw),
        title: card.title.clone(),
        description: card.description.clone(),
        url: card.url.clone(),
        source: SourceInfo::new(site.name, site.homepage, site.source_type),
        published_at,
        locations: classification.locations,
        categories: classification.categories,
        sentiment: classification.sentiment,
        impact_assessment: classification.impact,
        keywords: RelevanceFilter::NEWS.matched_required(&combined, KEYWORD_LIMIT),
        relevance_score: site.relevance_score,
        view_count: 0,
        is_active: true,
        scraped_at: now,
        last_updated: now,
    })
}

/// Scrape each `(site, listing URL)` pair in turn. Failures skip that site.
pub async fn collect_premium(client: &FetchClient, sites: &[(PremiumSite, String)]) -> Vec<Article> {
    let now = Utc::now();
    let mut articles = Vec::new();

    for (site, url) in sites {
        let cards = match client.get_text(url).await {
            Ok(html) => parse_cards(site, &html),
            Err(e) => Err(e),
        };
        match cards {
            Ok(cards) => {
                let before = articles.len();
                articles.extend(cards.iter().filter_map(|c| build_article(site, c, now)));
                tracing::info!(
                    source = site.name,
                    cards = cards.len(),
                    relevant = articles.len() - before,
                    "collected listing"
                );
            }
            Err(e) => {
                client.pacing().after_error(site.name, &e).await;
            }
        }
        client.pacing().between_requests().await;
    }

    articles
}

/// Every premium site paired with its live listing URL.
#[must_use]
pub fn default_sites() -> Vec<(PremiumSite, String)> {
    SITES
        .iter()
        .map(|s| (*s, s.listing_url.to_string()))
        .collect()
}
