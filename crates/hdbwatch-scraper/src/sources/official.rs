//! Government press-release collectors: HDB, URA and LTA.
//!
//! Listing pages are parsed as static HTML. Only titles that pass the
//! official relevance filter become articles; the published time is the
//! scrape time because listings carry no reliable date.

use chrono::{DateTime, Utc};
use hdbwatch_classify::{extract_keywords, Pipeline};
use hdbwatch_core::{Article, SourceInfo, SourceType};
use scraper::Html;

use crate::client::FetchClient;
use crate::error::ScraperError;
use crate::html::{element_text, parse_base, resolve_link, selector};
use crate::ids::timestamped_id;

const MIN_LINK_TITLE_CHARS: usize = 30;
const MIN_LTA_TITLE_CHARS: usize = 20;
const LTA_ITEMS_SCANNED: usize = 50;
const NAVIGATION_WORDS: &[&str] = &["arrow", "icon", "button", "menu"];
const HDB_NEWS_WORDS: &[&str] = &[
    "hdb",
    "launches",
    "unveils",
    "announces",
    "tender",
    "bto",
    "flats",
    "opens",
    "awards",
    "extends",
];

/// A government agency whose newsroom is scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agency {
    Hdb,
    Ura,
    Lta,
}

impl Agency {
    pub const ALL: [Self; 3] = [Self::Hdb, Self::Ura, Self::Lta];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hdb => "HDB",
            Self::Ura => "URA",
            Self::Lta => "LTA",
        }
    }

    #[must_use]
    pub fn listing_url(self) -> &'static str {
        match self {
            Self::Hdb => "https://www.hdb.gov.sg/about-us/news-and-publications/press-releases",
            Self::Ura => "https://www.ura.gov.sg/Corporate/Media-Room/Media-Releases",
            Self::Lta => "https://www.lta.gov.sg/content/ltagov/en/newsroom.html",
        }
    }

    fn homepage(self) -> &'static str {
        match self {
            Self::Hdb => "https://www.hdb.gov.sg",
            Self::Ura => "https://www.ura.gov.sg",
            Self::Lta => "https://www.lta.gov.sg",
        }
    }

    fn id_prefix(self) -> &'static str {
        match self {
            Self::Hdb => "hdb-gov",
            Self::Ura => "ura-gov",
            Self::Lta => "lta-gov",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Hdb => "HDB press release on housing matters",
            Self::Ura => "URA press release on property and urban planning",
            Self::Lta => "LTA news on MRT expansion and rail infrastructure",
        }
    }

    fn relevance_score(self) -> f64 {
        match self {
            Self::Hdb | Self::Ura => 0.95,
            Self::Lta => 0.90,
        }
    }

    /// Maximum relevant articles kept per run.
    #[must_use]
    pub fn cap(self) -> usize {
        match self {
            Self::Hdb | Self::Ura => 15,
            Self::Lta => 10,
        }
    }
}

/// A candidate release link found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub title: String,
    pub url: String,
}

fn is_hdb_release(title: &str, href: &str) -> bool {
    let lower = title.to_lowercase();
    if NAVIGATION_WORDS.iter().any(|w| lower.contains(w)) {
        return false;
    }
    href.to_lowercase().contains("press-release") || HDB_NEWS_WORDS.iter().any(|w| lower.contains(w))
}

/// Candidate releases on `agency`'s listing page, in page order.
///
/// Relative links are resolved against the agency's homepage.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] or [`ScraperError::InvalidUrl`] only if
/// a built-in selector or homepage fails to parse.
pub fn parse_listing(agency: Agency, html: &str) -> Result<Vec<Release>, ScraperError> {
    let document = Html::parse_document(html);
    let base = parse_base(agency.homepage())?;
    let mut releases = Vec::new();

    let mut push = |title: String, href: &str| {
        if let Some(url) = resolve_link(&base, href) {
            releases.push(Release { title, url });
        }
    };

    match agency {
        Agency::Hdb | Agency::Ura => {
            for link in document.select(&selector("a[href]")?) {
                let href = link.value().attr("href").unwrap_or_default();
                let title = element_text(link);
                if title.chars().count() < MIN_LINK_TITLE_CHARS {
                    continue;
                }
                let keep = match agency {
                    Agency::Hdb => is_hdb_release(&title, href),
                    _ => href.to_lowercase().contains("media-releases"),
                };
                if keep {
                    push(title, href);
                }
            }
        }
        Agency::Lta => {
            let heading_link = selector("h5.title a[href]")?;
            for item in document.select(&selector("li.item")?).take(LTA_ITEMS_SCANNED) {
                let Some(link) = item.select(&heading_link).next() else {
                    continue;
                };
                let href = link.value().attr("href").unwrap_or_default();
                let title = element_text(link);
                if title.chars().count() >= MIN_LTA_TITLE_CHARS {
                    push(title, href);
                }
            }
        }
    }

    Ok(releases)
}

/// Classify one release; `None` when the title is not property related.
#[must_use]
pub fn build_article(agency: Agency, release: &Release, now: DateTime<Utc>) -> Option<Article> {
    let classification = Pipeline::OFFICIAL.run(&release.title, "")?;
    Some(Article {
        article_id: timestamped_id(agency.id_prefix(), now, &release.url),
        title: release.title.clone(),
        description: agency.description().to_string(),
        url: release.url.clone(),
        source: SourceInfo::new(agency.name(), agency.homepage(), SourceType::Government),
        published_at: now,
        locations: classification.locations,
        categories: classification.categories,
        sentiment: classification.sentiment,
        impact_assessment: classification.impact,
        keywords: extract_keywords(&release.title),
        relevance_score: agency.relevance_score(),
        view_count: 0,
        is_active: true,
        scraped_at: now,
        last_updated: now,
    })
}

/// Relevant articles from one listing page, capped per agency.
///
/// # Errors
///
/// See [`parse_listing`].
pub fn articles_from_listing(
    agency: Agency,
    html: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Article>, ScraperError> {
    Ok(parse_listing(agency, html)?
        .iter()
        .filter_map(|release| build_article(agency, release, now))
        .take(agency.cap())
        .collect())
}

/// Every agency paired with its live listing URL.
#[must_use]
pub fn default_sources() -> Vec<(Agency, String)> {
    Agency::ALL
        .iter()
        .map(|a| (*a, a.listing_url().to_string()))
        .collect()
}

/// Scrape each `(agency, listing URL)` pair in turn. Failures skip that agency.
pub async fn collect_official(client: &FetchClient, sources: &[(Agency, String)]) -> Vec<Article> {
    let now = Utc::now();
    let mut articles = Vec::new();

    for (agency, url) in sources {
        let found = match client.get_text(url).await {
            Ok(html) => articles_from_listing(*agency, &html, now),
            Err(e) => Err(e),
        };
        match found {
            Ok(found) => {
                tracing::info!(source = agency.name(), count = found.len(), "collected releases");
                articles.extend(found);
            }
            Err(e) => {
                client.pacing().after_error(agency.name(), &e).await;
            }
        }
        client.pacing().between_requests().await;
    }

    articles
}
