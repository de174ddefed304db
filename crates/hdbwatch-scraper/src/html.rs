//! Static HTML helpers shared by the page collectors.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::ScraperError;

/// Elements whose text never counts as page content.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "header"];
/// Containers tried in order for the main article body.
const CONTENT_SELECTORS: &[&str] = &["article", ".article-content", ".story-body", "main"];
const FALLBACK_PARAGRAPHS: usize = 15;
const DESCRIPTION_PARAGRAPHS: usize = 2;
const DESCRIPTION_CHARS: usize = 250;

/// # Errors
///
/// Returns [`ScraperError::Selector`] if `css` does not parse.
pub(crate) fn selector(css: &'static str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Selector {
        css,
        reason: e.to_string(),
    })
}

/// Text of `element` with whitespace collapsed, skipping script-like children.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    push_visible_text(element, &mut parts);
    parts.join(" ")
}

fn push_visible_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let words = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !words.is_empty() {
                out.push(words);
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            if !SKIPPED_ELEMENTS.contains(&child.value().name()) {
                push_visible_text(child, out);
            }
        }
    }
}

fn inside_skipped(element: ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
    })
}

/// Resolve `href` against `base`, returning an absolute URL.
pub(crate) fn resolve_link(base: &Url, href: &str) -> Option<String> {
    base.join(href.trim()).ok().map(String::from)
}

/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `raw` is not an absolute URL.
pub(crate) fn parse_base(raw: &str) -> Result<Url, ScraperError> {
    Url::parse(raw).map_err(|e| ScraperError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

/// First `max` characters of `text`, never splitting a character.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// What a linked article page contributes to its feed item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePage {
    /// `<meta name="description">`, or the opening paragraphs.
    pub description: String,
    /// Visible body text used for location extraction.
    pub content: String,
}

/// Pull a description and the main body text out of an article page.
///
/// The body comes from the first matching content container, or the first
/// fifteen paragraphs when none matches.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] only if a built-in selector fails to parse.
pub fn parse_article_page(html: &str) -> Result<ArticlePage, ScraperError> {
    let document = Html::parse_document(html);
    let paragraph = selector("p")?;

    let mut content = String::new();
    for &css in CONTENT_SELECTORS {
        if let Some(el) = document.select(&selector(css)?).next() {
            content = element_text(el);
            if !content.is_empty() {
                break;
            }
        }
    }

    let paragraphs: Vec<String> = document
        .select(&paragraph)
        .filter(|p| !inside_skipped(*p))
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect();

    if content.is_empty() {
        content = paragraphs
            .iter()
            .take(FALLBACK_PARAGRAPHS)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
    }

    let meta = selector(r#"meta[name="description"]"#)?;
    let description = document
        .select(&meta)
        .find_map(|m| m.value().attr("content"))
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map_or_else(
            || {
                let opening = paragraphs
                    .iter()
                    .take(DESCRIPTION_PARAGRAPHS)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" ");
                truncate_chars(&opening, DESCRIPTION_CHARS)
            },
            str::to_string,
        );

    Ok(ArticlePage {
        description,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_meta_description_and_article_body() {
        let html = r#"<html><head>
            <meta name="description" content="Resale prices in Tampines climb again">
            </head><body>
            <header><p>Site menu Bishan</p></header>
            <article><h1>Prices climb</h1><script>var bedok = 1;</script>
            <p>Flats in Tampines sold for record sums.</p></article>
            </body></html>"#;
        let page = parse_article_page(html).unwrap();
        assert_eq!(page.description, "Resale prices in Tampines climb again");
        assert_eq!(page.content, "Prices climb Flats in Tampines sold for record sums.");
        assert!(!page.content.contains("bedok"));
    }

    #[test]
    fn falls_back_to_paragraphs() {
        let html = "<html><body><nav><p>Home News</p></nav>\
            <div><p>First paragraph about Yishun.</p><p>Second one.</p><p>Third.</p></div>\
            </body></html>";
        let page = parse_article_page(html).unwrap();
        assert_eq!(page.description, "First paragraph about Yishun. Second one.");
        assert_eq!(
            page.content,
            "First paragraph about Yishun. Second one. Third."
        );
    }

    #[test]
    fn empty_page_yields_empty_strings() {
        assert_eq!(parse_article_page("").unwrap(), ArticlePage::default());
    }

    #[test]
    fn relative_links_resolve_against_base() {
        let base = parse_base("https://www.hdb.gov.sg").unwrap();
        assert_eq!(
            resolve_link(&base, "/about-us/news/press-release/1").as_deref(),
            Some("https://www.hdb.gov.sg/about-us/news/press-release/1")
        );
        assert_eq!(
            resolve_link(&base, "https://www.ura.gov.sg/x").as_deref(),
            Some("https://www.ura.gov.sg/x")
        );
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("Toa Payoh é", 11), "Toa Payoh é");
        assert_eq!(truncate_chars("Toa Payoh é", 3), "Toa");
    }
}
