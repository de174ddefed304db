//! RSS feed parsing.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use scraper::Html;

use crate::error::ScraperError;

/// One `<item>` of an RSS feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: Option<String>,
    /// Text of the item's `<source>` element, the publisher's name on
    /// aggregator feeds.
    pub source: Option<String>,
}

impl FeedItem {
    /// `pubDate` as UTC, or `None` when absent or unparseable.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.pub_date.as_deref().and_then(parse_pub_date)
    }
}

/// Parse an RFC 2822 date such as `Mon, 06 Jan 2026 08:00:00 GMT`.
#[must_use]
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse the first `max_items` `<item>` elements of an RSS document.
///
/// Items without a title or link still count toward `max_items` but are not
/// returned. HTML inside descriptions is stripped.
///
/// # Errors
///
/// Returns [`ScraperError::Xml`] if the XML is malformed.
pub fn parse_feed(xml: &str, max_items: usize) -> Result<Vec<FeedItem>, ScraperError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut seen = 0usize;
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut item = FeedItem::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" {
                    in_item = true;
                    item = FeedItem::default();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" && in_item {
                    in_item = false;
                    seen += 1;
                    let done = std::mem::take(&mut item);
                    if !done.title.is_empty() && !done.link.is_empty() {
                        items.push(done);
                    }
                    if seen >= max_items {
                        break;
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    assign_field(&mut item, &current_tag, text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    assign_field(&mut item, &current_tag, text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ScraperError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

fn assign_field(item: &mut FeedItem, tag: &str, text: String) {
    match tag {
        "title" => item.title = text.trim().to_string(),
        "link" => item.link = text.trim().to_string(),
        "description" => item.description = strip_html(&text),
        "pubDate" => item.pub_date = Some(text),
        "source" => item.source = Some(text.trim().to_string()),
        _ => {}
    }
}

/// Text of an HTML fragment with entities decoded and whitespace collapsed.
pub(crate) fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
