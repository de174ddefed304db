pub mod client;
pub mod error;
pub mod feed;
pub mod html;
pub mod ids;
pub mod rate_limit;
pub mod sources;

pub use client::FetchClient;
pub use error::ScraperError;
pub use feed::{parse_feed, FeedItem};
pub use html::{parse_article_page, truncate_chars, ArticlePage};
pub use rate_limit::{is_rate_limited, Pacing};
