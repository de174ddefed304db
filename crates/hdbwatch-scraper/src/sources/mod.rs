//! Per-source collectors.

pub mod google_news;
pub mod lemon8;
pub mod official;
pub mod premium;
pub mod reddit;
mod reddit_helpers;

pub use google_news::collect_google_news;
pub use lemon8::{
    analyze_raw_post, parse_analysis, review_from_analysis, AnthropicAnalyzer, PostAnalysis,
    PostAnalyzer, LEMON8_PLATFORM,
};
pub use official::{collect_official, Agency};
pub use premium::{collect_premium, PremiumSite};
pub use reddit::{PostData, RedditClient, RedditCredentials, RedditRun, SUBREDDITS};
pub use reddit_helpers::{build_queries, review_from_post, REDDIT_PLATFORM};
