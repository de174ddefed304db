//! Text classification for housing news and living-experience reviews.
//!
//! Everything here is pure and infallible: fixed keyword tables, a place-name
//! gazetteer, a lexicon polarity scorer, and the rule tables that turn those
//! hits into categories and impact estimates. Empty input yields the empty or
//! default result.

pub mod amenities;
pub mod categorize;
pub mod gazetteer;
pub mod impact;
pub mod keywords;
pub mod pipeline;
pub mod relevance;
pub mod review;
pub mod scorer;
pub mod source;

pub use categorize::{categorize, CategoryProfile};
pub use gazetteer::{extract_locations, match_locations, merge_locations, region_for};
pub use impact::{assess_impact, ImpactProfile};
pub use keywords::extract_keywords;
pub use pipeline::{Classification, Pipeline};
pub use relevance::{is_property_related, Relevance, RelevanceFilter};
pub use scorer::{analyze_sentiment, compound_score, score_with, LexiconScorer, PolarityScorer};
pub use source::identify_source;
