//! The article pipeline: relevance, locations, categories, sentiment, impact.

use hdbwatch_core::{ImpactAssessment, Sentiment};

use crate::categorize::{categorize, CategoryProfile};
use crate::gazetteer::extract_locations;
use crate::impact::{assess_impact, ImpactProfile};
use crate::relevance::{Relevance, RelevanceFilter};
use crate::scorer::{score_with, LexiconScorer, PolarityScorer};

/// Output for one relevant item.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub categories: Vec<String>,
    pub locations: Vec<String>,
    pub sentiment: Sentiment,
    pub impact: ImpactAssessment,
}

/// A configured pipeline for one family of sources.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<S = LexiconScorer> {
    pub filter: RelevanceFilter,
    pub categories: CategoryProfile,
    pub impact: ImpactProfile,
    pub scorer: S,
}

impl Pipeline {
    /// Government press releases.
    pub const OFFICIAL: Self = Self {
        filter: RelevanceFilter::OFFICIAL,
        categories: CategoryProfile::Official,
        impact: ImpactProfile::Official,
        scorer: LexiconScorer,
    };

    /// Aggregated market news feeds.
    pub const MARKET: Self = Self {
        filter: RelevanceFilter::NEWS,
        categories: CategoryProfile::Market,
        impact: ImpactProfile::Market,
        scorer: LexiconScorer,
    };

    /// Premium news sites and portals.
    pub const PREMIUM: Self = Self {
        filter: RelevanceFilter::NEWS,
        categories: CategoryProfile::Premium,
        impact: ImpactProfile::Market,
        scorer: LexiconScorer,
    };
}

impl<S: PolarityScorer> Pipeline<S> {
    /// Classify one item, or `None` when it fails the relevance filter.
    ///
    /// Sentiment is scored on the title; locations and categories use
    /// title and description.
    pub fn run(&self, title: &str, description: &str) -> Option<Classification> {
        match self.filter.evaluate(title, description) {
            Relevance::Relevant(found) => {
                tracing::debug!(title, keywords = ?found, "relevant");
            }
            verdict => {
                tracing::debug!(title, verdict = ?verdict, "skipping irrelevant item");
                return None;
            }
        }

        let locations = extract_locations(&format!("{title} {description}"));
        Some(self.classify_relevant(title, description, locations))
    }

    /// Run steps 3 to 6 with caller-supplied locations, skipping the filter.
    pub fn classify_relevant(
        &self,
        title: &str,
        description: &str,
        locations: Vec<String>,
    ) -> Classification {
        let categories = categorize(self.categories, title, description);
        let sentiment = score_with(&self.scorer, title);
        let impact = assess_impact(self.impact, &categories, &sentiment, &locations);
        Classification {
            categories,
            locations,
            sentiment,
            impact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdbwatch_core::{PredictedImpact, SentimentLabel};

    #[test]
    fn bto_launch_in_punggol() {
        let c = Pipeline::OFFICIAL
            .run("New BTO launch in Punggol", "")
            .expect("relevant");
        assert!(c.categories.contains(&"new_development".to_string()));
        assert!(c.locations.contains(&"PUNGGOL".to_string()));
        assert_eq!(c.sentiment.label, SentimentLabel::Neutral);
        assert_eq!(c.impact.predicted_impact, PredictedImpact::ModeratePositive);
        assert_eq!(c.impact.timeframe, "2025-2030");
    }

    #[test]
    fn irrelevant_item_is_dropped() {
        assert!(Pipeline::OFFICIAL
            .run("Bus driver wins excellence award", "")
            .is_none());
        assert!(Pipeline::MARKET.run("Stocks close higher", "").is_none());
    }

    #[test]
    fn no_town_is_nationwide() {
        let c = Pipeline::PREMIUM
            .run("Resale prices ease for third quarter", "")
            .expect("relevant");
        assert_eq!(c.locations, vec!["NATIONWIDE".to_string()]);
        assert_eq!(c.impact.affected_areas, vec!["NATIONWIDE".to_string()]);
    }

    struct AlwaysNegative;

    impl PolarityScorer for AlwaysNegative {
        fn compound(&self, _text: &str) -> f64 {
            -0.8
        }
    }

    #[test]
    fn custom_scorer_drives_impact() {
        let pipeline = Pipeline {
            filter: RelevanceFilter::NEWS,
            categories: CategoryProfile::Market,
            impact: ImpactProfile::Market,
            scorer: AlwaysNegative,
        };
        let c = pipeline
            .run("Resale flat prices in Bedok", "")
            .expect("relevant");
        assert_eq!(c.sentiment.label, SentimentLabel::Negative);
        assert_eq!(c.impact.predicted_impact, PredictedImpact::ModerateNegative);
    }
}
