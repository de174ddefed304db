//! Coarse market-impact estimate from categories, sentiment and locations.

use hdbwatch_core::{ImpactAssessment, PredictedImpact, Sentiment, SentimentLabel, NATIONWIDE};

const HIGH_IMPACT: &[&str] = &["mrt_expansion", "infrastructure", "new_development"];
const MODERATE_IMPACT: &[&str] = &["investment_insights", "buyer_guide", "policy_change"];
const LONG_HORIZON: &[&str] = &["mrt_expansion", "new_development"];

const LONG_TIMEFRAME: &str = "2025-2030";
const SHORT_TIMEFRAME: &str = "2024-2026";

/// Which rule table to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactProfile {
    /// News rules: moderate-impact categories are always moderately positive.
    Market,
    /// Government rules: policy changes can be high impact.
    Official,
}

fn has_any(categories: &[String], set: &[&str]) -> bool {
    categories.iter().any(|c| set.contains(&c.as_str()))
}

/// Apply the impact rule table.
#[must_use]
pub fn assess_impact(
    profile: ImpactProfile,
    categories: &[String],
    sentiment: &Sentiment,
    locations: &[String],
) -> ImpactAssessment {
    let positive = sentiment.label == SentimentLabel::Positive;
    let scaled = if positive {
        PredictedImpact::HighPositive
    } else {
        PredictedImpact::ModeratePositive
    };

    let predicted_impact = if has_any(categories, HIGH_IMPACT) {
        scaled
    } else {
        match profile {
            ImpactProfile::Market if has_any(categories, MODERATE_IMPACT) => {
                PredictedImpact::ModeratePositive
            }
            ImpactProfile::Official if has_any(categories, &["policy_change"]) => scaled,
            _ if sentiment.label == SentimentLabel::Negative => PredictedImpact::ModerateNegative,
            _ => PredictedImpact::Neutral,
        }
    };

    let timeframe = if has_any(categories, LONG_HORIZON) {
        LONG_TIMEFRAME
    } else {
        SHORT_TIMEFRAME
    };

    let affected_areas = if locations.is_empty() {
        vec![NATIONWIDE.to_string()]
    } else {
        locations.to_vec()
    };

    ImpactAssessment {
        predicted_impact,
        affected_areas,
        timeframe: timeframe.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn positive_development_is_high_positive() {
        let impact = assess_impact(
            ImpactProfile::Market,
            &cats(&["new_development"]),
            &Sentiment::from_compound(0.5),
            &["PUNGGOL".to_string()],
        );
        assert_eq!(impact.predicted_impact, PredictedImpact::HighPositive);
        assert_eq!(impact.timeframe, LONG_TIMEFRAME);
        assert_eq!(impact.affected_areas, vec!["PUNGGOL".to_string()]);
    }

    #[test]
    fn negative_development_is_still_moderate_positive() {
        let impact = assess_impact(
            ImpactProfile::Market,
            &cats(&["new_development"]),
            &Sentiment::from_compound(-0.8),
            &[],
        );
        assert_eq!(impact.predicted_impact, PredictedImpact::ModeratePositive);
    }

    #[test]
    fn neutral_infrastructure_is_moderate_positive() {
        let impact = assess_impact(
            ImpactProfile::Official,
            &cats(&["infrastructure"]),
            &Sentiment::neutral(),
            &[],
        );
        assert_eq!(impact.predicted_impact, PredictedImpact::ModeratePositive);
        assert_eq!(impact.timeframe, SHORT_TIMEFRAME);
        assert_eq!(impact.affected_areas, vec![NATIONWIDE.to_string()]);
    }

    #[test]
    fn policy_change_depends_on_profile() {
        let positive = Sentiment::from_compound(0.4);
        let market = assess_impact(
            ImpactProfile::Market,
            &cats(&["policy_change"]),
            &positive,
            &[],
        );
        let official = assess_impact(
            ImpactProfile::Official,
            &cats(&["policy_change"]),
            &positive,
            &[],
        );
        assert_eq!(market.predicted_impact, PredictedImpact::ModeratePositive);
        assert_eq!(official.predicted_impact, PredictedImpact::HighPositive);
    }

    #[test]
    fn official_ignores_buyer_guide() {
        let impact = assess_impact(
            ImpactProfile::Official,
            &cats(&["buyer_guide"]),
            &Sentiment::neutral(),
            &[],
        );
        assert_eq!(impact.predicted_impact, PredictedImpact::Neutral);
    }

    #[test]
    fn negative_general_news_is_moderate_negative() {
        let impact = assess_impact(
            ImpactProfile::Market,
            &cats(&["general"]),
            &Sentiment::from_compound(-0.6),
            &[],
        );
        assert_eq!(impact.predicted_impact, PredictedImpact::ModerateNegative);
    }
}
