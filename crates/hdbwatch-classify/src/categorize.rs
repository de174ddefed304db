//! Keyword-group to topic-tag rule tables.

/// Tag used when no keyword group matches.
pub const GENERAL: &str = "general";

type Rule = (&'static [&'static str], &'static [&'static str]);

/// Which rule table to apply. Each news family uses its own vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryProfile {
    /// Aggregated market news (Google News feeds).
    Market,
    /// Government press releases.
    Official,
    /// Premium news sites and portals.
    Premium,
}

const MARKET_RULES: &[Rule] = &[
    (
        &["mrt", "lrt", "train", "station", "transport"],
        &["mrt_expansion", "infrastructure"],
    ),
    (&["bto", "launch", "development", "build"], &["new_development"]),
    (
        &["price", "resale", "market", "sold", "million", "psf"],
        &["market_trend", "price_analysis"],
    ),
    (&["policy", "grant", "scheme"], &["policy_change"]),
    (&["guide", "tips", "advice"], &["buyer_guide"]),
    (&["investment", "roi", "rental"], &["investment_insights"]),
];

const OFFICIAL_RULES: &[Rule] = &[
    (
        &["mrt", "lrt", "line", "rail", "station"],
        &["mrt_expansion", "infrastructure"],
    ),
    (
        &["bto", "launch", "flat", "tender", "development"],
        &["new_development"],
    ),
    (
        &["price", "resale", "market", "transaction"],
        &["market_trend", "price_analysis"],
    ),
    (
        &["policy", "grant", "scheme", "regulation"],
        &["policy_change"],
    ),
    (&["masterplan", "planning", "urban"], &["town_planning"]),
];

const PREMIUM_RULES: &[Rule] = &[
    (&["bto", "launch", "ballot"], &["new_development"]),
    (
        &["price", "cost", "valuation", "resale"],
        &["price_analysis"],
    ),
    (&["mrt", "lrt", "transport", "station"], &["infrastructure"]),
    (
        &["policy", "regulation", "rule", "scheme"],
        &["policy_change"],
    ),
    (&["market", "trend", "demand", "supply"], &["market_trend"]),
];

impl CategoryProfile {
    fn rules(self) -> &'static [Rule] {
        match self {
            Self::Market => MARKET_RULES,
            Self::Official => OFFICIAL_RULES,
            Self::Premium => PREMIUM_RULES,
        }
    }
}

/// Topic tags for `title` + `description`, deduplicated in first-hit order.
///
/// Returns `["general"]` when no group matches.
#[must_use]
pub fn categorize(profile: CategoryProfile, title: &str, description: &str) -> Vec<String> {
    let text = format!("{title} {description}").to_lowercase();
    let mut tags: Vec<String> = Vec::new();

    for (words, rule_tags) in profile.rules() {
        if !words.iter().any(|w| text.contains(w)) {
            continue;
        }
        for tag in *rule_tags {
            if !tags.iter().any(|t| t == tag) {
                tags.push((*tag).to_string());
            }
        }
    }

    if tags.is_empty() {
        tags.push(GENERAL.to_string());
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bto_launch_is_new_development() {
        for profile in [
            CategoryProfile::Market,
            CategoryProfile::Official,
            CategoryProfile::Premium,
        ] {
            let tags = categorize(profile, "New BTO launch in Punggol", "");
            assert!(
                tags.contains(&"new_development".to_string()),
                "{profile:?}: {tags:?}"
            );
        }
    }

    #[test]
    fn rail_news_gets_both_tags() {
        let tags = categorize(CategoryProfile::Market, "New MRT station opens", "");
        assert_eq!(tags, vec!["mrt_expansion", "infrastructure"]);
    }

    #[test]
    fn tags_are_not_duplicated() {
        let tags = categorize(
            CategoryProfile::Official,
            "Resale price index and market transactions",
            "resale market",
        );
        assert_eq!(tags, vec!["market_trend", "price_analysis"]);
    }

    #[test]
    fn official_profile_recognises_town_planning() {
        let tags = categorize(CategoryProfile::Official, "Draft Masterplan unveiled", "");
        assert!(tags.contains(&"town_planning".to_string()));
    }

    #[test]
    fn no_match_is_general() {
        assert_eq!(
            categorize(CategoryProfile::Premium, "Weather update", ""),
            vec![GENERAL]
        );
        assert_eq!(categorize(CategoryProfile::Market, "", ""), vec![GENERAL]);
    }
}
