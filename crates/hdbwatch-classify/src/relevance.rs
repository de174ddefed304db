//! Required/excluded keyword gating for property news.

/// A pair of fixed keyword lists. Keywords are lowercase.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceFilter {
    pub required: &'static [&'static str],
    pub excluded: &'static [&'static str],
}

/// Outcome of [`RelevanceFilter::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relevance {
    /// An excluded keyword was present.
    Excluded(&'static str),
    /// No required keyword was present.
    NoRequiredKeyword,
    /// Relevant; carries every required keyword that matched, in table order.
    Relevant(Vec<&'static str>),
}

impl Relevance {
    #[must_use]
    pub fn is_relevant(&self) -> bool {
        matches!(self, Self::Relevant(_))
    }
}

impl RelevanceFilter {
    /// Strict filter for government press releases: housing or rail expansion only.
    pub const OFFICIAL: Self = Self {
        required: &[
            "hdb",
            "flat",
            "bto",
            "housing",
            "resale",
            "property",
            "apartment",
            "unit",
            "room",
            "estate",
            "town",
            "neighbourhood",
            "lease",
            "valuation",
            "price",
            "purchase",
            "buyer",
            "seller",
            "grant",
            "subsidy",
            "ballot",
            "launch",
            "cpf",
            "condo",
            "condominium",
            "home",
            "real estate",
            "mortgage",
            "mrt expansion",
            "new mrt line",
            "mrt station",
            "rail expansion",
            "thomson-east coast line",
            "circle line",
            "downtown line",
            "jurong region line",
            "cross island line",
        ],
        excluded: &[
            "bus driver",
            "vocational licence",
            "driving licence",
            "bus service",
            "bus captain",
            "bus operation",
            "bus route",
            "bus interchange",
            "bus stop",
            "bus depot",
            "feeder bus",
            "express bus",
            "excellence award",
            "safety award",
            "service award",
            "best practice",
            "achiever",
            "outstanding",
            "award ceremony",
            "recognition",
            "celebrates",
            "commendation",
            "honor",
            "honours",
            "recruitment",
            "job fair",
            "career",
            "internship",
            "hiring",
            "scholarship",
            "training program",
            "workshop",
            "road safety",
            "traffic light",
            "pedestrian crossing",
            "cycling",
            "bicycle",
            "pcn",
            "park connector",
            "traffic management",
            "road works",
            "car park",
            "factsheet",
            "advisory",
            "reminder",
            "notice",
            "circular",
            "challenge shield",
            "mot challenge",
            "masterplan advisory",
        ],
    };

    /// Filter for news media and aggregated feeds.
    pub const NEWS: Self = Self {
        required: &[
            "hdb",
            "flat",
            "bto",
            "housing",
            "resale",
            "property",
            "apartment",
            "unit",
            "room",
            "estate",
            "town",
            "neighbourhood",
            "lease",
            "valuation",
            "price",
            "sale",
            "purchase",
            "buyer",
            "seller",
            "grant",
            "subsidy",
            "eligibility",
            "ballot",
            "launch",
            "cpf",
        ],
        excluded: &[
            "bus driver",
            "vocational licence",
            "driving",
            "bus service",
            "mrt station staff",
            "train operator",
            "bus captain",
            "excellence award",
            "safety award",
            "service award",
            "recruitment",
            "job fair",
            "career",
            "internship",
            "road safety",
            "traffic light",
            "pedestrian crossing",
            "cycling",
            "bicycle",
            "pcn",
            "park connector",
        ],
    };

    /// Classify `title` + `description`.
    ///
    /// Exclusion is checked first and always wins.
    #[must_use]
    pub fn evaluate(&self, title: &str, description: &str) -> Relevance {
        let text = format!("{title} {description}").to_lowercase();

        if let Some(hit) = self.excluded.iter().find(|kw| text.contains(*kw)) {
            return Relevance::Excluded(hit);
        }

        let found: Vec<&'static str> = self
            .required
            .iter()
            .copied()
            .filter(|kw| text.contains(kw))
            .collect();
        if found.is_empty() {
            Relevance::NoRequiredKeyword
        } else {
            Relevance::Relevant(found)
        }
    }

    #[must_use]
    pub fn is_relevant(&self, title: &str, description: &str) -> bool {
        self.evaluate(title, description).is_relevant()
    }

    /// The first `limit` required keywords present in `text`, in table order.
    #[must_use]
    pub fn matched_required(&self, text: &str, limit: usize) -> Vec<String> {
        let text = text.to_lowercase();
        self.required
            .iter()
            .filter(|kw| text.contains(*kw))
            .take(limit)
            .map(|kw| (*kw).to_string())
            .collect()
    }
}

/// Official-source relevance check on title and description.
#[must_use]
pub fn is_property_related(title: &str, description: &str) -> bool {
    RelevanceFilter::OFFICIAL.is_relevant(title, description)
}

/// True when `needle` occurs in `haystack` bounded by non-alphanumeric
/// characters or the string ends. Both sides are expected to be lowercase.
pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
