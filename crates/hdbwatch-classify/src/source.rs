//! Canonical publisher lookup for aggregated news items.

use hdbwatch_core::{SourceInfo, SourceType};


const AGGREGATOR_URL: &str = "https://news.google.com";
const UNKNOWN_SOURCE: &str = "Unknown Source";

struct Publisher {
    name: &'static str,
    url: &'static str,
    source_type: SourceType,
}

impl Publisher {
    fn info(&self) -> SourceInfo {
        SourceInfo::new(self.name, self.url, self.source_type)
    }
}

const NINETY_NINE: Publisher = Publisher {
    name: "99.co",
    url: "https://www.99.co",
    source_type: SourceType::PropertyPortal,
};
const PROPERTY_GURU: Publisher = Publisher {
    name: "PropertyGuru",
    url: "https://www.propertyguru.com.sg",
    source_type: SourceType::PropertyPortal,
};
const EDGE_PROP: Publisher = Publisher {
    name: "EdgeProp",
    url: "https://www.edgeprop.sg",
    source_type: SourceType::PropertyPortal,
};
const PROPERTY_GURU_SG: Publisher = Publisher {
    name: "PropertyGuru Singapore",
    url: "https://www.propertyguru.com.sg",
    source_type: SourceType::PropertyPortal,
};
const SRX: Publisher = Publisher {
    name: "SRX",
    url: "https://www.srx.com.sg",
    source_type: SourceType::PropertyPortal,
};
const STRAITS_TIMES: Publisher = Publisher {
    name: "The Straits Times",
    url: "https://www.straitstimes.com",
    source_type: SourceType::NewsMedia,
};
const CNA: Publisher = Publisher {
    name: "CNA",
    url: "https://www.channelnewsasia.com",
    source_type: SourceType::NewsMedia,
};
const TODAY: Publisher = Publisher {
    name: "TODAY",
    url: "https://www.todayonline.com",
    source_type: SourceType::NewsMedia,
};
const BUSINESS_TIMES: Publisher = Publisher {
    name: "Business Times",
    url: "https://www.businesstimes.com.sg",
    source_type: SourceType::NewsMedia,
};
const EDGE_SINGAPORE: Publisher = Publisher {
    name: "The Edge Singapore",
    url: "https://www.theedgesingapore.com",
    source_type: SourceType::NewsMedia,
};
const YAHOO_SG: Publisher = Publisher {
    name: "Yahoo Singapore",
    url: "https://sg.news.yahoo.com",
    source_type: SourceType::NewsMedia,
};
const HDB: Publisher = Publisher {
    name: "HDB",
    url: "https://www.hdb.gov.sg",
    source_type: SourceType::Government,
};
const URA: Publisher = Publisher {
    name: "URA",
    url: "https://www.ura.gov.sg",
    source_type: SourceType::Government,
};
const LTA: Publisher = Publisher {
    name: "LTA",
    url: "https://www.lta.gov.sg",
    source_type: SourceType::Government,
};

/// URL needles checked in order; the first hit wins.
const URL_RULES: &[(&[&str], &Publisher)] = &[
    (&["99.co", "99co"], &NINETY_NINE),
    (&["propertyguru"], &PROPERTY_GURU),
    (&["edgeprop"], &EDGE_PROP),
    (&["srx.com"], &SRX),
    (&["straitstimes"], &STRAITS_TIMES),
    (&["channelnewsasia", "cna.com"], &CNA),
    (&["todayonline", "today.com"], &TODAY),
    (&["businesstimes"], &BUSINESS_TIMES),
    (&["theedgesingapore"], &EDGE_SINGAPORE),
    (&["yahoo"], &YAHOO_SG),
    (&["hdb.gov"], &HDB),
    (&["ura.gov"], &URA),
    (&["lta.gov"], &LTA),
];

/// Label aliases checked in order after the URL rules.
const LABEL_ALIASES: &[(&[&str], &Publisher)] = &[
    (&["99co", "99.co", "ninetynine.co"], &NINETY_NINE),
    (&["propertyguru", "property guru", "pg"], &PROPERTY_GURU),
    (&["edgeprop", "edge prop", "edge property"], &EDGE_PROP),
    (&["propertyguru singapore"], &PROPERTY_GURU_SG),
    (&["srx", "srx.com.sg"], &SRX),
    (&["straits times", "st", "straitstimes"], &STRAITS_TIMES),
    (&["cna", "channel news asia", "channelnewsasia"], &CNA),
    (&["today", "todayonline"], &TODAY),
    (&["business times", "bt", "businesstimes"], &BUSINESS_TIMES),
    (&["edge singapore", "the edge"], &EDGE_SINGAPORE),
    (&["yahoo singapore", "yahoo sg"], &YAHOO_SG),
    (&["hdb", "housing development board"], &HDB),
    (&["ura", "urban redevelopment authority"], &URA),
    (&["lta", "land transport authority"], &LTA),
];

/// Resolve the real publisher of an item from its feed label and link.
///
/// The link is checked first, then the label aliases. Anything unmatched is
/// attributed to the label itself (or "Unknown Source") as a news aggregator.
#[must_use]
pub fn identify_source(label: &str, url: &str) -> SourceInfo {
    let url_lower = url.to_lowercase();
    if !url_lower.is_empty() {
        if let Some((_, publisher)) = URL_RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| url_lower.contains(n)))
        {
            return publisher.info();
        }
    }

    let label_lower = label.to_lowercase();
    if let Some((_, publisher)) = LABEL_ALIASES
        .iter()
        .find(|(aliases, _)| aliases.iter().any(|alias| label_lower.contains(alias)))
    {
        return publisher.info();
    }

    let name = if label.trim().is_empty() {
        UNKNOWN_SOURCE
    } else {
        label.trim()
    };
    SourceInfo::new(name, AGGREGATOR_URL, SourceType::NewsAggregator)
}
