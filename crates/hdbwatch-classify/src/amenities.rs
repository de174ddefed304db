//! Estate and amenity mentions in Lemon8 posts.

use std::collections::BTreeMap;

/// Estates as they are written in posts, title case.
pub const ESTATES: &[&str] = &[
    "Bishan",
    "Bukit Merah",
    "Bukit Timah",
    "Central Area",
    "Geylang",
    "Kallang",
    "Whampoa",
    "Kallang/Whampoa",
    "Marine Parade",
    "Queenstown",
    "Toa Payoh",
    "Ang Mo Kio",
    "Sembawang",
    "Woodlands",
    "Yishun",
    "Hougang",
    "Punggol",
    "Sengkang",
    "Serangoon",
    "Bedok",
    "Pasir Ris",
    "Tampines",
    "Bukit Batok",
    "Bukit Panjang",
    "Choa Chu Kang",
    "Clementi",
    "Jurong East",
    "Jurong West",
    "Tengah",
    "Lim Chu Kang",
    "Admiralty",
];

/// Amenity vocabulary by category.
pub const AMENITY_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "shopping",
        &[
            "Ion Orchard",
            "Ngee Ann City",
            "Paragon",
            "Takashimaya",
            "Plaza Singapura",
            "Wisma Atria",
            "Far East Plaza",
            "Marina Bay Sands",
            "VivoCity",
            "Tampines Mall",
            "JCube",
            "The Clementi Mall",
            "Bukit Panjang Plaza",
            "Bukit Batok Shopping Centre",
        ],
    ),
    (
        "dining",
        &[
            "hawker centre",
            "food court",
            "restaurant",
            "cafe",
            "coffee",
            "bakery",
            "dim sum",
            "chicken rice",
            "laksa",
            "roti prata",
            "nasi lemak",
        ],
    ),
    (
        "transport",
        &[
            "MRT",
            "LRT",
            "bus",
            "taxi",
            "Grab",
            "transport",
            "commute",
            "station",
            "interchange",
            "connectivity",
            "accessibility",
        ],
    ),
    (
        "recreation",
        &[
            "park",
            "gym",
            "swimming",
            "sports",
            "playground",
            "community centre",
            "library",
            "nature reserve",
            "hiking",
            "cycling",
        ],
    ),
    (
        "education",
        &[
            "school",
            "childcare",
            "kindergarten",
            "tuition",
            "university",
            "academic",
        ],
    ),
    (
        "healthcare",
        &[
            "hospital",
            "clinic",
            "medical",
            "healthcare",
            "doctor",
            "pharmacy",
            "polyclinic",
        ],
    ),
    (
        "safety",
        &[
            "safe",
            "security",
            "crime",
            "police",
            "neighborhood watch",
            "peacekeeping",
        ],
    ),
    (
        "community",
        &[
            "community",
            "neighbors",
            "friendly",
            "resident",
            "local",
            "vibrant",
        ],
    ),
];

/// Quality points awarded when any amenity is mentioned.
const AMENITY_BONUS: usize = 50;
const MAX_QUALITY: usize = 100;

/// Estates mentioned in `text`, case-insensitive, in table order.
#[must_use]
pub fn mentioned_estates(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    ESTATES
        .iter()
        .filter(|e| lower.contains(&e.to_lowercase()))
        .map(|e| (*e).to_string())
        .collect()
}

/// Amenities mentioned in `text`, grouped by category. Empty categories are omitted.
#[must_use]
pub fn extract_amenities(text: &str) -> BTreeMap<String, Vec<String>> {
    let lower = text.to_lowercase();
    AMENITY_CATEGORIES
        .iter()
        .filter_map(|(category, items)| {
            let hits: Vec<String> = items
                .iter()
                .filter(|item| lower.contains(&item.to_lowercase()))
                .map(|item| (*item).to_string())
                .collect();
            (!hits.is_empty()).then(|| ((*category).to_string(), hits))
        })
        .collect()
}

/// `len / 10`, plus a bonus when amenities were found, capped at 100.
#[must_use]
pub fn post_quality_score(text: &str, has_amenities: bool) -> u32 {
    let base = text.chars().count() / 10;
    let bonus = if has_amenities { AMENITY_BONUS } else { 0 };
    u32::try_from((base + bonus).min(MAX_QUALITY)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_estates_case_insensitively() {
        let found = mentioned_estates("Moved from TAMPINES to tengah last year");
        assert_eq!(found, vec!["Tampines", "Tengah"]);
    }

    #[test]
    fn kallang_whampoa_matches_all_forms() {
        let found = mentioned_estates("Life in Kallang/Whampoa");
        assert_eq!(found, vec!["Kallang", "Whampoa", "Kallang/Whampoa"]);
    }

    #[test]
    fn amenities_grouped_by_category() {
        let found = extract_amenities("Near the MRT, a hawker centre and a polyclinic");
        assert_eq!(found.len(), 3);
        assert_eq!(found["transport"], vec!["MRT"]);
        assert_eq!(found["dining"], vec!["hawker centre"]);
        assert_eq!(found["healthcare"], vec!["clinic", "polyclinic"]);
    }

    #[test]
    fn no_amenities_is_empty_map() {
        assert!(extract_amenities("").is_empty());
    }

    #[test]
    fn quality_score_caps_at_hundred() {
        assert_eq!(post_quality_score(&"x".repeat(120), false), 12);
        assert_eq!(post_quality_score(&"x".repeat(120), true), 62);
        assert_eq!(post_quality_score(&"x".repeat(5000), true), 100);
    }
}
