//! HDB town gazetteer and region table.

use hdbwatch_core::NATIONWIDE;

/// Recognised place names, uppercase, alphabetical.
pub const TOWNS: &[&str] = &[
    "ADMIRALTY",
    "ANG MO KIO",
    "BEDOK",
    "BISHAN",
    "BOON LAY",
    "BUKIT BATOK",
    "BUKIT MERAH",
    "BUKIT PANJANG",
    "BUKIT TIMAH",
    "CENTRAL AREA",
    "CHANGI",
    "CHOA CHU KANG",
    "CLEMENTI",
    "GEYLANG",
    "HOUGANG",
    "JURONG EAST",
    "JURONG WEST",
    "KALLANG",
    "LIM CHU KANG",
    "MARINE PARADE",
    "PASIR RIS",
    "PUNGGOL",
    "QUEENSTOWN",
    "SEMBAWANG",
    "SENGKANG",
    "SERANGOON",
    "TAMPINES",
    "TENGAH",
    "TOA PAYOH",
    "WHAMPOA",
    "WOODLANDS",
    "YEW TEE",
    "YISHUN",
];

/// Planning regions and their towns. Sembawang and Woodlands appear under
/// both North and North-West; lookups return the first region listed.
pub const REGIONS: &[(&str, &[&str])] = &[
    (
        "Central",
        &[
            "BISHAN",
            "BUKIT MERAH",
            "BUKIT TIMAH",
            "CENTRAL AREA",
            "GEYLANG",
            "KALLANG",
            "MARINE PARADE",
            "QUEENSTOWN",
            "TOA PAYOH",
        ],
    ),
    ("North", &["ANG MO KIO", "SEMBAWANG", "WOODLANDS", "YISHUN"]),
    (
        "North-East",
        &["HOUGANG", "PUNGGOL", "SENGKANG", "SERANGOON"],
    ),
    ("East", &["BEDOK", "PASIR RIS", "TAMPINES"]),
    (
        "West",
        &[
            "BUKIT BATOK",
            "BUKIT PANJANG",
            "CHOA CHU KANG",
            "CLEMENTI",
            "JURONG EAST",
            "JURONG WEST",
        ],
    ),
    (
        "North-West",
        &["LIM CHU KANG", "SEMBAWANG", "WOODLANDS", "ADMIRALTY"],
    ),
];

/// Gazetteer names found in `text`, in gazetteer order. May be empty.
#[must_use]
pub fn match_locations(text: &str) -> Vec<String> {
    let upper = text.to_uppercase();
    TOWNS
        .iter()
        .filter(|town| upper.contains(*town))
        .map(|town| (*town).to_string())
        .collect()
}

/// Gazetteer names found in `text`, or `[NATIONWIDE]` when none match.
#[must_use]
pub fn extract_locations(text: &str) -> Vec<String> {
    let found = match_locations(text);
    if found.is_empty() {
        vec![NATIONWIDE.to_string()]
    } else {
        found
    }
}

/// Union of two location lists, deduplicated, first-seen order.
///
/// The `NATIONWIDE` sentinel is dropped when a real town is present and
/// returned alone when nothing else is.
#[must_use]
pub fn merge_locations(first: &[String], second: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for loc in first.iter().chain(second) {
        if loc != NATIONWIDE && !merged.contains(loc) {
            merged.push(loc.clone());
        }
    }
    if merged.is_empty() {
        merged.push(NATIONWIDE.to_string());
    }
    merged
}

/// The first region (in table order) containing any of `locations`.
#[must_use]
pub fn region_for(locations: &[String]) -> Option<&'static str> {
    REGIONS
        .iter()
        .find(|(_, towns)| towns.iter().any(|t| locations.iter().any(|l| l == t)))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        assert_eq!(
            extract_locations("New BTO launch in Punggol"),
            vec!["PUNGGOL".to_string()]
        );
    }

    #[test]
    fn unmatched_text_is_nationwide() {
        assert_eq!(
            extract_locations("Resale prices climb again"),
            vec![NATIONWIDE.to_string()]
        );
        assert_eq!(extract_locations(""), vec![NATIONWIDE.to_string()]);
    }

    #[test]
    fn repeated_mentions_are_deduplicated() {
        let found = match_locations("Tampines vs Bedok, or tampines again");
        assert_eq!(found, vec!["BEDOK".to_string(), "TAMPINES".to_string()]);
    }

    #[test]
    fn merge_drops_sentinel_when_town_present() {
        let a = vec![NATIONWIDE.to_string()];
        let b = vec!["BISHAN".to_string(), "BISHAN".to_string()];
        assert_eq!(merge_locations(&a, &b), vec!["BISHAN".to_string()]);
        assert_eq!(merge_locations(&a, &[]), vec![NATIONWIDE.to_string()]);
    }

    #[test]
    fn region_lookup_uses_table_order() {
        assert_eq!(region_for(&["PUNGGOL".to_string()]), Some("North-East"));
        assert_eq!(region_for(&["WOODLANDS".to_string()]), Some("North"));
        assert_eq!(region_for(&["ADMIRALTY".to_string()]), Some("North-West"));
        assert_eq!(region_for(&[NATIONWIDE.to_string()]), None);
    }

    #[test]
    fn every_region_town_is_in_gazetteer() {
        for (_, towns) in REGIONS {
            for town in *towns {
                assert!(TOWNS.contains(town), "{town} missing from TOWNS");
            }
        }
    }
}
