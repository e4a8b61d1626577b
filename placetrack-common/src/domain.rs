//! Domain name normalization
//!
//! Free-form domain labels arrive from several sources (batch records,
//! student records, dashboard query strings) with inconsistent spellings.
//! Every aggregation and report groups by the canonical short key, so the
//! mapping lives here and nowhere else.

/// The six canonical domain keys, in the fixed order used by every
/// aggregation response. Result maps are pre-seeded from this list so a
/// key with no matching rows still appears with a count of 0.
pub const CANONICAL_KEYS: [&str; 6] = [
    "fullstack",
    "data",
    "marketing",
    "sap",
    "banking",
    "devops",
];

/// The four EPIC proficiency statuses, in display order.
pub const EPIC_STATUSES: [&str; 4] = ["Excellent", "Proficient", "Ideal", "Capable"];

/// Month abbreviations in fixed Jan-Dec order, used verbatim by the
/// placement graph endpoints.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Map a stored domain label to its canonical key.
///
/// Unrecognized labels fall back silently to a slug (lowercased,
/// whitespace stripped) rather than failing, so ad hoc domains still
/// appear in aggregated output under a derived key.
pub fn canonical_key(label: &str) -> String {
    match label {
        "Full Stack" | "Full Stack Development" => "fullstack".to_string(),
        "Data Analytics" | "Data Analytics & Science" => "data".to_string(),
        "Digital Marketing" | "Marketing" => "marketing".to_string(),
        "SAP" => "sap".to_string(),
        "Banking" | "Banking & Financial Services" => "banking".to_string(),
        "DevOps" => "devops".to_string(),
        other => other
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase(),
    }
}

/// Map a canonical key to the two-letter batch number prefix.
///
/// `dataanalytics` is accepted as a request-side alias for `data`.
pub fn batch_prefix(key: &str) -> Option<&'static str> {
    match key {
        "fullstack" => Some("FS"),
        "data" | "dataanalytics" => Some("DA"),
        "marketing" => Some("MK"),
        "sap" => Some("SA"),
        "banking" => Some("BK"),
        "devops" => Some("DV"),
        _ => None,
    }
}

/// Short chart label used by the owner dashboard graphs.
pub fn chart_label(key: &str) -> &'static str {
    match key {
        "fullstack" => "FSD",
        "data" => "DADS",
        "marketing" => "MK",
        "sap" => "SAP",
        "banking" => "BFS",
        "devops" => "DV",
        _ => "",
    }
}

/// Domain keys accepted by the SME dashboard query parameter.
///
/// The SME surface predates the `data` key and still says `dataanalytics`.
pub const SME_DASHBOARD_KEYS: [&str; 6] = [
    "fullstack",
    "dataanalytics",
    "marketing",
    "devops",
    "sap",
    "banking",
];

/// Display name for an SME dashboard domain key.
pub fn dashboard_label(key: &str) -> Option<&'static str> {
    match key {
        "fullstack" => Some("Full Stack"),
        "dataanalytics" => Some("Data Analytics"),
        "marketing" => Some("Digital Marketing"),
        "devops" => Some("DevOps"),
        "banking" => Some("Banking"),
        "sap" => Some("SAP"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_to_documented_keys() {
        assert_eq!(canonical_key("Full Stack"), "fullstack");
        assert_eq!(canonical_key("Full Stack Development"), "fullstack");
        assert_eq!(canonical_key("Data Analytics"), "data");
        assert_eq!(canonical_key("Data Analytics & Science"), "data");
        assert_eq!(canonical_key("Digital Marketing"), "marketing");
        assert_eq!(canonical_key("Marketing"), "marketing");
        assert_eq!(canonical_key("SAP"), "sap");
        assert_eq!(canonical_key("Banking"), "banking");
        assert_eq!(canonical_key("Banking & Financial Services"), "banking");
        assert_eq!(canonical_key("DevOps"), "devops");
    }

    #[test]
    fn unknown_label_falls_back_to_slug() {
        assert_eq!(canonical_key("Robotics"), "robotics");
        assert_eq!(canonical_key("Cyber Security"), "cybersecurity");
        assert_eq!(canonical_key(""), "");
    }

    #[test]
    fn batch_prefixes() {
        assert_eq!(batch_prefix("fullstack"), Some("FS"));
        assert_eq!(batch_prefix("data"), Some("DA"));
        assert_eq!(batch_prefix("dataanalytics"), Some("DA"));
        assert_eq!(batch_prefix("marketing"), Some("MK"));
        assert_eq!(batch_prefix("sap"), Some("SA"));
        assert_eq!(batch_prefix("banking"), Some("BK"));
        assert_eq!(batch_prefix("devops"), Some("DV"));
        assert_eq!(batch_prefix("robotics"), None);
    }

    #[test]
    fn chart_labels_cover_all_canonical_keys() {
        for key in CANONICAL_KEYS {
            assert!(!chart_label(key).is_empty());
        }
    }

    #[test]
    fn dashboard_labels_cover_sme_keys() {
        for key in SME_DASHBOARD_KEYS {
            assert!(dashboard_label(key).is_some());
        }
        assert_eq!(dashboard_label("data"), None);
    }
}
