use std::sync::OnceLock;

use regex::Regex;

use crate::offering::OfferingRecord;

fn lecture_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][0-9]+$").expect("regex is valid"))
}

/// Whether a section label names a lecture section (`D100`, `E100`).
///
/// Tutorials and labs (`TUT1`, `LAB2A`, `D101A`) do not count toward load.
pub fn is_countable_section(label: &str) -> bool {
    lecture_re().is_match(label)
}

/// Stateless filter selecting the sections that count toward term load.
pub struct SectionClassifier;

impl SectionClassifier {
    pub fn is_countable(offering: &OfferingRecord) -> bool {
        is_countable_section(&offering.section)
    }

    /// Iterate over the countable records in `offerings`.
    pub fn countable(offerings: &[OfferingRecord]) -> impl Iterator<Item = &OfferingRecord> {
        offerings.iter().filter(|o| Self::is_countable(o))
    }
}
