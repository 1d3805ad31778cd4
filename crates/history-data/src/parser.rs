//! Upstream row parsing.
//!
//! The browse endpoint returns each section as a fixed-arity array of text
//! cells:
//!
//! | index | content                                                   |
//! |-------|-----------------------------------------------------------|
//! | 0     | term label                                                |
//! | 1     | `<a href="/browse/info/...">CMPT 276 D100</a>`            |
//! | 2     | course title                                              |
//! | 3     | `"<enrolled>/<capacity>"`, enrolled may be `"115 (+31)"`  |
//! | 4     | instructor                                                |
//! | 5     | campus                                                    |
//!
//! All markup handling lives here; everything downstream sees plain
//! [`OfferingRecord`] fields.

use history_core::error::{HistoryError, Result};
use history_core::offering::OfferingRecord;
use tracing::{debug, warn};

/// Number of cells a row must carry.
pub const ROW_ARITY: usize = 6;

const CELL_LINK: usize = 1;
const CELL_TITLE: usize = 2;
const CELL_ENROLLMENT: usize = 3;
const CELL_INSTRUCTOR: usize = 4;
const CELL_CAMPUS: usize = 5;

/// One successfully parsed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub offering: OfferingRecord,
    pub title: String,
}

/// Outcome of parsing every row of one term.
#[derive(Debug, Clone, Default)]
pub struct ParsedRows {
    pub offerings: Vec<OfferingRecord>,
    /// Course title from the last parsed row, if any row parsed.
    pub title: Option<String>,
    /// Rows dropped as malformed.
    pub skipped: usize,
}

// ── Cell extraction ───────────────────────────────────────────────────────────

/// Last whitespace-separated token of the anchor text.
///
/// `<a href="...">CMPT 276 D100</a>` gives `"D100"`.
pub fn extract_section_label(cell: &str) -> Result<String> {
    let open_end = cell
        .find('>')
        .ok_or_else(|| HistoryError::malformed("section cell has no anchor body"))?;
    let close = cell[open_end..]
        .find("</")
        .map(|i| open_end + i)
        .ok_or_else(|| HistoryError::malformed("section cell has no closing tag"))?;

    cell[open_end + 1..close]
        .split_whitespace()
        .last()
        .map(str::to_string)
        .ok_or_else(|| HistoryError::malformed("section anchor text is empty"))
}

/// Quoted value of the first `href="..."` attribute.
pub fn extract_detail_url(cell: &str) -> Result<String> {
    const ATTR: &str = "href=\"";
    let start = cell
        .find(ATTR)
        .map(|i| i + ATTR.len())
        .ok_or_else(|| HistoryError::malformed("section cell has no href"))?;
    let len = cell[start..]
        .find('"')
        .ok_or_else(|| HistoryError::malformed("unterminated href attribute"))?;
    Ok(cell[start..start + len].to_string())
}

/// Split `"<enrolled>/<capacity>"` once on `/`, trimming both halves.
pub fn split_enrollment(cell: &str) -> Result<(String, String)> {
    cell.split_once('/')
        .map(|(enrolled, capacity)| (enrolled.trim().to_string(), capacity.trim().to_string()))
        .ok_or_else(|| HistoryError::malformed(format!("enrollment cell {cell:?} has no '/'")))
}

// ── Rows ──────────────────────────────────────────────────────────────────────

/// Parse one upstream row.
pub fn parse_row<S: AsRef<str>>(row: &[S]) -> Result<ParsedRow> {
    if row.len() < ROW_ARITY {
        return Err(HistoryError::malformed(format!(
            "expected {ROW_ARITY} cells, got {}",
            row.len()
        )));
    }
    let cell = |i: usize| row[i].as_ref();

    let (enrolled_raw, capacity_raw) = split_enrollment(cell(CELL_ENROLLMENT))?;

    Ok(ParsedRow {
        offering: OfferingRecord {
            section: extract_section_label(cell(CELL_LINK))?,
            info_url: extract_detail_url(cell(CELL_LINK))?,
            instructor: cell(CELL_INSTRUCTOR).trim().to_string(),
            enrolled_raw,
            capacity_raw,
            campus: cell(CELL_CAMPUS).trim().to_string(),
        },
        title: cell(CELL_TITLE).trim().to_string(),
    })
}

/// Parse every row, dropping malformed ones.
pub fn parse_rows(rows: &[Vec<String>]) -> ParsedRows {
    let mut parsed = ParsedRows::default();

    for (index, row) in rows.iter().enumerate() {
        match parse_row(row) {
            Ok(ParsedRow { offering, title }) => {
                parsed.offerings.push(offering);
                parsed.title = Some(title);
            }
            Err(e) => {
                warn!(row = index, error = %e, "skipping upstream row");
                parsed.skipped += 1;
            }
        }
    }

    debug!(
        "Parsed {} offerings, skipped {} rows",
        parsed.offerings.len(),
        parsed.skipped
    );

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = r#"<a href="/browse/info/2024fa-cmpt-276-d1">CMPT 276 D100</a>"#;

    fn row(link: &str, enrollment: &str) -> Vec<String> {
        vec![
            "Fall 2024".to_string(),
            link.to_string(),
            "Introduction to Software Engineering".to_string(),
            enrollment.to_string(),
            " Bobby Chan ".to_string(),
            "Burnaby".to_string(),
        ]
    }

    // ── extract_section_label ─────────────────────────────────────────────────

    #[test]
    fn test_extract_section_label() {
        assert_eq!(extract_section_label(LINK).unwrap(), "D100");
    }

    #[test]
    fn test_extract_section_label_single_token() {
        assert_eq!(
            extract_section_label(r#"<a href="/x">  E100 </a>"#).unwrap(),
            "E100"
        );
    }

    #[test]
    fn test_extract_section_label_missing_closing_tag() {
        let err = extract_section_label(r#"<a href="/x">CMPT 276 D100"#).unwrap_err();
        assert!(matches!(err, HistoryError::MalformedRow { .. }));
    }

    #[test]
    fn test_extract_section_label_plain_text() {
        assert!(extract_section_label("CMPT 276 D100").is_err());
    }

    #[test]
    fn test_extract_section_label_empty_anchor() {
        assert!(extract_section_label(r#"<a href="/x">   </a>"#).is_err());
    }

    // ── extract_detail_url ────────────────────────────────────────────────────

    #[test]
    fn test_extract_detail_url() {
        assert_eq!(
            extract_detail_url(LINK).unwrap(),
            "/browse/info/2024fa-cmpt-276-d1"
        );
    }

    #[test]
    fn test_extract_detail_url_missing() {
        assert!(extract_detail_url("<a>CMPT 276 D100</a>").is_err());
        assert!(extract_detail_url(r#"<a href="/browse>CMPT</a>"#).is_err());
    }

    // ── split_enrollment ──────────────────────────────────────────────────────

    #[test]
    fn test_split_enrollment() {
        assert_eq!(
            split_enrollment("96/100").unwrap(),
            ("96".to_string(), "100".to_string())
        );
        assert_eq!(
            split_enrollment("115 (+31) / 100").unwrap(),
            ("115 (+31)".to_string(), "100".to_string())
        );
    }

    #[test]
    fn test_split_enrollment_splits_once() {
        assert_eq!(
            split_enrollment("1/2/3").unwrap(),
            ("1".to_string(), "2/3".to_string())
        );
    }

    #[test]
    fn test_split_enrollment_missing_separator() {
        assert!(matches!(
            split_enrollment("96"),
            Err(HistoryError::MalformedRow { .. })
        ));
    }

    // ── parse_row ─────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_row() {
        let parsed = parse_row(&row(LINK, "115 (+31)/100")).unwrap();
        assert_eq!(parsed.title, "Introduction to Software Engineering");
        assert_eq!(parsed.offering.section, "D100");
        assert_eq!(parsed.offering.info_url, "/browse/info/2024fa-cmpt-276-d1");
        assert_eq!(parsed.offering.instructor, "Bobby Chan");
        assert_eq!(parsed.offering.campus, "Burnaby");
        assert_eq!(parsed.offering.enrolled_count(), 146);
        assert_eq!(parsed.offering.capacity_count(), 100);
    }

    #[test]
    fn test_parse_row_short_row() {
        let short = vec!["Fall 2024", LINK, "title"];
        assert!(parse_row(&short).is_err());
    }

    // ── parse_rows ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_rows_skips_malformed() {
        let rows = vec![
            row(LINK, "96/100"),
            row(LINK, "no separator"),
            row("not a link", "10/20"),
            row(LINK, "50/50"),
        ];
        let parsed = parse_rows(&rows);
        assert_eq!(parsed.offerings.len(), 2);
        assert_eq!(parsed.skipped, 2);
        assert_eq!(
            parsed.title.as_deref(),
            Some("Introduction to Software Engineering")
        );
    }

    #[test]
    fn test_parse_rows_empty() {
        let rows: Vec<Vec<String>> = Vec::new();
        let parsed = parse_rows(&rows);
        assert!(parsed.offerings.is_empty());
        assert!(parsed.title.is_none());
        assert_eq!(parsed.skipped, 0);
    }
}
