//! One upstream-reported section of a course within a term.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single section row after markup has been stripped.
///
/// Counts are kept as the raw upstream text and derived on demand, since the
/// enrolled cell may carry a waitlist suffix (`"115 (+31)"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingRecord {
    /// Section label, e.g. `"D100"`.
    pub section: String,
    pub instructor: String,
    /// Raw enrolled text, possibly with a waitlist suffix.
    pub enrolled_raw: String,
    /// Raw capacity text.
    pub capacity_raw: String,
    pub campus: String,
    /// Detail page link for the section.
    pub info_url: String,
}

fn waitlist_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)(?:\s*\(\+(\d+)\))?\s*$").expect("regex is valid"))
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("regex is valid"))
}

/// Parse `"<base>"` or `"<base> (+<waitlist>)"` into `base + waitlist`.
///
/// Anything else, including counts too large for `u32`, yields 0.
pub fn parse_with_waitlist(raw: &str) -> u32 {
    let Some(caps) = waitlist_re().captures(raw) else {
        return 0;
    };
    let Ok(base) = caps[1].parse::<u32>() else {
        return 0;
    };
    let waitlist = match caps.get(2) {
        Some(m) => match m.as_str().parse::<u32>() {
            Ok(n) => n,
            Err(_) => return 0,
        },
        None => 0,
    };
    base.checked_add(waitlist).unwrap_or(0)
}

/// First run of digits anywhere in `raw`, or 0.
pub fn parse_plain_number(raw: &str) -> u32 {
    digits_re()
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

impl OfferingRecord {
    /// Enrolled students including the waitlist.
    pub fn enrolled_count(&self) -> u32 {
        parse_with_waitlist(&self.enrolled_raw)
    }

    pub fn capacity_count(&self) -> u32 {
        parse_plain_number(&self.capacity_raw)
    }

    /// Whole-number load for this section; 0 when capacity is 0.
    pub fn load_percent(&self) -> u32 {
        let capacity = self.capacity_count();
        if capacity == 0 {
            return 0;
        }
        let percent = f64::from(self.enrolled_count()) * 100.0 / f64::from(capacity);
        (percent + 0.5).floor() as u32
    }
}
