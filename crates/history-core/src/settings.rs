use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default upstream browse endpoint.
pub const DEFAULT_BASE_URL: &str = "https://coursys.sfu.ca/browse/";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Multi-year enrollment history for a course
#[derive(Parser, Debug, Clone)]
#[command(
    name = "enrollment-history",
    about = "Multi-year enrollment history for a course",
    version
)]
pub struct Settings {
    /// Department code (e.g. CMPT)
    #[arg(long)]
    pub dept: String,

    /// Course number (e.g. 276)
    #[arg(long)]
    pub number: String,

    /// History range: 1yr, 3yr or 5yr (anything else means 3yr)
    #[arg(long, default_value = "3yr")]
    pub range: String,

    /// Starting year; overrides the terms file
    #[arg(long)]
    pub year: Option<i32>,

    /// Reference data file listing the enrolling / current term
    #[arg(long, env = "ENROLLMENT_HISTORY_TERMS")]
    pub terms_file: Option<PathBuf>,

    /// Upstream browse endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Maximum number of concurrent upstream requests (1-16)
    #[arg(long, default_value = "4", value_parser = clap::value_parser!(u32).range(1..=16))]
    pub concurrency: u32,

    /// Per-term request timeout in seconds (1-120)
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u64).range(1..=120))]
    pub timeout_secs: u64,

    /// Print the parsed sections of a single term identifier instead of the history
    #[arg(long)]
    pub sections: Option<i64>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// `~/.enrollment-history`, or `./.enrollment-history` without a home directory.
pub fn app_dir() -> PathBuf {
    app_dir_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
}

/// Application directory rooted at `base_dir` (used for testing).
pub fn app_dir_in(base_dir: &Path) -> PathBuf {
    base_dir.join(".enrollment-history")
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::parse_from_args(std::env::args_os())
    }

    /// Parse an explicit argument vector. Every run starts from the
    /// documented defaults; nothing is carried over between runs.
    pub fn parse_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::finalize(Settings::parse_from(args))
    }

    /// `~/.enrollment-history/terms.json`.
    pub fn default_terms_file() -> PathBuf {
        app_dir().join("terms.json")
    }

    /// The terms file to read: the configured one, else
    /// [`Settings::default_terms_file`].
    pub fn terms_file_or_default(&self) -> PathBuf {
        self.terms_file
            .clone()
            .unwrap_or_else(Self::default_terms_file)
    }

    fn finalize(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        std::iter::once("enrollment-history")
            .chain(["--dept", "cmpt", "--number", "276"])
            .chain(list.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(args(&[]));

        assert_eq!(settings.dept, "cmpt");
        assert_eq!(settings.number, "276");
        assert_eq!(settings.range, "3yr");
        assert!(settings.year.is_none());
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.concurrency, 4);
        assert_eq!(settings.timeout_secs, 15);
        assert!(settings.sections.is_none());
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_range_is_free_form() {
        let settings = Settings::parse_from(args(&["--range", "7yr"]));
        assert_eq!(settings.range, "7yr");
    }

    #[test]
    fn test_settings_concurrency_bounds() {
        assert!(Settings::try_parse_from(args(&["--concurrency", "0"])).is_err());
        assert!(Settings::try_parse_from(args(&["--concurrency", "17"])).is_err());
        let settings = Settings::parse_from(args(&["--concurrency", "8"]));
        assert_eq!(settings.concurrency, 8);
    }

    #[test]
    fn test_settings_requires_course() {
        assert!(Settings::try_parse_from(["enrollment-history"]).is_err());
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let settings = Settings::parse_from_args(args(&["--debug", "--log-level", "ERROR"]));
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_earlier_run_does_not_leak_into_next() {
        let first = Settings::parse_from_args(args(&[
            "--range",
            "1yr",
            "--base-url",
            "http://stale.invalid/",
        ]));
        assert_eq!(first.range, "1yr");

        let second = Settings::parse_from_args(args(&[]));
        assert_eq!(second.range, "3yr");
        assert_eq!(second.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_terms_file_or_default() {
        let settings = Settings::parse_from(args(&["--terms-file", "/tmp/terms.json"]));
        assert_eq!(
            settings.terms_file_or_default(),
            PathBuf::from("/tmp/terms.json")
        );
    }

    #[test]
    fn test_default_terms_file_under_app_dir() {
        let path = Settings::default_terms_file();
        assert!(path.ends_with(".enrollment-history/terms.json"));
        let settings = Settings::parse_from_args(args(&[]));
        if std::env::var_os("ENROLLMENT_HISTORY_TERMS").is_none() {
            assert_eq!(settings.terms_file_or_default(), path);
        }
    }
}
