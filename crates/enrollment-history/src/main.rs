mod bootstrap;
mod report;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use history_core::range::HistoryRange;
use history_core::settings::Settings;
use history_core::term::TermId;
use history_runtime::fetcher::CourseSysClient;
use history_runtime::terms::{FixedYear, TermCatalog, TermSource};
use history_runtime::walker::HistoryWalker;

use crate::report::{to_json, HistoryReport, SectionsReport};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("enrollment-history v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Course: {} {}, range: {}, upstream: {}",
        settings.dept.to_uppercase(),
        settings.number,
        settings.range,
        settings.base_url
    );

    let timeout = Duration::from_secs(settings.timeout_secs);
    let client = CourseSysClient::new(&settings.base_url, timeout)?;
    let walker =
        HistoryWalker::new(Arc::new(client), settings.concurrency as usize).with_term_timeout(timeout);

    if let Some(raw) = settings.sections {
        let browse = walker
            .fetch_term(&settings.dept, &settings.number, TermId::from_raw(raw))
            .await;
        println!("{}", to_json(&SectionsReport::new(&browse), settings.pretty)?);
        return Ok(());
    }

    let source: Box<dyn TermSource> = match settings.year {
        Some(year) => Box::new(FixedYear(year)),
        None => Box::new(TermCatalog::load(&settings.terms_file_or_default())?),
    };

    let points = walker
        .get_enrollment_history(source.as_ref(), &settings.dept, &settings.number, &settings.range)
        .await?;

    let report = HistoryReport::new(
        &settings.dept,
        &settings.number,
        HistoryRange::parse_lenient(&settings.range),
        points,
    );
    println!("{}", to_json(&report, settings.pretty)?);

    Ok(())
}
