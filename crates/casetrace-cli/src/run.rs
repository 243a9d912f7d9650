//! The pipeline run: load → filter → classify → aggregate → render.

use std::fs;
use std::path::PathBuf;

use casetrace_classify::classify_event;
use casetrace_ingest::{Loader, LoaderConfig};
use casetrace_report::{assemble, summarize, ReportMeta};
use casetrace_types::ClassifiedEvent;
use chrono::{FixedOffset, Local, Utc};
use tracing::{info, warn};

use crate::config::CaseConfig;
use crate::error::CliError;

/// What one successful run produced.
#[derive(Debug)]
pub struct RunReport {
    /// Events included in the report.
    pub events: usize,
    /// Where the report was written.
    pub report_path: PathBuf,
    /// Whether the report carries the partial-data banner.
    pub partial: bool,
}

/// Execute the full pipeline for one case.
pub fn run(config: &CaseConfig) -> Result<RunReport, CliError> {
    let loader = Loader::new(
        LoaderConfig::new(&config.case_dir).with_pattern(&config.pattern),
    );
    let outcome = loader.load()?;

    if outcome.events.is_empty() {
        if outcome.file_errors > 0 {
            return Err(CliError::NothingLoaded {
                files: outcome.file_errors,
            });
        }
        return Err(CliError::NoEvents {
            stage: "after load",
        });
    }
    if outcome.file_errors > 0 {
        warn!(
            file_errors = outcome.file_errors,
            "continuing with a partial event set"
        );
    }

    let filtered = config.filter.apply(outcome.events);
    if filtered.is_empty() {
        return Err(CliError::NoEvents {
            stage: "after filtering",
        });
    }

    let classified: Vec<ClassifiedEvent> = filtered.into_iter().map(classify_event).collect();
    let summary = summarize(&classified);

    let meta = ReportMeta {
        case_id: config.case_id.clone(),
        target_actor: config.target_actor.clone(),
        range_start: config.range_start,
        range_end: config.range_end,
        filters: config.filter.describe(),
        generated_at: Utc::now(),
        local_offset: local_offset(),
        partial_fetch: config.partial_fetch,
        load_errors: outcome.file_errors,
    };
    let document = assemble(&meta, &summary, &classified);

    fs::write(&config.report_path, document).map_err(|source| CliError::WriteReport {
        path: config.report_path.clone(),
        source,
    })?;
    info!(
        events = classified.len(),
        report = %config.report_path.display(),
        partial = meta.is_partial(),
        "report written"
    );

    Ok(RunReport {
        events: classified.len(),
        report_path: config.report_path.clone(),
        partial: meta.is_partial(),
    })
}

/// The observer's local UTC offset, captured once per run.
fn local_offset() -> FixedOffset {
    *Local::now().offset()
}
