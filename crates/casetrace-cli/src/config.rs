//! Case configuration: defaults, manifest file, CLI flag layering.
//!
//! Every component receives its settings through this structure; nothing
//! reads ambient state after resolution.

use std::fs;
use std::path::{Path, PathBuf};

use casetrace_classify::EventFilter;
use casetrace_types::parse_utc;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

/// Manifest file the retrieval collaborator leaves in the case directory.
const MANIFEST_NAME: &str = "case.yaml";

/// Optional case manifest written by the retrieval step.
///
/// `fetch_complete: false` is the collaborator's signal that the export was
/// interrupted; the report then carries the partial-data banner.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CaseManifest {
    /// Case identifier.
    pub case_id: Option<String>,
    /// Target actor under investigation.
    pub target_actor: Option<String>,
    /// Requested range start.
    pub date_from: Option<String>,
    /// Requested range end.
    pub date_to: Option<String>,
    /// Whether the retrieval run completed.
    pub fetch_complete: Option<bool>,
}

impl CaseManifest {
    /// Load `case.yaml` from the case directory if present.
    pub fn load(dir: &Path) -> Result<Option<Self>, CliError> {
        let path = dir.join(MANIFEST_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|err| {
            CliError::config(format!("cannot read {}: {err}", path.display()))
        })?;
        let manifest = serde_yaml::from_str(&text).map_err(|err| {
            CliError::config(format!("invalid manifest {}: {err}", path.display()))
        })?;
        debug!(manifest = %path.display(), "case manifest loaded");
        Ok(Some(manifest))
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct CaseConfig {
    /// Case directory.
    pub case_dir: PathBuf,
    /// Case identifier.
    pub case_id: String,
    /// Target actor, if named.
    pub target_actor: Option<String>,
    /// Record file name pattern.
    pub pattern: String,
    /// Filter criteria for the run.
    pub filter: EventFilter,
    /// Requested range, lower bound.
    pub range_start: Option<DateTime<Utc>>,
    /// Requested range, upper bound.
    pub range_end: Option<DateTime<Utc>>,
    /// Retrieval-collaborator partial flag.
    pub partial_fetch: bool,
    /// Report output path.
    pub report_path: PathBuf,
    /// Case log path.
    pub case_log_path: PathBuf,
}

impl CaseConfig {
    /// Resolve defaults, then the case manifest, then CLI flags.
    pub fn resolve(cli: &Cli) -> Result<Self, CliError> {
        if !cli.case_dir.is_dir() {
            return Err(CliError::CaseDir {
                path: cli.case_dir.clone(),
            });
        }
        let manifest = CaseManifest::load(&cli.case_dir)?.unwrap_or_default();

        let case_id = cli
            .case_id
            .clone()
            .or(manifest.case_id)
            .unwrap_or_else(|| default_case_id(&cli.case_dir));
        let target_actor = cli.actor.clone().or(manifest.target_actor);

        let from_text = cli.from.clone().or(manifest.date_from);
        let to_text = cli.to.clone().or(manifest.date_to);
        let range_start = from_text
            .as_deref()
            .map(|text| parse_bound(text, false))
            .transpose()?;
        let range_end = to_text
            .as_deref()
            .map(|text| parse_bound(text, true))
            .transpose()?;
        if let (Some(start), Some(end)) = (range_start, range_end) {
            if start > end {
                return Err(CliError::config(format!(
                    "requested range is inverted: {start} is after {end}"
                )));
            }
        }

        let filter = EventFilter {
            record_type: cli.record_type.clone(),
            operation: cli.operation.clone(),
            text: cli.search.clone(),
            from: range_start,
            to: range_end,
        };

        let partial_fetch = cli.partial || !manifest.fetch_complete.unwrap_or(true);

        Ok(Self {
            case_dir: cli.case_dir.clone(),
            case_id,
            target_actor,
            pattern: cli.pattern.clone(),
            filter,
            range_start,
            range_end,
            partial_fetch,
            report_path: cli
                .out
                .clone()
                .unwrap_or_else(|| cli.case_dir.join("report.html")),
            case_log_path: cli.case_dir.join("casetrace.log"),
        })
    }
}

fn default_case_id(dir: &Path) -> String {
    dir.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("case")
        .to_string()
}

/// Parse a range bound. A bare date names midnight; for the end bound it
/// extends to the last second of that day so the range stays inclusive.
fn parse_bound(text: &str, end_of_day: bool) -> Result<DateTime<Utc>, CliError> {
    let instant = parse_utc(text)
        .ok_or_else(|| CliError::config(format!("unrecognized date {text:?}")))?;
    if end_of_day && NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").is_ok() {
        return Ok(instant + Duration::seconds(86_399));
    }
    Ok(instant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(dir: &TempDir, extra: &[&str]) -> Cli {
        let dir_arg = dir.path().to_str().unwrap().to_string();
        let mut args = vec!["casetrace".to_string(), dir_arg];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn defaults_fill_in_without_a_manifest() {
        let dir = TempDir::new().unwrap();
        let config = CaseConfig::resolve(&cli(&dir, &[])).unwrap();
        assert_eq!(config.case_id, default_case_id(dir.path()));
        assert!(config.filter.is_empty());
        assert!(!config.partial_fetch);
        assert_eq!(config.report_path, dir.path().join("report.html"));
    }

    #[test]
    fn manifest_supplies_case_fields() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("case.yaml"),
            "case_id: CASE-7\ntarget_actor: alex@contoso.com\nfetch_complete: false\n",
        )
        .unwrap();
        let config = CaseConfig::resolve(&cli(&dir, &[])).unwrap();
        assert_eq!(config.case_id, "CASE-7");
        assert_eq!(config.target_actor.as_deref(), Some("alex@contoso.com"));
        assert!(config.partial_fetch);
    }

    #[test]
    fn flags_override_the_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("case.yaml"), "case_id: CASE-7\n").unwrap();
        let config = CaseConfig::resolve(&cli(&dir, &["--case-id", "CASE-9"])).unwrap();
        assert_eq!(config.case_id, "CASE-9");
    }

    #[test]
    fn bare_end_date_extends_to_end_of_day() {
        let dir = TempDir::new().unwrap();
        let config =
            CaseConfig::resolve(&cli(&dir, &["--from", "2024-01-01", "--to", "2024-01-31"]))
                .unwrap();
        assert_eq!(config.range_start, parse_utc("2024-01-01T00:00:00Z"));
        assert_eq!(config.range_end, parse_utc("2024-01-31T23:59:59Z"));
    }

    #[test]
    fn bad_date_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let err = CaseConfig::resolve(&cli(&dir, &["--from", "someday"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn inverted_range_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let err = CaseConfig::resolve(&cli(
            &dir,
            &["--from", "2024-02-01", "--to", "2024-01-01"],
        ))
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");
        let args = vec![
            "casetrace".to_string(),
            missing.to_str().unwrap().to_string(),
        ];
        let parsed = Cli::try_parse_from(args).unwrap();
        let err = CaseConfig::resolve(&parsed).unwrap_err();
        assert!(matches!(err, CliError::CaseDir { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn invalid_manifest_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("case.yaml"), "case_id: [unclosed\n").unwrap();
        let err = CaseConfig::resolve(&cli(&dir, &[])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
