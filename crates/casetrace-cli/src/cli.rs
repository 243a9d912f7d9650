//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use casetrace_common_log::LogLevel;
use clap::{ArgAction, Parser, ValueHint};

/// Casetrace - audit log investigation reports
///
/// Load a case directory of exported audit JSON, classify every event by
/// workload and intent, and write one self-contained HTML report.
#[derive(Debug, Parser)]
#[command(
    name = "casetrace",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Case directory containing the exported audit JSON files
    #[arg(env = "CASETRACE_CASE_DIR", value_hint = ValueHint::DirPath)]
    pub case_dir: PathBuf,

    /// Report output path (default: <case-dir>/report.html)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,

    /// Case identifier (default: manifest value, then directory name)
    #[arg(long)]
    pub case_id: Option<String>,

    /// Target actor under investigation, shown in the report header
    #[arg(long)]
    pub actor: Option<String>,

    /// Keep only events with exactly this record type
    #[arg(long)]
    pub record_type: Option<String>,

    /// Keep only events with exactly this operation
    #[arg(long)]
    pub operation: Option<String>,

    /// Keep only events whose serialized form contains this text
    #[arg(long)]
    pub search: Option<String>,

    /// Start of the requested date range (YYYY-MM-DD or full timestamp)
    #[arg(long)]
    pub from: Option<String>,

    /// End of the requested date range, inclusive
    #[arg(long)]
    pub to: Option<String>,

    /// Mark the report as generated from an interrupted retrieval
    #[arg(long)]
    pub partial: bool,

    /// File name pattern for record files
    #[arg(long, default_value = "*.json")]
    pub pattern: String,

    /// Increase verbosity level (-v, -vv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase verbosity level"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short,
        long,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,
}

impl Cli {
    /// Minimum log level implied by the verbosity flags.
    pub fn log_level(&self) -> LogLevel {
        match self.verbose {
            0 if self.quiet => LogLevel::Error,
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::try_parse_from(["casetrace", "/tmp/case"]).unwrap();
        assert_eq!(cli.case_dir, PathBuf::from("/tmp/case"));
        assert_eq!(cli.pattern, "*.json");
        assert!(!cli.partial);
    }

    #[test]
    fn parses_filter_flags() {
        let cli = Cli::try_parse_from([
            "casetrace",
            "/tmp/case",
            "--record-type",
            "ExchangeItem",
            "--search",
            "alex",
            "--from",
            "2024-01-01",
        ])
        .unwrap();
        assert_eq!(cli.record_type.as_deref(), Some("ExchangeItem"));
        assert_eq!(cli.search.as_deref(), Some("alex"));
        assert_eq!(cli.from.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["casetrace", "/tmp/case", "-q", "-v"]).is_err());
    }

    #[test]
    fn verbosity_maps_to_levels() {
        let quiet = Cli::try_parse_from(["casetrace", "/tmp/case", "-q"]).unwrap();
        assert_eq!(quiet.log_level(), LogLevel::Error);
        let plain = Cli::try_parse_from(["casetrace", "/tmp/case"]).unwrap();
        assert_eq!(plain.log_level(), LogLevel::Info);
        let noisy = Cli::try_parse_from(["casetrace", "/tmp/case", "-vv"]).unwrap();
        assert_eq!(noisy.log_level(), LogLevel::Trace);
    }
}
