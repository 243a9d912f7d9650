//! Casetrace - audit log investigation reports
//!
//! Main entry point for the `casetrace` binary.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};

mod cli;
mod config;
mod error;
mod run;

use casetrace_common_log::{init, LogConfig};
use cli::Cli;
use config::CaseConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configuration failures precede logging; they go straight to stderr.
    let config = match CaseConfig::resolve(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("casetrace: {err}");
            return ExitCode::from(err.exit_code());
        }
    };

    let mut log_config = LogConfig::from_env().with_case_log(&config.case_log_path);
    if cli.verbose > 0 || cli.quiet {
        log_config = log_config.with_level(cli.log_level());
    }
    if let Err(err) = init(log_config) {
        eprintln!("casetrace: {err}");
        return ExitCode::from(1);
    }

    match run::run(&config) {
        Ok(report) => {
            println!(
                "Report written to {} ({} event(s){})",
                report.report_path.display(),
                report.events,
                if report.partial { ", PARTIAL DATA" } else { "" }
            );
            ExitCode::SUCCESS
        }
        Err(err) if err.is_warning() => {
            warn!("{err}");
            ExitCode::from(err.exit_code())
        }
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
