//! CLI error handling and exit-code mapping.

use std::io;
use std::path::PathBuf;

use casetrace_ingest::IngestError;
use thiserror::Error;

/// Errors surfaced by the `casetrace` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config { message: String },

    #[error("cannot access case directory {path}")]
    CaseDir { path: PathBuf },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("no data loaded: all {files} matching file(s) failed")]
    NothingLoaded { files: usize },

    #[error("no events {stage}; report generation skipped")]
    NoEvents { stage: &'static str },

    #[error("failed to write report to {path}: {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this outcome is the empty-result warning rather than a
    /// failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NoEvents { .. })
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            Self::NoEvents { .. } => 3,
            Self::CaseDir { .. }
            | Self::Ingest(_)
            | Self::NothingLoaded { .. }
            | Self::WriteReport { .. }
            | Self::Other(_) => 1,
        }
    }
}
