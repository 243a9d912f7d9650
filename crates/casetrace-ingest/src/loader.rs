//! Record loader: directory of JSON exports to normalized events.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use casetrace_types::{parse_utc, NormalizedEvent, RawRecord};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Case directory holding the exported JSON files.
    pub directory: PathBuf,
    /// Glob-style file name pattern.
    pub pattern: String,
}

impl LoaderConfig {
    /// Configuration for a directory with the default `*.json` pattern.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            pattern: "*.json".to_string(),
        }
    }

    /// Override the file name pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }
}

/// Result of one loading pass.
///
/// Partial ingestion is the steady state: per-file and per-record failures
/// are counted here and logged, never escalated.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Events in file order, then record order within each file.
    pub events: Vec<NormalizedEvent>,
    /// Files matching the pattern that were attempted.
    pub files_seen: usize,
    /// Files skipped because they could not be read or deserialized.
    pub file_errors: usize,
    /// Records whose payload text failed its second parse pass.
    pub payload_warnings: usize,
    /// Elements skipped because they were not record objects.
    pub record_errors: usize,
}

/// Loader failures that abort the run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read case directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid file pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Reads a case directory of JSON exports into normalized events.
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader for the given configuration.
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load every matching file in the case directory.
    ///
    /// Only an unreadable directory or an invalid pattern is fatal; a bad
    /// file costs that file, a bad payload costs nothing but structure.
    pub fn load(&self) -> Result<LoadOutcome, IngestError> {
        let pattern = glob::Pattern::new(&self.config.pattern).map_err(|source| {
            IngestError::Pattern {
                pattern: self.config.pattern.clone(),
                source,
            }
        })?;

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.config.directory)
            .map_err(|source| IngestError::Directory {
                path: self.config.directory.clone(),
                source,
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| pattern.matches(name))
            })
            .collect();
        // Deterministic file order regardless of directory enumeration.
        paths.sort();

        let mut outcome = LoadOutcome::default();
        for path in &paths {
            outcome.files_seen += 1;
            match read_file(path) {
                Ok(elements) => {
                    debug!(file = %path.display(), records = elements.len(), "loaded file");
                    for element in elements {
                        match normalize(element, path, &mut outcome) {
                            Some(event) => outcome.events.push(event),
                            None => outcome.record_errors += 1,
                        }
                    }
                }
                Err(err) => {
                    error!(file = %path.display(), "skipping file: {err}");
                    outcome.file_errors += 1;
                }
            }
        }

        info!(
            events = outcome.events.len(),
            files = outcome.files_seen,
            file_errors = outcome.file_errors,
            payload_warnings = outcome.payload_warnings,
            "load complete"
        );
        Ok(outcome)
    }
}

/// Read one file as a sequence of record elements.
///
/// A single top-level object is treated as a one-element sequence.
fn read_file(path: &Path) -> Result<Vec<Value>, FileError> {
    let text = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    match value {
        Value::Array(elements) => Ok(elements),
        Value::Object(_) => Ok(vec![value]),
        other => Err(FileError::Shape(shape_name(&other))),
    }
}

#[derive(Debug, Error)]
enum FileError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    #[error("deserialize failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected object or array at top level, found {0}")]
    Shape(&'static str),
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize one record element, accounting for payload and timestamp
/// degradation. Returns `None` only when the element is not a record
/// object at all.
fn normalize(element: Value, path: &Path, outcome: &mut LoadOutcome) -> Option<NormalizedEvent> {
    let raw: RawRecord = match serde_json::from_value(element) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(file = %path.display(), "skipping non-record element: {err}");
            return None;
        }
    };

    let timestamp = parse_utc(&raw.creation_time);
    if timestamp.is_none() && !raw.creation_time.is_empty() {
        warn!(
            record = %raw.id,
            text = %raw.creation_time,
            "unparseable creation timestamp, event kept without one"
        );
    }

    let (payload, raw_payload) = match raw.audit_data {
        None => (None, None),
        Some(Value::Object(map)) => (Some(map), None),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => (Some(map), None),
            Ok(_) | Err(_) => {
                outcome.payload_warnings += 1;
                warn!(record = %raw.id, "payload text is not a JSON object, kept raw");
                (None, Some(text))
            }
        },
        Some(other) => {
            outcome.payload_warnings += 1;
            warn!(record = %raw.id, "payload has unexpected shape, kept raw");
            (None, Some(other.to_string()))
        }
    };

    Some(NormalizedEvent {
        id: raw.id,
        record_type: raw.record_type,
        operation: raw.operation,
        timestamp,
        actor: raw.user_id,
        payload,
        raw_payload,
    })
}
