//! Logging infrastructure for Casetrace.
//!
//! Two sinks: a terminal layer on stderr for the operator, and the case
//! log, a plain append-only file of timestamped severity-tagged lines
//! inside the case directory. The case log is the durable record of every
//! anomaly a run encounters, so its layer is always plain text.

use std::io;
use std::path::PathBuf;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Terminal output format.
    pub format: LogFormat,
    /// Case log path; `None` disables the file sink.
    pub case_log: Option<PathBuf>,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Terminal output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            case_log: None,
        }
    }
}

impl LogConfig {
    /// Read level and format overrides from the environment.
    ///
    /// `CASETRACE_LOG_LEVEL` wins over `RUST_LOG`; `CASETRACE_LOG_FORMAT`
    /// selects the terminal format.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("CASETRACE_LOG_LEVEL") {
            if let Some(l) = LogLevel::parse(&level) {
                config.level = l;
            }
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            if let Some(l) = LogLevel::parse(&level) {
                config.level = l;
            }
        }

        if let Ok(format) = std::env::var("CASETRACE_LOG_FORMAT") {
            config.format = match format.to_lowercase().as_str() {
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            };
        }

        config
    }

    /// Attach the case log file sink.
    pub fn with_case_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.case_log = Some(path.into());
        self
    }

    /// Override the minimum level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }
}

/// Initialize logging with the given configuration.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let registry = tracing_subscriber::registry().with(filter);

    match (config.format, &config.case_log) {
        (LogFormat::Pretty, None) => {
            let stderr_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true)
                .with_target(false);
            registry
                .with(stderr_layer)
                .try_init()
                .map_err(|e| LogError::Init(e.to_string()))?;
        }
        (LogFormat::Pretty, Some(path)) => {
            let stderr_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true)
                .with_target(false);
            let file_layer = fmt::layer()
                .with_writer(open_case_log(path)?)
                .with_ansi(false)
                .with_target(false);
            registry
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LogError::Init(e.to_string()))?;
        }
        (LogFormat::Compact, None) => {
            let stderr_layer = fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_ansi(true)
                .with_target(false);
            registry
                .with(stderr_layer)
                .try_init()
                .map_err(|e| LogError::Init(e.to_string()))?;
        }
        (LogFormat::Compact, Some(path)) => {
            let stderr_layer = fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_ansi(true)
                .with_target(false);
            let file_layer = fmt::layer()
                .with_writer(open_case_log(path)?)
                .with_ansi(false)
                .with_target(false);
            registry
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LogError::Init(e.to_string()))?;
        }
    }

    Ok(())
}

fn open_case_log(path: &std::path::Path) -> Result<std::fs::File, LogError> {
    Ok(std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?)
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    Init(String),

    #[error("failed to open case log: {0}")]
    File(#[from] io::Error),
}

/// Convenience macros re-exported from tracing.
pub use tracing::{debug, error, info, trace, warn};
