//! Audit record loading and normalization for Casetrace.

mod loader;

pub use loader::{IngestError, LoadOutcome, Loader, LoaderConfig};
