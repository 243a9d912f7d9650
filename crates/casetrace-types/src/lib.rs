//! Audit record and event types for Casetrace.

mod event;
mod label;
mod record;
mod timestamp;

pub use event::{ClassifiedEvent, NormalizedEvent, Payload};
pub use label::{Intent, Workload};
pub use record::RawRecord;
pub use timestamp::parse_utc;
