//! Workload and intent classification rules for Casetrace.

mod filter;
mod rules;

pub use filter::EventFilter;
pub use rules::{classify, classify_event};
