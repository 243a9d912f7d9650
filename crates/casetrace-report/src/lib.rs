//! Aggregation and HTML report rendering for Casetrace.

mod aggregate;
mod assemble;
mod card;
pub mod html;

pub use aggregate::{summarize, AggregateSummary, TOP_N};
pub use assemble::{assemble, ReportMeta};
pub use card::{format_local, render_card};
