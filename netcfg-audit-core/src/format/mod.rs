//! Report formatters for run results.

pub mod json;
pub mod text;

pub use json::{format_json, parse_json};
pub use text::{format_rows, format_summary, summarize, ReportRow, RunSummary, SHOW_KIND};
