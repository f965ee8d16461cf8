//! Rendering of timing reports.

mod json;
mod terminal;

pub use json::{from_json, to_json, to_json_pretty};
pub use terminal::{format_ns, format_report, format_speedup};
