//! JSON serialization for timing reports.

use crate::result::TimingReport;

/// Serialize a TimingReport to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for TimingReport).
pub fn to_json(report: &TimingReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a TimingReport to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for TimingReport).
pub fn to_json_pretty(report: &TimingReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Parse a report previously written with [`to_json`] or [`to_json_pretty`].
///
/// # Errors
///
/// Returns an error if `json` is not a serialized TimingReport, or if its
/// statistics do not match what its own sample yields.
pub fn from_json(json: &str) -> Result<TimingReport, serde_json::Error> {
    serde_json::from_str(json)
}
