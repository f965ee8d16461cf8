//! Statistical methods for timing samples.
//!
//! - Summary statistics (mean, extremes, standard deviation)
//! - Quantiles using the R-7 interpolation rule

mod quantile;
mod summary;

pub use quantile::{compute_quantile, compute_quantiles, quantile_sorted};
pub use summary::Summary;
