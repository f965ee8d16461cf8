//! Tukey-fence outlier diagnostics.
//!
//! Outliers are counted, never removed: the report's mean is always taken
//! over every timed call. A high outlier fraction signals a noisy machine
//! or a unit whose cost is not yet stable (e.g. still warming up).

use serde::{Deserialize, Serialize};

use crate::statistics::compute_quantile;

/// Statistics about outliers in a timing sample.
///
/// Fences are `None` when inspection was skipped, so a report always
/// serializes to finite JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierStats {
    /// Samples inspected.
    pub total_samples: usize,
    /// Tukey multiplier `k`, or `None` if inspection was disabled.
    pub fence: Option<f64>,
    /// Samples below the lower fence.
    pub low: usize,
    /// Samples above the upper fence.
    pub high: usize,
    /// Fraction of samples outside either fence (0.0 to 1.0).
    pub outlier_fraction: f64,
    /// Lower fence in nanoseconds.
    pub lower_fence: Option<f64>,
    /// Upper fence in nanoseconds.
    pub upper_fence: Option<f64>,
}

impl OutlierStats {
    /// Stats for when no inspection was possible.
    pub fn none(total_samples: usize, fence: Option<f64>) -> Self {
        Self {
            total_samples,
            fence,
            low: 0,
            high: 0,
            outlier_fraction: 0.0,
            lower_fence: None,
            upper_fence: None,
        }
    }

    /// Count samples outside `[Q1 - k*IQR, Q3 + k*IQR]`.
    ///
    /// `fence` is `k`; 1.5 is the classic choice. A non-positive or
    /// non-finite `fence` disables inspection, as do fewer than four
    /// samples.
    pub fn from_samples(samples: &[f64], fence: f64) -> Self {
        if !fence.is_finite() || fence <= 0.0 {
            return Self::none(samples.len(), None);
        }
        if samples.len() < 4 {
            return Self::none(samples.len(), Some(fence));
        }

        let mut scratch = samples.to_vec();
        let q1 = compute_quantile(&mut scratch, 0.25);
        let q3 = compute_quantile(&mut scratch, 0.75);
        let iqr = q3 - q1;
        let lower_fence = q1 - fence * iqr;
        let upper_fence = q3 + fence * iqr;

        let low = samples.iter().filter(|&&x| x < lower_fence).count();
        let high = samples.iter().filter(|&&x| x > upper_fence).count();

        Self {
            total_samples: samples.len(),
            fence: Some(fence),
            low,
            high,
            outlier_fraction: (low + high) as f64 / samples.len() as f64,
            lower_fence: Some(lower_fence),
            upper_fence: Some(upper_fence),
        }
    }

    /// Total outliers on either side.
    pub fn count(&self) -> usize {
        self.low + self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_single_spike() {
        let samples = vec![100.0, 101.0, 99.0, 100.0, 102.0, 98.0, 100.0, 5000.0];
        let stats = OutlierStats::from_samples(&samples, 1.5);

        assert_eq!(stats.high, 1);
        assert_eq!(stats.low, 0);
        assert_eq!(stats.count(), 1);
        assert!((stats.outlier_fraction - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_constant_samples_have_no_outliers() {
        let samples = vec![42.0; 10];
        let stats = OutlierStats::from_samples(&samples, 1.5);
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.lower_fence, Some(42.0));
        assert_eq!(stats.upper_fence, Some(42.0));
    }

    #[test]
    fn test_small_or_disabled_inspection() {
        let stats = OutlierStats::from_samples(&[1.0, 2.0, 1000.0], 1.5);
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.total_samples, 3);
        assert_eq!(stats.fence, Some(1.5));
        assert!(stats.lower_fence.is_none());

        let stats = OutlierStats::from_samples(&[1.0, 2.0, 3.0, 4.0, 1000.0], 0.0);
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.fence, None);
        assert!(stats.upper_fence.is_none());

        let stats = OutlierStats::from_samples(&[1.0, 2.0, 3.0, 4.0, 1000.0], f64::INFINITY);
        assert_eq!(stats.fence, None);
    }
}
