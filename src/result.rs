//! Timing report types.

use serde::{Deserialize, Serialize};

use crate::approx::{is_close, Tolerance};
use crate::error::{Error, Result};
use crate::measurement::{OutlierStats, TimingSample};
use crate::statistics::{compute_quantiles, Summary};

/// Slack allowed between stored and recomputed statistics on load.
const STORED_TOLERANCE: Tolerance = Tolerance {
    rel: 1e-9,
    abs: 1e-9,
    nan_equal: false,
};

/// Summary of one measured run.
///
/// Built once from a [`TimingSample`] and read-only afterwards. All times
/// are in nanoseconds. Deserializing recomputes every statistic from the
/// stored sample and rejects input whose statistics disagree with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredReport")]
pub struct TimingReport {
    summary: Summary,
    median_ns: f64,
    p95_ns: f64,
    outliers: OutlierStats,
    metadata: Metadata,
    sample: TimingSample,
}

/// Context about how a report was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Untimed calls executed before measurement.
    pub warmup_runs: usize,
    /// Clock source used.
    pub timer: String,
    /// Estimated clock resolution in nanoseconds.
    pub timer_resolution_ns: f64,
    /// Wall-clock time of the whole run, warm-up included, in seconds.
    pub runtime_secs: f64,
}

impl TimingReport {
    /// Derive a report from a sample.
    ///
    /// `outlier_fence` is the Tukey multiplier; see
    /// [`OutlierStats::from_samples`].
    pub fn from_sample(sample: TimingSample, outlier_fence: f64, metadata: Metadata) -> Self {
        let values = sample.as_slice();
        let summary = Summary::from_samples(values);

        let quantiles = compute_quantiles(values, &[0.5, 0.95]);
        let median_ns = quantiles[0];
        let p95_ns = quantiles[1];

        let outliers = OutlierStats::from_samples(values, outlier_fence);

        Self {
            summary,
            median_ns,
            p95_ns,
            outliers,
            metadata,
            sample,
        }
    }

    /// Number of timed calls; equals the requested repetitions.
    pub fn count(&self) -> usize {
        self.summary.count
    }

    /// Arithmetic mean per call.
    pub fn mean_ns(&self) -> f64 {
        self.summary.mean
    }

    /// Fastest single call; the usual low-noise estimator.
    pub fn min_ns(&self) -> f64 {
        self.summary.min
    }

    /// Slowest single call.
    pub fn max_ns(&self) -> f64 {
        self.summary.max
    }

    /// Sample standard deviation.
    pub fn std_dev_ns(&self) -> f64 {
        self.summary.std_dev
    }

    /// Median per call.
    pub fn median_ns(&self) -> f64 {
        self.median_ns
    }

    /// 95th percentile per call.
    pub fn p95_ns(&self) -> f64 {
        self.p95_ns
    }

    /// Full summary statistics.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Outlier diagnostics.
    pub fn outliers(&self) -> &OutlierStats {
        &self.outliers
    }

    /// Run metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Per-call durations in call order.
    pub fn sample(&self) -> &TimingSample {
        &self.sample
    }

    /// How many times faster this run is than `baseline`, by mean.
    ///
    /// Values above 1.0 mean `self` is faster. Returns infinity when this
    /// run's mean is zero (below clock resolution) and the baseline's is not.
    pub fn speedup_over(&self, baseline: &TimingReport) -> f64 {
        let ours = self.mean_ns();
        let theirs = baseline.mean_ns();
        if ours == 0.0 {
            if theirs == 0.0 {
                1.0
            } else {
                f64::INFINITY
            }
        } else {
            theirs / ours
        }
    }
}

/// Serialized shape of a [`TimingReport`], checked before it is trusted.
#[derive(Deserialize)]
struct StoredReport {
    summary: Summary,
    median_ns: f64,
    p95_ns: f64,
    outliers: OutlierStats,
    metadata: Metadata,
    sample: TimingSample,
}

impl TryFrom<StoredReport> for TimingReport {
    type Error = Error;

    fn try_from(stored: StoredReport) -> Result<Self> {
        let StoredReport {
            summary,
            median_ns,
            p95_ns,
            outliers,
            metadata,
            sample,
        } = stored;

        let rebuilt = TimingReport::from_sample(sample, outliers.fence.unwrap_or(0.0), metadata);

        let counts = [
            ("count", summary.count, rebuilt.summary.count),
            ("outliers.total_samples", outliers.total_samples, rebuilt.outliers.total_samples),
            ("outliers.low", outliers.low, rebuilt.outliers.low),
            ("outliers.high", outliers.high, rebuilt.outliers.high),
        ];
        for (field, stored, derived) in counts {
            if stored != derived {
                return Err(inconsistent(field, stored as f64, derived as f64));
            }
        }

        let values = [
            ("mean", summary.mean, rebuilt.summary.mean),
            ("min", summary.min, rebuilt.summary.min),
            ("max", summary.max, rebuilt.summary.max),
            ("std_dev", summary.std_dev, rebuilt.summary.std_dev),
            ("median_ns", median_ns, rebuilt.median_ns),
            ("p95_ns", p95_ns, rebuilt.p95_ns),
            ("outlier_fraction", outliers.outlier_fraction, rebuilt.outliers.outlier_fraction),
        ];
        for (field, stored, derived) in values {
            if !is_close(stored, derived, &STORED_TOLERANCE) {
                return Err(inconsistent(field, stored, derived));
            }
        }

        let fences = [
            ("outliers.fence", outliers.fence, rebuilt.outliers.fence),
            ("lower_fence", outliers.lower_fence, rebuilt.outliers.lower_fence),
            ("upper_fence", outliers.upper_fence, rebuilt.outliers.upper_fence),
        ];
        for (field, stored, derived) in fences {
            let agree = match (stored, derived) {
                (Some(a), Some(b)) => is_close(a, b, &STORED_TOLERANCE),
                (None, None) => true,
                _ => false,
            };
            if !agree {
                return Err(Error::InconsistentReport(format!(
                    "{} is {:?} but the sample gives {:?}",
                    field, stored, derived
                )));
            }
        }

        Ok(rebuilt)
    }
}

fn inconsistent(field: &str, stored: f64, derived: f64) -> Error {
    Error::InconsistentReport(format!(
        "{} is {} but the sample gives {}",
        field, stored, derived
    ))
}

#[cfg(test)]
pub(crate) fn make_test_report(durations: Vec<f64>) -> TimingReport {
    let sample = TimingSample::new(durations).expect("valid durations");
    TimingReport::from_sample(
        sample,
        1.5,
        Metadata {
            warmup_runs: 1,
            timer: "Instant".to_string(),
            timer_resolution_ns: 20.0,
            runtime_secs: 0.01,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_statistics() {
        let report = make_test_report(vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(report.count(), 5);
        assert!((report.mean_ns() - 30.0).abs() < 1e-12);
        assert_eq!(report.min_ns(), 10.0);
        assert_eq!(report.max_ns(), 50.0);
        assert!((report.median_ns() - 30.0).abs() < 1e-12);
        assert!((report.p95_ns() - 48.0).abs() < 1e-12);
        assert_eq!(report.sample().as_slice(), &[10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn test_outliers_do_not_change_mean() {
        let mut durations = vec![100.0; 19];
        durations.push(10_000.0);
        let report = make_test_report(durations);

        assert_eq!(report.count(), 20);
        assert_eq!(report.outliers().high, 1);
        assert!((report.mean_ns() - 595.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_call_report_has_no_fences() {
        let report = make_test_report(vec![250.0]);
        assert_eq!(report.count(), 1);
        assert_eq!(report.outliers().lower_fence, None);
        assert_eq!(report.std_dev_ns(), 0.0);
    }

    #[test]
    fn test_stored_report_rebuilds_from_sample() {
        let report = make_test_report(vec![10.0, 20.0, 30.0, 40.0, 5000.0]);
        let json = serde_json::to_string(&report).unwrap();
        let parsed: TimingReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.count(), 5);
        assert_eq!(parsed.median_ns(), report.median_ns());
        assert_eq!(parsed.outliers(), report.outliers());
    }

    #[test]
    fn test_stored_count_must_match_sample() {
        let report = make_test_report(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"count\":6"));

        let edited = json.replace("\"count\":6", "\"count\":999");
        let err = serde_json::from_str::<TimingReport>(&edited).unwrap_err();
        assert!(err.to_string().contains("count"), "{}", err);
    }

    #[test]
    fn test_stored_mean_must_match_sample() {
        let report = make_test_report(vec![100.0, 300.0]);
        let json = serde_json::to_string(&report).unwrap();
        let edited = json.replace("\"mean\":200.0", "\"mean\":1.0");
        assert_ne!(json, edited);
        assert!(serde_json::from_str::<TimingReport>(&edited).is_err());
    }

    #[test]
    fn test_speedup() {
        let slow = make_test_report(vec![1000.0, 1000.0]);
        let fast = make_test_report(vec![10.0, 10.0]);
        assert!((fast.speedup_over(&slow) - 100.0).abs() < 1e-9);
        assert!((slow.speedup_over(&fast) - 0.01).abs() < 1e-12);

        let instant = make_test_report(vec![0.0]);
        assert!(instant.speedup_over(&slow).is_infinite());
        assert_eq!(instant.speedup_over(&instant), 1.0);
    }
}
