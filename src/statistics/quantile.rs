//! Quantile computation.
//!
//! Single quantiles use `select_nth_unstable_by` for O(n) expected time;
//! several quantiles over the same data sort once and index.

/// Compute a single quantile from a mutable slice.
///
/// Uses the R-7 definition (linear interpolation between order
/// statistics). The slice is partially reordered as a side effect.
///
/// # Panics
///
/// Panics if `data` is empty or if `p` is outside [0, 1].
pub fn compute_quantile(data: &mut [f64], p: f64) -> f64 {
    assert!(!data.is_empty(), "Cannot compute quantile of empty slice");
    assert!(
        (0.0..=1.0).contains(&p),
        "Quantile probability must be in [0, 1]"
    );

    let n = data.len();
    if n == 1 {
        return data[0];
    }

    let h = (n - 1) as f64 * p;
    let h_floor = h.floor() as usize;
    let h_frac = h - h.floor();

    if h_floor >= n - 1 {
        let (_, &mut max, _) = data.select_nth_unstable_by(n - 1, |a, b| a.total_cmp(b));
        return max;
    }

    let (_, &mut lower, upper) = data.select_nth_unstable_by(h_floor, |a, b| a.total_cmp(b));

    if h_frac == 0.0 {
        return lower;
    }

    // Next order statistic is the minimum of the upper partition.
    let upper_min = upper
        .iter()
        .copied()
        .min_by(|a, b| a.total_cmp(b))
        .unwrap_or(lower);

    lower + h_frac * (upper_min - lower)
}

/// Compute a quantile from data already sorted ascending.
///
/// Same R-7 definition as [`compute_quantile`]. The caller must ensure
/// the data is sorted; no verification is performed.
///
/// # Panics
///
/// Panics if `sorted` is empty or if `p` is outside [0, 1].
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "Cannot compute quantile of empty slice");
    assert!(
        (0.0..=1.0).contains(&p),
        "Quantile probability must be in [0, 1]"
    );

    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let h_floor = h.floor() as usize;
    let h_frac = h - h.floor();

    if h_floor >= n - 1 {
        sorted[n - 1]
    } else if h_frac == 0.0 {
        sorted[h_floor]
    } else {
        sorted[h_floor] + h_frac * (sorted[h_floor + 1] - sorted[h_floor])
    }
}

/// Compute several quantiles with one sort.
///
/// Returns values in the order of `probs`.
///
/// # Panics
///
/// Panics if `data` is empty or any probability is outside [0, 1].
pub fn compute_quantiles(data: &[f64], probs: &[f64]) -> Vec<f64> {
    assert!(!data.is_empty(), "Cannot compute quantile of empty slice");

    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));

    probs.iter().map(|&p| quantile_sorted(&sorted, p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_quantile_median() {
        let mut data = vec![5.0, 1.0, 4.0, 2.0, 3.0];
        let median = compute_quantile(&mut data, 0.5);
        assert!((median - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_compute_quantile_interpolates() {
        let mut data = vec![4.0, 1.0, 3.0, 2.0];
        // h = 3 * 0.5 = 1.5 -> halfway between 2 and 3
        let median = compute_quantile(&mut data, 0.5);
        assert!((median - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_compute_quantile_extremes() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let min = compute_quantile(&mut data.clone(), 0.0);
        let max = compute_quantile(&mut data.clone(), 1.0);
        assert!((min - 1.0).abs() < 1e-10);
        assert!((max - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_selection_matches_sorted() {
        let data: Vec<f64> = vec![
            3.7, 1.2, 9.5, 2.1, 7.3, 4.8, 6.2, 8.9, 1.5, 5.4, 2.7, 9.1, 3.3, 6.8, 4.5, 7.9, 2.4,
            8.3, 5.7, 1.9,
        ];
        let probs = [0.05, 0.25, 0.5, 0.75, 0.95];
        let batch = compute_quantiles(&data, &probs);

        for (i, &p) in probs.iter().enumerate() {
            let single = compute_quantile(&mut data.clone(), p);
            assert!(
                (single - batch[i]).abs() < 1e-10,
                "p={} single={} batch={}",
                p,
                single,
                batch[i]
            );
        }

        for w in batch.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    #[should_panic(expected = "Cannot compute quantile of empty slice")]
    fn test_empty_slice_panics() {
        let mut data: Vec<f64> = vec![];
        compute_quantile(&mut data, 0.5);
    }

    #[test]
    #[should_panic(expected = "Quantile probability must be in [0, 1]")]
    fn test_out_of_range_probability_panics() {
        quantile_sorted(&[1.0, 2.0], 1.5);
    }
}
