//! Numeric kernels used as benchmark subjects.
//!
//! These are the small loops the harness is usually pointed at: a scalar
//! square, a simple moving average, and reductions in sequential and
//! (with the `parallel` feature) data-parallel form.

use crate::error::{Error, Result};

/// Square a scalar.
#[inline]
pub fn square(x: f64) -> f64 {
    x * x
}

/// Square every element.
pub fn square_all(xs: &[f64]) -> Vec<f64> {
    xs.iter().copied().map(square).collect()
}

/// Sum of squares, sequentially.
pub fn sum_of_squares(xs: &[f64]) -> f64 {
    xs.iter().map(|&x| square(x)).sum()
}

/// Simple moving average over a sliding window.
///
/// Returns `xs.len() - window + 1` values; element `i` is the mean of
/// `xs[i..i + window]`. Uses a running sum, so cost is O(n) regardless of
/// window size.
///
/// # Errors
///
/// [`Error::InvalidConfig`] if `window` is zero or longer than `xs`.
pub fn moving_average(xs: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(Error::InvalidConfig("window must be at least 1".to_string()));
    }
    if window > xs.len() {
        return Err(Error::InvalidConfig(format!(
            "window {} exceeds series length {}",
            window,
            xs.len()
        )));
    }

    let w = window as f64;
    let mut out = Vec::with_capacity(xs.len() - window + 1);
    let mut sum: f64 = xs[..window].iter().sum();
    out.push(sum / w);

    for i in window..xs.len() {
        sum += xs[i] - xs[i - window];
        out.push(sum / w);
    }

    Ok(out)
}

/// Moving average computed window by window, O(n * window).
///
/// Reference for [`moving_average`]; the running-sum version accumulates
/// rounding error, this one does not.
///
/// # Errors
///
/// Same as [`moving_average`].
pub fn moving_average_naive(xs: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 || window > xs.len() {
        return Err(Error::InvalidConfig(format!(
            "window {} invalid for series length {}",
            window,
            xs.len()
        )));
    }

    Ok(xs
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect())
}

/// Sum of squares across the rayon thread pool.
#[cfg(feature = "parallel")]
pub fn par_sum_of_squares(xs: &[f64]) -> f64 {
    use rayon::prelude::*;
    xs.par_iter().map(|&x| square(x)).sum()
}

/// Square every element across the rayon thread pool.
#[cfg(feature = "parallel")]
pub fn par_square_all(xs: &[f64]) -> Vec<f64> {
    use rayon::prelude::*;
    xs.par_iter().map(|&x| square(x)).collect()
}
