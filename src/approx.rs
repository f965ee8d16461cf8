//! Elementwise approximate equality of numeric sequences.
//!
//! Position `i` is close when
//!
//! ```text
//! |a[i] - b[i]| <= abs + rel * |b[i]|
//! ```
//!
//! The comparison is asymmetric in the same way as the usual array
//! `allclose`: `b` is the reference the relative tolerance scales with.
//!
//! NaN handling:
//! - both NaN: close only when [`Tolerance::nan_equal`] is set
//! - exactly one NaN: never close
//!
//! Infinities of the same sign are close; the formula alone would
//! compute `inf - inf = NaN`. Thresholds must be non-negative and not NaN;
//! sequence comparisons reject anything else with
//! [`Error::InvalidConfig`](crate::Error::InvalidConfig).
//!
//! # Example
//!
//! ```
//! use warmtime::{approx_equal, Tolerance};
//!
//! let expected = [1.0, 2.0, f64::NAN];
//! let actual = [1.0, 2.0 + 1e-9, f64::NAN];
//!
//! let tol = Tolerance::default().nan_equal(true);
//! assert!(approx_equal(&actual, &expected, &tol).unwrap());
//!
//! // Length mismatch is an error, not `false`.
//! assert!(approx_equal(&[1.0, 2.0], &[1.0], &tol).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default relative tolerance.
pub const DEFAULT_REL_TOL: f64 = 1e-5;

/// Default absolute tolerance.
pub const DEFAULT_ABS_TOL: f64 = 1e-8;

/// Tolerance policy for approximate comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Relative tolerance, scaled by `|b[i]|`.
    pub rel: f64,
    /// Absolute tolerance.
    pub abs: f64,
    /// Treat two NaNs at the same position as equal.
    pub nan_equal: bool,
}

impl Default for Tolerance {
    /// `rel = 1e-5`, `abs = 1e-8`, NaNs unequal.
    fn default() -> Self {
        Self {
            rel: DEFAULT_REL_TOL,
            abs: DEFAULT_ABS_TOL,
            nan_equal: false,
        }
    }
}

impl Tolerance {
    /// Tolerance with explicit thresholds and NaNs unequal.
    pub fn new(rel: f64, abs: f64) -> Self {
        Self {
            rel,
            abs,
            nan_equal: false,
        }
    }

    /// Zero tolerance: only bitwise-equal magnitudes compare close.
    pub fn exact() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Set the relative tolerance.
    pub fn rel(mut self, rel: f64) -> Self {
        self.rel = rel;
        self
    }

    /// Set the absolute tolerance.
    pub fn abs(mut self, abs: f64) -> Self {
        self.abs = abs;
        self
    }

    /// Set whether paired NaNs compare equal.
    pub fn nan_equal(mut self, nan_equal: bool) -> Self {
        self.nan_equal = nan_equal;
        self
    }

    /// Check that both thresholds are non-negative numbers.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] naming the offending threshold.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("rel", self.rel), ("abs", self.abs)] {
            if value.is_nan() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} tolerance must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// First position at which two sequences are not close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Index into both sequences.
    pub index: usize,
    /// Value from the first sequence.
    pub actual: f64,
    /// Value from the second (reference) sequence.
    pub expected: f64,
}

/// Whether two scalars are close under `tol`.
///
/// Does not validate `tol`: a negative or NaN threshold makes every finite
/// pair compare unequal, identical values included.
#[inline]
pub fn is_close(a: f64, b: f64, tol: &Tolerance) -> bool {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => tol.nan_equal,
        (true, false) | (false, true) => false,
        (false, false) if a.is_infinite() || b.is_infinite() => a == b,
        (false, false) => (a - b).abs() <= tol.abs + tol.rel * b.abs(),
    }
}

/// Whether `a` and `b` are close at every index.
///
/// # Errors
///
/// [`Error::SizeMismatch`] if the lengths differ, otherwise
/// [`Error::InvalidConfig`] if `tol` fails [`Tolerance::validate`].
pub fn approx_equal(a: &[f64], b: &[f64], tol: &Tolerance) -> Result<bool> {
    Ok(first_mismatch(a, b, tol)?.is_none())
}

/// Locate the first index at which `a` and `b` are not close.
///
/// # Errors
///
/// As for [`approx_equal`].
pub fn first_mismatch(a: &[f64], b: &[f64], tol: &Tolerance) -> Result<Option<Mismatch>> {
    if a.len() != b.len() {
        return Err(Error::SizeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    tol.validate()?;

    Ok(a
        .iter()
        .zip(b)
        .position(|(&x, &y)| !is_close(x, y, tol))
        .map(|index| Mismatch {
            index,
            actual: a[index],
            expected: b[index],
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tol(rel: f64, abs: f64, nan_equal: bool) -> Tolerance {
        Tolerance::new(rel, abs).nan_equal(nan_equal)
    }

    #[test]
    fn test_identical_sequences_zero_tolerance() {
        let a = [1.0, 2.0, 3.0];
        assert!(approx_equal(&a, &a, &tol(0.0, 0.0, false)).unwrap());
    }

    #[test]
    fn test_nan_policy() {
        let a = [1.0, f64::NAN];
        assert!(approx_equal(&a, &a, &tol(0.0, 0.0, true)).unwrap());
        assert!(!approx_equal(&a, &a, &tol(0.0, 0.0, false)).unwrap());
    }

    #[test]
    fn test_single_nan_never_close() {
        let t = tol(1.0, 1.0, true);
        assert!(!is_close(f64::NAN, 1.0, &t));
        assert!(!is_close(1.0, f64::NAN, &t));
    }

    #[test]
    fn test_absolute_boundary() {
        assert!(!approx_equal(&[1.0], &[1.1], &tol(0.0, 0.05, false)).unwrap());
        assert!(approx_equal(&[1.0], &[1.1], &tol(0.0, 0.2, false)).unwrap());
        // Exactly representable gap sits on the boundary and is close.
        assert!(is_close(1.0, 1.5, &tol(0.0, 0.5, false)));
    }

    #[test]
    fn test_relative_scales_with_reference() {
        let t = tol(0.1, 0.0, false);
        // |100 - 109| = 9 <= 0.1 * 109
        assert!(is_close(100.0, 109.0, &t));
        // |109 - 100| = 9 <= 0.1 * 100 = 10
        assert!(is_close(109.0, 100.0, &t));
        // |111 - 100| = 11 > 10
        assert!(!is_close(111.0, 100.0, &t));
    }

    #[test]
    fn test_infinities() {
        let t = Tolerance::default();
        assert!(is_close(f64::INFINITY, f64::INFINITY, &t));
        assert!(is_close(f64::NEG_INFINITY, f64::NEG_INFINITY, &t));
        assert!(!is_close(f64::INFINITY, f64::NEG_INFINITY, &t));
        assert!(!is_close(f64::INFINITY, 1e300, &t));
    }

    #[test]
    fn test_infinity_is_not_close_to_finite_under_any_tolerance() {
        let t = tol(f64::INFINITY, f64::INFINITY, false);
        assert!(!is_close(f64::INFINITY, 1.0, &t));
        assert!(!is_close(1.0, f64::NEG_INFINITY, &t));
    }

    #[test]
    fn test_negative_tolerance_never_close() {
        let t = tol(0.0, -1.0, false);
        assert!(!is_close(1.0, 1.0, &t));
        assert!(!is_close(0.0, 0.0, &tol(-1e-3, 0.0, false)));
    }

    #[test]
    fn test_invalid_tolerance_rejected() {
        let a = [1.0, 2.0];
        for bad in [
            tol(-1e-5, 1e-8, false),
            tol(1e-5, -1.0, false),
            tol(f64::NAN, 0.0, false),
            tol(0.0, f64::NAN, true),
        ] {
            let err = approx_equal(&a, &a, &bad).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)), "{:?}", bad);
            assert!(first_mismatch(&a, &a, &bad).is_err());
        }
        assert!(Tolerance::default().validate().is_ok());
        assert!(Tolerance::exact().validate().is_ok());
    }

    #[test]
    fn test_size_mismatch_reported_before_tolerance() {
        let err = approx_equal(&[1.0], &[], &tol(-1.0, -1.0, false)).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { left: 1, right: 0 }));
    }

    #[test]
    fn test_size_mismatch_is_error() {
        let err = approx_equal(&[1.0, 2.0], &[1.0], &Tolerance::default()).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { left: 2, right: 1 }));
    }

    #[test]
    fn test_order_sensitive() {
        let t = Tolerance::exact();
        assert!(!approx_equal(&[1.0, 2.0], &[2.0, 1.0], &t).unwrap());
    }

    #[test]
    fn test_empty_sequences_are_equal() {
        assert!(approx_equal(&[], &[], &Tolerance::exact()).unwrap());
    }

    #[test]
    fn test_first_mismatch_reports_index() {
        let a = [1.0, 2.0, 3.5, 4.0];
        let b = [1.0, 2.0, 3.0, 5.0];
        let m = first_mismatch(&a, &b, &tol(0.0, 0.1, false))
            .unwrap()
            .expect("mismatch expected");
        assert_eq!(m.index, 2);
        assert_eq!(m.actual, 3.5);
        assert_eq!(m.expected, 3.0);
    }

    #[test]
    fn test_idempotent() {
        let a = [0.1 + 0.2, f64::NAN, 1e-9];
        let b = [0.3, f64::NAN, 0.0];
        let t = Tolerance::default().nan_equal(true);
        let first = approx_equal(&a, &b, &t).unwrap();
        let second = approx_equal(&a, &b, &t).unwrap();
        assert_eq!(first, second);
        assert!(first);
    }
}
