//! Rounding of reported results.
//!
//! [`round_decimals`] works in decimal places: the value is scaled by
//! `10^d`, rounded half to even and scaled back, so `round_decimals(2.5, 0)`
//! is `2.0` and `round_decimals(1234.5, -2)` is `1200.0`.

use crate::constants::{DEFAULT_DECIMALS, MAX_DECIMALS};
use crate::errors::ExprResult;
use crate::math::{powi10, rint};
use crate::value::{broadcast_len, from_fn, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

pub fn round_decimals(x: f64, decimals: i32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let d = decimals.clamp(-MAX_DECIMALS, MAX_DECIMALS);
    let y = if d >= 0 {
        rint(x * powi10(d)) / powi10(d)
    } else {
        rint(x / powi10(-d)) * powi10(-d)
    };
    if y.is_finite() {
        y
    } else {
        x
    }
}

/// Decimal place of the `n`-th significant figure of `x`.
///
/// `None` for zero and non-finite values, which have no leading digit. The
/// result is clamped to `±MAX_DECIMALS`.
pub fn decimals_for(x: f64, n: u32) -> Option<i32> {
    if x == 0.0 || !x.is_finite() {
        return None;
    }
    let lead = libm::floor(libm::log10(libm::fabs(x))) as i64;
    let d = i64::from(n.max(1)) - 1 - lead;
    let limit = i64::from(MAX_DECIMALS);
    i32::try_from(d.clamp(-limit, limit)).ok()
}

pub fn round_significant(x: f64, n: u32) -> f64 {
    match decimals_for(x, n) {
        Some(d) => round_decimals(x, d),
        None => x,
    }
}

/// How a propagated `(nominal, error)` pair is rounded for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "digits", rename_all = "lowercase")]
pub enum Precision {
    /// Fixed number of decimal places, negative values round left of the point.
    Decimals(i32),
    /// Significant figures, applied to nominal and error independently.
    Significant(u32),
    /// Error to `n` significant figures, nominal to the same decimal place.
    Uncertainty(u32),
}

impl Default for Precision {
    fn default() -> Self {
        Precision::Decimals(DEFAULT_DECIMALS)
    }
}

impl Precision {
    /// Rounds a nominal value and its uncertainty.
    ///
    /// ```
    /// use physics_core::{Precision, Value};
    ///
    /// let (v, e) = Precision::Uncertainty(1)
    ///     .apply(&Value::from(9.81234), &Value::from(0.0372))
    ///     .unwrap();
    /// assert_eq!(v, Value::from(9.81));
    /// assert_eq!(e, Value::from(0.04));
    /// ```
    pub fn apply(&self, nominal: &Value, error: &Value) -> ExprResult<(Value, Value)> {
        match *self {
            Precision::Decimals(d) => Ok((
                nominal.map(|x| round_decimals(x, d)),
                error.map(|x| round_decimals(x, d)),
            )),
            Precision::Significant(n) => Ok((
                nominal.map(|x| round_significant(x, n)),
                error.map(|x| round_significant(x, n)),
            )),
            Precision::Uncertainty(n) => {
                let len = broadcast_len(&[nominal, error])?;
                let place = |i: usize| decimals_for(error.get(i), n).unwrap_or(DEFAULT_DECIMALS);
                let v = from_fn(len, |i| round_decimals(nominal.get(i), place(i)));
                let e = from_fn(len, |i| round_decimals(error.get(i), place(i)));
                Ok((v, e))
            }
        }
    }

    /// Decimal places used to print a single value, if fixed.
    pub fn display_decimals(&self) -> Option<usize> {
        match *self {
            Precision::Decimals(d) if d >= 0 => Some(d as usize),
            Precision::Decimals(_) => Some(0),
            _ => None,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Decimals(d) => write!(f, "{}", d),
            Precision::Significant(n) => write!(f, "SIG {}", n),
            Precision::Uncertainty(n) => write!(f, "UNC {}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_half_to_even() {
        assert_eq!(round_decimals(2.5, 0), 2.0);
        assert_eq!(round_decimals(3.5, 0), 4.0);
        assert_eq!(round_decimals(-0.125, 2), -0.12);
        assert_eq!(round_decimals(1.23456789, 4), 1.2346);
    }

    #[test]
    fn negative_decimals() {
        assert_eq!(round_decimals(1234.5, -2), 1200.0);
        assert_eq!(round_decimals(1250.0, -2), 1200.0);
        assert_eq!(round_decimals(1350.0, -2), 1400.0);
    }

    #[test]
    fn non_finite_passes_through() {
        assert!(round_decimals(f64::NAN, 3).is_nan());
        assert_eq!(round_decimals(f64::INFINITY, 3), f64::INFINITY);
        assert!(round_significant(f64::NAN, 2).is_nan());
    }

    #[test]
    fn huge_decimals_leave_value_alone() {
        assert_eq!(round_decimals(1e300, 300), 1e300);
        assert_eq!(round_decimals(5.0, 10_000), 5.0);
    }

    #[test]
    fn significant_figures() {
        assert_eq!(round_significant(0.0123456, 3), 0.0123);
        assert_eq!(round_significant(98765.0, 2), 99000.0);
        assert_eq!(round_significant(0.0, 3), 0.0);
        assert_eq!(decimals_for(0.0372, 1), Some(2));
        assert_eq!(decimals_for(372.0, 2), Some(-1));
        assert_eq!(decimals_for(0.0, 2), None);
    }

    #[test]
    fn huge_digit_counts_are_clamped() {
        assert_eq!(decimals_for(1e-5, u32::MAX), Some(MAX_DECIMALS));
        assert_eq!(decimals_for(1.5, 3_000_000_000), Some(MAX_DECIMALS));
        assert!((round_significant(1e-5, 2_147_483_647) - 1e-5).abs() < 1e-18);
        assert!((round_significant(1.5, 3_000_000_000) - 1.5).abs() < 1e-12);
        let (v, e) = Precision::Significant(u32::MAX)
            .apply(&Value::from(1.5), &Value::from(0.25))
            .unwrap();
        assert!((v.get(0) - 1.5).abs() < 1e-12);
        assert!((e.get(0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn default_is_four_decimals() {
        let (v, e) = Precision::default()
            .apply(&Value::from(1.234567), &Value::from(0.000049))
            .unwrap();
        assert_eq!(v, Value::from(1.2346));
        assert_eq!(e, Value::from(0.0));
    }

    #[test]
    fn uncertainty_mode_elementwise() {
        let nominal = Value::from(vec![1.23456, 20.4567]);
        let error = Value::from(vec![0.0123, 1.7]);
        let (v, e) = Precision::Uncertainty(2).apply(&nominal, &error).unwrap();
        assert_eq!(v, Value::from(vec![1.235, 20.5]));
        assert_eq!(e, Value::from(vec![0.012, 1.7]));
    }

    #[test]
    fn uncertainty_mode_broadcasts_scalar_nominal() {
        let nominal = Value::from(20.4567);
        let error = Value::from(vec![0.0123, 1.7]);
        let (v, e) = Precision::Uncertainty(2).apply(&nominal, &error).unwrap();
        assert_eq!(v, Value::from(vec![20.457, 20.5]));
        assert_eq!(e, Value::from(vec![0.012, 1.7]));
    }

    #[test]
    fn uncertainty_mode_empty_error() {
        let (v, e) = Precision::Uncertainty(2)
            .apply(&Value::from(3.0), &Value::Array(vec![]))
            .unwrap();
        assert_eq!(v, Value::Array(vec![]));
        assert_eq!(e, Value::Array(vec![]));
    }

    #[test]
    fn uncertainty_mode_zero_error_uses_default_place() {
        let (v, e) = Precision::Uncertainty(2)
            .apply(&Value::from(3.14159265), &Value::from(0.0))
            .unwrap();
        assert_eq!(v, Value::from(3.1416));
        assert_eq!(e, Value::from(0.0));
    }

    #[test]
    fn display_and_serde() {
        assert_eq!(Precision::Decimals(4).to_string(), "4");
        assert_eq!(Precision::Significant(3).to_string(), "SIG 3");
        assert_eq!(Precision::Uncertainty(2).to_string(), "UNC 2");
        let json = serde_json::to_string(&Precision::Significant(3)).unwrap();
        assert_eq!(json, r#"{"mode":"significant","digits":3}"#);
    }
}
