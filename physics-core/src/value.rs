//! Scalar or one-dimensional array values with broadcasting.
//!
//! A measured quantity is either a single number or a fixed-length series of
//! numbers. Arithmetic between values broadcasts in one dimension:
//!
//! | Left | Right | Result |
//! |------|-------|--------|
//! | scalar | scalar | scalar |
//! | scalar | array(n) | array(n) |
//! | array(1) | array(n) | array(n) |
//! | array(n) | array(n) | array(n) |
//! | array(n) | array(m), n ≠ m, neither 1 | `ShapeMismatch` |

use crate::errors::{ExprError, ExprResult, MathErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Array(Vec<f64>),
}

impl Value {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// Number of elements; `None` for a scalar.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Scalar(_) => None,
            Value::Array(v) => Some(v.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Array(v) if v.is_empty())
    }

    /// Element `i`, repeating scalars and length-1 arrays; `NaN` past the end.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        match self {
            Value::Scalar(x) => *x,
            Value::Array(v) if v.len() == 1 => v[0],
            Value::Array(v) => v.get(i).copied().unwrap_or(f64::NAN),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Array(_) => None,
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Value::Scalar(x) => vec![*x],
            Value::Array(v) => v.clone(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let n = self.len().unwrap_or(1);
        (0..n).map(move |i| self.get(i))
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(x) => Value::Scalar(f(*x)),
            Value::Array(v) => Value::Array(v.iter().map(|&x| f(x)).collect()),
        }
    }

    pub fn zip_with(&self, other: &Value, f: impl Fn(f64, f64) -> f64) -> ExprResult<Value> {
        match broadcast_len(&[self, other])? {
            None => Ok(Value::Scalar(f(self.get(0), other.get(0)))),
            Some(n) => Ok(Value::Array(
                (0..n).map(|i| f(self.get(i), other.get(i))).collect(),
            )),
        }
    }

    pub fn sqrt(&self) -> Value {
        self.map(libm::sqrt)
    }

    pub fn abs(&self) -> Value {
        self.map(libm::fabs)
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(f64::is_finite)
    }

    /// Element-wise sum of several values; the empty sum is scalar zero.
    pub fn sum(values: &[Value]) -> ExprResult<Value> {
        let refs: Vec<&Value> = values.iter().collect();
        let n = broadcast_len(&refs)?;
        Ok(from_fn(n, |i| values.iter().map(|v| v.get(i)).sum()))
    }
}

/// Common length of a set of operands, `None` when all are scalars.
///
/// ```
/// use physics_core::value::{broadcast_len, Value};
/// let a = Value::from(vec![1.0, 2.0, 3.0]);
/// let b = Value::from(2.0);
/// assert_eq!(broadcast_len(&[&a, &b]).unwrap(), Some(3));
/// ```
pub fn broadcast_len(values: &[&Value]) -> ExprResult<Option<usize>> {
    let mut len: Option<usize> = None;
    for v in values {
        let Some(n) = v.len() else { continue };
        len = match len {
            None => Some(n),
            Some(m) if m == n || n == 1 => Some(m),
            Some(1) => Some(n),
            Some(m) => {
                return Err(ExprError::math_error(
                    "broadcast",
                    MathErrorKind::ShapeMismatch,
                    &format!("operands could not be broadcast together with lengths {} and {}", m, n),
                ));
            }
        };
    }
    Ok(len)
}

/// Builds a value of the given broadcast length from an element function.
pub fn from_fn(len: Option<usize>, f: impl Fn(usize) -> f64) -> Value {
    match len {
        None => Value::Scalar(f(0)),
        Some(n) => Value::Array((0..n).map(f).collect()),
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Scalar(0.0)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Array(v)
    }
}

impl From<&[f64]> for Value {
    fn from(v: &[f64]) -> Self {
        Value::Array(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(v: [f64; N]) -> Self {
        Value::Array(v.to_vec())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(x) => write_number(f, *x),
            Value::Array(v) => {
                f.write_str("[")?;
                for (i, x) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_number(f, *x)?;
                }
                f.write_str("]")
            }
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    match f.precision() {
        Some(p) => write!(f, "{:.*}", p, x),
        None => write!(f, "{}", x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_scalar_with_array() {
        let a = Value::from(2.0);
        let b = Value::from(vec![1.0, 2.0, 3.0]);
        let c = a.zip_with(&b, |x, y| x * y).unwrap();
        assert_eq!(c, Value::Array(vec![2.0, 4.0, 6.0]));
    }

    #[test]
    fn broadcast_length_one_array() {
        let a = Value::from(vec![10.0]);
        let b = Value::from(vec![1.0, 2.0]);
        let c = a.zip_with(&b, |x, y| x + y).unwrap();
        assert_eq!(c, Value::Array(vec![11.0, 12.0]));
        let d = b.zip_with(&a, |x, y| x + y).unwrap();
        assert_eq!(d, Value::Array(vec![11.0, 12.0]));
    }

    #[test]
    fn scalars_stay_scalar() {
        let c = Value::from(3.0).zip_with(&Value::from(4.0), f64::hypot).unwrap();
        assert_eq!(c, Value::Scalar(5.0));
    }

    #[test]
    fn mismatched_lengths_error() {
        let a = Value::from(vec![1.0, 2.0, 3.0]);
        let b = Value::from(vec![1.0, 2.0]);
        let err = a.zip_with(&b, |x, y| x + y).unwrap_err();
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn empty_array_broadcasts_with_scalar() {
        let a = Value::from(Vec::<f64>::new());
        let c = a.zip_with(&Value::from(1.0), |x, y| x + y).unwrap();
        assert_eq!(c, Value::Array(vec![]));
        assert!(c.is_empty());
    }

    #[test]
    fn get_past_the_end_is_nan() {
        assert!(Value::from(Vec::<f64>::new()).get(0).is_nan());
        assert!(Value::from(vec![1.0, 2.0]).get(2).is_nan());
        assert_eq!(Value::from(vec![7.0]).get(5), 7.0);
    }

    #[test]
    fn sum_of_values() {
        let parts = vec![
            Value::from(1.0),
            Value::from(vec![1.0, 2.0]),
            Value::from(vec![0.5, 0.5]),
        ];
        assert_eq!(Value::sum(&parts).unwrap(), Value::Array(vec![2.5, 3.5]));
        assert_eq!(Value::sum(&[]).unwrap(), Value::Scalar(0.0));
    }

    #[test]
    fn display_respects_precision() {
        let v = Value::from(vec![1.23456, 2.0]);
        assert_eq!(format!("{:.2}", v), "[1.23, 2.00]");
        assert_eq!(format!("{}", Value::from(0.5)), "0.5");
    }

    #[test]
    fn serde_untagged() {
        let s = serde_json::to_string(&Value::from(vec![1.0, 2.5])).unwrap();
        assert_eq!(s, "[1.0,2.5]");
        let v: Value = serde_json::from_str("3.5").unwrap();
        assert_eq!(v, Value::Scalar(3.5));
    }

    #[test]
    fn finite_check() {
        assert!(Value::from(vec![1.0, 2.0]).is_finite());
        assert!(!Value::from(vec![1.0, f64::NAN]).is_finite());
    }
}
