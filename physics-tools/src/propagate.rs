//! First-order propagation of measurement uncertainty through a formula.
//!
//! For `f(x₁, …, xₙ)` with independent uncertainties `σᵢ`:
//!
//! ```text
//! σ_f = sqrt( Σ (∂f/∂xᵢ · σᵢ)² )
//! ```
//!
//! Partial derivatives are exact: they are taken symbolically, simplified and
//! compiled before any number is plugged in. Inputs may be scalars or
//! equal-length arrays; arrays are handled element by element with
//! broadcasting, so a batch of measurements propagates in a single call.

use crate::correlation::Correlations;
use crate::error::{Error, Result};
use crate::varmap::VarMap;
use nalgebra::DVector;
use physics_core::value::broadcast_len;
use physics_core::{diff, Expr, Lambda, Precision, Symbol, Value};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Unrounded outcome of a propagation.
#[derive(Debug, Clone, Serialize)]
pub struct Propagation {
    pub nominal: Value,
    pub error: Value,
    /// Symbols in the order the values were given.
    #[serde(serialize_with = "names")]
    pub symbols: Vec<Symbol>,
    #[serde(serialize_with = "exprs")]
    pub derivatives: Vec<Expr>,
    /// Variance contributed by each symbol; these sum to `error²`.
    pub contributions: Vec<Value>,
}

fn names<S: serde::Serializer>(symbols: &[Symbol], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_seq(symbols.iter().map(|x| x.name()))
}

fn exprs<S: serde::Serializer>(exprs: &[Expr], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_seq(exprs.iter().map(|e| e.to_string()))
}

impl Propagation {
    pub fn rounded(&self, precision: Precision) -> Result<(Value, Value)> {
        Ok(precision.apply(&self.nominal, &self.error)?)
    }

    /// `|σ_f / f|`, element-wise.
    pub fn relative_error(&self) -> Result<Value> {
        Ok(self.error.zip_with(&self.nominal, |e, v| e / v)?.abs())
    }

    /// Fraction of the total variance each symbol accounts for.
    pub fn variance_shares(&self) -> Result<Vec<Value>> {
        let total = self.error.map(|e| e * e);
        self.contributions
            .iter()
            .map(|c| -> Result<Value> {
                Ok(c.zip_with(&total, |c, t| if t == 0.0 { 0.0 } else { c / t })?)
            })
            .collect()
    }

    pub fn derivative(&self, sym: &Symbol) -> Option<&Expr> {
        let idx = self.symbols.iter().position(|s| s == sym)?;
        self.derivatives.get(idx)
    }
}

/// Propagates `errors` through `formula` and rounds the result.
///
/// Returns `(value, uncertainty)`, each a scalar or an array matching the
/// broadcast shape of the inputs.
///
/// ```
/// use physics_core::{parse_expr, Precision, Value};
/// use physics_tools::propagate::propagate_error;
/// use physics_tools::varmap::VarMap;
///
/// let f = parse_expr("m*g*h").unwrap();
/// let values = VarMap::from([("m", 2.0), ("g", 9.81), ("h", 1.5)]);
/// let errors = VarMap::from([("m", 0.01), ("g", 0.0), ("h", 0.02)]);
/// let (v, e) = propagate_error(&f, &values, &errors, Precision::Decimals(4)).unwrap();
/// assert_eq!(v, Value::from(29.43));
/// assert!((e.as_scalar().unwrap() - 0.4191).abs() < 1e-9);
/// ```
pub fn propagate_error(
    formula: &Expr,
    values: &VarMap,
    errors: &VarMap,
    precision: Precision,
) -> Result<(Value, Value)> {
    propagate(formula, values, errors)?.rounded(precision)
}

struct Prepared {
    symbols: Vec<Symbol>,
    sigmas: Vec<Value>,
    nominal: Value,
    derivatives: Vec<Expr>,
    slopes: Vec<Value>,
}

fn prepare(formula: &Expr, values: &VarMap, errors: &VarMap) -> Result<Prepared> {
    let symbols: Vec<Symbol> = values.keys().cloned().collect();
    if let Some(missing) = formula.free_symbols().into_iter().find(|s| !values.contains(s)) {
        return Err(Error::UnknownVariable(missing.name().to_string()));
    }
    let sigmas = symbols
        .iter()
        .map(|s| {
            errors
                .get(s)
                .cloned()
                .ok_or_else(|| Error::MissingUncertainty(s.name().to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    let args: Vec<Value> = values.values().cloned().collect();

    let nominal = Lambda::new(formula, &symbols)?.call(&args)?;

    let compiled = symbols
        .par_iter()
        .map(|s| -> Result<(Expr, Lambda)> {
            let d = diff(formula, s);
            debug!(symbol = %s, derivative = %d, "partial derivative");
            let lambda = Lambda::new(&d, &symbols)?;
            Ok((d, lambda))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut derivatives = Vec::with_capacity(compiled.len());
    let mut slopes = Vec::with_capacity(compiled.len());
    for (d, lambda) in compiled {
        slopes.push(lambda.call(&args)?);
        derivatives.push(d);
    }

    Ok(Prepared {
        symbols,
        sigmas,
        nominal,
        derivatives,
        slopes,
    })
}

/// Propagates independent uncertainties without rounding.
pub fn propagate(formula: &Expr, values: &VarMap, errors: &VarMap) -> Result<Propagation> {
    let p = prepare(formula, values, errors)?;
    let contributions = p
        .slopes
        .iter()
        .zip(&p.sigmas)
        .map(|(slope, sigma)| -> Result<Value> {
            Ok(slope.zip_with(sigma, |d, e| (d * e) * (d * e))?)
        })
        .collect::<Result<Vec<_>>>()?;
    let error = Value::sum(&contributions)?.sqrt();
    Ok(finish(p, error, contributions))
}

/// Propagates correlated uncertainties: `σ_f² = gᵀ R g` with `gᵢ = ∂f/∂xᵢ · σᵢ`
/// and `R` the correlation matrix.
///
/// Each symbol's contribution is `gᵢ (R g)ᵢ`, so contributions still sum to
/// the total variance; with correlations they may be negative.
pub fn propagate_correlated(
    formula: &Expr,
    values: &VarMap,
    errors: &VarMap,
    correlations: &Correlations,
) -> Result<Propagation> {
    let p = prepare(formula, values, errors)?;
    let r = correlations.check(&p.symbols)?;
    let mut operands: Vec<&Value> = p.slopes.iter().collect();
    operands.extend(p.sigmas.iter());
    let len = broadcast_len(&operands)?;
    let n = p.symbols.len();

    let element = |k: usize| -> Vec<f64> {
        let g = DVector::from_fn(n, |i, _| p.slopes[i].get(k) * p.sigmas[i].get(k));
        let rg = &r * &g;
        g.component_mul(&rg).iter().copied().collect()
    };
    let per_element: Vec<Vec<f64>> = match len {
        None => vec![element(0)],
        Some(m) => (0..m).into_par_iter().map(element).collect(),
    };

    let contributions: Vec<Value> = (0..n)
        .map(|i| match len {
            None => Value::Scalar(per_element[0][i]),
            Some(_) => Value::Array(per_element.iter().map(|c| c[i]).collect()),
        })
        .collect();
    let variance = match len {
        None => Value::Scalar(per_element[0].iter().sum()),
        Some(_) => Value::Array(per_element.iter().map(|c| c.iter().sum()).collect()),
    };
    // Rounding can push a zero variance slightly negative.
    let error = variance.map(|v| libm::sqrt(if v < 0.0 { 0.0 } else { v }));
    Ok(finish(p, error, contributions))
}

fn finish(p: Prepared, error: Value, contributions: Vec<Value>) -> Propagation {
    if !p.nominal.is_finite() {
        warn!(value = %p.nominal, "formula evaluated to a non-finite value");
    }
    if !error.is_finite() {
        warn!(error = %error, "propagated uncertainty is not finite");
    }
    Propagation {
        nominal: p.nominal,
        error,
        symbols: p.symbols,
        derivatives: p.derivatives,
        contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics_core::parse_expr;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn sum_adds_in_quadrature() {
        let f = parse_expr("a + b").unwrap();
        let values = VarMap::from([("a", 1.0), ("b", 2.0)]);
        let errors = VarMap::from([("a", 0.3), ("b", 0.4)]);
        let p = propagate(&f, &values, &errors).unwrap();
        assert_eq!(p.nominal, Value::from(3.0));
        assert!(close(p.error.as_scalar().unwrap(), 0.5, 1e-15));
    }

    #[test]
    fn product_relative_errors() {
        let f = parse_expr("x*y").unwrap();
        let values = VarMap::from([("x", 10.0), ("y", 5.0)]);
        let errors = VarMap::from([("x", 0.1), ("y", 0.1)]);
        let p = propagate(&f, &values, &errors).unwrap();
        let rel = p.relative_error().unwrap().as_scalar().unwrap();
        let expected = (0.01f64.powi(2) + 0.02f64.powi(2)).sqrt();
        assert!(close(rel, expected, 1e-12));
    }

    #[test]
    fn relative_error_is_positive_for_negative_nominal() {
        let f = parse_expr("-2*x").unwrap();
        let values = VarMap::from([("x", 4.0)]);
        let errors = VarMap::from([("x", 0.2)]);
        let p = propagate(&f, &values, &errors).unwrap();
        assert_eq!(p.nominal, Value::from(-8.0));
        let rel = p.relative_error().unwrap().as_scalar().unwrap();
        assert!(close(rel, 0.05, 1e-15));
    }

    #[test]
    fn array_inputs_broadcast() {
        let f = parse_expr("m*v").unwrap();
        let values = VarMap::from([("m", Value::from(2.0)), ("v", Value::from(vec![1.0, 2.0, 3.0]))]);
        let errors = VarMap::from([("m", 0.1), ("v", 0.0)]);
        let p = propagate(&f, &values, &errors).unwrap();
        assert_eq!(p.nominal, Value::from(vec![2.0, 4.0, 6.0]));
        let e = p.error.to_vec();
        assert!(close(e[0], 0.1, 1e-12));
        assert!(close(e[2], 0.3, 1e-12));
    }

    #[test]
    fn rounding_applied() {
        let f = parse_expr("x/3").unwrap();
        let values = VarMap::from([("x", 1.0)]);
        let errors = VarMap::from([("x", 0.1)]);
        let (v, e) = propagate_error(&f, &values, &errors, Precision::Decimals(3)).unwrap();
        assert_eq!(v, Value::from(0.333));
        assert_eq!(e, Value::from(0.033));
    }

    #[test]
    fn formula_symbol_without_value_is_error() {
        let f = parse_expr("a*b").unwrap();
        let values = VarMap::from([("a", 1.0)]);
        let errors = VarMap::from([("a", 0.1), ("b", 0.1)]);
        let err = propagate(&f, &values, &errors).unwrap_err();
        assert!(matches!(err, Error::UnknownVariable(ref n) if n == "b"));
    }

    #[test]
    fn value_without_uncertainty_is_error() {
        let f = parse_expr("a*b").unwrap();
        let values = VarMap::from([("a", 1.0), ("b", 2.0)]);
        let errors = VarMap::from([("a", 0.1)]);
        let err = propagate(&f, &values, &errors).unwrap_err();
        assert!(matches!(err, Error::MissingUncertainty(ref n) if n == "b"));
    }

    #[test]
    fn extra_error_keys_are_ignored() {
        let f = parse_expr("2*a").unwrap();
        let values = VarMap::from([("a", 1.0)]);
        let errors = VarMap::from([("a", 0.1), ("zzz", 5.0)]);
        let p = propagate(&f, &values, &errors).unwrap();
        assert!(close(p.error.as_scalar().unwrap(), 0.2, 1e-15));
    }

    #[test]
    fn values_not_in_formula_contribute_nothing() {
        let f = parse_expr("a").unwrap();
        let values = VarMap::from([("a", 1.0), ("b", 2.0)]);
        let errors = VarMap::from([("a", 0.1), ("b", 7.0)]);
        let p = propagate(&f, &values, &errors).unwrap();
        assert_eq!(p.contributions[1], Value::from(0.0));
        assert_eq!(p.derivative(&Symbol::new("b")), Some(&Expr::Num(0.0)));
    }

    #[test]
    fn shares_sum_to_one() {
        let f = parse_expr("a*b^2/c").unwrap();
        let values = VarMap::from([("a", 1.2), ("b", 3.4), ("c", 0.7)]);
        let errors = VarMap::from([("a", 0.01), ("b", 0.05), ("c", 0.02)]);
        let p = propagate(&f, &values, &errors).unwrap();
        let total: f64 = p
            .variance_shares()
            .unwrap()
            .iter()
            .map(|v| v.as_scalar().unwrap())
            .sum();
        assert!(close(total, 1.0, 1e-12));
    }

    #[test]
    fn non_finite_result_is_not_an_error() {
        let f = parse_expr("1/x").unwrap();
        let values = VarMap::from([("x", 0.0)]);
        let errors = VarMap::from([("x", 0.1)]);
        let p = propagate(&f, &values, &errors).unwrap();
        assert!(p.nominal.as_scalar().unwrap().is_infinite());
    }

    #[test]
    fn mismatched_array_lengths_error() {
        let f = parse_expr("a + b").unwrap();
        let values = VarMap::from([("a", vec![1.0, 2.0]), ("b", vec![1.0, 2.0, 3.0])]);
        let errors = VarMap::from([("a", 0.1), ("b", 0.1)]);
        assert!(matches!(propagate(&f, &values, &errors), Err(Error::Expr(_))));
    }

    #[test]
    fn uncorrelated_matches_independent() {
        let f = parse_expr("a*sin(b)").unwrap();
        let values = VarMap::from([("a", Value::from(vec![1.0, 2.0])), ("b", Value::from(0.3))]);
        let errors = VarMap::from([("a", 0.05), ("b", 0.01)]);
        let p = propagate(&f, &values, &errors).unwrap();
        let q = propagate_correlated(&f, &values, &errors, &Correlations::new()).unwrap();
        for (x, y) in p.error.iter().zip(q.error.iter()) {
            assert!(close(x, y, 1e-15));
        }
    }

    #[test]
    fn full_correlation_adds_linearly() {
        let f = parse_expr("a + b").unwrap();
        let values = VarMap::from([("a", 1.0), ("b", 2.0)]);
        let errors = VarMap::from([("a", 0.3), ("b", 0.4)]);
        let mut c = Correlations::new();
        c.set(&Symbol::new("a"), &Symbol::new("b"), 1.0).unwrap();
        let q = propagate_correlated(&f, &values, &errors, &c).unwrap();
        assert!(close(q.error.as_scalar().unwrap(), 0.7, 1e-12));
        c.set(&Symbol::new("a"), &Symbol::new("b"), -1.0).unwrap();
        let q = propagate_correlated(&f, &values, &errors, &c).unwrap();
        assert!(close(q.error.as_scalar().unwrap(), 0.1, 1e-12));
    }

    #[test]
    fn correlated_contributions_sum_to_variance() {
        let f = parse_expr("a*b").unwrap();
        let values = VarMap::from([("a", 2.0), ("b", 3.0)]);
        let errors = VarMap::from([("a", 0.1), ("b", 0.2)]);
        let mut c = Correlations::new();
        c.set(&Symbol::new("a"), &Symbol::new("b"), 0.5).unwrap();
        let q = propagate_correlated(&f, &values, &errors, &c).unwrap();
        let sum: f64 = q.contributions.iter().map(|v| v.as_scalar().unwrap()).sum();
        let e = q.error.as_scalar().unwrap();
        assert!(close(sum, e * e, 1e-12));
    }
}
