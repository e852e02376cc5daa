//! Pairwise correlation coefficients between measured quantities.

use crate::error::{Error, Result};
use nalgebra::{DMatrix, SymmetricEigen};
use physics_core::Symbol;
use std::collections::BTreeMap;

/// Eigenvalues above `-PSD_TOLERANCE` count as non-negative.
const PSD_TOLERANCE: f64 = 1e-12;

/// Symmetric correlation coefficients, stored once per unordered pair.
///
/// Unlisted pairs are uncorrelated and every symbol is fully correlated with
/// itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correlations {
    pairs: BTreeMap<(Symbol, Symbol), f64>,
}

fn key(a: &Symbol, b: &Symbol) -> (Symbol, Symbol) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl Correlations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, a: &Symbol, b: &Symbol, rho: f64) -> Result<()> {
        if a == b {
            return Err(Error::Correlation(format!(
                "{} is always fully correlated with itself",
                a
            )));
        }
        if !rho.is_finite() || !(-1.0..=1.0).contains(&rho) {
            return Err(Error::Correlation(format!(
                "coefficient for {} and {} must lie in [-1, 1], got {}",
                a, b, rho
            )));
        }
        if rho == 0.0 {
            self.pairs.remove(&key(a, b));
        } else {
            self.pairs.insert(key(a, b), rho);
        }
        Ok(())
    }

    pub fn get(&self, a: &Symbol, b: &Symbol) -> f64 {
        if a == b {
            return 1.0;
        }
        self.pairs.get(&key(a, b)).copied().unwrap_or(0.0)
    }

    /// Drops every pair involving `sym`.
    pub fn forget(&mut self, sym: &Symbol) {
        self.pairs.retain(|(a, b), _| a != sym && b != sym);
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Symbol, f64)> {
        self.pairs.iter().map(|((a, b), &rho)| (a, b, rho))
    }

    /// Correlation matrix for `symbols`, in that order.
    pub fn matrix(&self, symbols: &[Symbol]) -> DMatrix<f64> {
        let n = symbols.len();
        DMatrix::from_fn(n, n, |i, j| self.get(&symbols[i], &symbols[j]))
    }

    /// Fails unless the correlation matrix over `symbols` is positive
    /// semi-definite, i.e. could come from real data.
    pub fn check(&self, symbols: &[Symbol]) -> Result<DMatrix<f64>> {
        let m = self.matrix(symbols);
        if symbols.is_empty() {
            return Ok(m);
        }
        let eigen = SymmetricEigen::new(m.clone());
        let min = eigen.eigenvalues.min();
        if min < -PSD_TOLERANCE {
            return Err(Error::Correlation(format!(
                "correlation matrix is not positive semi-definite (smallest eigenvalue {:.3e})",
                min
            )));
        }
        Ok(m)
    }
}
