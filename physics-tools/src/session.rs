use crate::correlation::Correlations;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::propagate::{self, Propagation};
use crate::varmap::VarMap;
use physics_core::{Precision, Symbol, Value};

#[derive(Debug, Default)]
pub struct Session {
    pub formula: Option<Formula>,
    pub values: VarMap,
    pub errors: VarMap,
    pub correlations: Correlations,
    pub precision: Precision,
    pub header_lines: Vec<String>,
    pub last_result: Option<Propagation>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(precision: Precision) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    pub fn load_dataset(&mut self, data: Dataset) {
        self.values = data.values;
        self.errors = data.errors;
        self.correlations = data.correlations;
        self.header_lines = data.header_lines;
        if data.formula.is_some() {
            self.formula = data.formula;
        }
        if let Some(p) = data.precision {
            self.precision = p;
        }
        self.last_result = None;
    }

    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            header_lines: self.header_lines.clone(),
            formula: self.formula.clone(),
            precision: Some(self.precision),
            correlations: self.correlations.clone(),
            values: self.values.clone(),
            errors: self.errors.clone(),
        }
    }

    pub fn set_formula(&mut self, formula: Formula) {
        self.formula = Some(formula);
        self.last_result = None;
    }

    pub fn set_value(&mut self, sym: Symbol, value: Value, error: Option<Value>) {
        if let Some(e) = error {
            self.errors.insert(sym.clone(), e);
        }
        self.values.insert(sym, value);
        self.last_result = None;
    }

    pub fn set_error(&mut self, sym: Symbol, error: Value) -> Result<()> {
        if !self.values.contains(&sym) {
            return Err(Error::UnknownVariable(sym.name().to_string()));
        }
        self.errors.insert(sym, error);
        self.last_result = None;
        Ok(())
    }

    pub fn drop_variable(&mut self, sym: &Symbol) -> bool {
        let removed = self.values.remove(sym).is_some();
        self.errors.remove(sym);
        self.correlations.forget(sym);
        self.last_result = None;
        removed
    }

    pub fn drop_all(&mut self) {
        self.values.clear();
        self.errors.clear();
        self.correlations.clear();
        self.last_result = None;
    }

    pub fn set_correlation(&mut self, a: &Symbol, b: &Symbol, rho: f64) -> Result<()> {
        self.correlations.set(a, b, rho)?;
        self.last_result = None;
        Ok(())
    }

    pub fn require_formula(&self) -> Result<&Formula> {
        self.formula.as_ref().ok_or(Error::NoFormula)
    }

    /// Runs the propagation and keeps the result.
    ///
    /// Correlations that involve only the current variables take effect;
    /// without any, uncertainties are treated as independent.
    pub fn propagate(&mut self) -> Result<&Propagation> {
        let formula = self.require_formula()?;
        let result = if self.correlations.is_empty() {
            propagate::propagate(formula.expr(), &self.values, &self.errors)?
        } else {
            propagate::propagate_correlated(
                formula.expr(),
                &self.values,
                &self.errors,
                &self.correlations,
            )?
        };
        Ok(self.last_result.insert(result))
    }

    pub fn require_result(&self) -> Result<&Propagation> {
        self.last_result.as_ref().ok_or(Error::NoResult)
    }

    pub fn rounded_result(&self) -> Result<(Value, Value)> {
        self.require_result()?.rounded(self.precision)
    }

    pub fn variable_count(&self) -> usize {
        self.values.len()
    }

    pub fn reset(&mut self) {
        let precision = self.precision;
        *self = Self::with_precision(precision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_dataset;

    #[test]
    fn new_session_defaults() {
        let session = Session::new();
        assert!(session.formula.is_none());
        assert_eq!(session.variable_count(), 0);
        assert_eq!(session.precision, Precision::Decimals(4));
        assert!(session.last_result.is_none());
    }

    #[test]
    fn propagate_without_formula_errors() {
        let mut session = Session::new();
        assert!(matches!(session.propagate(), Err(Error::NoFormula)));
    }

    #[test]
    fn changing_inputs_clears_result() {
        let mut session = Session::new();
        session.set_formula(Formula::parse("2*x").unwrap());
        session.set_value(Symbol::new("x"), Value::from(1.0), Some(Value::from(0.1)));
        session.propagate().unwrap();
        assert!(session.last_result.is_some());
        session.set_error(Symbol::new("x"), Value::from(0.2)).unwrap();
        assert!(session.last_result.is_none());
    }

    #[test]
    fn uncertainty_for_unknown_variable_errors() {
        let mut session = Session::new();
        let err = session.set_error(Symbol::new("q"), Value::from(0.1)).unwrap_err();
        assert!(matches!(err, Error::UnknownVariable(_)));
    }

    #[test]
    fn load_dataset_populates_session() {
        let content = "\
!Pendulum
:FORMULA T = 2*pi*sqrt(l/g)
:PRECISION SIG 3
l 0.75 +- 0.002
g 9.81 +- 0.01";
        let mut session = Session::new();
        session.load_dataset(parse_dataset(content).unwrap());
        assert_eq!(session.variable_count(), 2);
        assert_eq!(session.precision, Precision::Significant(3));
        assert_eq!(session.header_lines.len(), 1);
        let (v, _) = {
            session.propagate().unwrap();
            session.rounded_result().unwrap()
        };
        assert_eq!(v, Value::from(1.74));
    }

    #[test]
    fn drop_variable_forgets_correlations() {
        let mut session = Session::new();
        session.set_value(Symbol::new("a"), Value::from(1.0), Some(Value::from(0.1)));
        session.set_value(Symbol::new("b"), Value::from(1.0), Some(Value::from(0.1)));
        session
            .set_correlation(&Symbol::new("a"), &Symbol::new("b"), 0.5)
            .unwrap();
        assert!(session.drop_variable(&Symbol::new("a")));
        assert!(session.correlations.is_empty());
        assert!(!session.drop_variable(&Symbol::new("a")));
    }

    #[test]
    fn reset_keeps_precision() {
        let mut session = Session::with_precision(Precision::Decimals(2));
        session.set_formula(Formula::parse("x").unwrap());
        session.reset();
        assert!(session.formula.is_none());
        assert_eq!(session.precision, Precision::Decimals(2));
    }
}
