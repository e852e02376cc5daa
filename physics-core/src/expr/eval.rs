use super::{Expr, Symbol};
use crate::errors::{ExprError, ExprResult};
use std::collections::HashMap;

impl Expr {
    /// Evaluates the tree directly against scalar bindings.
    ///
    /// Tree walking is fine for one-off values; use [`crate::Lambda`] to
    /// evaluate the same expression many times or over arrays.
    pub fn eval_scalar(&self, vars: &HashMap<Symbol, f64>) -> ExprResult<f64> {
        let v = match self {
            Expr::Num(v) => *v,
            Expr::Const(c) => c.value(),
            Expr::Sym(s) => *vars
                .get(s)
                .ok_or_else(|| ExprError::UnboundSymbol(s.name().to_string()))?,
            Expr::Neg(a) => -a.eval_scalar(vars)?,
            Expr::Add(a, b) => a.eval_scalar(vars)? + b.eval_scalar(vars)?,
            Expr::Sub(a, b) => a.eval_scalar(vars)? - b.eval_scalar(vars)?,
            Expr::Mul(a, b) => a.eval_scalar(vars)? * b.eval_scalar(vars)?,
            Expr::Div(a, b) => a.eval_scalar(vars)? / b.eval_scalar(vars)?,
            Expr::Pow(a, b) => libm::pow(a.eval_scalar(vars)?, b.eval_scalar(vars)?),
            Expr::Call(f, a) => f.apply(a.eval_scalar(vars)?),
        };
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse_expr;

    #[test]
    fn unbound_symbol_is_error() {
        let e = parse_expr("x + y").unwrap();
        let mut vars = HashMap::new();
        vars.insert(Symbol::new("x"), 1.0);
        assert_eq!(e.eval_scalar(&vars), Err(ExprError::UnboundSymbol("y".into())));
    }

    #[test]
    fn ieee_semantics_for_bad_domains() {
        let vars = HashMap::new();
        assert!(parse_expr("1/0").unwrap().eval_scalar(&vars).unwrap().is_infinite());
        assert!(parse_expr("sqrt(-1)").unwrap().eval_scalar(&vars).unwrap().is_nan());
        assert!(parse_expr("ln(0)").unwrap().eval_scalar(&vars).unwrap().is_infinite());
    }
}
