use super::{simplify, Expr, Func, Symbol};

/// Exact partial derivative of `expr` with respect to `sym`, simplified.
///
/// ```
/// use physics_core::expr::{diff, parse_expr, Symbol};
///
/// let f = parse_expr("m*g*h").unwrap();
/// assert_eq!(diff(&f, &Symbol::new("h")).to_string(), "m*g");
/// ```
pub fn diff(expr: &Expr, sym: &Symbol) -> Expr {
    simplify(&derive(expr, sym))
}

fn derive(expr: &Expr, sym: &Symbol) -> Expr {
    if !expr.depends_on(sym) {
        return Expr::Num(0.0);
    }
    match expr {
        Expr::Num(_) | Expr::Const(_) => Expr::Num(0.0),
        Expr::Sym(s) => Expr::Num(if s == sym { 1.0 } else { 0.0 }),
        Expr::Neg(a) => -derive(a, sym),
        Expr::Add(a, b) => derive(a, sym) + derive(b, sym),
        Expr::Sub(a, b) => derive(a, sym) - derive(b, sym),
        Expr::Mul(a, b) => {
            derive(a, sym) * (**b).clone() + (**a).clone() * derive(b, sym)
        }
        Expr::Div(a, b) => {
            let num = derive(a, sym) * (**b).clone() - (**a).clone() * derive(b, sym);
            num / (**b).clone().pow(2.0)
        }
        Expr::Pow(base, exponent) => derive_pow(base, exponent, sym),
        Expr::Call(f, arg) => derive_call(*f, arg, sym),
    }
}

fn derive_pow(base: &Expr, exponent: &Expr, sym: &Symbol) -> Expr {
    let base_varies = base.depends_on(sym);
    let exp_varies = exponent.depends_on(sym);
    match (base_varies, exp_varies) {
        // d(u^n) = n*u^(n-1)*du
        (true, false) => {
            exponent.clone()
                * base.clone().pow(exponent.clone() - 1.0)
                * derive(base, sym)
        }
        // d(a^v) = a^v*ln(a)*dv
        (false, true) => {
            base.clone().pow(exponent.clone()) * base.clone().ln() * derive(exponent, sym)
        }
        // d(u^v) = u^v*(dv*ln(u) + v*du/u)
        _ => {
            let du = derive(base, sym);
            let dv = derive(exponent, sym);
            base.clone().pow(exponent.clone())
                * (dv * base.clone().ln() + exponent.clone() * du / base.clone())
        }
    }
}

fn derive_call(f: Func, arg: &Expr, sym: &Symbol) -> Expr {
    derive(arg, sym) * f.derivative(arg)
}
