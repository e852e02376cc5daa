//! Bottom-up algebraic simplification.
//!
//! The rules are local rewrites that never change the value of an
//! expression wherever it is defined: numeric folding, identities
//! (`x + 0`, `x*1`, `x^1`), annihilators (`x*0`, `0/x`), cancellation
//! (`x - x`, `x/x`), sign normalisation and merging of numeric
//! coefficients and integer powers. Function calls on literals are folded
//! only when the result is an exact integer, so `sin(0)` becomes `0` but
//! `cos(1)` stays symbolic.

use super::{Expr, Func};

pub fn simplify(expr: &Expr) -> Expr {
    match expr {
        Expr::Num(_) | Expr::Const(_) | Expr::Sym(_) => expr.clone(),
        Expr::Neg(a) => neg(simplify(a)),
        Expr::Add(a, b) => add(simplify(a), simplify(b)),
        Expr::Sub(a, b) => sub(simplify(a), simplify(b)),
        Expr::Mul(a, b) => mul(simplify(a), simplify(b)),
        Expr::Div(a, b) => div(simplify(a), simplify(b)),
        Expr::Pow(a, b) => pow(simplify(a), simplify(b)),
        Expr::Call(f, a) => call(*f, simplify(a)),
    }
}

fn is_integer(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0
}

/// Splits `c*x` into `(c, x)`; anything else is `(1, e)`.
fn coefficient(e: &Expr) -> (f64, &Expr) {
    match e {
        Expr::Mul(a, b) => match **a {
            Expr::Num(c) => (c, &**b),
            _ => (1.0, e),
        },
        _ => (1.0, e),
    }
}

fn neg(a: Expr) -> Expr {
    match a {
        Expr::Num(v) => Expr::Num(-v),
        Expr::Neg(x) => *x,
        Expr::Sub(x, y) => Expr::Sub(y, x),
        Expr::Mul(c, x) if c.as_num().is_some() => mul(Expr::Num(-c.as_num().unwrap_or(1.0)), *x),
        other => Expr::Neg(Box::new(other)),
    }
}

fn add(a: Expr, b: Expr) -> Expr {
    if let (Expr::Num(x), Expr::Num(y)) = (&a, &b) {
        return Expr::Num(x + y);
    }
    if a.is_zero() {
        return b;
    }
    if b.is_zero() {
        return a;
    }
    if let Expr::Neg(x) = b {
        return sub(a, *x);
    }
    if let Expr::Num(v) = b {
        if v < 0.0 {
            return Expr::Sub(Box::new(a), Box::new(Expr::Num(-v)));
        }
    }
    if let Expr::Neg(x) = a {
        return sub(b, *x);
    }
    let (ca, ta) = coefficient(&a);
    let (cb, tb) = coefficient(&b);
    if ta == tb {
        return mul(Expr::Num(ca + cb), ta.clone());
    }
    Expr::Add(Box::new(a), Box::new(b))
}

fn sub(a: Expr, b: Expr) -> Expr {
    if let (Expr::Num(x), Expr::Num(y)) = (&a, &b) {
        return Expr::Num(x - y);
    }
    if b.is_zero() {
        return a;
    }
    if a.is_zero() {
        return neg(b);
    }
    if let Expr::Neg(x) = b {
        return add(a, *x);
    }
    if let Expr::Num(v) = b {
        if v < 0.0 {
            return Expr::Add(Box::new(a), Box::new(Expr::Num(-v)));
        }
    }
    let (ca, ta) = coefficient(&a);
    let (cb, tb) = coefficient(&b);
    if ta == tb {
        return mul(Expr::Num(ca - cb), ta.clone());
    }
    Expr::Sub(Box::new(a), Box::new(b))
}

fn mul(a: Expr, b: Expr) -> Expr {
    if let (Expr::Num(x), Expr::Num(y)) = (&a, &b) {
        return Expr::Num(x * y);
    }
    if a.is_zero() || b.is_zero() {
        return Expr::Num(0.0);
    }
    if a.is_one() {
        return b;
    }
    if b.is_one() {
        return a;
    }
    if a.as_num() == Some(-1.0) {
        return neg(b);
    }
    if b.as_num() == Some(-1.0) {
        return neg(a);
    }
    if b.as_num().is_some() {
        return mul(b, a);
    }
    if let Expr::Neg(x) = a {
        return neg(mul(*x, b));
    }
    if let Expr::Neg(y) = b {
        return neg(mul(a, *y));
    }
    if let Expr::Num(c) = a {
        return match b {
            Expr::Mul(x, y) if x.as_num().is_some() => {
                mul(Expr::Num(c * x.as_num().unwrap_or(1.0)), *y)
            }
            Expr::Div(x, y) if x.as_num().is_some() => {
                div(Expr::Num(c * x.as_num().unwrap_or(1.0)), *y)
            }
            other => Expr::Mul(Box::new(Expr::Num(c)), Box::new(other)),
        };
    }
    if let Expr::Mul(c, x) = &b {
        if let Some(c) = c.as_num() {
            let x = (**x).clone();
            return mul(Expr::Num(c), mul(a, x));
        }
    }
    if let Expr::Mul(c, x) = &a {
        if let Some(c) = c.as_num() {
            let x = (**x).clone();
            return mul(Expr::Num(c), mul(x, b));
        }
    }
    if a == b {
        return pow(a, Expr::Num(2.0));
    }
    match (&a, &b) {
        (Expr::Pow(x, n), y) if **x == *y && n.as_num().is_some() => {
            return pow(y.clone(), Expr::Num(n.as_num().unwrap_or(0.0) + 1.0));
        }
        (x, Expr::Pow(y, n)) if **y == *x && n.as_num().is_some() => {
            return pow(x.clone(), Expr::Num(n.as_num().unwrap_or(0.0) + 1.0));
        }
        (Expr::Pow(x, n), Expr::Pow(y, m)) if x == y && n.as_num().is_some() && m.as_num().is_some() => {
            let sum = n.as_num().unwrap_or(0.0) + m.as_num().unwrap_or(0.0);
            return pow((**x).clone(), Expr::Num(sum));
        }
        _ => {}
    }
    Expr::Mul(Box::new(a), Box::new(b))
}

fn div(a: Expr, b: Expr) -> Expr {
    if let (Expr::Num(x), Expr::Num(y)) = (&a, &b) {
        if *y != 0.0 {
            return Expr::Num(x / y);
        }
    }
    if b.is_one() {
        return a;
    }
    if b.is_zero() {
        return Expr::Div(Box::new(a), Box::new(b));
    }
    if a.is_zero() {
        return Expr::Num(0.0);
    }
    if b.as_num() == Some(-1.0) {
        return neg(a);
    }
    if a == b {
        return Expr::Num(1.0);
    }
    if let Expr::Neg(x) = a {
        return neg(div(*x, b));
    }
    if let Expr::Neg(y) = b {
        return neg(div(a, *y));
    }
    if let Expr::Div(x, y) = a {
        return div(*x, mul(*y, b));
    }
    match (&a, &b) {
        (Expr::Pow(x, n), y) if **x == *y && n.as_num().is_some() => {
            return pow(y.clone(), Expr::Num(n.as_num().unwrap_or(0.0) - 1.0));
        }
        (x, Expr::Pow(y, n)) if **y == *x && n.as_num().is_some() => {
            return div(Expr::Num(1.0), pow(x.clone(), Expr::Num(n.as_num().unwrap_or(0.0) - 1.0)));
        }
        (Expr::Mul(c, x), Expr::Num(d)) if c.as_num().is_some() => {
            return mul(Expr::Num(c.as_num().unwrap_or(1.0) / d), (**x).clone());
        }
        _ => {}
    }
    Expr::Div(Box::new(a), Box::new(b))
}

fn pow(a: Expr, b: Expr) -> Expr {
    if let (Expr::Num(x), Expr::Num(y)) = (&a, &b) {
        let r = libm::pow(*x, *y);
        if r.is_finite() {
            return Expr::Num(r);
        }
    }
    if b.is_zero() {
        return Expr::Num(1.0);
    }
    if b.is_one() {
        return a;
    }
    if a.is_one() {
        return Expr::Num(1.0);
    }
    if a.is_zero() && b.as_num().is_some_and(|v| v > 0.0) {
        return Expr::Num(0.0);
    }
    if let (Expr::Pow(x, m), Some(n)) = (&a, b.as_num()) {
        if let Some(m) = m.as_num() {
            if is_integer(n) {
                return pow((**x).clone(), Expr::Num(m * n));
            }
        }
    }
    if let Expr::Call(Func::Sqrt, x) = &a {
        if b.as_num() == Some(2.0) {
            return (**x).clone();
        }
    }
    Expr::Pow(Box::new(a), Box::new(b))
}

fn call(f: Func, a: Expr) -> Expr {
    if let Expr::Num(v) = a {
        let r = f.apply(v);
        if is_integer(r) {
            return Expr::Num(r);
        }
    }
    match (f, &a) {
        (Func::Ln, Expr::Call(Func::Exp, x)) => return (**x).clone(),
        (Func::Exp, Expr::Call(Func::Ln, x)) => return (**x).clone(),
        (Func::Sqrt, Expr::Pow(x, n)) if n.as_num() == Some(2.0) => {
            return Expr::call(Func::Abs, (**x).clone());
        }
        _ => {}
    }
    Expr::Call(f, Box::new(a))
}
