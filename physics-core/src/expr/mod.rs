//! Symbolic expression trees.
//!
//! An [`Expr`] is an immutable tree of arithmetic over named [`Symbol`]s,
//! numeric literals, the constants π and e, and the elementary functions in
//! [`Func`]. Trees are built with ordinary Rust operators or parsed from text:
//!
//! ```
//! use physics_core::expr::{parse_expr, symbols, Expr};
//!
//! let s = symbols("m g h");
//! let built: Expr = s[0].clone() * s[1].clone() * s[2].clone();
//! let parsed = parse_expr("m*g*h").unwrap();
//! assert_eq!(built, parsed);
//! ```
//!
//! Submodules add differentiation ([`diff()`]), simplification
//! ([`simplify()`]) and direct evaluation ([`Expr::eval_scalar`]).

mod diff;
mod display;
mod eval;
mod func;
mod ops;
mod parse;
mod simplify;

pub use diff::diff;
pub use func::Func;
pub use parse::parse_expr;
pub use simplify::simplify;

use crate::constants::{E, PI};
use crate::errors::{ExprError, ExprResult};
use std::collections::BTreeSet;
use std::fmt;

/// A named scalar variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol without validating the name.
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    /// Creates a symbol, rejecting names that are not identifiers or that
    /// collide with a function or constant name.
    pub fn parse(name: &str) -> ExprResult<Self> {
        if !is_identifier(name) || Func::from_name(name).is_some() || Constant::from_name(name).is_some() {
            return Err(ExprError::InvalidSymbol(name.to_string()));
        }
        Ok(Symbol(name.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

/// Splits a whitespace- or comma-separated list into symbols.
///
/// ```
/// use physics_core::expr::symbols;
/// let s = symbols("r, m g");
/// assert_eq!(s.len(), 3);
/// assert_eq!(s[2].name(), "g");
/// ```
pub fn symbols(names: &str) -> Vec<Symbol> {
    names
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(Symbol::new)
        .collect()
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Mathematical constants kept symbolic until evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Constant::Pi),
            "e" => Some(Constant::E),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => PI,
            Constant::E => E,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Const(Constant),
    Sym(Symbol),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

impl Expr {
    pub fn num(value: f64) -> Self {
        Expr::Num(value)
    }

    pub fn sym(name: &str) -> Self {
        Expr::Sym(Symbol::new(name))
    }

    pub fn pi() -> Self {
        Expr::Const(Constant::Pi)
    }

    pub fn call(func: Func, arg: impl Into<Expr>) -> Self {
        Expr::Call(func, Box::new(arg.into()))
    }

    pub fn pow(self, exponent: impl Into<Expr>) -> Self {
        Expr::Pow(Box::new(self), Box::new(exponent.into()))
    }

    pub fn sqrt(self) -> Self {
        Expr::call(Func::Sqrt, self)
    }

    pub fn sin(self) -> Self {
        Expr::call(Func::Sin, self)
    }

    pub fn cos(self) -> Self {
        Expr::call(Func::Cos, self)
    }

    pub fn tan(self) -> Self {
        Expr::call(Func::Tan, self)
    }

    pub fn exp(self) -> Self {
        Expr::call(Func::Exp, self)
    }

    pub fn ln(self) -> Self {
        Expr::call(Func::Ln, self)
    }

    pub fn abs(self) -> Self {
        Expr::call(Func::Abs, self)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(v) if *v == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Num(v) if *v == 1.0)
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Expr::Num(v) => Some(*v),
            _ => None,
        }
    }

    /// Symbols appearing in the tree, sorted and deduplicated.
    pub fn free_symbols(&self) -> Vec<Symbol> {
        let mut set = BTreeSet::new();
        self.collect_symbols(&mut set);
        set.into_iter().collect()
    }

    fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Num(_) | Expr::Const(_) => {}
            Expr::Sym(s) => {
                out.insert(s.clone());
            }
            Expr::Neg(a) | Expr::Call(_, a) => a.collect_symbols(out),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
        }
    }

    pub fn depends_on(&self, sym: &Symbol) -> bool {
        match self {
            Expr::Num(_) | Expr::Const(_) => false,
            Expr::Sym(s) => s == sym,
            Expr::Neg(a) | Expr::Call(_, a) => a.depends_on(sym),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => a.depends_on(sym) || b.depends_on(sym),
        }
    }

    /// Replaces every occurrence of `sym` with `replacement`.
    pub fn substitute(&self, sym: &Symbol, replacement: &Expr) -> Expr {
        let sub = |e: &Expr| Box::new(e.substitute(sym, replacement));
        match self {
            Expr::Sym(s) if s == sym => replacement.clone(),
            Expr::Num(_) | Expr::Const(_) | Expr::Sym(_) => self.clone(),
            Expr::Neg(a) => Expr::Neg(sub(a)),
            Expr::Call(f, a) => Expr::Call(*f, sub(a)),
            Expr::Add(a, b) => Expr::Add(sub(a), sub(b)),
            Expr::Sub(a, b) => Expr::Sub(sub(a), sub(b)),
            Expr::Mul(a, b) => Expr::Mul(sub(a), sub(b)),
            Expr::Div(a, b) => Expr::Div(sub(a), sub(b)),
            Expr::Pow(a, b) => Expr::Pow(sub(a), sub(b)),
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Num(value)
    }
}

impl From<Symbol> for Expr {
    fn from(sym: Symbol) -> Self {
        Expr::Sym(sym)
    }
}

impl From<&Symbol> for Expr {
    fn from(sym: &Symbol) -> Self {
        Expr::Sym(sym.clone())
    }
}
