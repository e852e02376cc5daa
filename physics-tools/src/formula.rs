use crate::error::{Error, Result};
use physics_core::{parse_expr, Expr, Symbol};
use std::fmt;
use std::str::FromStr;

/// A formula as the user typed it, optionally named: `I = m*r^2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    name: Option<Symbol>,
    expr: Expr,
    source: String,
}

impl Formula {
    pub fn new(expr: Expr) -> Self {
        let source = expr.to_string();
        Self {
            name: None,
            expr,
            source,
        }
    }

    pub fn named(name: &str, expr: Expr) -> Result<Self> {
        let mut formula = Self::new(expr);
        formula.name = Some(Symbol::parse(name)?);
        formula.source = format!("{} = {}", name, formula.source);
        Ok(formula)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let (name, body) = match text.split_once('=') {
            Some((lhs, rhs)) => (Some(lhs.trim()), rhs),
            None => (None, text),
        };
        if body.contains('=') {
            return Err(Error::Parse(format!("more than one '=' in formula: {}", text)));
        }
        let expr = parse_expr(body)?;
        let name = match name {
            Some(n) => Some(Symbol::parse(n)?),
            None => None,
        };
        Ok(Self {
            name,
            expr,
            source: text.to_string(),
        })
    }

    pub fn name(&self) -> Option<&Symbol> {
        self.name.as_ref()
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Label used for the result: the formula name, or `f`.
    pub fn label(&self) -> &str {
        self.name.as_ref().map_or("f", |s| s.name())
    }
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} = {}", name, self.expr),
            None => write!(f, "{}", self.expr),
        }
    }
}
