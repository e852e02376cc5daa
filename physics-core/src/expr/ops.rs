//! Arithmetic operators for building expressions.
//!
//! `Expr` and `Symbol` combine with each other and with `f64` on either side
//! using `+`, `-`, `*`, `/` and unary `-`. Powers and functions use methods.

use super::{Expr, Func, Symbol};
use core::ops::*;

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl<T: Into<Expr>> $trait<T> for Expr {
            type Output = Expr;
            #[inline]
            fn $method(self, rhs: T) -> Expr {
                Expr::$variant(Box::new(self), Box::new(rhs.into()))
            }
        }

        impl<T: Into<Expr>> $trait<T> for Symbol {
            type Output = Expr;
            #[inline]
            fn $method(self, rhs: T) -> Expr {
                Expr::$variant(Box::new(Expr::Sym(self)), Box::new(rhs.into()))
            }
        }

        impl $trait<Expr> for f64 {
            type Output = Expr;
            #[inline]
            fn $method(self, rhs: Expr) -> Expr {
                Expr::$variant(Box::new(Expr::Num(self)), Box::new(rhs))
            }
        }

        impl $trait<Symbol> for f64 {
            type Output = Expr;
            #[inline]
            fn $method(self, rhs: Symbol) -> Expr {
                Expr::$variant(Box::new(Expr::Num(self)), Box::new(Expr::Sym(rhs)))
            }
        }
    };
}

impl_binary_op!(Add, add, Add);
impl_binary_op!(Sub, sub, Sub);
impl_binary_op!(Mul, mul, Mul);
impl_binary_op!(Div, div, Div);

impl Neg for Expr {
    type Output = Expr;
    #[inline]
    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

impl Neg for Symbol {
    type Output = Expr;
    #[inline]
    fn neg(self) -> Expr {
        Expr::Neg(Box::new(Expr::Sym(self)))
    }
}

/// Builder methods on symbols; they borrow, so a symbol can be reused freely.
impl Symbol {
    pub fn expr(&self) -> Expr {
        Expr::Sym(self.clone())
    }

    pub fn pow(&self, exponent: impl Into<Expr>) -> Expr {
        self.expr().pow(exponent)
    }

    pub fn sqrt(&self) -> Expr {
        Expr::call(Func::Sqrt, self)
    }

    pub fn sin(&self) -> Expr {
        Expr::call(Func::Sin, self)
    }

    pub fn cos(&self) -> Expr {
        Expr::call(Func::Cos, self)
    }

    pub fn tan(&self) -> Expr {
        Expr::call(Func::Tan, self)
    }

    pub fn exp(&self) -> Expr {
        Expr::call(Func::Exp, self)
    }

    pub fn ln(&self) -> Expr {
        Expr::call(Func::Ln, self)
    }
}
