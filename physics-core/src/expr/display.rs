use super::Expr;
use std::fmt;

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_NEG: u8 = 3;
const PREC_POW: u8 = 4;
const PREC_ATOM: u8 = 5;

fn precedence(e: &Expr) -> u8 {
    match e {
        Expr::Num(v) if !v.is_finite() => PREC_ATOM,
        Expr::Num(v) if *v < 0.0 || (*v == 0.0 && v.is_sign_negative()) => PREC_NEG,
        Expr::Num(_) | Expr::Const(_) | Expr::Sym(_) | Expr::Call(..) => PREC_ATOM,
        Expr::Neg(_) => PREC_NEG,
        Expr::Add(..) | Expr::Sub(..) => PREC_ADD,
        Expr::Mul(..) | Expr::Div(..) => PREC_MUL,
        Expr::Pow(..) => PREC_POW,
    }
}

struct Operand<'a>(&'a Expr, bool);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Non-finite literals print as the division that produces them, so the text
/// parses back to the same value.
fn write_num(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("(0/0)")
    } else if v == f64::INFINITY {
        f.write_str("(1/0)")
    } else if v == f64::NEG_INFINITY {
        f.write_str("(-1/0)")
    } else {
        write!(f, "{}", v)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => write_num(f, *v),
            Expr::Const(c) => f.write_str(c.name()),
            Expr::Sym(s) => f.write_str(s.name()),
            Expr::Call(func, arg) => write!(f, "{}({})", func.name(), arg),
            Expr::Neg(a) => {
                let p = precedence(a);
                write!(f, "-{}", Operand(a, p < PREC_MUL || p == PREC_NEG))
            }
            Expr::Add(a, b) => {
                let wrap_b = precedence(b) == PREC_NEG;
                write!(f, "{} + {}", a, Operand(b, wrap_b))
            }
            Expr::Sub(a, b) => {
                let p = precedence(b);
                write!(f, "{} - {}", a, Operand(b, p <= PREC_ADD || p == PREC_NEG))
            }
            Expr::Mul(a, b) => {
                let pa = precedence(a);
                let pb = precedence(b);
                write!(
                    f,
                    "{}*{}",
                    Operand(a, pa < PREC_MUL),
                    Operand(b, pb < PREC_MUL || pb == PREC_NEG)
                )
            }
            Expr::Div(a, b) => {
                let pa = precedence(a);
                let pb = precedence(b);
                write!(
                    f,
                    "{}/{}",
                    Operand(a, pa < PREC_MUL),
                    Operand(b, pb <= PREC_MUL || pb == PREC_NEG)
                )
            }
            Expr::Pow(a, b) => {
                let pa = precedence(a);
                let pb = precedence(b);
                write!(
                    f,
                    "{}^{}",
                    Operand(a, pa <= PREC_POW),
                    Operand(b, pb < PREC_POW)
                )
            }
        }
    }
}
