use super::Expr;
use crate::constants::LN_10;
use crate::math;

/// Elementary functions of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log10,
    Sqrt,
    Abs,
    Sign,
}

impl Func {
    pub const ALL: [Func; 15] = [
        Func::Sin,
        Func::Cos,
        Func::Tan,
        Func::Asin,
        Func::Acos,
        Func::Atan,
        Func::Sinh,
        Func::Cosh,
        Func::Tanh,
        Func::Exp,
        Func::Ln,
        Func::Log10,
        Func::Sqrt,
        Func::Abs,
        Func::Sign,
    ];

    /// Looks up a function by name. `log` is the natural logarithm and the
    /// `arc*` spellings are accepted for the inverse trigonometric functions.
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "asin" | "arcsin" => Func::Asin,
            "acos" | "arccos" => Func::Acos,
            "atan" | "arctan" => Func::Atan,
            "sinh" => Func::Sinh,
            "cosh" => Func::Cosh,
            "tanh" => Func::Tanh,
            "exp" => Func::Exp,
            "ln" | "log" => Func::Ln,
            "log10" => Func::Log10,
            "sqrt" => Func::Sqrt,
            "abs" => Func::Abs,
            "sign" => Func::Sign,
            _ => return None,
        };
        Some(f)
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Log10 => "log10",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
            Func::Sign => "sign",
        }
    }

    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Func::Sin => libm::sin(x),
            Func::Cos => libm::cos(x),
            Func::Tan => libm::tan(x),
            Func::Asin => libm::asin(x),
            Func::Acos => libm::acos(x),
            Func::Atan => libm::atan(x),
            Func::Sinh => libm::sinh(x),
            Func::Cosh => libm::cosh(x),
            Func::Tanh => libm::tanh(x),
            Func::Exp => libm::exp(x),
            Func::Ln => libm::log(x),
            Func::Log10 => libm::log10(x),
            Func::Sqrt => libm::sqrt(x),
            Func::Abs => libm::fabs(x),
            Func::Sign => math::sign(x),
        }
    }

    /// `f'(u)` as an expression in `u`; the caller multiplies by `du`.
    pub fn derivative(self, u: &Expr) -> Expr {
        let u = u.clone();
        match self {
            Func::Sin => u.cos(),
            Func::Cos => -u.sin(),
            Func::Tan => Expr::num(1.0) + u.tan().pow(2.0),
            Func::Asin => Expr::num(1.0) / (Expr::num(1.0) - u.pow(2.0)).sqrt(),
            Func::Acos => -(Expr::num(1.0) / (Expr::num(1.0) - u.pow(2.0)).sqrt()),
            Func::Atan => Expr::num(1.0) / (Expr::num(1.0) + u.pow(2.0)),
            Func::Sinh => Expr::call(Func::Cosh, u),
            Func::Cosh => Expr::call(Func::Sinh, u),
            Func::Tanh => Expr::num(1.0) - Expr::call(Func::Tanh, u).pow(2.0),
            Func::Exp => u.exp(),
            Func::Ln => Expr::num(1.0) / u,
            Func::Log10 => Expr::num(1.0) / (u * Expr::num(LN_10)),
            Func::Sqrt => Expr::num(1.0) / (Expr::num(2.0) * u.sqrt()),
            Func::Abs => Expr::call(Func::Sign, u),
            Func::Sign => Expr::num(0.0),
        }
    }
}
