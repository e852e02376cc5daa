pub mod constants;
pub mod errors;
pub mod expr;
pub mod lambda;
pub mod math;
pub mod round;
pub mod value;

pub use errors::{ExprError, ExprResult, MathErrorKind};
pub use expr::{diff, parse_expr, simplify, Constant, Expr, Func, Symbol};
pub use lambda::Lambda;
pub use round::Precision;
pub use value::Value;
