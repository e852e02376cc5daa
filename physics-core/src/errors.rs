//! Error types for symbolic expression handling.
//!
//! [`ExprError`] covers the ways building, parsing, compiling or evaluating an
//! expression can fail. Numerical trouble inside a formula (division by zero,
//! `sqrt` of a negative number) is *not* an error: evaluation follows IEEE
//! semantics and yields `inf` or `NaN`, the way array libraries do.
//!
//! # Error Categories
//!
//! | Variant | Use Case |
//! |---------|----------|
//! | [`Parse`](ExprError::Parse) | Malformed formula text |
//! | [`UnknownFunction`](ExprError::UnknownFunction) | Call to a function the engine does not know |
//! | [`UnboundSymbol`](ExprError::UnboundSymbol) | Symbol without a value or argument slot |
//! | [`InvalidSymbol`](ExprError::InvalidSymbol) | Name that is not an identifier |
//! | [`MathError`](ExprError::MathError) | Shape or arity mismatch, bad input |
//!
//! ```
//! use physics_core::{ExprError, MathErrorKind};
//!
//! let err = ExprError::math_error("broadcast", MathErrorKind::ShapeMismatch, "3 vs 4");
//! assert!(err.to_string().contains("ShapeMismatch"));
//! ```

use thiserror::Error;

/// Classification of numerical failures that are reported as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathErrorKind {
    /// Array operands whose lengths cannot be broadcast together.
    ShapeMismatch,
    /// Wrong number of arguments passed to a compiled expression.
    ArityMismatch,
    /// Input value is invalid for the operation.
    InvalidInput,
    /// Result is NaN or infinity where a finite value is required.
    NotFinite,
}

/// Unified error type for the expression engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// Formula text could not be parsed. `position` is the 1-based column.
    #[error("Parse error at column {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    /// A symbol has no value (scalar evaluation) or no argument slot (compilation).
    #[error("Unbound symbol '{0}'")]
    UnboundSymbol(String),

    #[error("Invalid symbol name '{0}'")]
    InvalidSymbol(String),

    #[error("Math error in {operation} ({kind:?}): {message}")]
    MathError {
        operation: String,
        kind: MathErrorKind,
        message: String,
    },
}

/// Convenience alias for `Result<T, ExprError>`.
pub type ExprResult<T> = Result<T, ExprError>;

impl ExprError {
    /// Creates a [`Parse`](Self::Parse) error.
    pub fn parse(position: usize, reason: &str) -> Self {
        Self::Parse {
            position,
            message: reason.to_string(),
        }
    }

    /// Creates a [`MathError`](Self::MathError) with the given kind.
    pub fn math_error(operation: &str, kind: MathErrorKind, reason: &str) -> Self {
        Self::MathError {
            operation: operation.to_string(),
            kind,
            message: reason.to_string(),
        }
    }

    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            Self::MathError {
                kind: MathErrorKind::ShapeMismatch,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ExprError::parse(7, "unexpected ')'");
        assert_eq!(err.to_string(), "Parse error at column 7: unexpected ')'");
    }

    #[test]
    fn test_math_error_with_kind() {
        let err = ExprError::math_error("call", MathErrorKind::ArityMismatch, "expected 2 got 3");
        assert!(err.to_string().contains("Math error in call"));
        assert!(err.to_string().contains("ArityMismatch"));
        assert!(!err.is_shape_mismatch());
    }

    #[test]
    fn test_shape_mismatch_detection() {
        let err = ExprError::math_error("broadcast", MathErrorKind::ShapeMismatch, "3 vs 4");
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn test_symbol_errors() {
        assert_eq!(
            ExprError::UnboundSymbol("theta".into()).to_string(),
            "Unbound symbol 'theta'"
        );
        assert_eq!(
            ExprError::UnknownFunction("sec".into()).to_string(),
            "Unknown function 'sec'"
        );
    }

    #[test]
    fn test_send_sync() {
        fn _assert_send<T: Send>() {}
        fn _assert_sync<T: Sync>() {}
        _assert_send::<ExprError>();
        _assert_sync::<ExprError>();
    }
}
