use physics_core::ExprError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("no uncertainty given for {0}")]
    MissingUncertainty(String),

    #[error("no formula set - use FORMULA to define one")]
    NoFormula,

    #[error("no result yet - run PROPAGATE first")]
    NoResult,

    #[error("invalid correlation: {0}")]
    Correlation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Expr(#[from] ExprError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
