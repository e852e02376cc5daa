pub mod commands;
pub mod config;
pub mod correlation;
pub mod dataset;
pub mod error;
pub mod formula;
pub mod parser;
pub mod plot;
pub mod propagate;
pub mod session;
pub mod varmap;

pub use error::{Error, Result};
pub use propagate::propagate_error;
pub use varmap::VarMap;
