use crate::correlation::Correlations;
use crate::formula::Formula;
use crate::varmap::VarMap;
use physics_core::Precision;

/// Contents of a measurement data file.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub header_lines: Vec<String>,
    pub formula: Option<Formula>,
    pub precision: Option<Precision>,
    pub correlations: Correlations,
    pub values: VarMap,
    pub errors: VarMap,
}

/// Separators accepted between values and uncertainties.
pub const UNCERTAINTY_SEPARATORS: [&str; 3] = ["+-", "+/-", "±"];

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable_count(&self) -> usize {
        self.values.len()
    }
}
