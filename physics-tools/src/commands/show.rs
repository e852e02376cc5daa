use super::precision::describe;
use super::{format_value, Command, CommandOutput};
use crate::error::Result;
use crate::session::Session;

pub struct Show;

impl Command for Show {
    fn name(&self) -> &str {
        "SHOW"
    }
    fn description(&self) -> &str {
        "Display session state"
    }

    fn execute(&self, session: &mut Session, _args: &[&str]) -> Result<CommandOutput> {
        let formula_str = session
            .formula
            .as_ref()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "not set".to_string());

        let total = session.variable_count();
        let missing = session
            .values
            .keys()
            .filter(|s| !session.errors.contains(s))
            .count();
        let vars_str = if missing > 0 {
            format!("{} ({} without uncertainty)", total, missing)
        } else {
            format!("{}", total)
        };

        let result_str = match session.rounded_result() {
            Ok((value, error)) => format!(
                "{} +/- {}",
                format_value(&value, session.precision),
                format_value(&error, session.precision)
            ),
            Err(_) => "not propagated yet".to_string(),
        };

        let output = format!(
            "Formula: {}\nVariables: {}\nCorrelations: {}\nPrecision: {}\nLast result: {}",
            formula_str,
            vars_str,
            session.correlations.len(),
            describe(session.precision),
            result_str,
        );

        Ok(CommandOutput::Text(output))
    }
}
