use super::{Command, CommandOutput};
use crate::error::Result;
use crate::formula::Formula;
use crate::session::Session;

pub struct FormulaCmd;

impl Command for FormulaCmd {
    fn name(&self) -> &str {
        "FORMULA"
    }
    fn description(&self) -> &str {
        "Set or show the formula"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        if args.is_empty() {
            let text = session
                .formula
                .as_ref()
                .map(|f| f.to_string())
                .unwrap_or_else(|| "No formula set".to_string());
            return Ok(CommandOutput::Text(text));
        }
        let formula = Formula::parse(&args.join(" "))?;
        let missing: Vec<String> = formula
            .expr()
            .free_symbols()
            .into_iter()
            .filter(|s| !session.values.contains(s))
            .map(|s| s.name().to_string())
            .collect();
        let mut text = format!("Formula: {}", formula);
        if !missing.is_empty() {
            text.push_str(&format!("\nNo values yet for: {}", missing.join(", ")));
        }
        session.set_formula(formula);
        Ok(CommandOutput::Text(text))
    }
}
