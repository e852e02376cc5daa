use super::{Command, CommandOutput};
use crate::error::Result;
use crate::session::Session;
use physics_core::{diff, Symbol};

pub struct Diff;

impl Command for Diff {
    fn name(&self) -> &str {
        "DIFF"
    }
    fn description(&self) -> &str {
        "Show partial derivatives of the formula"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        let formula = session.require_formula()?;
        let symbols: Vec<Symbol> = if !args.is_empty() {
            args.iter().map(|a| Symbol::parse(a)).collect::<physics_core::ExprResult<_>>()?
        } else if !session.values.is_empty() {
            session.values.keys().cloned().collect()
        } else {
            formula.expr().free_symbols()
        };
        let label = formula.label();
        let lines: Vec<String> = symbols
            .iter()
            .map(|s| format!("d{}/d{} = {}", label, s, diff(formula.expr(), s)))
            .collect();
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}
