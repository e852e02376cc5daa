use super::{Command, CommandOutput};
use crate::error::Result;
use crate::session::Session;

pub struct Reset;

impl Command for Reset {
    fn name(&self) -> &str {
        "RESET"
    }
    fn description(&self) -> &str {
        "Clear formula, variables and correlations"
    }

    fn execute(&self, session: &mut Session, _args: &[&str]) -> Result<CommandOutput> {
        let count = session.variable_count();
        session.reset();
        Ok(CommandOutput::Text(format!(
            "Cleared formula and {} variables",
            count
        )))
    }
}
