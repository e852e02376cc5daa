use super::{Command, CommandOutput};
use crate::error::{Error, Result};
use crate::session::Session;
use physics_core::Symbol;

pub struct DropVar;

impl Command for DropVar {
    fn name(&self) -> &str {
        "DROP"
    }
    fn description(&self) -> &str {
        "Remove variable(s)"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(Error::Parse("DROP requires variable name(s) or ALL".into()));
        }
        if args.len() == 1 && args[0].eq_ignore_ascii_case("ALL") {
            session.drop_all();
            return Ok(CommandOutput::Text("All variables removed".into()));
        }
        let mut unknown = Vec::new();
        for name in args {
            if !session.drop_variable(&Symbol::new(*name)) {
                unknown.push(*name);
            }
        }
        if !unknown.is_empty() {
            return Err(Error::UnknownVariable(unknown.join(", ")));
        }
        Ok(CommandOutput::Text(format!("Removed: {}", args.join(", "))))
    }
}
