use super::{Command, CommandOutput};
use crate::error::{Error, Result};
use crate::parser::format_dataset;
use crate::session::Session;
use tracing::info;

pub struct Save;

impl Command for Save {
    fn name(&self) -> &str {
        "SAVE"
    }
    fn description(&self) -> &str {
        "Save formula and measurements to a data file"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(Error::Parse("SAVE requires a filename".into()));
        }
        let output = format_dataset(&session.to_dataset());
        std::fs::write(args[0], &output).map_err(Error::Io)?;
        info!(path = args[0], variables = session.variable_count(), "saved data file");
        Ok(CommandOutput::Text(format!(
            "Saved {} variables to {}",
            session.variable_count(),
            args[0]
        )))
    }
}
