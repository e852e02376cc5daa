use super::{Command, CommandOutput};
use crate::error::{Error, Result};
use crate::propagate::Propagation;
use crate::session::Session;
use physics_core::{Precision, Value};
use serde::Serialize;
use tracing::info;

pub struct Export;

/// JSON document written by EXPORT.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub formula: String,
    pub precision: Precision,
    pub value: Value,
    pub uncertainty: Value,
    pub raw: &'a Propagation,
}

impl Command for Export {
    fn name(&self) -> &str {
        "EXPORT"
    }
    fn description(&self) -> &str {
        "Write the last result as JSON"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(Error::Parse("EXPORT requires a filename".into()));
        }
        let json = report_json(session)?;
        std::fs::write(args[0], json).map_err(Error::Io)?;
        info!(path = args[0], "exported result");
        Ok(CommandOutput::Text(format!("Wrote {}", args[0])))
    }
}

pub fn report_json(session: &Session) -> Result<String> {
    let raw = session.require_result()?;
    let (value, uncertainty) = session.rounded_result()?;
    let report = Report {
        formula: session.require_formula()?.to_string(),
        precision: session.precision,
        value,
        uncertainty,
        raw,
    };
    serde_json::to_string_pretty(&report).map_err(|e| Error::Io(std::io::Error::other(e)))
}
