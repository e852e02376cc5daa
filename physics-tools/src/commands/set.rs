use super::{Command, CommandOutput};
use crate::error::{Error, Result};
use crate::parser::{parse_measurement, parse_value};
use crate::session::Session;
use physics_core::Symbol;

pub struct Set;

impl Command for Set {
    fn name(&self) -> &str {
        "SET"
    }
    fn description(&self) -> &str {
        "Set a measured value and optional uncertainty"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        if args.len() < 2 {
            return Err(Error::Parse(
                "SET requires a variable and value(s)".into(),
            ));
        }
        let (sym, value, error) = parse_measurement(&args.join(" "))?;
        let text = match &error {
            Some(e) => format!("{} = {} +- {}", sym, value, e),
            None => format!("{} = {}", sym, value),
        };
        session.set_value(sym, value, error);
        Ok(CommandOutput::Text(text))
    }
}

pub struct Unc;

impl Command for Unc {
    fn name(&self) -> &str {
        "UNC"
    }
    fn description(&self) -> &str {
        "Set the uncertainty of a variable"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        if args.len() < 2 {
            return Err(Error::Parse(
                "UNC requires a variable and uncertainty value(s)".into(),
            ));
        }
        let sym = Symbol::parse(args[0])?;
        let error = parse_value(&args[1..], args[0])?;
        let text = format!("{} +- {}", sym, error);
        session.set_error(sym, error)?;
        Ok(CommandOutput::Text(text))
    }
}
