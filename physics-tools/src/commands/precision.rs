use super::{Command, CommandOutput};
use crate::error::Result;
use crate::parser::parse_precision;
use crate::session::Session;
use physics_core::Precision;

pub struct PrecisionCmd;

impl Command for PrecisionCmd {
    fn name(&self) -> &str {
        "PRECISION"
    }
    fn description(&self) -> &str {
        "Show or set result rounding"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        if !args.is_empty() {
            session.precision = parse_precision(args)?;
        }
        Ok(CommandOutput::Text(format!(
            "Precision: {}",
            describe(session.precision)
        )))
    }
}

pub fn describe(p: Precision) -> String {
    match p {
        Precision::Decimals(d) => format!("{} decimal places", d),
        Precision::Significant(n) => format!("{} significant figures", n),
        Precision::Uncertainty(n) => {
            format!("uncertainty to {} significant figures, value to match", n)
        }
    }
}
