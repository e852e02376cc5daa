use super::{Command, CommandOutput};
use crate::error::{Error, Result};
use crate::parser::parse_f64;
use crate::session::Session;
use physics_core::Symbol;

pub struct Corr;

impl Command for Corr {
    fn name(&self) -> &str {
        "CORR"
    }
    fn description(&self) -> &str {
        "List or set correlation coefficients"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        match args {
            [] => Ok(list(session)),
            [clear] if clear.eq_ignore_ascii_case("CLEAR") => {
                session.correlations.clear();
                session.last_result = None;
                Ok(CommandOutput::Text("Correlations cleared".into()))
            }
            [a, b, rho] => {
                let a = Symbol::parse(a)?;
                let b = Symbol::parse(b)?;
                let rho = parse_f64(rho, "correlation")?;
                session.set_correlation(&a, &b, rho)?;
                Ok(CommandOutput::Text(format!("rho({}, {}) = {}", a, b, rho)))
            }
            _ => Err(Error::Parse(
                "CORR takes no arguments, CLEAR, or <a> <b> <rho>".into(),
            )),
        }
    }
}

fn list(session: &Session) -> CommandOutput {
    if session.correlations.is_empty() {
        return CommandOutput::Text("No correlations (inputs independent)".into());
    }
    let headers = vec!["A".to_string(), "B".to_string(), "rho".to_string()];
    let rows = session
        .correlations
        .iter()
        .map(|(a, b, rho)| vec![a.to_string(), b.to_string(), format!("{:.4}", rho)])
        .collect();
    CommandOutput::Table { headers, rows }
}
