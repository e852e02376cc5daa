use super::{Command, CommandOutput, ResultDisplay};
use crate::error::Result;
use crate::session::Session;

pub struct Propagate;

impl Command for Propagate {
    fn name(&self) -> &str {
        "PROPAGATE"
    }
    fn description(&self) -> &str {
        "Propagate uncertainties through the formula"
    }

    fn execute(&self, session: &mut Session, _args: &[&str]) -> Result<CommandOutput> {
        session.propagate()?;
        Ok(CommandOutput::ResultDisplay(result_display(session)?))
    }
}

pub fn result_display(session: &Session) -> Result<ResultDisplay> {
    let result = session.require_result()?;
    let (value, error) = session.rounded_result()?;
    let label = session
        .formula
        .as_ref()
        .map_or("f", |f| f.label())
        .to_string();
    Ok(ResultDisplay {
        label,
        values: value.to_vec(),
        errors: error.to_vec(),
        relative: result.relative_error()?.to_vec(),
        decimals: session.precision.display_decimals(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::dispatch;

    #[test]
    fn propagate_scalar() {
        let mut session = Session::new();
        dispatch(&mut session, "FORMULA A = l*w").unwrap();
        dispatch(&mut session, "SET l 2.0 +- 0.03").unwrap();
        dispatch(&mut session, "SET w 3.0 +- 0.04").unwrap();
        match Propagate.execute(&mut session, &[]).unwrap() {
            CommandOutput::ResultDisplay(r) => {
                assert_eq!(r.label, "A");
                assert_eq!(r.values, vec![6.0]);
                assert!((r.errors[0] - 0.1204).abs() < 1e-12);
                assert_eq!(r.decimals, Some(4));
            }
            _ => panic!("expected ResultDisplay output"),
        }
    }

    #[test]
    fn propagate_array() {
        let mut session = Session::new();
        dispatch(&mut session, "FORMULA v = d/t").unwrap();
        dispatch(&mut session, "SET d 10 +- 0.1").unwrap();
        dispatch(&mut session, "SET t 2 4 5 +- 0.1").unwrap();
        match Propagate.execute(&mut session, &[]).unwrap() {
            CommandOutput::ResultDisplay(r) => {
                assert_eq!(r.values, vec![5.0, 2.5, 2.0]);
                assert_eq!(r.errors.len(), 3);
            }
            _ => panic!("expected ResultDisplay output"),
        }
    }

    #[test]
    fn missing_uncertainty_reported() {
        let mut session = Session::new();
        dispatch(&mut session, "FORMULA 2*x").unwrap();
        dispatch(&mut session, "SET x 1").unwrap();
        let err = Propagate.execute(&mut session, &[]).err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("no uncertainty given for x"));
    }
}
