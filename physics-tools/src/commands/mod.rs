pub mod contrib;
pub mod corr;
pub mod diff;
pub mod drop;
pub mod eval;
pub mod export;
pub mod formula;
pub mod gplot;
pub mod help;
pub mod list;
pub mod load;
pub mod precision;
pub mod propagate;
pub mod reset;
pub mod save;
pub mod set;
pub mod show;

use crate::error::Result;
use crate::session::Session;
use physics_core::{Precision, Value};

#[derive(Debug)]
pub enum CommandOutput {
    Text(String),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    ResultDisplay(ResultDisplay),
    None,
}

/// A rounded propagation result, one row per element.
#[derive(Debug)]
pub struct ResultDisplay {
    pub label: String,
    pub values: Vec<f64>,
    pub errors: Vec<f64>,
    pub relative: Vec<f64>,
    pub decimals: Option<usize>,
}

pub trait Command {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput>;
}

pub fn dispatch(session: &mut Session, input: &str) -> Result<CommandOutput> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.is_empty() {
        return Ok(CommandOutput::None);
    }
    let cmd_name = parts[0].to_uppercase();
    let args = &parts[1..];
    match cmd_name.as_str() {
        "CONTRIB" => contrib::Contrib.execute(session, args),
        "CORR" => corr::Corr.execute(session, args),
        "DIFF" => diff::Diff.execute(session, args),
        "DROP" => drop::DropVar.execute(session, args),
        "EVAL" => eval::Eval.execute(session, args),
        "EXPORT" => export::Export.execute(session, args),
        "FORMULA" => formula::FormulaCmd.execute(session, args),
        "GPLOT" => gplot::Gplot.execute(session, args),
        "HELP" => help::Help.execute(session, args),
        "LIST" => list::List.execute(session, args),
        "LOAD" => load::Load.execute(session, args),
        "PRECISION" => precision::PrecisionCmd.execute(session, args),
        "PROPAGATE" => propagate::Propagate.execute(session, args),
        "QUIT" => Ok(CommandOutput::Text("Use Ctrl-D to exit".to_string())),
        "RESET" => reset::Reset.execute(session, args),
        "SAVE" => save::Save.execute(session, args),
        "SET" => set::Set.execute(session, args),
        "SHOW" => show::Show.execute(session, args),
        "UNC" => set::Unc.execute(session, args),
        _ => Err(crate::error::Error::Parse(format!(
            "unknown command: {}",
            parts[0]
        ))),
    }
}

/// Formats a number with fixed decimals when the precision has them.
pub fn format_number(x: f64, decimals: Option<usize>) -> String {
    match decimals {
        Some(d) => format!("{:.*}", d, x),
        None => format!("{}", x),
    }
}

pub fn format_value(v: &Value, precision: Precision) -> String {
    match precision.display_decimals() {
        Some(d) => format!("{:.*}", d, v),
        None => v.to_string(),
    }
}

/// Runs the propagation unless a current result exists.
pub(crate) fn ensure_result(session: &mut Session) -> Result<()> {
    if session.last_result.is_none() {
        session.propagate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    #[test]
    fn dispatch_set_adds_variable() {
        let mut session = Session::new();
        let result = dispatch(&mut session, "SET m 0.12 +- 0.001").unwrap();
        assert_eq!(session.variable_count(), 1);
        match result {
            CommandOutput::Text(s) => assert!(s.contains('m')),
            _ => panic!("expected Text output"),
        }
    }

    #[test]
    fn dispatch_drop_removes_variable() {
        let mut session = Session::new();
        dispatch(&mut session, "SET a 1 +- 0.1").unwrap();
        dispatch(&mut session, "SET b 2 +- 0.1").unwrap();
        dispatch(&mut session, "DROP a").unwrap();
        let names: Vec<&str> = session.values.keys().map(|s| s.name()).collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn dispatch_unknown_command_errors() {
        let mut session = Session::new();
        assert!(dispatch(&mut session, "ZZZNOTACMD").is_err());
    }

    #[test]
    fn dispatch_propagate_without_formula_errors() {
        let mut session = Session::new();
        dispatch(&mut session, "SET a 1 +- 0.1").unwrap();
        assert!(dispatch(&mut session, "PROPAGATE").is_err());
    }

    #[test]
    fn dispatch_empty_input_returns_none() {
        let mut session = Session::new();
        let result = dispatch(&mut session, "").unwrap();
        assert!(matches!(result, CommandOutput::None));
    }

    #[test]
    fn dispatch_case_insensitive() {
        let mut session = Session::new();
        assert!(dispatch(&mut session, "formula E = m*c^2").is_ok());
        assert!(session.formula.is_some());
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(1.23456, Some(2)), "1.23");
        assert_eq!(format_number(0.5, None), "0.5");
        assert_eq!(format_value(&Value::from(vec![1.0, 2.5]), Precision::Decimals(1)), "[1.0, 2.5]");
        assert_eq!(format_value(&Value::from(0.25), Precision::Significant(2)), "0.25");
    }
}
