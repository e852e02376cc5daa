use super::{Command, CommandOutput};
use crate::error::Result;
use crate::session::Session;

pub struct List;

impl Command for List {
    fn name(&self) -> &str {
        "LIST"
    }
    fn description(&self) -> &str {
        "List variables with values and uncertainties"
    }

    fn execute(&self, session: &mut Session, _args: &[&str]) -> Result<CommandOutput> {
        if session.values.is_empty() {
            return Ok(CommandOutput::Text("No variables set".into()));
        }
        let headers = vec![
            "Variable".to_string(),
            "Value".to_string(),
            "Uncertainty".to_string(),
            "Relative".to_string(),
        ];
        let rows = session
            .values
            .iter()
            .map(|(sym, value)| {
                let (err, rel) = match session.errors.get(sym) {
                    Some(e) => (e.to_string(), relative(value, e)),
                    None => ("-".to_string(), "-".to_string()),
                };
                vec![sym.to_string(), value.to_string(), err, rel]
            })
            .collect();
        Ok(CommandOutput::Table { headers, rows })
    }
}

fn relative(value: &physics_core::Value, error: &physics_core::Value) -> String {
    match error.zip_with(value, |e, v| 100.0 * (e / v).abs()) {
        Ok(r) => {
            let parts: Vec<String> = r.iter().map(|x| format!("{:.2}%", x)).collect();
            parts.join(" ")
        }
        Err(_) => "shape?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics_core::{Symbol, Value};

    #[test]
    fn list_rows_in_order() {
        let mut session = Session::new();
        session.set_value(Symbol::new("b"), Value::from(2.0), Some(Value::from(0.1)));
        session.set_value(Symbol::new("a"), Value::from(4.0), None);
        match List.execute(&mut session, &[]).unwrap() {
            CommandOutput::Table { headers, rows } => {
                assert_eq!(headers.len(), 4);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0][0], "b");
                assert_eq!(rows[0][3], "5.00%");
                assert_eq!(rows[1][2], "-");
            }
            _ => panic!("expected Table output"),
        }
    }

    #[test]
    fn list_empty() {
        let mut session = Session::new();
        assert!(matches!(
            List.execute(&mut session, &[]).unwrap(),
            CommandOutput::Text(_)
        ));
    }
}
