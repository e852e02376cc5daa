use super::{format_value, Command, CommandOutput};
use crate::error::{Error, Result};
use crate::session::Session;
use physics_core::{parse_expr, Lambda, Symbol, Value};

pub struct Eval;

impl Command for Eval {
    fn name(&self) -> &str {
        "EVAL"
    }
    fn description(&self) -> &str {
        "Evaluate an expression at the current values"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(Error::Parse("EVAL requires an expression".into()));
        }
        let expr = parse_expr(&args.join(" "))?;
        let symbols: Vec<Symbol> = session.values.keys().cloned().collect();
        if let Some(s) = expr.free_symbols().into_iter().find(|s| !session.values.contains(s)) {
            return Err(Error::UnknownVariable(s.name().to_string()));
        }
        let values: Vec<Value> = session.values.values().cloned().collect();
        let result = Lambda::new(&expr, &symbols)?.call(&values)?;
        Ok(CommandOutput::Text(format!(
            "{} = {}",
            expr,
            format_value(&result, session.precision)
        )))
    }
}
