use super::{ensure_result, Command, CommandOutput};
use crate::error::Result;
use crate::session::Session;
use physics_core::round::round_significant;

pub struct Contrib;

impl Command for Contrib {
    fn name(&self) -> &str {
        "CONTRIB"
    }
    fn description(&self) -> &str {
        "Share of the total variance per variable"
    }

    fn execute(&self, session: &mut Session, _args: &[&str]) -> Result<CommandOutput> {
        ensure_result(session)?;
        let result = session.require_result()?;
        let shares = result.variance_shares()?;
        let headers = vec![
            "Variable".to_string(),
            "Derivative".to_string(),
            "Variance".to_string(),
            "Share".to_string(),
        ];
        let rows = result
            .symbols
            .iter()
            .zip(&result.derivatives)
            .zip(result.contributions.iter().zip(&shares))
            .map(|((sym, d), (c, share))| {
                let pct: Vec<String> = share.iter().map(|s| format!("{:.1}%", 100.0 * s)).collect();
                vec![
                    sym.to_string(),
                    d.to_string(),
                    c.map(|x| round_significant(x, 3)).to_string(),
                    pct.join(" "),
                ]
            })
            .collect();
        Ok(CommandOutput::Table { headers, rows })
    }
}
