use super::{Command, CommandOutput};
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::parser::parse_dataset;
use crate::session::Session;
use std::path::Path;
use tracing::info;

pub struct Load;

impl Command for Load {
    fn name(&self) -> &str {
        "LOAD"
    }
    fn description(&self) -> &str {
        "Load measurements from a data file"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(Error::Parse("LOAD requires a filename".into()));
        }
        let data = load_file(Path::new(args[0]))?;
        let summary = format_summary(&data);
        session.load_dataset(data);
        Ok(CommandOutput::Text(summary))
    }
}

pub fn load_file(path: &Path) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)?;
    let data = parse_dataset(&content)?;
    info!(
        path = %path.display(),
        variables = data.variable_count(),
        "loaded data file"
    );
    Ok(data)
}

fn format_summary(data: &Dataset) -> String {
    let mut lines = Vec::new();
    for h in &data.header_lines {
        lines.push(h.trim_start_matches('!').trim().to_string());
    }
    if let Some(f) = &data.formula {
        lines.push(format!("Formula: {}", f));
    }
    let names: Vec<&str> = data.values.keys().map(|s| s.name()).collect();
    lines.push(format!("Variables: {} ({})", names.len(), names.join(", ")));
    let missing: Vec<&str> = data
        .values
        .keys()
        .filter(|s| !data.errors.contains(s))
        .map(|s| s.name())
        .collect();
    if !missing.is_empty() {
        lines.push(format!("No uncertainty for: {}", missing.join(", ")));
    }
    if !data.correlations.is_empty() {
        lines.push(format!("Correlations: {}", data.correlations.len()));
    }
    lines.join("\n")
}
