//! Interactive workbench for measurement uncertainty propagation.
//!
//! ```bash
//! # Interactive session
//! errprop
//!
//! # Start with a data file and three significant figures
//! errprop --load incline.dat --precision "SIG 3"
//!
//! # Run a command script and exit
//! errprop --script pendulum.cmd
//! ```

use anyhow::{bail, Context};
use clap::Parser;
use physics_core::Precision;
use physics_tools::commands::{self, CommandOutput, ResultDisplay};
use physics_tools::config::Config;
use physics_tools::parser::parse_precision_arg;
use physics_tools::session::Session;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Propagate measurement uncertainties through a formula
#[derive(Parser, Debug)]
#[command(name = "errprop")]
#[command(version)]
#[command(about = "Propagate measurement uncertainties through a formula")]
struct Args {
    /// Configuration file (default: <config dir>/errprop/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Result rounding: 4, "DEC 4", "SIG 3" or "UNC 2"
    #[arg(short, long, value_parser = parse_precision_arg)]
    precision: Option<Precision>,

    /// Data file to load before the first prompt
    #[arg(short, long, value_name = "FILE")]
    load: Option<PathBuf>,

    /// Run the commands in FILE, one per line, then exit
    #[arg(short, long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

struct ErrpropHelper {
    commands: Vec<String>,
}

impl ErrpropHelper {
    fn new() -> Self {
        Self {
            commands: [
                "FORMULA", "SET", "UNC", "DROP", "LIST", "CORR", "PRECISION",
                "PROPAGATE", "DIFF", "CONTRIB", "EVAL", "LOAD", "SAVE",
                "EXPORT", "GPLOT", "RESET", "SHOW", "HELP", "QUIT",
            ].iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn split_path_prefix(partial: &str) -> (&Path, &str) {
    if partial.is_empty() {
        return (Path::new("."), "");
    }
    let path = Path::new(partial);
    if partial.ends_with(std::path::is_separator) {
        return (path, "");
    }
    match (path.parent(), path.file_name()) {
        (Some(p), Some(f)) => {
            let dir = if p.as_os_str().is_empty() { Path::new(".") } else { p };
            (dir, f.to_str().unwrap_or(""))
        }
        _ => (Path::new("."), partial),
    }
}

fn complete_path(partial: &str) -> Vec<Pair> {
    let (dir, prefix) = split_path_prefix(partial);
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return vec![],
    };
    let base = match partial.rfind(std::path::is_separator) {
        Some(i) => partial[..=i].to_string(),
        None => String::new(),
    };
    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| build_path_pair(&e, prefix, &base))
        .collect()
}

fn build_path_pair(entry: &fs::DirEntry, prefix: &str, base: &str) -> Option<Pair> {
    let name = entry.file_name().into_string().ok()?;
    if !name.starts_with(prefix) {
        return None;
    }
    let suffix = if entry.path().is_dir() { std::path::MAIN_SEPARATOR_STR } else { "" };
    Some(Pair {
        display: format!("{}{}", name, suffix),
        replacement: format!("{}{}{}", base, name, suffix),
    })
}

impl Completer for ErrpropHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let up_to = &line[..pos];
        let words: Vec<&str> = up_to.split_whitespace().collect();
        let start = up_to.rfind(char::is_whitespace).map_or(0, |i| i + 1);

        if words.is_empty() || (words.len() == 1 && !up_to.ends_with(' ')) {
            let prefix = words.first().map_or("", |s| *s).to_uppercase();
            let matches: Vec<Pair> = self.commands.iter()
                .filter(|c| c.starts_with(&prefix))
                .map(|c| Pair { display: c.clone(), replacement: c.clone() })
                .collect();
            return Ok((start, matches));
        }
        let cmd = words[0].to_uppercase();
        if matches!(cmd.as_str(), "LOAD" | "SAVE" | "EXPORT" | "GPLOT") {
            let partial = if up_to.ends_with(' ') { "" } else { words.last().copied().unwrap_or("") };
            Ok((start, complete_path(partial)))
        } else {
            Ok((pos, vec![]))
        }
    }
}

impl Hinter for ErrpropHelper {
    type Hint = String;
}
impl Highlighter for ErrpropHelper {}
impl Validator for ErrpropHelper {}
impl Helper for ErrpropHelper {}

fn setup_tracing(args: &Args) {
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_tracing(&args);

    let config = Config::discover(args.config.as_deref())?;
    let precision = match args.precision {
        Some(p) => p,
        None => config.precision()?.unwrap_or_default(),
    };
    debug!(%precision, "starting session");
    let mut session = Session::with_precision(precision);

    if let Some(path) = args.load.as_ref().or(config.data_file.as_ref()) {
        let data = commands::load::load_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
        session.load_dataset(data);
        if args.precision.is_some() {
            session.precision = precision;
        }
    }

    match &args.script {
        Some(script) => run_script(&mut session, script),
        None => run_repl(&mut session, &config),
    }
}

fn run_script(session: &mut Session, path: &Path) -> anyhow::Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    info!(path = %path.display(), "running script");
    for (i, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.eq_ignore_ascii_case("QUIT") {
            break;
        }
        match commands::dispatch(session, line) {
            Ok(output) => print_output(output),
            Err(e) => bail!("{}:{}: {}", path.display(), i + 1, e),
        }
    }
    Ok(())
}

fn run_repl(session: &mut Session, config: &Config) -> anyhow::Result<()> {
    println!("errprop v{}", env!("CARGO_PKG_VERSION"));
    println!("Type HELP for commands, Ctrl-D to exit\n");

    let mut rl = Editor::with_config(
        rustyline::Config::builder()
            .auto_add_history(true)
            .build(),
    )
    .context("failed to initialize editor")?;
    rl.set_helper(Some(ErrpropHelper::new()));

    let history = config.history_path();
    if rl.load_history(&history).is_err() {
        debug!(path = %history.display(), "no history loaded");
    }

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("QUIT") {
                    println!("Bye!");
                    break;
                }
                match commands::dispatch(session, line) {
                    Ok(output) => print_output(output),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Bye!");
                break;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(&history) {
        debug!(path = %history.display(), error = %e, "history not saved");
    }
    Ok(())
}

fn print_output(output: CommandOutput) {
    match output {
        CommandOutput::Text(s) => println!("{}", s),
        CommandOutput::Table { headers, rows } => print_table(&headers, &rows),
        CommandOutput::ResultDisplay(result) => print_result(&result),
        CommandOutput::None => {}
    }
}

fn print_result(result: &ResultDisplay) {
    let pick = |v: &[f64], i: usize| match v {
        [x] => *x,
        v => v.get(i).copied().unwrap_or(f64::NAN),
    };
    let n = result.values.len().max(result.errors.len());
    println!();
    for i in 0..n {
        let label = if n > 1 {
            format!("{}[{}]", result.label, i)
        } else {
            result.label.clone()
        };
        println!(
            "  {} = {} +/- {}  ({:.2}%)",
            label,
            commands::format_number(pick(&result.values, i), result.decimals),
            commands::format_number(pick(&result.errors, i), result.decimals),
            pick(&result.relative, i) * 100.0,
        );
    }
    println!();
}

fn print_table(headers: &[String], rows: &[Vec<String>]) {
    let widths: Vec<usize> = (0..headers.len())
        .map(|i| {
            let hw = headers[i].len();
            let rw = rows.iter()
                .map(|r| r.get(i).map_or(0, |s| s.len()))
                .max()
                .unwrap_or(0);
            hw.max(rw)
        })
        .collect();

    for (i, h) in headers.iter().enumerate() {
        print!("{:>width$}  ", h, width = widths[i]);
    }
    println!();

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            print!("{:>width$}  ", cell, width = widths[i]);
        }
        println!();
    }
}
