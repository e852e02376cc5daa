use super::{Command, CommandOutput};
use crate::error::Result;
use crate::session::Session;

pub struct Help;

impl Command for Help {
    fn name(&self) -> &str {
        "HELP"
    }
    fn description(&self) -> &str {
        "Show available commands"
    }

    fn execute(&self, _session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        if let Some(cmd) = args.first() {
            Ok(CommandOutput::Text(command_help(cmd)))
        } else {
            Ok(CommandOutput::Text(general_help()))
        }
    }
}

fn command_help(cmd: &str) -> String {
    match cmd.to_uppercase().as_str() {
        "FORMULA" => "FORMULA [name =] <expr>\n  Set the formula, or show it with no args\n  Example: FORMULA T = 2*pi*sqrt(l/g)".into(),
        "SET" => "SET <var> <value...> [+- <error...>]\n  Set a measured value; several numbers make an array\n  Example: SET t 1.21 1.19 1.24 +- 0.02".into(),
        "UNC" => "UNC <var> <error...>\n  Set the uncertainty of an existing variable".into(),
        "DROP" => "DROP <var> [var...] | DROP ALL\n  Remove variables and their correlations".into(),
        "LIST" => "LIST\n  List variables with values and uncertainties".into(),
        "CORR" => "CORR [<a> <b> <rho> | CLEAR]\n  Show or set a correlation coefficient in [-1, 1]\n  rho = 0 removes the pair".into(),
        "PRECISION" => "PRECISION [n | DEC n | SIG n | UNC n]\n  n, DEC n = decimal places (default 4)\n  SIG n = significant figures\n  UNC n = uncertainty to n figures, value to match".into(),
        "PROPAGATE" => "PROPAGATE\n  Propagate uncertainties through the formula".into(),
        "DIFF" => "DIFF [var...]\n  Show partial derivatives of the formula".into(),
        "CONTRIB" => "CONTRIB\n  Share of the total variance per variable".into(),
        "EVAL" => "EVAL <expr>\n  Evaluate an expression at the current values".into(),
        "LOAD" => "LOAD <file>\n  Load measurements from a data file".into(),
        "SAVE" => "SAVE <file>\n  Save formula and measurements to a data file".into(),
        "EXPORT" => "EXPORT <file>\n  Write the last result as JSON".into(),
        "GPLOT" => "GPLOT [file.svg] [var]\n  Plot the result with error bars against index or an array variable\n  No file = terminal, with file = SVG output".into(),
        "RESET" => "RESET\n  Clear formula, variables and correlations (keeps precision)".into(),
        "SHOW" => "SHOW\n  Display session state".into(),
        "HELP" => "HELP [command]\n  Show help for a command".into(),
        "QUIT" => "QUIT\n  Exit the program".into(),
        _ => format!("Unknown command: {}", cmd),
    }
}

fn general_help() -> String {
    "\
Commands:
  FORMULA [expr]     Set or show the formula
  SET <var> <v> [+- <e>]
                     Set a measured value
  UNC <var> <e>      Set an uncertainty
  DROP <vars>        Remove variables (or ALL)
  LIST               List variables
  CORR [a b rho]     Show or set correlations

  PRECISION [mode]   Show or set result rounding
  PROPAGATE          Propagate uncertainties
  DIFF [vars]        Show partial derivatives
  CONTRIB            Variance share per variable
  EVAL <expr>        Evaluate an expression

  LOAD <file>        Load a data file
  SAVE <file>        Save a data file
  EXPORT <file>      Write result as JSON
  GPLOT [file] [var] Plot result with error bars

  RESET              Clear the session
  SHOW               Display session state
  HELP [cmd]         Show help
  QUIT               Exit

Type HELP <command> for details."
        .to_string()
}
