use super::{ensure_result, Command, CommandOutput};
use crate::error::Result;
use crate::plot::band::compute_band;
use crate::session::Session;
use std::path::Path;

pub struct Gplot;

impl Command for Gplot {
    fn name(&self) -> &str {
        "GPLOT"
    }
    fn description(&self) -> &str {
        "Plot the result with its uncertainty"
    }

    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<CommandOutput> {
        let (file, against) = split_args(args);
        ensure_result(session)?;
        let band = compute_band(session, against)?;
        let title = format!("{} with uncertainty", band.y_label);
        match file {
            Some(path) => {
                let path = Path::new(path);
                crate::plot::svg::band_svg(&band, path, &title).map_err(svg_err)?;
                Ok(CommandOutput::Text(format!("Written to {}", path.display())))
            }
            None => Ok(CommandOutput::Text(crate::plot::terminal::band_terminal(
                &band, &title,
            ))),
        }
    }
}

fn split_args<'a>(args: &[&'a str]) -> (Option<&'a str>, Option<&'a str>) {
    let mut file = None;
    let mut against = None;
    for &arg in args {
        if arg.to_lowercase().ends_with(".svg") {
            file = Some(arg);
        } else {
            against = Some(arg);
        }
    }
    (file, against)
}

fn svg_err(e: Box<dyn std::error::Error>) -> crate::error::Error {
    crate::error::Error::Io(std::io::Error::other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::dispatch;

    fn session() -> Session {
        let mut session = Session::new();
        dispatch(&mut session, "FORMULA v = d/t").unwrap();
        dispatch(&mut session, "SET d 10 +- 0.1").unwrap();
        dispatch(&mut session, "SET t 1 2 4 +- 0.05").unwrap();
        session
    }

    #[test]
    fn args_in_either_order() {
        assert_eq!(split_args(&["out.svg", "t"]), (Some("out.svg"), Some("t")));
        assert_eq!(split_args(&["t", "OUT.SVG"]), (Some("OUT.SVG"), Some("t")));
        assert_eq!(split_args(&[]), (None, None));
    }

    #[test]
    fn terminal_plot_propagates_first() {
        let mut session = session();
        match Gplot.execute(&mut session, &["t"]).unwrap() {
            CommandOutput::Text(s) => assert!(s.starts_with("v with uncertainty\n  v vs t")),
            _ => panic!("expected Text output"),
        }
        assert!(session.last_result.is_some());
    }

    #[test]
    fn svg_written() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("band.svg");
        let path_str = path.to_str().unwrap();
        match Gplot.execute(&mut session, &[path_str]).unwrap() {
            CommandOutput::Text(s) => assert!(s.starts_with("Written to")),
            _ => panic!("expected Text output"),
        }
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn without_formula_fails() {
        let mut session = Session::new();
        assert!(Gplot.execute(&mut session, &[]).is_err());
    }
}
