use crate::error::{Error, Result};
use crate::session::Session;
use physics_core::Symbol;

/// Result values with their uncertainty, ready to plot.
pub struct ResultBand {
    pub x: Vec<f64>,
    pub value: Vec<f64>,
    pub error: Vec<f64>,
    pub x_label: String,
    pub y_label: String,
}

impl ResultBand {
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.value.iter().copied()).collect()
    }

    pub fn upper(&self) -> Vec<(f64, f64)> {
        self.edge(1.0)
    }

    pub fn lower(&self) -> Vec<(f64, f64)> {
        self.edge(-1.0)
    }

    fn edge(&self, sign: f64) -> Vec<(f64, f64)> {
        (0..self.len())
            .map(|i| (self.x[i], self.value[i] + sign * self.error_at(i)))
            .collect()
    }

    pub fn error_at(&self, i: usize) -> f64 {
        match self.error.as_slice() {
            [e] => *e,
            errors => errors.get(i).copied().unwrap_or(f64::NAN),
        }
    }
}

/// Builds the band from the last result, against element index or the
/// values of `against`.
pub fn compute_band(session: &Session, against: Option<&str>) -> Result<ResultBand> {
    let result = session.require_result()?;
    let value = result.nominal.to_vec();
    let error = result.error.to_vec();
    let n = value.len();
    let (x, x_label) = match against {
        None => ((0..n).map(|i| i as f64).collect(), "index".to_string()),
        Some(name) => {
            let sym = Symbol::new(name);
            let v = session
                .values
                .get(&sym)
                .ok_or_else(|| Error::UnknownVariable(name.to_string()))?;
            let x = v.to_vec();
            if x.len() != n {
                return Err(Error::Parse(format!(
                    "{} has {} values but the result has {}",
                    name,
                    x.len(),
                    n
                )));
            }
            (x, name.to_string())
        }
    };
    let y_label = session
        .formula
        .as_ref()
        .map_or("f", |f| f.label())
        .to_string();
    Ok(ResultBand {
        x,
        value,
        error,
        x_label,
        y_label,
    })
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
        dispatch(&mut session, "PROPAGATE").unwrap();
        session
    }

    #[test]
    fn band_against_index() {
        let band = compute_band(&session(), None).unwrap();
        assert_eq!(band.x, vec![0.0, 1.0, 2.0]);
        assert_eq!(band.value, vec![10.0, 5.0, 2.5]);
        assert_eq!(band.y_label, "v");
        let up = band.upper();
        assert!(up[0].1 > 10.0);
        assert!(band.lower()[0].1 < 10.0);
    }

    #[test]
    fn band_against_variable() {
        let band = compute_band(&session(), Some("t")).unwrap();
        assert_eq!(band.x, vec![1.0, 2.0, 4.0]);
        assert_eq!(band.x_label, "t");
    }

    #[test]
    fn band_against_scalar_variable_fails() {
        assert!(compute_band(&session(), Some("d")).is_err());
        assert!(compute_band(&session(), Some("zz")).is_err());
    }

    #[test]
    fn requires_result() {
        let session = Session::new();
        assert!(matches!(compute_band(&session, None), Err(Error::NoResult)));
    }
}
