use crate::dataset::{Dataset, UNCERTAINTY_SEPARATORS};
use crate::error::{Error, Result};
use crate::formula::Formula;
use physics_core::constants::MAX_SIGNIFICANT;
use physics_core::{Precision, Symbol, Value};
use std::fmt::Write as _;

pub fn parse_dataset(content: &str) -> Result<Dataset> {
    let mut data = Dataset::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('!') {
            data.header_lines.push(trimmed.to_string());
        } else if let Some(option) = trimmed.strip_prefix(':') {
            parse_option(option, &mut data)?;
        } else {
            let (name, value, error) = parse_measurement(trimmed)?;
            match error {
                Some(e) => {
                    data.errors.insert(name.clone(), e);
                }
                None => {
                    data.errors.remove(&name);
                }
            }
            data.values.insert(name, value);
        }
    }
    Ok(data)
}

fn parse_option(option: &str, data: &mut Dataset) -> Result<()> {
    let option = option.trim();
    let (keyword, rest) = option
        .split_once(char::is_whitespace)
        .map_or((option, ""), |(k, r)| (k, r.trim()));
    match keyword.to_uppercase().as_str() {
        "FORMULA" => data.formula = Some(Formula::parse(rest)?),
        "PRECISION" => {
            let args: Vec<&str> = rest.split_whitespace().collect();
            data.precision = Some(parse_precision(&args)?);
        }
        "CORR" => {
            let p: Vec<&str> = rest.split_whitespace().collect();
            if p.len() != 3 {
                return Err(Error::Parse(format!(
                    "CORR needs two variables and a coefficient, got: {}",
                    rest
                )));
            }
            let a = Symbol::parse(p[0])?;
            let b = Symbol::parse(p[1])?;
            let rho = parse_f64(p[2], "correlation")?;
            data.correlations.set(&a, &b, rho)?;
        }
        _ => return Err(Error::Parse(format!("unknown option: {}", keyword))),
    }
    Ok(())
}

/// Parses `name v1 [v2 ...] [+- e1 [e2 ...]]`. Any separator may touch the
/// numbers around it.
pub fn parse_measurement(line: &str) -> Result<(Symbol, Value, Option<Value>)> {
    let spaced = pad_separators(line);
    let p: Vec<&str> = spaced.split_whitespace().collect();
    let Some((name, rest)) = p.split_first() else {
        return Err(Error::Parse("empty measurement line".into()));
    };
    let sym = Symbol::parse(name)?;
    let split = rest.iter().position(|t| UNCERTAINTY_SEPARATORS.contains(t));
    let (value_tokens, error_tokens) = match split {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };
    if value_tokens.is_empty() {
        return Err(Error::Parse(format!("no value given for {}", name)));
    }
    let value = parse_value(value_tokens, name)?;
    let error = match error_tokens {
        Some([]) => {
            return Err(Error::Parse(format!("no uncertainty after separator for {}", name)));
        }
        Some(tokens) => Some(parse_value(tokens, name)?),
        None => None,
    };
    Ok((sym, value, error))
}

fn pad_separators(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut rest = line;
    'scan: while !rest.is_empty() {
        for sep in UNCERTAINTY_SEPARATORS {
            if let Some(tail) = rest.strip_prefix(sep) {
                out.push(' ');
                out.push_str(sep);
                out.push(' ');
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

/// One number is a scalar, several form an array.
pub fn parse_value(tokens: &[&str], field: &str) -> Result<Value> {
    let numbers = tokens
        .iter()
        .map(|t| parse_f64(t, field))
        .collect::<Result<Vec<_>>>()?;
    Ok(match numbers.as_slice() {
        [x] => Value::Scalar(*x),
        _ => Value::Array(numbers),
    })
}

/// Parses `n`, `DEC n`, `SIG n` or `UNC n`.
pub fn parse_precision(args: &[&str]) -> Result<Precision> {
    let digits = |s: &str| -> Result<u32> {
        match s.parse::<u32>() {
            Ok(n) if (1..=MAX_SIGNIFICANT).contains(&n) => Ok(n),
            _ => Err(Error::Parse(format!(
                "expected a digit count from 1 to {}, got: {}",
                MAX_SIGNIFICANT, s
            ))),
        }
    };
    match args {
        [n] => parse_decimals(n),
        [mode, n] => match mode.to_uppercase().as_str() {
            "DEC" => parse_decimals(n),
            "SIG" => Ok(Precision::Significant(digits(n)?)),
            "UNC" => Ok(Precision::Uncertainty(digits(n)?)),
            _ => Err(Error::Parse(format!("unknown precision mode: {}", mode))),
        },
        _ => Err(Error::Parse(
            "expected n, DEC n, SIG n or UNC n".into(),
        )),
    }
}

fn parse_decimals(s: &str) -> Result<Precision> {
    s.parse::<i32>()
        .map(Precision::Decimals)
        .map_err(|e| Error::Parse(format!("decimals: {}", e)))
}

/// Adapter for command-line flags: `--precision "SIG 3"`.
pub fn parse_precision_arg(s: &str) -> std::result::Result<Precision, String> {
    let args: Vec<&str> = s.split_whitespace().collect();
    parse_precision(&args).map_err(|e| e.to_string())
}

pub fn format_dataset(data: &Dataset) -> String {
    let mut out = String::new();
    for h in &data.header_lines {
        if h.starts_with('!') {
            out.push_str(h);
        } else {
            let _ = write!(out, "!{}", h);
        }
        out.push('\n');
    }
    if let Some(f) = &data.formula {
        let _ = writeln!(out, ":FORMULA {}", f);
    }
    if let Some(p) = &data.precision {
        let _ = writeln!(out, ":PRECISION {}", p);
    }
    for (a, b, rho) in data.correlations.iter() {
        let _ = writeln!(out, ":CORR {} {} {}", a, b, rho);
    }
    let width = data.values.keys().map(|s| s.name().len()).max().unwrap_or(0);
    for (sym, value) in data.values.iter() {
        let _ = write!(out, "{:<width$} {}", sym.name(), join_numbers(value), width = width);
        if let Some(e) = data.errors.get(sym) {
            let _ = write!(out, "  +- {}", join_numbers(e));
        }
        out.push('\n');
    }
    out
}

fn join_numbers(v: &Value) -> String {
    v.iter()
        .map(|x| format!("{:?}", x))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn parse_f64(s: &str, field: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|e| Error::Parse(format!("{}: {}", field, e)))
}
