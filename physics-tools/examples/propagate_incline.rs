//! Moment of inertia of cylinders rolled down an incline.
//!
//! ```bash
//! cargo run -p physics-tools --example propagate_incline
//! ```

use physics_core::{parse_expr, Precision, Value};
use physics_tools::{propagate_error, VarMap};

fn main() -> anyhow::Result<()> {
    let formula = parse_expr("m*r^2*(g*t^2*sin(theta)/(2*L) - 1)")?;

    let values = VarMap::from([
        ("r", Value::from(vec![0.025, 0.030, 0.035])),
        ("m", Value::from(0.120)),
        ("g", Value::from(9.81)),
        ("t", Value::from(vec![2.10, 1.95, 1.80])),
        ("theta", Value::from(15f64.to_radians())),
        ("L", Value::from(1.5)),
    ]);
    let errors = VarMap::from([
        ("r", Value::from(0.0005)),
        ("m", Value::from(0.001)),
        ("g", Value::from(0.01)),
        ("t", Value::from(vec![0.05, 0.05, 0.04])),
        ("theta", Value::from(0.1f64.to_radians())),
        ("L", Value::from(0.002)),
    ]);

    for precision in [Precision::Decimals(7), Precision::Uncertainty(2)] {
        let (value, error) = propagate_error(&formula, &values, &errors, precision)?;
        println!("[{precision}] I = {value} +/- {error} kg m^2");
    }
    Ok(())
}
