use super::band::ResultBand;
use textplots::{Chart, Plot, Shape};

pub fn band_terminal(band: &ResultBand, title: &str) -> String {
    if band.is_empty() {
        return format!("{title}\n  (no data)\n");
    }
    let value = to_f32_points(&band.points());
    let upper = to_f32_points(&band.upper());
    let lower = to_f32_points(&band.lower());
    let (xmin, xmax) = f32_extent(value.iter().map(|p| p.0));
    let chart_body = render_band(&value, &upper, &lower, xmin, xmax);
    format!(
        "{title}\n  {} vs {} (points: value, lines: value +/- error)\n{chart_body}",
        band.y_label, band.x_label
    )
}

fn render_band(
    value: &[(f32, f32)],
    upper: &[(f32, f32)],
    lower: &[(f32, f32)],
    xmin: f32,
    xmax: f32,
) -> String {
    let points = Shape::Points(value);
    let up = Shape::Lines(upper);
    let down = Shape::Lines(lower);
    let mut chart = Chart::new(120, 40, xmin, xmax);
    let rendered = chart.lineplot(&points).lineplot(&up).lineplot(&down);
    rendered.axis();
    rendered.figures();
    format!("{rendered}")
}

fn to_f32_points(points: &[(f64, f64)]) -> Vec<(f32, f32)> {
    points.iter().map(|&(x, y)| (x as f32, y as f32)).collect()
}

fn f32_extent(iter: impl Iterator<Item = f32>) -> (f32, f32) {
    let (lo, hi) = iter.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if (hi - lo).abs() < 1e-6 {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> ResultBand {
        ResultBand {
            x: vec![0.0, 1.0, 2.0],
            value: vec![1.0, 2.0, 3.0],
            error: vec![0.1],
            x_label: "index".into(),
            y_label: "f".into(),
        }
    }

    #[test]
    fn band_has_title_and_labels() {
        let text = band_terminal(&band(), "Result");
        assert!(text.starts_with("Result\n  f vs index"));
    }

    #[test]
    fn empty_band() {
        let mut b = band();
        b.value.clear();
        assert_eq!(band_terminal(&b, "Result"), "Result\n  (no data)\n");
    }
}
