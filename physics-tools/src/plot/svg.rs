use super::band::ResultBand;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::path::Path;

type PlotResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Result values with vertical error bars, joined by a line when there is
/// more than one element.
pub fn band_svg(band: &ResultBand, path: &Path, title: &str) -> PlotResult {
    let mut extremes = band.upper();
    extremes.extend(band.lower());
    let (x_range, y_range) = padded_ranges(&extremes);
    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = build_chart(&root, title, &band.x_label, &band.y_label, &x_range, &y_range)?;
    draw_error_bars(&mut chart, band)?;
    if band.len() > 1 {
        draw_line(&mut chart, &band.points())?;
    }
    root.present()?;
    Ok(())
}

fn padded_ranges(points: &[(f64, f64)]) -> ((f64, f64), (f64, f64)) {
    let finite: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if finite.is_empty() {
        return ((-1.0, 1.0), (-1.0, 1.0));
    }
    let (mut x_min, mut x_max) = extent(finite.iter().map(|p| p.0));
    let (mut y_min, mut y_max) = extent(finite.iter().map(|p| p.1));
    let x_pad = (x_max - x_min).abs() * 0.1 + 0.5;
    let y_pad = (y_max - y_min).abs() * 0.1 + 1e-6;
    x_min -= x_pad;
    x_max += x_pad;
    y_min -= y_pad;
    y_max += y_pad;
    ((x_min, x_max), (y_min, y_max))
}

fn extent(iter: impl Iterator<Item = f64>) -> (f64, f64) {
    iter.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

type Chart2d<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn build_chart<'a, DB: DrawingBackend + 'a>(
    area: &'a DrawingArea<DB, plotters::coord::Shift>,
    title: &str,
    x_label: &str,
    y_label: &str,
    x_range: &(f64, f64),
    y_range: &(f64, f64),
) -> std::result::Result<Chart2d<'a, DB>, Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;
    Ok(chart)
}

fn draw_error_bars<DB: DrawingBackend>(chart: &mut Chart2d<'_, DB>, band: &ResultBand) -> PlotResult
where
    DB::ErrorType: 'static,
{
    chart.draw_series((0..band.len()).map(|i| {
        let e = band.error_at(i);
        let (x, y) = (band.x[i], band.value[i]);
        ErrorBar::new_vertical(x, y - e, y, y + e, BLUE.filled(), 8)
    }))?;
    Ok(())
}

fn draw_line<DB: DrawingBackend>(chart: &mut Chart2d<'_, DB>, points: &[(f64, f64)]) -> PlotResult
where
    DB::ErrorType: 'static,
{
    chart.draw_series(LineSeries::new(points.iter().copied(), BLUE.mix(0.4)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_ranges_skip_non_finite() {
        let ((x0, x1), (y0, y1)) = padded_ranges(&[(0.0, 1.0), (2.0, f64::NAN), (4.0, 3.0)]);
        assert!(x0 < 0.0 && x1 > 4.0);
        assert!(y0 < 1.0 && y1 > 3.0);
    }

    #[test]
    fn padded_ranges_default_when_empty() {
        assert_eq!(padded_ranges(&[]), ((-1.0, 1.0), (-1.0, 1.0)));
    }

    #[test]
    fn writes_svg_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("band.svg");
        let band = ResultBand {
            x: vec![0.0, 1.0],
            value: vec![1.0, 1.5],
            error: vec![0.1, 0.2],
            x_label: "index".into(),
            y_label: "f".into(),
        };
        band_svg(&band, &path, "Result").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("<svg"));
    }
}
