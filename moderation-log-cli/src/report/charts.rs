//! Chart rendering (SVG via `plotters`)
//!
//! Bar charts of mean category scores and a scatter plot of the two designated
//! columns. Every chart is written as a standalone SVG file into the chart
//! directory.

use super::ReportError;
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;

/// Color ramp for bar charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPalette {
    /// Dark purple through teal to yellow
    Viridis,
    /// Black through purple and orange to pale yellow
    Magma,
}

impl BarPalette {
    fn stops(self) -> &'static [(u8, u8, u8)] {
        match self {
            BarPalette::Viridis => &[(68, 1, 84), (59, 82, 139), (33, 145, 140), (94, 201, 98), (253, 231, 37)],
            BarPalette::Magma => &[(0, 0, 4), (81, 18, 124), (183, 55, 121), (252, 137, 97), (252, 253, 191)],
        }
    }

    /// Color for bar `index` out of `count`, spread evenly over the ramp
    pub fn color(self, index: usize, count: usize) -> RGBColor {
        let stops = self.stops();
        let t = if count > 1 {
            index as f64 / (count - 1) as f64
        } else {
            0.0
        };
        let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
        let lower = scaled.floor() as usize;
        let upper = (lower + 1).min(stops.len() - 1);
        let frac = scaled - lower as f64;

        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        let (r0, g0, b0) = stops[lower];
        let (r1, g1, b1) = stops[upper];
        RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
    }
}

/// Writes charts into one output directory
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
}

fn chart_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Chart(e.to_string())
}

impl ChartRenderer {
    /// Create a renderer, creating the output directory if needed
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        log::debug!("Charts will be written to {:?}", output_dir);
        Ok(Self { output_dir })
    }

    /// Render a bar chart of named values; undefined values get no bar
    pub fn bar_chart(
        &self,
        file_name: &str,
        title: &str,
        y_label: &str,
        bars: &[(String, Option<f64>)],
        palette: BarPalette,
    ) -> Result<PathBuf, ReportError> {
        let path = self.output_dir.join(file_name);
        let count = bars.len().max(1);
        let y_max = bars
            .iter()
            .filter_map(|(_, v)| *v)
            .fold(0.0_f64, f64::max);
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

        {
            let root = SVGBackend::new(&path, (1200, 500)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 28))
                .margin(15)
                .x_label_area_size(140)
                .y_label_area_size(70)
                .build_cartesian_2d((0..count).into_segmented(), 0f64..y_max)
                .map_err(chart_err)?;

            let label_for = |segment: &SegmentValue<usize>| match segment {
                SegmentValue::CenterOf(i) => bars
                    .get(*i)
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            };

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(count)
                .x_label_formatter(&label_for)
                .x_label_style(
                    ("sans-serif", 14)
                        .into_font()
                        .transform(FontTransform::Rotate90),
                )
                .y_desc(y_label)
                .draw()
                .map_err(chart_err)?;

            chart
                .draw_series(bars.iter().enumerate().filter_map(|(i, (_, value))| {
                    let value = (*value)?;
                    let mut bar = Rectangle::new(
                        [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), value)],
                        palette.color(i, bars.len()).filled(),
                    );
                    bar.set_margin(0, 0, 4, 4);
                    Some(bar)
                }))
                .map_err(chart_err)?;

            root.present().map_err(chart_err)?;
        }

        log::info!("Saved bar chart '{}' to {:?}", title, path);
        Ok(path)
    }

    /// Render a scatter plot of (x, y) points
    pub fn scatter_plot(
        &self,
        file_name: &str,
        title: &str,
        axis_labels: (&str, &str),
        points: &[(f64, f64)],
    ) -> Result<PathBuf, ReportError> {
        let path = self.output_dir.join(file_name);
        let x_range = padded_range(points.iter().map(|(x, _)| *x));
        let y_range = padded_range(points.iter().map(|(_, y)| *y));

        {
            let root = SVGBackend::new(&path, (700, 500)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 22))
                .margin(15)
                .x_label_area_size(50)
                .y_label_area_size(60)
                .build_cartesian_2d(x_range, y_range)
                .map_err(chart_err)?;

            chart
                .configure_mesh()
                .x_desc(axis_labels.0)
                .y_desc(axis_labels.1)
                .draw()
                .map_err(chart_err)?;

            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, BLUE.mix(0.6).filled())),
                )
                .map_err(chart_err)?;

            root.present().map_err(chart_err)?;
        }

        log::info!("Saved scatter plot '{}' to {:?}", title, path);
        Ok(path)
    }
}

/// Axis range covering all values with a small margin; [0, 1] when empty
fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }

    let lo = min.min(0.0);
    let hi = max.max(1.0);
    let pad = (hi - lo) * 0.02;
    (lo - pad)..(hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_endpoints() {
        assert_eq!(BarPalette::Viridis.color(0, 5), RGBColor(68, 1, 84));
        assert_eq!(BarPalette::Viridis.color(4, 5), RGBColor(253, 231, 37));
        assert_eq!(BarPalette::Magma.color(0, 1), RGBColor(0, 0, 4));
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(std::iter::empty()), 0.0..1.0);

        let range = padded_range(vec![0.2, 0.4].into_iter());
        assert!(range.start < 0.0 && range.end > 1.0);

        let range = padded_range(vec![-1.0, 3.0].into_iter());
        assert!(range.start < -1.0 && range.end > 3.0);
    }

    #[test]
    fn test_bar_chart_written() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path().join("charts")).unwrap();

        let bars = vec![
            ("oa_violence".to_string(), Some(0.4)),
            ("oa_hate".to_string(), Some(0.1)),
            ("oa_sexual".to_string(), None),
        ];
        let path = renderer
            .bar_chart("bars.svg", "Average Scores", "Mean Score", &bars, BarPalette::Viridis)
            .unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Average Scores"));
    }

    #[test]
    fn test_empty_scatter_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path()).unwrap();

        let path = renderer
            .scatter_plot("scatter.svg", "Nothing", ("x", "y"), &[])
            .unwrap();
        assert!(path.exists());
    }
}
