//! Chart model and rendering.
//!
//! Calculations describe what to draw as a [`Figure`]; [`save`] turns it into an
//! SVG or PNG with `plotters`, choosing the backend from the file extension.
//! Bitmaps are drawn without text, since the bitmap backend has no font
//! support here; they keep the plot frame, grid, bands, bars and lines.
//! Log axes are drawn by projecting values to log10 on a linear grid and
//! labelling the ticks with the original magnitude.

use std::ffi::OsStr;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::errors::RenderError;
use crate::sweep::Sweep;

/// Line colours assigned to series without an explicit colour.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Orange.
pub const ORANGE: RGBColor = RGBColor(255, 165, 0);
/// Olive.
pub const OLIVE: RGBColor = RGBColor(128, 128, 0);
/// Brown.
pub const BROWN: RGBColor = RGBColor(165, 42, 42);
/// Deep pink.
pub const DEEP_PINK: RGBColor = RGBColor(255, 20, 147);
/// Olive drab.
pub const OLIVE_DRAB: RGBColor = RGBColor(107, 142, 35);

/// Axis scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    /// Values drawn as given.
    Linear,
    /// Values drawn by their base-10 logarithm.
    Log,
}

impl Scale {
    /// Map a data value onto the drawing grid.
    #[must_use]
    pub fn project(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Log => value.log10(),
        }
    }

    /// Tick text for a grid position on a log axis.
    fn tick_label(self, position: f64) -> String {
        match self {
            Self::Linear => format!("{position}"),
            Self::Log => format!("{:.0e}", 10f64.powf(position)),
        }
    }
}

/// One chart axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    /// Axis description.
    pub label: String,
    /// Linear or logarithmic scaling.
    pub scale: Scale,
    /// Fixed limits in data units; fitted to the content when `None`.
    pub range: Option<(f64, f64)>,
}

impl Axis {
    /// Linear axis fitted to its content.
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            scale: Scale::Linear,
            range: None,
        }
    }

    /// Limits on the drawing grid for content spanning `values`.
    fn bounds(&self, values: impl Iterator<Item = f64>) -> (f64, f64) {
        if let Some((low, high)) = self.range {
            return (self.scale.project(low), self.scale.project(high));
        }
        let (low, high) = values
            .map(|value| self.scale.project(value))
            .filter(|value| value.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
                (low.min(value), high.max(value))
            });
        if !low.is_finite() {
            return (0.0, 1.0);
        }
        if high - low < f64::EPSILON {
            return (low - 0.5, high + 0.5);
        }
        let pad = 0.05 * (high - low);
        (low - pad, high + pad)
    }
}

/// A polyline through `(x, y)` points.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    /// Legend entry; the series is left out of the legend when `None`.
    pub label: Option<String>,
    /// Points in data units.
    pub points: Vec<(f64, f64)>,
    /// Line colour; taken from [`PALETTE`] when `None`.
    pub color: Option<RGBColor>,
    /// Stroke width in pixels.
    pub width: u32,
}

impl Series {
    /// Set the legend entry.
    pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = Some(label.into());
        self
    }

    /// Set the line colour.
    pub fn color(&mut self, color: RGBColor) -> &mut Self {
        self.color = Some(color);
        self
    }

    /// Set the stroke width.
    pub fn width(&mut self, width: u32) -> &mut Self {
        self.width = width;
        self
    }
}

/// A shaded horizontal span across the whole chart width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    /// Lower edge in data units.
    pub low: f64,
    /// Upper edge in data units.
    pub high: f64,
    /// Fill colour.
    pub color: RGBColor,
    /// Fill opacity between 0 and 1.
    pub opacity: f64,
}

/// Orientation and position of a reference line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reference {
    /// Line at constant `y`.
    Horizontal(f64),
    /// Line at constant `x`.
    Vertical(f64),
}

/// A full-width or full-height reference line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefLine {
    /// Where the line sits.
    pub position: Reference,
    /// Line colour.
    pub color: RGBColor,
}

/// A filled histogram bar standing on `y = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    /// Left edge in data units.
    pub left: f64,
    /// Right edge in data units.
    pub right: f64,
    /// Bar height in data units.
    pub height: f64,
    /// Fill colour.
    pub color: RGBColor,
    /// Fill opacity between 0 and 1.
    pub opacity: f64,
}

/// Everything needed to draw one chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    /// Caption above the plot area.
    pub title: Option<String>,
    /// Horizontal axis.
    pub x: Axis,
    /// Vertical axis.
    pub y: Axis,
    /// Line series in drawing order.
    pub series: Vec<Series>,
    /// Shaded horizontal spans, drawn beneath the series.
    pub bands: Vec<Band>,
    /// Reference lines, drawn above the series.
    pub lines: Vec<RefLine>,
    /// Histogram bars, drawn beneath the series.
    pub bars: Vec<Bar>,
    /// Whether to draw grid lines.
    pub grid: bool,
    /// Canvas size in pixels.
    pub size: (u32, u32),
}

impl Figure {
    /// Create an empty linear chart with the given axis descriptions.
    #[must_use]
    pub fn new(x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: None,
            x: Axis::new(x_label),
            y: Axis::new(y_label),
            series: Vec::new(),
            bands: Vec::new(),
            lines: Vec::new(),
            bars: Vec::new(),
            grid: true,
            size: (800, 600),
        }
    }

    /// Set the caption.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Use a logarithmic horizontal axis.
    #[must_use]
    pub fn log_x(mut self) -> Self {
        self.x.scale = Scale::Log;
        self
    }

    /// Use a logarithmic vertical axis.
    #[must_use]
    pub fn log_y(mut self) -> Self {
        self.y.scale = Scale::Log;
        self
    }

    /// Fix the horizontal limits.
    #[must_use]
    pub fn x_range(mut self, low: f64, high: f64) -> Self {
        self.x.range = Some((low, high));
        self
    }

    /// Fix the vertical limits.
    #[must_use]
    pub fn y_range(mut self, low: f64, high: f64) -> Self {
        self.y.range = Some((low, high));
        self
    }

    /// Hide grid lines.
    #[must_use]
    pub fn without_grid(mut self) -> Self {
        self.grid = false;
        self
    }

    /// Add a line through `xs` against `ys` and return it for styling.
    pub fn plot(&mut self, xs: &Sweep, ys: &Sweep) -> &mut Series {
        self.series.push(Series {
            label: None,
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
            color: None,
            width: 2,
        });
        let last = self.series.len() - 1;
        &mut self.series[last]
    }

    /// Shade the horizontal span between `low` and `high`.
    pub fn band(&mut self, low: f64, high: f64, color: RGBColor, opacity: f64) -> &mut Self {
        self.bands.push(Band {
            low,
            high,
            color,
            opacity,
        });
        self
    }

    /// Draw a horizontal reference line at `y`.
    pub fn hline(&mut self, y: f64, color: RGBColor) -> &mut Self {
        self.lines.push(RefLine {
            position: Reference::Horizontal(y),
            color,
        });
        self
    }

    /// Draw a vertical reference line at `x`.
    pub fn vline(&mut self, x: f64, color: RGBColor) -> &mut Self {
        self.lines.push(RefLine {
            position: Reference::Vertical(x),
            color,
        });
        self
    }

    /// Add a histogram bar.
    pub fn bar(&mut self, left: f64, right: f64, height: f64, color: RGBColor, opacity: f64) -> &mut Self {
        self.bars.push(Bar {
            left,
            right,
            height,
            color,
            opacity,
        });
        self
    }

    /// Horizontal limits on the drawing grid.
    #[must_use]
    pub fn x_bounds(&self) -> (f64, f64) {
        let series = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0));
        let bars = self.bars.iter().flat_map(|b| [b.left, b.right]);
        let lines = self.lines.iter().filter_map(|line| match line.position {
            Reference::Vertical(x) => Some(x),
            Reference::Horizontal(_) => None,
        });
        self.x.bounds(series.chain(bars).chain(lines))
    }

    /// Vertical limits on the drawing grid.
    #[must_use]
    pub fn y_bounds(&self) -> (f64, f64) {
        let series = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1));
        let bars = self.bars.iter().flat_map(|b| [0.0, b.height]);
        let bands = self.bands.iter().flat_map(|b| [b.low, b.high]);
        let lines = self.lines.iter().filter_map(|line| match line.position {
            Reference::Horizontal(y) => Some(y),
            Reference::Vertical(_) => None,
        });
        self.y.bounds(series.chain(bars).chain(bands).chain(lines))
    }

    /// Map a data point onto the drawing grid.
    fn project(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (self.x.scale.project(x), self.y.scale.project(y))
    }
}

/// Render `figure` to `path`; `.svg` and `.png` are supported.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedFormat`] for other extensions and
/// [`RenderError::Draw`] when drawing or writing the file fails.
pub fn save(figure: &Figure, path: &Path) -> Result<(), RenderError> {
    let failed = |message: String| RenderError::Draw {
        path: path.to_path_buf(),
        message,
    };
    match path.extension().and_then(OsStr::to_str) {
        Some("svg") => {
            let root = SVGBackend::new(path, figure.size).into_drawing_area();
            draw(&root, figure, Text::Drawn).map_err(|error| failed(error.to_string()))
        }
        Some("png") => {
            let root = BitMapBackend::new(path, figure.size).into_drawing_area();
            draw(&root, figure, Text::Omitted).map_err(|error| failed(error.to_string()))
        }
        _ => Err(RenderError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Whether a backend can render captions, tick labels and legends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Text {
    /// Every text element is drawn.
    Drawn,
    /// No text element is drawn; the mesh is replaced by a plain grid.
    Omitted,
}

/// Grid divisions drawn on charts without text.
const PLAIN_GRID_DIVISIONS: u32 = 10;

/// Frame and evenly spaced grid lines over `(x0, x1) × (y0, y1)`, drawn
/// without touching the font machinery.
fn plain_grid(figure: &Figure, (x0, x1): (f64, f64), (y0, y1): (f64, f64)) -> Vec<PathElement<(f64, f64)>> {
    let frame = PathElement::new(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)], BLACK);
    if !figure.grid {
        return vec![frame];
    }
    let light = BLACK.mix(0.1);
    let steps = f64::from(PLAIN_GRID_DIVISIONS);
    let mut lines = Vec::new();
    for step in 1..PLAIN_GRID_DIVISIONS {
        let x = x0 + (x1 - x0) * f64::from(step) / steps;
        let y = y0 + (y1 - y0) * f64::from(step) / steps;
        lines.push(PathElement::new(vec![(x, y0), (x, y1)], light));
        lines.push(PathElement::new(vec![(x0, y), (x1, y)], light));
    }
    lines.push(frame);
    lines
}

/// Draw `figure` onto `root`.
fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    text: Text,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let (x0, x1) = figure.x_bounds();
    let (y0, y1) = figure.y_bounds();

    let mut builder = ChartBuilder::on(root);
    builder.margin(16);
    if text == Text::Drawn {
        builder.x_label_area_size(48).y_label_area_size(64);
        if let Some(title) = &figure.title {
            builder.caption(title, ("sans-serif", 18));
        }
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    if text == Text::Drawn {
        let x_ticks = |position: &f64| figure.x.scale.tick_label(*position);
        let y_ticks = |position: &f64| figure.y.scale.tick_label(*position);
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(figure.x.label.as_str())
            .y_desc(figure.y.label.as_str());
        if figure.x.scale == Scale::Log {
            mesh.x_label_formatter(&x_ticks);
        }
        if figure.y.scale == Scale::Log {
            mesh.y_label_formatter(&y_ticks);
        }
        if !figure.grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;
    } else {
        chart.draw_series(plain_grid(figure, (x0, x1), (y0, y1)))?;
    }

    for band in &figure.bands {
        let low = figure.y.scale.project(band.low);
        let high = figure.y.scale.project(band.high);
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x0, low), (x1, high)],
            band.color.mix(band.opacity).filled(),
        )))?;
    }

    for bar in &figure.bars {
        let corners = [
            figure.project((bar.left, 0.0)),
            figure.project((bar.right, bar.height)),
        ];
        chart.draw_series(std::iter::once(Rectangle::new(
            corners,
            bar.color.mix(bar.opacity).filled(),
        )))?;
    }

    for (index, series) in figure.series.iter().enumerate() {
        let color = series.color.unwrap_or(PALETTE[index % PALETTE.len()]);
        let style = color.stroke_width(series.width);
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|&point| figure.project(point))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        let drawn = chart.draw_series(LineSeries::new(points, style))?;
        if let (Text::Drawn, Some(label)) = (text, &series.label) {
            drawn
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }
    }

    for line in &figure.lines {
        let points = match line.position {
            Reference::Horizontal(y) => {
                let y = figure.y.scale.project(y);
                vec![(x0, y), (x1, y)]
            }
            Reference::Vertical(x) => {
                let x = figure.x.scale.project(x);
                vec![(x, y0), (x, y1)]
            }
        };
        chart.draw_series(LineSeries::new(points, line.color.stroke_width(1)))?;
    }

    if text == Text::Drawn && figure.series.iter().any(|series| series.label.is_some()) {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::linspace;

    #[test]
    fn bounds_pad_the_content() {
        let mut figure = Figure::new("x", "y");
        figure.plot(&linspace(0.0, 10.0, 11), &linspace(0.0, 100.0, 11));
        let (x0, x1) = figure.x_bounds();
        let (y0, y1) = figure.y_bounds();
        assert!((x0 + 0.5).abs() < 1.0e-12 && (x1 - 10.5).abs() < 1.0e-12);
        assert!((y0 + 5.0).abs() < 1.0e-12 && (y1 - 105.0).abs() < 1.0e-12);
    }

    #[test]
    fn log_axes_work_in_decades() {
        let mut figure = Figure::new("N", "S").log_x().log_y().x_range(1.0e3, 1.0e9);
        figure.plot(&linspace(1.0e3, 1.0e9, 3), &linspace(10.0, 1000.0, 3));
        let (x0, x1) = figure.x_bounds();
        assert!((x0 - 3.0).abs() < 1.0e-12 && (x1 - 9.0).abs() < 1.0e-12);
        assert!(figure.y_bounds().0 < 1.0);
    }

    #[test]
    fn empty_and_flat_content_still_has_extent() {
        let figure = Figure::new("x", "y");
        assert_eq!(figure.x_bounds(), (0.0, 1.0));

        let mut flat = Figure::new("x", "y");
        flat.hline(2.0, BLACK);
        assert_eq!(flat.y_bounds(), (1.5, 2.5));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let figure = Figure::new("x", "y");
        let error = save(&figure, Path::new("chart.pdf")).expect_err("pdf has no backend");
        assert!(matches!(error, RenderError::UnsupportedFormat(_)));
    }

    #[test]
    fn svg_is_written() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("chart.svg");
        let mut figure = Figure::new("x", "y").title("demo");
        figure.plot(&linspace(0.0, 1.0, 5), &linspace(1.0, 2.0, 5)).label("line");
        figure.band(1.2, 1.4, RED, 0.18);
        save(&figure, &path).expect("svg renders");
        let text = std::fs::read_to_string(&path).expect("svg readable");
        assert!(text.contains("<svg"));
    }

    #[test]
    fn png_is_written_without_text() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("chart.png");
        let mut figure = Figure::new("x", "y").title("demo").log_x();
        figure.plot(&linspace(1.0, 100.0, 5), &linspace(1.0, 2.0, 5)).label("line");
        figure.band(1.2, 1.4, RED, 0.18);
        figure.bar(10.0, 20.0, 1.5, GREEN, 0.09);
        figure.vline(50.0, BLUE);
        save(&figure, &path).expect("png renders");
        let bytes = std::fs::read(&path).expect("png readable");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn plain_grid_has_a_frame_and_divisions() {
        let figure = Figure::new("x", "y");
        assert_eq!(plain_grid(&figure, (0.0, 1.0), (0.0, 1.0)).len(), 19);
        assert_eq!(plain_grid(&figure.without_grid(), (0.0, 1.0), (0.0, 1.0)).len(), 1);
    }
}
