//! Fender performance curves: reaction force and absorbed energy against
//! deflection, smoothed through the manufacturers' tabulated points.

use std::path::Path;

use csv::ReaderBuilder;
use plotters::style::{RGBColor, BLUE, CYAN, GREEN, MAGENTA, RED, YELLOW};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure};
use crate::sweep::{linspace, Sweep};

/// Artifact holding every curve.
pub const ARTIFACT: &str = "fpc-w-cf.svg";

/// Line colours of the reaction curves.
const REACTION_COLORS: [RGBColor; 3] = [MAGENTA, BLUE, CYAN];
/// Line colours of the energy curves.
const ENERGY_COLORS: [RGBColor; 3] = [GREEN, RED, YELLOW];

/// Curve files and chart limits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FenderParams {
    /// Reaction curve names; each is read from `<name>.csv` (deflection %, kN).
    pub reaction_curves: Vec<String>,
    /// Energy curve names; each is read from `<name>.csv` (deflection %, kN·m).
    pub energy_curves: Vec<String>,
    /// Divisor taking kN to MN and kN·m to MJ.
    pub scale: f64,
    /// Points on each smoothed curve.
    pub points: usize,
    /// Upper deflection limit of the chart (%).
    pub deflection_max: f64,
    /// Upper force and energy limit of the chart.
    pub value_max: f64,
}

impl Default for FenderParams {
    fn default() -> Self {
        let names = |names: [&str; 3]| names.iter().map(ToString::to_string).collect();
        Self {
            reaction_curves: names(["ABFRVD", "FPFRVD", "CELRVD"]),
            energy_curves: names(["ABFEVD", "FPFEVD", "CELEVD"]),
            scale: 1e3,
            points: 100,
            deflection_max: 70.0,
            value_max: 5.5,
        }
    }
}

impl Parameters for FenderParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("scale", self.scale)
    }
}

/// Interpolating cubic spline with not-a-knot end conditions: the third
/// derivative is continuous across the second and the second-to-last knots.
///
/// Three points give the interpolating parabola and two give a straight line.
#[derive(Clone, Debug, PartialEq)]
pub struct Spline {
    /// Knot abscissae, ascending.
    x: Vec<f64>,
    /// Knot ordinates.
    y: Vec<f64>,
    /// Second derivative at each knot.
    curvature: Vec<f64>,
}

impl Spline {
    /// Fit through `points`, which are sorted by abscissa first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MalformedOption`] for fewer than two points
    /// or repeated abscissae.
    ///
    /// # Examples
    /// ```
    /// use offshorex::fenders::Spline;
    ///
    /// let cube = |x: f64| x.powi(3);
    /// let points: Vec<_> = [0.0, 1.0, 2.0, 4.0].iter().map(|&x| (x, cube(x))).collect();
    /// let spline = Spline::not_a_knot(&points).expect("valid curve");
    /// assert!((spline.value(3.0) - 27.0).abs() < 1.0e-9);
    /// ```
    pub fn not_a_knot(points: &[(f64, f64)]) -> Result<Self, ConfigurationError> {
        let mut points = points.to_vec();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (x, y): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        let n = x.len();
        if n < 2 {
            return Err(ConfigurationError::MalformedOption(
                "a curve needs at least two points".to_string(),
            ));
        }
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        if h.iter().any(|&step| step <= 0.0) {
            return Err(ConfigurationError::MalformedOption(
                "curve deflections must be distinct".to_string(),
            ));
        }
        let slope = |i: usize| (y[i + 1] - y[i]) / h[i];

        let curvature = match n {
            2 => vec![0.0; 2],
            3 => vec![2.0 * (slope(1) - slope(0)) / (h[0] + h[1]); 3],
            _ => {
                let interior = n - 2;
                let mut sub = vec![0.0; interior];
                let mut diag = vec![0.0; interior];
                let mut sup = vec![0.0; interior];
                let mut rhs = vec![0.0; interior];
                for row in 0..interior {
                    let i = row + 1;
                    sub[row] = h[i - 1];
                    diag[row] = 2.0 * (h[i - 1] + h[i]);
                    sup[row] = h[i];
                    rhs[row] = 6.0 * (slope(i) - slope(i - 1));
                }
                // The end curvatures are eliminated through the not-a-knot
                // conditions, which changes the first and last rows only.
                let (a, b) = (h[0], h[1]);
                diag[0] = (a + b) * (a + 2.0 * b) / b;
                sup[0] = (b * b - a * a) / b;
                let (a, b) = (h[n - 3], h[n - 2]);
                sub[interior - 1] = (a * a - b * b) / a;
                diag[interior - 1] = (a + b) * (2.0 * a + b) / a;

                let mut curvature = vec![0.0; n];
                curvature[1..=interior].copy_from_slice(&thomas_solve(&sub, &diag, &sup, &rhs));
                curvature[0] = ((h[0] + h[1]) * curvature[1] - h[0] * curvature[2]) / h[1];
                curvature[n - 1] =
                    ((h[n - 3] + h[n - 2]) * curvature[n - 2] - h[n - 2] * curvature[n - 3]) / h[n - 3];
                curvature
            }
        };
        Ok(Self { x, y, curvature })
    }

    /// Spline value at `at`; outside the knots the end cubic is extended.
    #[must_use]
    pub fn value(&self, at: f64) -> f64 {
        let last = self.x.len() - 2;
        let i = self.x.partition_point(|&knot| knot <= at).saturating_sub(1).min(last);
        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - at) / h;
        let b = (at - self.x[i]) / h;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a.powi(3) - a) * self.curvature[i] + (b.powi(3) - b) * self.curvature[i + 1]) * h.powi(2)
                / 6.0
    }

    /// Largest knot abscissa.
    #[must_use]
    pub fn x_max(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    /// Evaluate at every value of `x`.
    #[must_use]
    pub fn sample(&self, x: &Sweep) -> Sweep {
        x.mapv(|x| self.value(x))
    }
}

/// Thomas algorithm for a tridiagonal system of at least one row.
fn thomas_solve(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = rhs.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];
    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let den = diag[i] - sub[i] * c[i - 1];
        c[i] = sup[i] / den;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / den;
    }
    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }
    x
}

/// Read a headerless two-column curve and scale its second column down by `scale`.
///
/// # Errors
///
/// Returns [`CalcError::Csv`] when the file is missing or a row is not two numbers.
pub fn read_curve(path: &Path, scale: f64) -> Result<Vec<(f64, f64)>, CalcError> {
    let mut reader = ReaderBuilder::new().has_headers(false).from_path(path)?;
    let mut points = Vec::new();
    for row in reader.deserialize() {
        let (deflection, value): (f64, f64) = row?;
        points.push((deflection, value / scale));
    }
    debug!(curve = %path.display(), points = points.len(), "fender curve read");
    Ok(points)
}

/// Smooth and plot the curves `names`, read from `data_dir`.
fn plot_curves(
    figure: &mut Figure,
    params: &FenderParams,
    data_dir: &Path,
    names: &[String],
    colors: &[RGBColor],
) -> Result<(), CalcError> {
    for (index, name) in names.iter().enumerate() {
        let points = read_curve(&data_dir.join(format!("{name}.csv")), params.scale)?;
        let spline = Spline::not_a_knot(&points)?;
        let x = linspace(0.0, spline.x_max(), params.points);
        figure
            .plot(&x, &spline.sample(&x))
            .label(name.as_str())
            .color(colors[index % colors.len()])
            .width(2);
    }
    Ok(())
}

/// Reaction and energy curves on shared axes.
///
/// # Errors
///
/// Returns [`CalcError::Csv`] for unreadable curve files and
/// [`CalcError::Configuration`] for curves that cannot be smoothed.
pub fn figure(params: &FenderParams, data_dir: &Path) -> Result<Figure, CalcError> {
    let mut figure = Figure::new(
        "Deflection, D (%)",
        "Reaction force, R (MN); Energy absorption, E (MJ)",
    )
    .x_range(0.0, params.deflection_max)
    .y_range(0.0, params.value_max);
    plot_curves(&mut figure, params, data_dir, &params.reaction_curves, &REACTION_COLORS)?;
    plot_curves(&mut figure, params, data_dir, &params.energy_curves, &ENERGY_COLORS)?;
    Ok(figure)
}

/// Draw the fender performance chart from curves in `data_dir`.
///
/// # Errors
///
/// Returns [`CalcError::Csv`] for unreadable curve files, and
/// [`CalcError::Render`] when the chart cannot be written.
pub fn run(params: &FenderParams, data_dir: &Path, out_dir: &Path) -> Result<Outcome, CalcError> {
    let figure = figure(params, data_dir)?;
    let path = artifact(out_dir, ARTIFACT);
    save(&figure, &path)?;
    record(&path);
    Ok(Outcome::written(vec![path]))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn spline_passes_through_knots() {
        let points = [(0.0, 0.0), (10.0, 1.0), (25.0, 1.5), (40.0, 4.0), (55.0, 2.0)];
        let spline = Spline::not_a_knot(&points).expect("valid curve");
        for (x, y) in points {
            assert_relative_eq!(spline.value(x), y, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn spline_reproduces_a_cubic_on_uneven_knots() {
        let cubic = |x: f64| x.powi(3) - 2.0 * x + 1.0;
        let points: Vec<_> = [0.0, 1.0, 2.5, 3.0, 4.0].iter().map(|&x| (x, cubic(x))).collect();
        let spline = Spline::not_a_knot(&points).expect("valid curve");
        for x in [0.5, 1.7, 2.8, 3.7] {
            assert_relative_eq!(spline.value(x), cubic(x), max_relative = 1.0e-10);
        }
    }

    #[test]
    fn three_points_give_the_parabola() {
        let spline = Spline::not_a_knot(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]).expect("valid curve");
        assert_relative_eq!(spline.value(0.5), 0.75, epsilon = 1.0e-12);
    }

    #[test]
    fn two_points_give_a_straight_line() {
        let spline = Spline::not_a_knot(&[(0.0, 1.0), (2.0, 5.0)]).expect("valid curve");
        assert_relative_eq!(spline.value(0.5), 2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn single_point_is_rejected() {
        assert!(Spline::not_a_knot(&[(1.0, 1.0)]).is_err());
    }

    #[test]
    fn curves_are_read_in_megaunits() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("ABFRVD.csv");
        fs::write(&path, "0,0\n30,1200\n60,2500\n").expect("curve written");
        let points = read_curve(&path, 1e3).expect("curve parsed");
        assert_eq!(points, vec![(0.0, 0.0), (30.0, 1.2), (60.0, 2.5)]);
    }

    #[test]
    fn missing_curve_is_an_error() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let result = figure(&FenderParams::default(), dir.path());
        assert!(matches!(result, Err(CalcError::Csv(_))));
    }
}
