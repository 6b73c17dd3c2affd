//! Two-slope S-N curves to ISO 19902.
//!
//! A curve is `S = (N / 10^a)^(-1/m)`, with the first slope below the knee and
//! the second slope from the knee on.

use std::path::Path;

use plotters::style::{RGBColor, BLACK, BLUE, GREEN, MAGENTA, RED};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure, BROWN, DEEP_PINK, OLIVE, OLIVE_DRAB, ORANGE};
use crate::sweep::{logspace, Sweep};

/// Artifact for the full curve family.
pub const CATALOGUE_ARTIFACT: &str = "sncurves.svg";
/// Artifact for the tubular joint curves in air and seawater.
pub const TUBULAR_JOINT_ARTIFACT: &str = "sncurves-tj.svg";

/// A two-slope S-N curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnCurve {
    /// Legend name.
    pub name: &'static str,
    /// `log10` intercept of the first segment.
    pub a1: f64,
    /// Inverse slope of the first segment.
    pub m1: f64,
    /// `log10` intercept of the second segment.
    pub a2: f64,
    /// Inverse slope of the second segment.
    pub m2: f64,
    /// Cycle count at which the second segment takes over.
    pub knee: f64,
}

impl SnCurve {
    /// Curve with intercepts `a1`, `a2` and slopes `m1`, `m2` meeting at `knee` cycles.
    const fn new(name: &'static str, a1: f64, m1: f64, a2: f64, m2: f64, knee: f64) -> Self {
        Self {
            name,
            a1,
            m1,
            a2,
            m2,
            knee,
        }
    }

    /// Stress range for `n` cycles.
    ///
    /// # Examples
    /// ```
    /// use offshorex::fatigue::sn::CATALOGUE;
    ///
    /// let d = CATALOGUE[3];
    /// let at_knee = d.stress(1.0e6);
    /// assert!((at_knee - 10f64.powf((15.63 - 6.0) / 5.0)).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn stress(&self, n: f64) -> f64 {
        if n < self.knee {
            self.first_slope(n)
        } else {
            self.second_slope(n)
        }
    }

    /// Stress range on the first segment, ignoring the knee.
    #[must_use]
    pub fn first_slope(&self, n: f64) -> f64 {
        (n / 10f64.powf(self.a1)).powf(-1.0 / self.m1)
    }

    /// Stress range on the second segment, ignoring the knee.
    #[must_use]
    pub fn second_slope(&self, n: f64) -> f64 {
        (n / 10f64.powf(self.a2)).powf(-1.0 / self.m2)
    }

    /// Stress ranges for every cycle count.
    #[must_use]
    pub fn stresses(&self, cycles: &Sweep) -> Sweep {
        cycles.mapv(|n| self.stress(n))
    }

    /// Cycle counts for the two segments, split at the knee.
    #[must_use]
    pub fn segments(&self, range: &CycleRange) -> (Sweep, Sweep) {
        let knee = self.knee.clamp(range.start, range.end);
        (
            logspace(range.start, knee, range.points),
            logspace(knee, range.end, range.points),
        )
    }
}

/// ISO 19902 curves in seawater with cathodic protection.
pub const CATALOGUE: [SnCurve; 9] = [
    SnCurve::new("TJ curve", 12.18, 3.0, 16.13, 5.0, 1.8e6),
    SnCurve::new("B curve", 14.61, 4.0, 17.01, 5.0, 1.0e5),
    SnCurve::new("C curve", 13.23, 3.5, 16.47, 5.0, 4.68e5),
    SnCurve::new("D curve", 11.78, 3.0, 15.63, 5.0, 1.0e6),
    SnCurve::new("E curve", 11.62, 3.0, 15.37, 5.0, 1.0e6),
    SnCurve::new("F curve", 11.40, 3.0, 15.00, 5.0, 1.0e6),
    SnCurve::new("F2 curve", 11.23, 3.0, 14.71, 5.0, 1.0e6),
    SnCurve::new("G curve", 11.00, 3.0, 14.33, 5.0, 1.0e6),
    SnCurve::new("W1 curve", 10.57, 3.0, 13.62, 5.0, 1.0e6),
];

/// Line colours for [`CATALOGUE`], in order.
pub const CATALOGUE_COLORS: [RGBColor; 9] = [
    BLACK, MAGENTA, BLUE, ORANGE, GREEN, OLIVE, BROWN, DEEP_PINK, OLIVE_DRAB,
];

/// The tubular joint curve in air and in seawater with cathodic protection.
pub const TUBULAR_JOINT: [SnCurve; 2] = [
    SnCurve::new("TJ curve (air)", 12.48, 3.0, 16.13, 5.0, 1.0e7),
    SnCurve::new("TJ curve (seawater w/ C.P.)", 12.18, 3.0, 16.13, 5.0, 1.8e6),
];

/// Cycle range drawn for every curve.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CycleRange {
    /// Lowest cycle count.
    pub start: f64,
    /// Highest cycle count.
    pub end: f64,
    /// Samples per segment.
    pub points: usize,
}

impl Default for CycleRange {
    fn default() -> Self {
        Self {
            start: 1.0e3,
            end: 1.0e9,
            points: 200,
        }
    }
}

impl Parameters for CycleRange {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("start", self.start)?;
        if self.end <= self.start {
            return Err(ConfigurationError::out_of_range(
                "end",
                self.end,
                "must exceed start",
            ));
        }
        if self.points < 2 {
            return Err(ConfigurationError::out_of_range(
                "points",
                self.points as f64,
                "needs at least two samples",
            ));
        }
        Ok(())
    }
}

/// Log-log chart of `curves`, one colour per curve shared by both segments.
#[must_use]
pub fn figure(curves: &[SnCurve], colors: &[RGBColor], range: &CycleRange) -> Figure {
    let mut figure = Figure::new("Number of cycles, N", "Hotspot stress, σ (MPa)")
        .log_x()
        .log_y()
        .x_range(range.start, range.end);
    for (curve, &color) in curves.iter().zip(colors) {
        let (low, high) = curve.segments(range);
        // The low segment ends on the knee, which itself belongs to the second slope.
        figure
            .plot(&low, &low.mapv(|n| curve.first_slope(n)))
            .label(curve.name)
            .color(color)
            .width(1);
        figure.plot(&high, &curve.stresses(&high)).color(color).width(1);
    }
    figure
}

/// Plot `curves` in `colors` over `range` and save the chart to `path`.
fn draw(curves: &[SnCurve], colors: &[RGBColor], range: &CycleRange, path: &Path) -> Result<Outcome, CalcError> {
    debug!(curves = curves.len(), points = range.points, "s-n curves");
    save(&figure(curves, colors, range), path)?;
    record(path);
    Ok(Outcome::written(vec![path.to_path_buf()]))
}

/// Draw the full curve catalogue.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run_catalogue(range: &CycleRange, out_dir: &Path) -> Result<Outcome, CalcError> {
    draw(&CATALOGUE, &CATALOGUE_COLORS, range, &artifact(out_dir, CATALOGUE_ARTIFACT))
}

/// Draw the tubular joint curves in air and seawater.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run_tubular_joint(range: &CycleRange, out_dir: &Path) -> Result<Outcome, CalcError> {
    draw(&TUBULAR_JOINT, &[BLUE, RED], range, &artifact(out_dir, TUBULAR_JOINT_ARTIFACT))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn knee_belongs_to_the_second_slope() {
        let curve = TUBULAR_JOINT[1];
        let second = (1.8e6 / 10f64.powf(16.13)).powf(-1.0 / 5.0);
        assert_relative_eq!(curve.stress(1.8e6), second, max_relative = 1.0e-12);
        let first = (1.79e6 / 10f64.powf(12.18)).powf(-1.0 / 3.0);
        assert_relative_eq!(curve.stress(1.79e6), first, max_relative = 1.0e-12);
    }

    #[test]
    fn stress_falls_with_cycle_count() {
        let range = CycleRange::default();
        for curve in CATALOGUE.iter().chain(&TUBULAR_JOINT) {
            let (low, high) = curve.segments(&range);
            let stresses = curve.stresses(&low);
            assert_eq!(stresses.len(), low.len());
            assert!(stresses[0] > stresses[stresses.len() - 1]);
            assert!(curve.stress(high[0]) > curve.stress(high[high.len() - 1]));
        }
    }

    #[test]
    fn segments_meet_at_the_knee() {
        let (low, high) = CATALOGUE[1].segments(&CycleRange::default());
        assert_relative_eq!(low[low.len() - 1], 1.0e5, max_relative = 1.0e-12);
        assert_relative_eq!(high[0], 1.0e5, max_relative = 1.0e-12);
    }

    #[test]
    fn single_sample_range_is_rejected() {
        let range = CycleRange {
            points: 1,
            ..CycleRange::default()
        };
        assert!(range.validate().is_err());
    }
}
