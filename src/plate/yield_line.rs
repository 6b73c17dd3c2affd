//! Web plate sizing by yield line theory: collapse load against plate
//! thickness for a range of steel grades.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure};
use crate::sweep::{arange, Sweep};

/// How the plate edges are restrained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeSupport {
    /// Fixed edges.
    Fixed,
    /// Simply supported edges.
    Supported,
}

impl EdgeSupport {
    /// Artifact name for this edge condition.
    #[must_use]
    pub fn artifact(self) -> &'static str {
        match self {
            Self::Fixed => "Pvt_fixed_ends.svg",
            Self::Supported => "Pvt_supported_ends.svg",
        }
    }

    /// Chart caption.
    fn title(self) -> &'static str {
        match self {
            Self::Fixed => "Min.web plate size for fixed edges (yield line theory)",
            Self::Supported => "Min.web plate size for supported edges (yield line theory)",
        }
    }
}

/// Plate geometry in mm and steel grades in MPa.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct YieldLineParams {
    /// Thinnest plate.
    pub thickness_start: f64,
    /// Thickness at which the sweep stops, exclusive.
    pub thickness_stop: f64,
    /// Thickness increment.
    pub thickness_step: f64,
    /// Dimension `b`.
    pub b: f64,
    /// Dimension `c`.
    pub c: f64,
    /// Dimension `e`.
    pub e: f64,
    /// Loaded length `L`.
    pub length: f64,
    /// Yield strengths, one curve each.
    pub yield_strengths: Vec<f64>,
}

impl Default for YieldLineParams {
    fn default() -> Self {
        Self {
            thickness_start: 4.0,
            thickness_stop: 20.0,
            thickness_step: 0.1,
            b: 64.0,
            c: 0.0,
            e: 64.0,
            length: 110.0,
            yield_strengths: vec![240.0, 275.0, 320.0, 345.0, 355.0],
        }
    }
}

impl Parameters for YieldLineParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("thickness_step", self.thickness_step)?;
        positive("b", self.b)?;
        positive("e", self.e)
    }
}

impl YieldLineParams {
    /// Plate thicknesses swept.
    #[must_use]
    pub fn thicknesses(&self) -> Sweep {
        arange(self.thickness_start, self.thickness_stop, self.thickness_step)
    }

    /// Bracketed geometry term of the collapse load for `support`.
    fn mechanism(&self, support: EdgeSupport) -> f64 {
        let Self { b, c, e, length, .. } = *self;
        match support {
            EdgeSupport::Fixed => 2.0 * b.powi(2) + 2.0 * e.powi(2) + c * b + length * e,
            EdgeSupport::Supported => 2.0 * b.powi(2) + e.powi(2) + c * b + length * e / 2.0,
        }
    }
}

/// Collapse load `Pu = Fy t² / (e b) · mechanism / 1e3` (kN) for each thickness.
#[must_use]
pub fn collapse_load(params: &YieldLineParams, support: EdgeSupport, fy: f64, t: &Sweep) -> Sweep {
    let mechanism = params.mechanism(support);
    t.mapv(|t| fy * t.powi(2) / (params.e * params.b) * mechanism / 1e3)
}

/// One curve per yield strength.
#[must_use]
pub fn figure(params: &YieldLineParams, support: EdgeSupport) -> Figure {
    let t = params.thicknesses();
    let mut figure = Figure::new("t (mm)", "Pu (kN)").title(format!(
        "{} (b: {:.0}mm, c: {:.0}mm, e: {:.0}mm, L: {:.0}mm)",
        support.title(),
        params.b,
        params.c,
        params.e,
        params.length
    ));
    for &fy in &params.yield_strengths {
        figure
            .plot(&t, &collapse_load(params, support, fy, &t))
            .label(format!("Fy = {fy:.0} MPa"));
    }
    figure
}

/// Draw the chart for the selected edge condition.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run(params: &YieldLineParams, support: Option<EdgeSupport>, out_dir: &Path) -> Result<Outcome, CalcError> {
    let Some(support) = support else {
        return Ok(Outcome::no_selection("yield-line"));
    };
    let path = artifact(out_dir, support.artifact());
    save(&figure(params, support), &path)?;
    record(&path);
    Ok(Outcome::written(vec![path]))
}
