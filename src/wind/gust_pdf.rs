//! Weibull probability densities of normalised wind speed and force for
//! extra-tropical storms.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure};
use crate::sweep::{span, Sweep};

/// Artifact written by [`run`].
pub const ARTIFACT: &str = "pdf.svg";

/// Shape and scale inputs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GustPdfParams {
    /// Weibull shape `k`.
    pub shape: f64,
    /// Mean/nominal speed scales.
    pub speed_scales: Vec<f64>,
    /// Mean/nominal force scales, paired with `speed_scales`.
    pub force_scales: Vec<f64>,
    /// Largest normalised speed.
    pub max_speed: f64,
}

impl Default for GustPdfParams {
    fn default() -> Self {
        Self {
            shape: 5.0,
            speed_scales: vec![1.0, 1.12],
            force_scales: vec![0.78, 0.94],
            max_speed: 2.5,
        }
    }
}

impl Parameters for GustPdfParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("shape", self.shape)?;
        positive("max_speed", self.max_speed)
    }
}

/// Weibull density `f(x) = (k/λ)(x/λ)^(k-1) exp(-(x/λ)^k)`.
///
/// # Examples
/// ```
/// use offshorex::sweep::linspace;
/// use offshorex::wind::gust_pdf::weibull_density;
///
/// let f = weibull_density(&linspace(0.0, 1.0, 2), 5.0, 1.0);
/// assert_eq!(f[0], 0.0);
/// assert!((f[1] - 5.0 * (-1.0_f64).exp()).abs() < 1e-12);
/// ```
#[must_use]
pub fn weibull_density(x: &Sweep, shape: f64, scale: f64) -> Sweep {
    x.mapv(|x| {
        let ratio = x / scale;
        (shape / scale) * ratio.powf(shape - 1.0) * (-ratio.powf(shape)).exp()
    })
}

/// Densities for every speed/force scale pair.
#[must_use]
pub fn figure(params: &GustPdfParams) -> Figure {
    let x = span(0.0, params.max_speed);
    let mut figure = Figure::new(
        "Normalised wind speed",
        "Probability density function (pdf) of wind speed",
    );
    for (&speed, &force) in params.speed_scales.iter().zip(&params.force_scales) {
        figure
            .plot(&x, &weibull_density(&x, params.shape, speed))
            .label(format!("Mean/nominal speed: {speed:.2}"));
        figure
            .plot(&x, &weibull_density(&x, params.shape, force))
            .label(format!("Mean/nominal force: {force:.2}"));
    }
    figure
}

/// Draw the densities.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run(params: &GustPdfParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    let path = artifact(out_dir, ARTIFACT);
    save(&figure(params), &path)?;
    record(&path);
    Ok(Outcome::written(vec![path]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::linspace;

    #[test]
    fn density_integrates_to_about_one() {
        let x = linspace(0.0, 3.0, 3001);
        let f = weibull_density(&x, 5.0, 1.12);
        let area: f64 = f.iter().sum::<f64>() * 0.001;
        assert!((area - 1.0).abs() < 1.0e-3);
    }

    #[test]
    fn figure_pairs_speed_and_force() {
        let figure = figure(&GustPdfParams::default());
        assert_eq!(figure.series.len(), 4);
        assert!(figure.series.iter().all(|series| series.points.len() == 50));
    }
}
