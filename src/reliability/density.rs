//! Log-normal load and resistance densities and the safety margin between
//! them, per region and exposure level (ISO 19902).
//!
//! Each case samples both distributions, draws their normalised histograms
//! and overlays the analytical densities.

use std::f64::consts::PI;
use std::path::Path;

use plotters::style::{RGBColor, GREEN, RED};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, LogNormal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Parameters;
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure};
use crate::sweep::{linspace, Sweep};

/// Load and resistance statistics for one region and exposure level.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DensityCase {
    /// Region code.
    pub region: String,
    /// Exposure level, `L1` or `L2`.
    pub exposure: String,
    /// Mean load `Em` relative to the nominal load.
    pub load_mean: f64,
    /// Load coefficient of variation `Ve`.
    pub load_cov: f64,
    /// Mean reserve strength ratio `Rm`.
    pub resistance_mean: f64,
    /// Resistance coefficient of variation `Vr`.
    pub resistance_cov: f64,
}

impl DensityCase {
    /// Case from `(mean, cov)` pairs of load and resistance.
    fn new(region: &str, exposure: &str, load: (f64, f64), resistance: (f64, f64)) -> Self {
        Self {
            region: region.to_string(),
            exposure: exposure.to_string(),
            load_mean: load.0,
            load_cov: load.1,
            resistance_mean: resistance.0,
            resistance_cov: resistance.1,
        }
    }

    /// Artifact name, `pd_<region>_<exposure>.png`.
    #[must_use]
    pub fn artifact(&self) -> String {
        format!("pd_{}_{}.png", self.region, self.exposure)
    }
}

/// Sampling and chart inputs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DensityParams {
    /// Cases to draw, one chart each.
    pub cases: Vec<DensityCase>,
    /// Samples drawn from each distribution.
    pub samples: usize,
    /// Histogram bins.
    pub bins: usize,
    /// Points on each analytical density curve.
    pub curve_points: usize,
    /// Seed for reproducible sampling; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self {
            cases: vec![
                DensityCase::new("GoM", "L1", (0.79, 0.3298), (1.85, 0.05)),
                DensityCase::new("GoM", "L2", (0.79, 0.3298), (1.60, 0.05)),
                DensityCase::new("NNS", "L1", (0.81, 0.2768), (1.92, 0.05)),
                DensityCase::new("NNS", "L2", (0.81, 0.2768), (1.49, 0.05)),
                DensityCase::new("CNS", "L1", (0.84, 0.2266), (1.73, 0.05)),
                DensityCase::new("CNS", "L2", (0.84, 0.2266), (1.40, 0.05)),
                DensityCase::new("AUS", "L1", (0.78, 0.3396), (2.18, 0.05)),
                DensityCase::new("AUS", "L2", (0.78, 0.3396), (1.60, 0.05)),
            ],
            samples: 1000,
            bins: 100,
            curve_points: 10000,
            seed: None,
        }
    }
}

impl Parameters for DensityParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.samples == 0 || self.bins == 0 {
            return Err(ConfigurationError::MalformedOption(
                "samples and bins must be at least one".to_string(),
            ));
        }
        Ok(())
    }
}

/// Underlying normal parameters `(μ, σ)` of a log-normal with mean `mean` and
/// coefficient of variation `cov`.
///
/// # Examples
/// ```
/// use offshorex::reliability::density::log_normal_parameters;
///
/// let (mu, sigma) = log_normal_parameters(1.0, 0.0);
/// assert_eq!((mu, sigma), (0.0, 0.0));
/// ```
#[must_use]
pub fn log_normal_parameters(mean: f64, cov: f64) -> (f64, f64) {
    let spread = 1.0 + cov.powi(2);
    ((mean / spread.sqrt()).ln(), spread.ln().sqrt())
}

/// Log-normal density at each `x`.
#[must_use]
pub fn log_normal_density(x: &Sweep, mu: f64, sigma: f64) -> Sweep {
    x.mapv(|x| {
        (-(x.ln() - mu).powi(2) / (2.0 * sigma.powi(2))).exp() / (x * sigma * (2.0 * PI).sqrt())
    })
}

/// A normalised histogram.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// `bins + 1` bin edges.
    pub edges: Vec<f64>,
    /// Density per bin; the bars integrate to one.
    pub density: Vec<f64>,
}

/// Bin `samples` into `bins` equal bins between their extremes, as a density.
#[must_use]
pub fn histogram(samples: &[f64], bins: usize) -> Histogram {
    let low = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let high = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (low, high) = if high > low { (low, high) } else { (low - 0.5, low + 0.5) };
    let width = (high - low) / bins as f64;

    let mut counts = vec![0_usize; bins];
    for &sample in samples {
        // The top edge is closed, so the maximum falls in the last bin.
        let index = (((sample - low) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }
    let total = samples.len() as f64 * width;
    Histogram {
        edges: (0..=bins).map(|edge| low + edge as f64 * width).collect(),
        density: counts.into_iter().map(|count| count as f64 / total).collect(),
    }
}

/// Draw `count` log-normal samples with mean `mean` and coefficient of variation `cov`.
fn sample(rng: &mut StdRng, mean: f64, cov: f64, count: usize) -> Result<Vec<f64>, ConfigurationError> {
    let (mu, sigma) = log_normal_parameters(mean, cov);
    let distribution = LogNormal::new(mu, sigma)
        .map_err(|_| ConfigurationError::out_of_range("cov", cov, "gives an invalid log-normal spread"))?;
    Ok(distribution.sample_iter(rng).take(count).collect())
}

/// Histogram bars and analytical density of one distribution, drawn in `color`.
fn overlay(
    figure: &mut Figure,
    rng: &mut StdRng,
    params: &DensityParams,
    (mean, cov): (f64, f64),
    color: RGBColor,
) -> Result<(), ConfigurationError> {
    let samples = sample(rng, mean, cov, params.samples)?;
    let bars = histogram(&samples, params.bins);
    for (edge, &height) in bars.edges.windows(2).zip(&bars.density) {
        figure.bar(edge[0], edge[1], height, color, 0.09);
    }
    let (mu, sigma) = log_normal_parameters(mean, cov);
    let x = linspace(bars.edges[0], bars.edges[params.bins], params.curve_points);
    figure.plot(&x, &log_normal_density(&x, mu, sigma)).color(color).width(1);
    figure.vline(mean, color);
    Ok(())
}

/// Chart for one case.
///
/// # Errors
///
/// Returns [`ConfigurationError::OutOfRange`] when a coefficient of variation
/// gives no valid log-normal distribution.
pub fn figure(params: &DensityParams, case: &DensityCase, rng: &mut StdRng) -> Result<Figure, ConfigurationError> {
    let mut figure = Figure::new(
        format!(
            "Load or resistance as times the nominal load, x, Emean({:.2}); x, Rmean({:.2})",
            case.load_mean, case.resistance_mean
        ),
        "Probability density",
    )
    .title(format!("{} - {}", case.region, case.exposure))
    .x_range(0.25, 2.75)
    .y_range(0.0, 5.0);
    overlay(&mut figure, rng, params, (case.load_mean, case.load_cov), RED)?;
    overlay(
        &mut figure,
        rng,
        params,
        (case.resistance_mean, case.resistance_cov),
        GREEN,
    )?;
    Ok(figure)
}

/// Draw every case.
///
/// # Errors
///
/// Returns [`CalcError::Configuration`] for an invalid distribution and
/// [`CalcError::Render`] when a chart cannot be written.
pub fn run(params: &DensityParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    debug!(cases = params.cases.len(), seed = ?params.seed, "reliability densities");
    let mut written = Vec::with_capacity(params.cases.len());
    for case in &params.cases {
        let path = artifact(out_dir, &case.artifact());
        save(&figure(params, case, &mut rng)?, &path)?;
        record(&path);
        written.push(path);
    }
    Ok(Outcome::written(written))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn parameters_reproduce_the_mean() {
        let (mu, sigma) = log_normal_parameters(1.85, 0.05);
        assert_relative_eq!((mu + sigma.powi(2) / 2.0).exp(), 1.85, max_relative = 1.0e-12);
    }

    #[test]
    fn histogram_integrates_to_one() {
        let samples = [0.5, 0.7, 0.7, 1.0, 1.5, 2.0];
        let bars = histogram(&samples, 3);
        assert_eq!(bars.edges.len(), 4);
        let width = bars.edges[1] - bars.edges[0];
        let area: f64 = bars.density.iter().map(|d| d * width).sum();
        assert_relative_eq!(area, 1.0, max_relative = 1.0e-12);
        assert_relative_eq!(bars.edges[3], 2.0, max_relative = 1.0e-12);
    }

    #[test]
    fn seeded_charts_are_reproducible() {
        let params = DensityParams::default();
        let case = &params.cases[0];
        let first = figure(&params, case, &mut StdRng::seed_from_u64(7)).expect("valid case");
        let second = figure(&params, case, &mut StdRng::seed_from_u64(7)).expect("valid case");
        assert_eq!(first, second);
        assert_eq!(first.bars.len(), 200);
        assert_eq!(first.series[0].points.len(), 10000);
    }

    #[test]
    fn density_peaks_near_the_mode() {
        let (mu, sigma) = log_normal_parameters(0.79, 0.3298);
        let mode = (mu - sigma.powi(2)).exp();
        let x = Sweep::from(vec![mode * 0.9, mode, mode * 1.1]);
        let f = log_normal_density(&x, mu, sigma);
        assert!(f[1] > f[0] && f[1] > f[2]);
    }

    #[test]
    fn artifact_names_follow_region_and_exposure() {
        assert_eq!(DensityParams::default().cases[7].artifact(), "pd_AUS_L2.png");
    }

    #[test]
    fn run_writes_one_bitmap_per_case() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let params = DensityParams {
            seed: Some(1),
            ..DensityParams::default()
        };
        let outcome = run(&params, dir.path()).expect("charts render");
        assert_eq!(outcome.artifacts().len(), 8);
        for (path, case) in outcome.artifacts().iter().zip(&params.cases) {
            assert!(path.ends_with(case.artifact()));
            assert!(std::fs::read(path).expect("chart readable").starts_with(b"\x89PNG"));
        }
    }
}
