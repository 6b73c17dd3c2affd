//! Probability of meeting the design wave during a weather-exposed operation
//! such as piling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure};
use crate::sweep::{arange, Sweep};

/// Artifact written by [`run`].
pub const ARTIFACT: &str = "stormsafety.svg";

/// Exposure durations and the return period sweep; times in years.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StormSafetyParams {
    /// Exposure durations `L`.
    pub exposures: Vec<f64>,
    /// Legend label per exposure.
    pub labels: Vec<String>,
    /// First return period.
    pub period_start: f64,
    /// Return period at which the sweep stops, exclusive.
    pub period_stop: f64,
    /// Return period increment.
    pub period_step: f64,
}

impl Default for StormSafetyParams {
    fn default() -> Self {
        Self {
            exposures: vec![0.027, 0.083, 0.167, 0.250, 0.333, 0.500],
            labels: ["10 day", "1 month", "2 month", "3 month", "4 month", "6 month"]
                .map(String::from)
                .to_vec(),
            period_start: 1.0,
            period_stop: 50.0,
            period_step: 0.1,
        }
    }
}

impl Parameters for StormSafetyParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("period_start", self.period_start)?;
        positive("period_step", self.period_step)
    }
}

/// Encounter probability `p = (1 - exp(-L/T)) · 100` in percent.
#[must_use]
pub fn encounter_probability(exposure: f64, periods: &Sweep) -> Sweep {
    periods.mapv(|period| (1.0 - (-exposure / period).exp()) * 100.0)
}

/// Encounter probability against return period on a log axis.
#[must_use]
pub fn figure(params: &StormSafetyParams) -> Figure {
    let periods = arange(params.period_start, params.period_stop, params.period_step);
    let mut figure = Figure::new(
        "Return period, T (years)",
        "Probability of encountering design wave, p (%)",
    )
    .log_x();
    for (index, &exposure) in params.exposures.iter().enumerate() {
        let label = params
            .labels
            .get(index)
            .map_or_else(|| format!("{exposure} yr"), Clone::clone);
        figure
            .plot(&periods, &encounter_probability(exposure, &periods))
            .label(format!("{label} piling"));
    }
    figure
}

/// Draw the encounter probabilities.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run(params: &StormSafetyParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    let path = artifact(out_dir, ARTIFACT);
    save(&figure(params), &path)?;
    record(&path);
    Ok(Outcome::written(vec![path]))
}
