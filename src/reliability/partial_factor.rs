//! Partial action factor and the matching mean reserve strength ratio against
//! return period, per EP97-5050.

use std::path::Path;

use plotters::style::{BLUE, GREEN};
use serde::{Deserialize, Serialize};

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure};
use crate::sweep::{span, Sweep};

/// Return period marked for a 1e-4 annual failure probability (years).
pub const RETURN_PERIOD_LOW: f64 = 2000.0;
/// Return period marked for a 3e-5 annual failure probability (years).
pub const RETURN_PERIOD_HIGH: f64 = 33333.0;

/// What the return period is plotted against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ordinate {
    /// Partial action factor `γE`, selected by `--typ 1`.
    PartialFactor,
    /// Mean reserve strength ratio `Rm`, selected by `--typ 2`.
    ReserveStrength,
}

impl Ordinate {
    /// The ordinate selected by a `--typ` value, if any.
    #[must_use]
    pub fn from_typ(typ: u32) -> Option<Self> {
        match typ {
            1 => Some(Self::PartialFactor),
            2 => Some(Self::ReserveStrength),
            _ => None,
        }
    }

    /// Command-line selector for this ordinate.
    fn typ(self) -> u32 {
        match self {
            Self::PartialFactor => 1,
            Self::ReserveStrength => 2,
        }
    }

    /// Artifact name, `rel_pra-<typ>.svg`.
    #[must_use]
    pub fn artifact(self) -> String {
        format!("rel_pra-{}.svg", self.typ())
    }
}

/// Hazard curve coefficients of one region.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Region {
    /// Legend name.
    pub name: String,
    /// Scale `A` of the annual failure probability.
    pub scale: f64,
    /// Decay `E0` of the annual failure probability.
    pub decay: f64,
}

impl Region {
    /// Region with the given hazard curve constants.
    fn new(name: &str, scale: f64, decay: f64) -> Self {
        Self {
            name: name.to_string(),
            scale,
            decay,
        }
    }
}

/// Regions and uncertainties.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PartialFactorParams {
    /// Regions drawn, one curve each.
    pub regions: Vec<Region>,
    /// Load coefficient of variation `VE` (drag and inertia coefficients).
    pub load_cov: f64,
    /// Resistance coefficient of variation `VR`.
    pub resistance_cov: f64,
    /// Smallest mean reserve strength ratio.
    pub rsr_min: f64,
    /// Largest mean reserve strength ratio.
    pub rsr_max: f64,
    /// Ratio of `Rm` to `γE`.
    pub resistance_bias: f64,
}

impl Default for PartialFactorParams {
    fn default() -> Self {
        Self {
            regions: vec![
                Region::new("Australian NWS", 1.342, 0.2041),
                Region::new("Gulf of Mexico", 2.13, 0.187),
                Region::new("Northern North Sea", 11.9, 0.1411),
                Region::new("West Africa", 19.2351, 0.1322),
                Region::new("Central and Southern North Sea", 180.0, 0.102),
            ],
            load_cov: 0.07,
            resistance_cov: 0.05,
            rsr_min: 1.4,
            rsr_max: 2.4,
            resistance_bias: 1.37,
        }
    }
}

impl Parameters for PartialFactorParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("resistance_bias", self.resistance_bias)?;
        for region in &self.regions {
            positive("decay", region.decay)?;
        }
        Ok(())
    }
}

impl PartialFactorParams {
    /// Combined coefficient of variation `V = √(VE² + VR²)`.
    #[must_use]
    pub fn cov(&self) -> f64 {
        self.load_cov.hypot(self.resistance_cov)
    }

    /// Mean reserve strength ratios swept.
    #[must_use]
    pub fn reserve_strength(&self) -> Sweep {
        span(self.rsr_min, self.rsr_max)
    }

    /// Partial action factors `γE = Rm / 1.37` for each reserve strength ratio.
    #[must_use]
    pub fn partial_factor(&self, rsr: &Sweep) -> Sweep {
        rsr / self.resistance_bias
    }
}

/// Annual failure probability `Pf = A exp(−x/E0) exp((V x)² / (2 E0²))`.
///
/// # Examples
/// ```
/// use offshorex::reliability::partial_factor::{failure_probability, Region};
///
/// let region = Region { name: "flat".into(), scale: 1.0, decay: 1.0 };
/// assert_eq!(failure_probability(&region, 0.1, 0.0), 1.0);
/// ```
#[must_use]
pub fn failure_probability(region: &Region, cov: f64, x: f64) -> f64 {
    let e0 = region.decay;
    region.scale * (-x / e0).exp() * ((cov * x).powi(2) / (2.0 * e0.powi(2))).exp()
}

/// Return period `1 / Pf` for each reserve strength ratio (years).
#[must_use]
pub fn return_period(params: &PartialFactorParams, region: &Region, rsr: &Sweep) -> Sweep {
    let cov = params.cov();
    rsr.mapv(|x| 1.0 / failure_probability(region, cov, x))
}

/// Every region's curve against return period.
#[must_use]
pub fn figure(params: &PartialFactorParams, ordinate: Ordinate) -> Figure {
    let rsr = params.reserve_strength();
    let (label, y, (low, high)) = match ordinate {
        Ordinate::PartialFactor => (
            "Partial action factor, γe",
            params.partial_factor(&rsr),
            (1.02, 1.7),
        ),
        Ordinate::ReserveStrength => ("Reserve strength ratio mean, Rm", rsr.clone(), (1.4, 2.4)),
    };
    let mut figure = Figure::new("Return period (years)", label)
        .log_x()
        .y_range(low, high);
    for region in &params.regions {
        figure
            .plot(&return_period(params, region, &rsr), &y)
            .label(region.name.as_str())
            .width(2);
    }
    figure.vline(RETURN_PERIOD_LOW, GREEN);
    figure.vline(RETURN_PERIOD_HIGH, BLUE);
    figure
}

/// Draw the chart selected by `typ`.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run(params: &PartialFactorParams, typ: u32, out_dir: &Path) -> Result<Outcome, CalcError> {
    let Some(ordinate) = Ordinate::from_typ(typ) else {
        return Ok(Outcome::no_selection("rel-pra"));
    };
    let path = artifact(out_dir, &ordinate.artifact());
    save(&figure(params, ordinate), &path)?;
    record(&path);
    Ok(Outcome::written(vec![path]))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn return_period_grows_with_reserve_strength() {
        let params = PartialFactorParams::default();
        let rsr = params.reserve_strength();
        for region in &params.regions {
            let rp = return_period(&params, region, &rsr);
            assert_eq!(rp.len(), rsr.len());
            assert!(rp.windows(2).into_iter().all(|w| w[1] > w[0]));
        }
    }

    #[test]
    fn gulf_of_mexico_matches_hand_calculation() {
        let params = PartialFactorParams::default();
        let region = &params.regions[1];
        let cov = (0.07_f64.powi(2) + 0.05_f64.powi(2)).sqrt();
        let pf = 2.13 * (-1.85 / 0.187_f64).exp() * ((cov * 1.85).powi(2) / (2.0 * 0.187_f64.powi(2))).exp();
        assert_relative_eq!(failure_probability(region, params.cov(), 1.85), pf, max_relative = 1.0e-12);
    }

    #[test]
    fn partial_factor_is_reserve_strength_over_bias() {
        let params = PartialFactorParams::default();
        let gamma = params.partial_factor(&params.reserve_strength());
        assert_relative_eq!(gamma[0], 1.4 / 1.37, max_relative = 1.0e-12);
    }

    #[test]
    fn only_typ_one_and_two_select_a_chart() {
        assert_eq!(Ordinate::from_typ(1), Some(Ordinate::PartialFactor));
        assert_eq!(Ordinate::from_typ(2).map(Ordinate::artifact).as_deref(), Some("rel_pra-2.svg"));
        assert_eq!(Ordinate::from_typ(3), None);
    }

    #[test]
    fn chart_marks_both_return_periods() {
        let figure = figure(&PartialFactorParams::default(), Ordinate::ReserveStrength);
        assert_eq!(figure.series.len(), 5);
        assert_eq!(figure.lines.len(), 2);
        assert_eq!(figure.y.range, Some((1.4, 2.4)));
    }
}
