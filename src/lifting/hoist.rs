//! Minimum off-board hoisting velocity for lifts off a supply vessel:
//! API Spec 2C, EN 13852-1 and the IOGP S-618 revision of API Spec 2C.

use std::path::Path;

use plotters::style::{MAGENTA, RED};
use serde::{Deserialize, Serialize};

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure};
use crate::sweep::{arange, Sweep};

/// Artifact comparing API Spec 2C with EN 13852-1.
pub const ARTIFACT: &str = "vhmin.svg";
/// Artifact comparing API Spec 2C with IOGP S-618 against EN 13852-1.
pub const IOGP_ARTIFACT: &str = "vhmin_iogp.svg";

/// Feet to metres, as written in API Spec 2C.
const FOOT: f64 = 0.3048;
/// Metres to feet, as written in IOGP S-618.
const FEET_PER_METRE: f64 = 3.2808;

/// Sea state sweep and crane reeving inputs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HoistParams {
    /// Lowest significant wave height (m).
    pub wave_height_start: f64,
    /// Significant wave height at which the sweep stops, exclusive (m).
    pub wave_height_stop: f64,
    /// Wave height increment (m).
    pub wave_height_step: f64,
    /// Wave height from which the second API Spec 2C expression applies (m).
    pub api_threshold: f64,
    /// Hoisting factor `KH` for single fall reeving at rated capacity.
    pub single_fall: f64,
    /// Hoisting factor `KH` for multiple fall reeving at rated capacity.
    pub multiple_fall: f64,
    /// Boom tip velocity `Vc` (m/s).
    pub boom_tip_velocity: f64,
}

impl Default for HoistParams {
    fn default() -> Self {
        Self {
            wave_height_start: 0.0,
            wave_height_stop: 3.0,
            wave_height_step: 0.001,
            api_threshold: 1.83,
            single_fall: 0.50,
            multiple_fall: 0.28,
            boom_tip_velocity: 0.0,
        }
    }
}

impl Parameters for HoistParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("wave_height_step", self.wave_height_step)
    }
}

impl HoistParams {
    /// Significant wave heights.
    #[must_use]
    pub fn wave_heights(&self) -> Sweep {
        arange(self.wave_height_start, self.wave_height_stop, self.wave_height_step)
    }
}

/// API Spec 2C minimum hoisting velocity (m/s).
///
/// Below the threshold `v = 0.033·0.3048 + 0.098 Hs`; from it on
/// `v = 0.067 (Hs + 3.3·0.3048)`.
///
/// # Examples
/// ```
/// use offshorex::lifting::hoist::{api_2c, HoistParams};
///
/// let params = HoistParams::default();
/// assert!((api_2c(&params, 0.0) - 0.033 * 0.3048).abs() < 1e-12);
/// assert!((api_2c(&params, 1.83) - 0.067 * (1.83 + 3.3 * 0.3048)).abs() < 1e-12);
/// ```
#[must_use]
pub fn api_2c(params: &HoistParams, hs: f64) -> f64 {
    if hs < params.api_threshold {
        0.033 * FOOT + 0.098 * hs
    } else {
        0.067 * (hs + 3.3 * FOOT)
    }
}

/// EN 13852-1 hoisting velocity `VH = KH √(Vd² + Vc²)` with `Vd = 6 Hs / (Hs + 8)`.
#[must_use]
pub fn en_13852(params: &HoistParams, hs: &Sweep, kh: f64) -> Sweep {
    let vc = params.boom_tip_velocity;
    hs.mapv(|hs| {
        let vd = 6.0 * hs / (hs + 8.0);
        kh * vd.hypot(vc)
    })
}

/// API Spec 2C as amended by IOGP S-618, main hoist (m/s).
#[must_use]
pub fn iogp_main(hs: &Sweep) -> Sweep {
    hs.mapv(|hs| {
        let feet = hs * FEET_PER_METRE;
        (-0.0032 * feet.powi(2) + 0.179 * feet + 0.0499) / FEET_PER_METRE
    })
}

/// API Spec 2C as amended by IOGP S-618, auxiliary hoist (m/s).
#[must_use]
pub fn iogp_auxiliary(hs: &Sweep) -> Sweep {
    iogp_main(hs) * 1.79
}

/// Chart with the EN 13852-1 minimum hoisting velocity drawn alongside.
fn figure_with_en(params: &HoistParams, hs: &Sweep) -> Figure {
    let mut figure = Figure::new("Hsig (m)", "vh,min (m/s)")
        .title("API v. EN for (off-board) lift off supply vessel");
    figure
        .plot(hs, &en_13852(params, hs, params.single_fall))
        .label("EN 13852-1 (RC, SFR)");
    figure
        .plot(hs, &en_13852(params, hs, params.multiple_fall))
        .label("EN 13852-1 (RC, MFR)");
    figure
}

/// API Spec 2C against EN 13852-1; the API curve is drawn as its two branches.
#[must_use]
pub fn figure(params: &HoistParams) -> Figure {
    let hs = params.wave_heights();
    let mut figure = figure_with_en(params, &hs);
    let (low, high): (Vec<f64>, Vec<f64>) =
        hs.iter().copied().partition(|&h| h < params.api_threshold);
    let low = Sweep::from(low);
    let high = Sweep::from(high);
    figure
        .plot(&low, &low.mapv(|h| api_2c(params, h)))
        .label("API spec 2c")
        .color(RED);
    figure.plot(&high, &high.mapv(|h| api_2c(params, h))).color(RED);
    figure
}

/// API Spec 2C with IOGP S-618 against EN 13852-1.
#[must_use]
pub fn iogp_figure(params: &HoistParams) -> Figure {
    let hs = params.wave_heights();
    let mut figure = figure_with_en(params, &hs);
    figure
        .plot(&hs, &iogp_auxiliary(&hs))
        .label("API spec 2c + IOGP S-618 (Auxi)")
        .color(MAGENTA);
    figure
        .plot(&hs, &iogp_main(&hs))
        .label("API spec 2c + IOGP S-618 (Main)")
        .color(RED);
    figure
}

/// Save and record one hoisting chart.
fn draw(figure: &Figure, path: &Path) -> Result<Outcome, CalcError> {
    save(figure, path)?;
    record(path);
    Ok(Outcome::written(vec![path.to_path_buf()]))
}

/// Draw API Spec 2C against EN 13852-1.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run(params: &HoistParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    draw(&figure(params), &artifact(out_dir, ARTIFACT))
}

/// Draw API Spec 2C with IOGP S-618 against EN 13852-1.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run_iogp(params: &HoistParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    draw(&iogp_figure(params), &artifact(out_dir, IOGP_ARTIFACT))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn threshold_wave_height_uses_second_expression() {
        let params = HoistParams::default();
        assert_relative_eq!(api_2c(&params, 1.83), 0.067 * (1.83 + 3.3 * 0.3048));
        assert_relative_eq!(api_2c(&params, 1.829), 0.033 * 0.3048 + 0.098 * 1.829);
    }

    #[test]
    fn single_fall_is_faster_than_multiple_fall() {
        let params = HoistParams::default();
        let hs = Sweep::from(vec![2.0]);
        let single = en_13852(&params, &hs, params.single_fall)[0];
        let multiple = en_13852(&params, &hs, params.multiple_fall)[0];
        assert_relative_eq!(single, 0.5 * 1.2, max_relative = 1.0e-12);
        assert!(single > multiple);
    }

    #[test]
    fn iogp_auxiliary_scales_main() {
        let hs = Sweep::from(vec![0.0, 1.5]);
        let main = iogp_main(&hs);
        assert_relative_eq!(main[0], 0.0499 / 3.2808, max_relative = 1.0e-12);
        assert_relative_eq!(iogp_auxiliary(&hs)[1], 1.79 * main[1], max_relative = 1.0e-12);
    }

    #[test]
    fn api_branches_cover_the_whole_sweep() {
        let params = HoistParams::default();
        let figure = figure(&params);
        let api_points: usize = figure.series[2..].iter().map(|s| s.points.len()).sum();
        assert_eq!(api_points, params.wave_heights().len());
        assert_eq!(figure.series[0].points.len(), 3000);
    }
}
