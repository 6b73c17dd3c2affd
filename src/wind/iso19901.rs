//! Wind speed profiles to ISO 19901-1 for several gust averaging times.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure};
use crate::sweep::{span, Sweep};

/// Artifact written by [`run`].
pub const ARTIFACT: &str = "isowind.svg";

/// Profile inputs; heights in m, times in s.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct IsoWindParams {
    /// One-hour mean wind speed `U0` at the reference height (m/s). Required.
    pub speed: Option<f64>,
    /// Top of the profile (m).
    pub height: f64,
    /// Reference height `zr`.
    pub reference_height: f64,
    /// Reference averaging time `t0`.
    pub reference_time: f64,
    /// Gust averaging times, one curve each.
    pub averaging_times: Vec<f64>,
    /// Lowest height of the profile.
    pub base_height: f64,
}

impl Default for IsoWindParams {
    fn default() -> Self {
        Self {
            speed: None,
            height: 140.0,
            reference_height: 10.0,
            reference_time: 3600.0,
            averaging_times: vec![3.0, 5.0, 60.0, 600.0, 3600.0],
            base_height: 0.1,
        }
    }
}

impl Parameters for IsoWindParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        let speed = self
            .speed
            .ok_or_else(|| ConfigurationError::MissingOption("speed".to_string()))?;
        positive("speed", speed)?;
        positive("height", self.height)
    }
}

impl IsoWindParams {
    /// `U0`, or zero when [`Parameters::validate`] has not been run.
    fn mean_speed(&self) -> f64 {
        self.speed.unwrap_or_default()
    }
}

/// Turbulence intensity `Iu(z) = 0.06 (1 + 0.043 U0)(z/zr)^-0.22`.
#[must_use]
pub fn turbulence_intensity(params: &IsoWindParams, z: &Sweep) -> Sweep {
    let u0 = params.mean_speed();
    z.mapv(|z| 0.06 * (1.0 + 0.043 * u0) * (z / params.reference_height).powf(-0.22))
}

/// One-hour mean speed `U(z) = U0 (1 + C ln(z/zr))`, `C = 0.0573 √(1 + 0.15 U0)`.
#[must_use]
pub fn mean_speed(params: &IsoWindParams, z: &Sweep) -> Sweep {
    let u0 = params.mean_speed();
    let c = 0.0573 * (1.0 + 0.15 * u0).sqrt();
    z.mapv(|z| u0 * (1.0 + c * (z / params.reference_height).ln()))
}

/// Gust speed `u(z, t) = U(z) (1 - 0.41 Iu(z) ln(t/t0))` for averaging time `t`.
#[must_use]
pub fn gust_speed(params: &IsoWindParams, z: &Sweep, time: f64) -> Sweep {
    let factor = 0.41 * (time / params.reference_time).ln();
    let intensity = turbulence_intensity(params, z);
    mean_speed(params, z) * intensity.mapv(|iu| 1.0 - iu * factor)
}

/// Gust speed against height for every averaging time.
#[must_use]
pub fn figure(params: &IsoWindParams) -> Figure {
    let z = span(params.base_height, params.height);
    let mut figure = Figure::new("Wind speed (m/s)", "Height, z (m)").title(format!(
        "ISO Wind profile (Uo={:.1}m/s at {:.1}m reference elevation)",
        params.mean_speed(),
        params.reference_height
    ));
    for &time in &params.averaging_times {
        figure
            .plot(&gust_speed(params, &z, time), &z)
            .label(format!("u(z,t) -- {time:.0}s"));
    }
    figure
}

/// Draw the wind speed profiles.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run(params: &IsoWindParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    let path = artifact(out_dir, ARTIFACT);
    save(&figure(params), &path)?;
    record(&path);
    Ok(Outcome::written(vec![path]))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::{resolve, Overrides};

    fn params(speed: f64) -> IsoWindParams {
        IsoWindParams {
            speed: Some(speed),
            ..IsoWindParams::default()
        }
    }

    #[test]
    fn hourly_gust_equals_mean_speed() {
        let params = params(30.0);
        let z = span(0.1, 140.0);
        let hourly = gust_speed(&params, &z, 3600.0);
        let mean = mean_speed(&params, &z);
        for (gust, mean) in hourly.iter().zip(mean.iter()) {
            assert_relative_eq!(gust, mean, max_relative = 1.0e-12);
        }
    }

    #[test]
    fn mean_speed_at_reference_height_is_u0() {
        let z = Sweep::from(vec![10.0]);
        assert_relative_eq!(mean_speed(&params(25.0), &z)[0], 25.0, max_relative = 1.0e-12);
    }

    #[test]
    fn short_gusts_are_faster() {
        let params = params(30.0);
        let z = Sweep::from(vec![50.0]);
        assert!(gust_speed(&params, &z, 3.0)[0] > gust_speed(&params, &z, 60.0)[0]);
    }

    #[test]
    fn speed_is_required() {
        let mut overrides = Overrides::new();
        overrides.set("height", 100.0);
        assert_eq!(
            resolve::<IsoWindParams>(&overrides),
            Err(ConfigurationError::MissingOption("speed".to_string()))
        );
        overrides.set("speed", 30.0);
        let params: IsoWindParams = resolve(&overrides).expect("speed supplied");
        assert_eq!(params.speed, Some(30.0));
    }
}
