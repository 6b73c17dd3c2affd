//! Jacket flooding through an orifice: ingress rate and time to flood each
//! compartment, for engineered flooding or an accidental breach.

use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure};
use crate::sweep::{arange, Sweep};
use crate::units::sweep_mm_to_m;

/// Artifact for flow rate against hole diameter.
pub const FLOW_ARTIFACT: &str = "DvQ.svg";
/// Artifact for time to flood against hole diameter.
pub const TIME_ARTIFACT: &str = "Dvt.svg";

/// A floodable compartment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Compartment {
    /// Legend name.
    pub name: String,
    /// Floodable volume (m³).
    pub volume: f64,
}

impl Compartment {
    /// Compartment `name` holding `volume` m³.
    fn new(name: &str, volume: f64) -> Self {
        Self {
            name: name.to_string(),
            volume,
        }
    }
}

/// Jacket, orifice and seawater inputs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FloodingParams {
    /// Jacket buoyancy `B` (N).
    pub buoyancy: f64,
    /// Projected area `Ap` over which buoyancy gives the pressure head (m²).
    pub projected_area: f64,
    /// Smallest hole diameter (mm).
    pub diameter_start: f64,
    /// Hole diameter at which the sweep stops, exclusive (mm).
    pub diameter_stop: f64,
    /// Hole diameter increment (mm).
    pub diameter_step: f64,
    /// Discharge coefficient `μ` of the orifice.
    pub discharge_coefficient: f64,
    /// Seawater density `ρ` (kg/m³).
    pub water_density: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    /// Compartments to flood.
    pub compartments: Vec<Compartment>,
}

impl Default for FloodingParams {
    fn default() -> Self {
        Self {
            buoyancy: 28000e3,
            projected_area: 5400.0,
            diameter_start: 1.0,
            diameter_stop: 100.0,
            diameter_step: 1.0,
            discharge_coefficient: 0.75,
            water_density: 1025.0,
            gravity: 9.81,
            compartments: vec![
                Compartment::new("Pile sleeve", 170.0),
                Compartment::new("Lower leg compartment", 190.0),
                Compartment::new("Buoyancy tank", 6000.0),
                Compartment::new("Outer leg -- full", 900.0),
            ],
        }
    }
}

impl Parameters for FloodingParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("projected_area", self.projected_area)?;
        positive("diameter_step", self.diameter_step)?;
        positive("water_density", self.water_density)
    }
}

/// Hydrostatic head `h = (B / Ap) / (ρ g)` (m).
///
/// # Examples
/// ```
/// use offshorex::marine::flooding::{head, FloodingParams};
///
/// let h = head(&FloodingParams::default());
/// assert!((h - 0.515_669_444_8).abs() < 1e-9);
/// ```
#[must_use]
pub fn head(params: &FloodingParams) -> f64 {
    (params.buoyancy / params.projected_area) / (params.water_density * params.gravity)
}

/// Ingress velocity `v = μ √(2 g h)` (m/s).
#[must_use]
pub fn ingress_velocity(params: &FloodingParams) -> f64 {
    params.discharge_coefficient * (2.0 * params.gravity * head(params)).sqrt()
}

/// Hole diameters in metres.
#[must_use]
pub fn diameters(params: &FloodingParams) -> Sweep {
    sweep_mm_to_m(&arange(
        params.diameter_start,
        params.diameter_stop,
        params.diameter_step,
    ))
}

/// Flow rate `Q = π D²/4 · v` for each diameter `D` in metres (m³/s).
#[must_use]
pub fn flow_rate(params: &FloodingParams, diameters: &Sweep) -> Sweep {
    let v = ingress_velocity(params);
    diameters.mapv(|d| PI * d.powi(2) / 4.0 * v)
}

/// Time to flood `volume` at each flow rate (hours).
#[must_use]
pub fn time_to_flood(volume: f64, flow: &Sweep) -> Sweep {
    flow.mapv(|q| volume / q / 3600.0)
}

/// Flow rate and time-to-flood charts.
#[must_use]
pub fn figures(params: &FloodingParams) -> (Figure, Figure) {
    let d = diameters(params);
    let q = flow_rate(params, &d);

    let mut flow = Figure::new("Hole diameter, D (m)", "Rate of water ingress, Q (m³/s)");
    flow.plot(&d, &q);

    let mut time = Figure::new("Hole diameter, D (m)", "Time taken to flood, t (hour)").log_y();
    for compartment in &params.compartments {
        time.plot(&d, &time_to_flood(compartment.volume, &q))
            .label(format!("{} ({:.0}m³)", compartment.name, compartment.volume));
    }
    (flow, time)
}

/// Draw both flooding charts.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when a chart cannot be written.
pub fn run(params: &FloodingParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    debug!(
        head = head(params),
        velocity = ingress_velocity(params),
        "flooding"
    );
    let (flow, time) = figures(params);
    let mut written = Vec::with_capacity(2);
    for (figure, name) in [(flow, FLOW_ARTIFACT), (time, TIME_ARTIFACT)] {
        let path = artifact(out_dir, name);
        save(&figure, &path)?;
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
    fn fifty_millimetre_hole_floods_pile_sleeve_in_about_ten_hours() {
        let params = FloodingParams::default();
        assert_relative_eq!(ingress_velocity(&params), 2.385_593_618_1, max_relative = 1.0e-9);
        let q = flow_rate(&params, &Sweep::from(vec![0.05]));
        assert_relative_eq!(q[0], 0.004_684_102_1, max_relative = 1.0e-8);
        let t = time_to_flood(170.0, &q);
        assert_relative_eq!(t[0], 10.081_381_886_4, max_relative = 1.0e-9);
    }

    #[test]
    fn diameter_sweep_is_in_metres() {
        let d = diameters(&FloodingParams::default());
        assert_eq!(d.len(), 99);
        assert_relative_eq!(d[0], 0.001, max_relative = 1.0e-12);
        assert_relative_eq!(d[98], 0.099, max_relative = 1.0e-12);
    }

    #[test]
    fn one_curve_per_compartment() {
        let (flow, time) = figures(&FloodingParams::default());
        assert_eq!(flow.series.len(), 1);
        assert_eq!(time.series.len(), 4);
        assert_eq!(time.series[0].label.as_deref(), Some("Pile sleeve (170m³)"));
    }
}
