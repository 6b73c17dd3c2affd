//! Vortex-induced vibration screening of drill casing in a steady current
//! (DNV-RP-C205).

use std::f64::consts::PI;
use std::path::Path;

use plotters::style::RED;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure, ORANGE};
use crate::sweep::{arange, Sweep};
use crate::tubular::section::PipeSection;

/// Artifact written by [`run`].
pub const ARTIFACT: &str = "vivc.svg";
/// Reduced velocity band in which in-line VIV can occur.
pub const IN_LINE_BAND: (f64, f64) = (1.0, 4.5);
/// Reduced velocity band drawn for cross-flow VIV (onset at 3.0).
pub const CROSS_FLOW_BAND: (f64, f64) = (3.0, 5.0);

/// Boundary condition of the span, setting the natural frequency coefficient.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EndCondition {
    /// Both ends fixed.
    Fixed,
    /// Both ends clamped.
    Clamped,
    /// Both ends pinned.
    SimplySupported,
    /// One end free.
    Cantilevered,
}

impl EndCondition {
    /// Frequency coefficient `c` in `fn = c/2π · √(EI / M l⁴)`.
    #[must_use]
    pub fn coefficient(self) -> f64 {
        match self {
            Self::Fixed => 22.2,
            Self::Clamped => 15.4,
            Self::SimplySupported => 9.87,
            Self::Cantilevered => 3.52,
        }
    }
}

/// Casing, current and fluid properties in SI units.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VivParams {
    /// Outside diameters to compare (m).
    pub diameters: Vec<f64>,
    /// Wall thickness (m).
    pub thickness: f64,
    /// Shortest span (m).
    pub length_start: f64,
    /// Span at which the sweep stops, exclusive (m).
    pub length_stop: f64,
    /// Span increment (m).
    pub length_step: f64,
    /// Whether the bore is flooded.
    pub flooded: bool,
    /// Span end condition.
    pub end: EndCondition,
    /// Young's modulus (N/m²).
    pub elastic_modulus: f64,
    /// Steel density (kg/m³).
    pub steel_density: f64,
    /// Seawater density (kg/m³).
    pub water_density: f64,
    /// Structural damping ratio.
    pub damping: f64,
    /// Current velocity (m/s).
    pub current: f64,
    /// Marine growth thickness (m).
    pub growth_thickness: f64,
    /// Marine growth density (kg/m³).
    pub growth_density: f64,
}

impl Default for VivParams {
    fn default() -> Self {
        Self {
            diameters: vec![0.4064, 0.4572, 0.508, 0.5588, 0.6096, 0.6604, 0.762],
            thickness: 0.022,
            length_start: 0.1,
            length_stop: 40.0,
            length_step: 0.1,
            flooded: true,
            end: EndCondition::Clamped,
            elastic_modulus: 2.05e11,
            steel_density: 7850.0,
            water_density: 1025.0,
            damping: 0.05,
            current: 0.7,
            growth_thickness: 0.0,
            growth_density: 575.0,
        }
    }
}

impl Parameters for VivParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("thickness", self.thickness)?;
        positive("length_step", self.length_step)?;
        if self.growth_thickness < 0.0 {
            return Err(ConfigurationError::out_of_range(
                "growth_thickness",
                self.growth_thickness,
                "must not be negative",
            ));
        }
        Ok(())
    }
}

impl VivParams {
    /// Added mass coefficient: 1.2 with marine growth, 1.6 for a clean pipe.
    #[must_use]
    pub fn added_mass_coefficient(&self) -> f64 {
        if self.growth_thickness > 0.0 {
            1.2
        } else {
            1.6
        }
    }
}

/// Mass per metre of one casing, split by contribution (kg/m).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassPerLength {
    /// Steel.
    pub steel: f64,
    /// Hydrodynamic added mass.
    pub added: f64,
    /// Water inside the bore.
    pub entrained: f64,
    /// Marine growth.
    pub growth: f64,
}

impl MassPerLength {
    /// Sum of every contribution.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.steel + self.added + self.entrained + self.growth
    }
}

/// Mass breakdown for a casing of outside diameter `diameter`.
#[must_use]
pub fn mass_per_length(params: &VivParams, diameter: f64) -> MassPerLength {
    let section = PipeSection::new(diameter, params.thickness);
    let tm = params.growth_thickness;
    let fill = if params.flooded { 1.0 } else { 0.0 };
    MassPerLength {
        steel: section.annulus_area() * params.steel_density,
        added: params.added_mass_coefficient() * params.water_density * PI * (diameter + 2.0 * tm).powi(2)
            / 4.0,
        entrained: fill * params.water_density * (PI / 4.0) * section.inner_diameter().powi(2),
        growth: PI * (diameter + tm) * tm * params.growth_density,
    }
}

/// Stability parameter `Ks = 2 M (2π β) / (ρ (D + 2 tm)²)`.
#[must_use]
pub fn stability_parameter(params: &VivParams, diameter: f64) -> f64 {
    let mass = mass_per_length(params, diameter).total();
    2.0 * mass * (2.0 * PI * params.damping)
        / (params.water_density * (diameter + 2.0 * params.growth_thickness).powi(2))
}

/// Natural frequency of each span length (Hz).
#[must_use]
pub fn natural_frequency(params: &VivParams, diameter: f64, lengths: &Sweep) -> Sweep {
    let inertia = PipeSection::new(diameter, params.thickness).moment_of_inertia();
    let mass = mass_per_length(params, diameter).total();
    let c = params.end.coefficient();
    let stiffness = params.elastic_modulus * inertia;
    lengths.mapv(|l| (0.5 * c / PI) * (stiffness / (mass * l.powi(4))).sqrt())
}

/// Reduced velocity `vr = v / (fn D)` for each span length.
#[must_use]
pub fn reduced_velocity(params: &VivParams, diameter: f64, lengths: &Sweep) -> Sweep {
    natural_frequency(params, diameter, lengths).mapv(|frequency| params.current / (frequency * diameter))
}

/// Reduced velocity against span for every casing, with the occurrence bands.
#[must_use]
pub fn figure(params: &VivParams, lengths: &Sweep) -> Figure {
    let mut figure = Figure::new("Length of pipe, L (m)", "Reduced velocity, vr")
        .title(format!("VIV check for {:.1}m/s current", params.current));
    figure.band(IN_LINE_BAND.0, IN_LINE_BAND.1, RED, 0.18);
    figure.band(CROSS_FLOW_BAND.0, CROSS_FLOW_BAND.1, ORANGE, 0.18);
    for &diameter in &params.diameters {
        let vr = reduced_velocity(params, diameter, lengths);
        figure.plot(lengths, &vr).label(format!(
            "{:.0}×{:.0} (D/t={:.1}), Ks={:.1}",
            diameter * 1.0e3,
            params.thickness * 1.0e3,
            diameter / params.thickness,
            stability_parameter(params, diameter),
        ));
    }
    figure
}

/// Evaluate and draw the VIV screening chart.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run(params: &VivParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    let lengths = arange(params.length_start, params.length_stop, params.length_step);
    debug!(spans = lengths.len(), casings = params.diameters.len(), "viv sweep");
    let path = artifact(out_dir, ARTIFACT);
    save(&figure(params, &lengths), &path)?;
    record(&path);
    Ok(Outcome::written(vec![path]))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn added_mass_coefficient_depends_on_growth() {
        let mut params = VivParams::default();
        assert_relative_eq!(params.added_mass_coefficient(), 1.6);
        params.growth_thickness = 0.05;
        assert_relative_eq!(params.added_mass_coefficient(), 1.2);
    }

    #[test]
    fn buoyant_pipe_carries_no_entrained_water() {
        let params = VivParams {
            flooded: false,
            ..VivParams::default()
        };
        let mass = mass_per_length(&params, 0.508);
        assert_relative_eq!(mass.entrained, 0.0);
        assert_relative_eq!(mass.growth, 0.0);
        let steel = (PI / 4.0) * (0.508_f64.powi(2) - 0.464_f64.powi(2)) * 7850.0;
        assert_relative_eq!(mass.steel, steel, max_relative = 1.0e-12);
    }

    #[test]
    fn reduced_velocity_grows_with_span() {
        let params = VivParams::default();
        let lengths = arange(params.length_start, params.length_stop, params.length_step);
        let vr = reduced_velocity(&params, 0.4064, &lengths);
        assert_eq!(vr.len(), lengths.len());
        assert!(vr.windows(2).into_iter().all(|pair| pair[1] > pair[0]));
    }

    #[test]
    fn frequency_scales_with_end_coefficient() {
        let lengths = Sweep::from(vec![10.0]);
        let clamped = natural_frequency(&VivParams::default(), 0.508, &lengths);
        let fixed = natural_frequency(
            &VivParams {
                end: EndCondition::Fixed,
                ..VivParams::default()
            },
            0.508,
            &lengths,
        );
        assert_relative_eq!(fixed[0] / clamped[0], 22.2 / 15.4, max_relative = 1.0e-12);
    }

    #[test]
    fn end_condition_reads_kebab_case() {
        let end: EndCondition =
            serde_json::from_str("\"simply-supported\"").expect("known end condition");
        assert_eq!(end, EndCondition::SimplySupported);
    }
}
