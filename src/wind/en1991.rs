//! Wind action profiles to EN 1991-1-4:2005, one curve per terrain category.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError, DomainWarning};
use crate::plot::{save, Figure};
use crate::sweep::{span, Sweep};

/// Roughness length `z0` of terrain category 2, the reference terrain (m).
pub const REFERENCE_ROUGHNESS: f64 = 0.05;

/// Which profile to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// Turbulence intensity `Iv(z)`, clause 4.4.
    TurbulenceIntensity,
    /// Turbulent length scale `L(z)`, Annex B.
    LengthScale,
    /// Peak velocity pressure `qp(z)` in terms of `vb`, clause 4.5.
    PeakPressure,
    /// Roughness factor `cr(z)`, clause 4.3.2.
    Roughness,
}

impl Profile {
    /// Artifact the profile is saved to.
    #[must_use]
    pub fn artifact(self) -> &'static str {
        match self {
            Self::TurbulenceIntensity => "ti.svg",
            Self::LengthScale => "tls.svg",
            Self::PeakPressure => "pvp.svg",
            Self::Roughness => "rf.svg",
        }
    }

    /// Horizontal axis description.
    fn x_label(self) -> &'static str {
        match self {
            Self::TurbulenceIntensity => "Turbulence intensity, Iv(z)",
            Self::LengthScale => "Turbulent length scale, L(z)",
            Self::PeakPressure => "Peak velocity pressure qp(z) in terms of vb",
            Self::Roughness => "Roughness factor, cr(z) = vm(z) / vb",
        }
    }
}

/// Terrain and structure inputs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EnWindParams {
    /// Height of the structure (m).
    pub height: f64,
    /// Roughness length `z0` for terrain categories 0 to 4 (m).
    pub roughness_lengths: Vec<f64>,
    /// Minimum height `zmin` for each category (m).
    pub minimum_heights: Vec<f64>,
    /// Reference height `zt` of Annex B.1 (m).
    pub reference_height: f64,
    /// Reference length scale `Lt` of Annex B.1 (m).
    pub reference_length: f64,
    /// Turbulence factor `k1`.
    pub turbulence_factor: f64,
    /// Orography factor `c0`.
    pub orography_factor: f64,
}

impl Default for EnWindParams {
    fn default() -> Self {
        Self {
            height: 140.0,
            roughness_lengths: vec![0.003, 0.01, 0.05, 0.3, 1.0],
            minimum_heights: vec![1.0, 1.0, 2.0, 5.0, 10.0],
            reference_height: 200.0,
            reference_length: 300.0,
            turbulence_factor: 1.0,
            orography_factor: 1.0,
        }
    }
}

impl Parameters for EnWindParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("height", self.height)?;
        if self.roughness_lengths.len() != self.minimum_heights.len() {
            return Err(ConfigurationError::MalformedOption(
                "roughness_lengths and minimum_heights must list the same terrain categories"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Turbulent length scale `L(z) = Lt (z/zt)^α` with `α = 0.67 + 0.05 ln z0`.
#[must_use]
pub fn turbulent_length_scale(params: &EnWindParams, z0: f64, z: &Sweep) -> Sweep {
    let alpha = 0.67 + 0.05 * z0.ln();
    z.mapv(|z| params.reference_length * (z / params.reference_height).powf(alpha))
}

/// Roughness factor `cr(z) = kr ln(z/z0)` with `kr = 0.19 (z0/0.05)^0.07`.
#[must_use]
pub fn roughness_factor(z0: f64, z: &Sweep) -> Sweep {
    let kr = 0.19 * (z0 / REFERENCE_ROUGHNESS).powf(0.07);
    z.mapv(|z| kr * (z / z0).ln())
}

/// Turbulence intensity `Iv(z) = k1 / (c0 ln(z/z0))`.
#[must_use]
pub fn turbulence_intensity(params: &EnWindParams, z0: f64, z: &Sweep) -> Sweep {
    z.mapv(|z| params.turbulence_factor / (params.orography_factor * (z / z0).ln()))
}

/// Peak velocity pressure in terms of `vb`, `qp(z) = (1 + 7 Iv) · ½ · cr²`.
#[must_use]
pub fn peak_velocity_pressure(params: &EnWindParams, z0: f64, z: &Sweep) -> Sweep {
    let iv = turbulence_intensity(params, z0, z);
    let cr = roughness_factor(z0, z);
    (iv * 7.0 + 1.0) * 0.5 * cr.mapv(|c| c * c)
}

/// Heights from `zmin` to the structure height for one terrain category.
#[must_use]
pub fn heights(params: &EnWindParams, zmin: f64) -> Sweep {
    span(zmin, params.height)
}

/// Evaluate `profile` for one terrain category.
#[must_use]
pub fn evaluate(params: &EnWindParams, profile: Profile, z0: f64, z: &Sweep) -> Sweep {
    match profile {
        Profile::TurbulenceIntensity => turbulence_intensity(params, z0, z),
        Profile::LengthScale => turbulent_length_scale(params, z0, z),
        Profile::PeakPressure => peak_velocity_pressure(params, z0, z),
        Profile::Roughness => roughness_factor(z0, z),
    }
}

/// `profile` against height, one line per terrain category.
#[must_use]
pub fn figure(params: &EnWindParams, profile: Profile) -> Figure {
    let mut figure = Figure::new(profile.x_label(), "Height, z (m)");
    for (category, (&z0, &zmin)) in params
        .roughness_lengths
        .iter()
        .zip(&params.minimum_heights)
        .enumerate()
    {
        let z = heights(params, zmin);
        let values = evaluate(params, profile, z0, &z);
        figure.plot(&values, &z).label(format!("Terrain: {category}"));
    }
    figure
}

/// Draw the selected profile, unless the structure is taller than `zt`.
///
/// The height check runs first, so an out-of-range height is reported even when
/// no profile is selected.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run(params: &EnWindParams, profile: Option<Profile>, out_dir: &Path) -> Result<Outcome, CalcError> {
    if params.height > params.reference_height {
        return Ok(Outcome::skipped(DomainWarning::HeightAboveReference {
            height: params.height,
            limit: params.reference_height,
        }));
    }
    let Some(profile) = profile else {
        return Ok(Outcome::no_selection("enwind"));
    };
    debug!(?profile, height = params.height, "en 1991 wind profile");
    let path = artifact(out_dir, profile.artifact());
    save(&figure(params, profile), &path)?;
    record(&path);
    Ok(Outcome::written(vec![path]))
}
