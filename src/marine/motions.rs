//! Inertia forces on cargo from vessel motions (Noble Denton 0030/ND), and
//! the influence of cargo eccentricity on them.

use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure};
use crate::sweep::{span, Sweep};
use crate::units::deg_to_rad;

/// Artifact written for a custom vessel.
pub const CUSTOM_ARTIFACT: &str = "ves_c.svg";

/// Single amplitude motions of a vessel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Roll angle (rad).
    pub roll: f64,
    /// Pitch angle (rad).
    pub pitch: f64,
    /// Full cycle roll period (s).
    pub roll_period: f64,
    /// Full cycle pitch period (s).
    pub pitch_period: f64,
    /// Heave acceleration as a fraction of `g`.
    pub heave: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
}

impl Motion {
    /// Peak roll acceleration `θr (2π/Tr)²` (rad/s²).
    #[must_use]
    pub fn roll_acceleration(&self) -> f64 {
        self.roll * (2.0 * PI / self.roll_period).powi(2)
    }

    /// Peak pitch acceleration `θp (2π/Tp)²` (rad/s²).
    #[must_use]
    pub fn pitch_acceleration(&self) -> f64 {
        self.pitch * (2.0 * PI / self.pitch_period).powi(2)
    }

    /// Vertical force per unit weight under roll, including gravity, at transverse lever `ly`.
    #[must_use]
    pub fn vertical_roll(&self, ly: f64) -> f64 {
        self.roll.cos() + (ly / self.gravity) * self.roll_acceleration() + self.heave * self.roll.cos()
    }

    /// Vertical force per unit weight under pitch, including gravity, at longitudinal lever `lx`.
    #[must_use]
    pub fn vertical_pitch(&self, lx: f64) -> f64 {
        self.pitch.cos()
            + (lx / self.gravity) * self.pitch_acceleration()
            + self.heave * self.pitch.cos()
    }

    /// Horizontal force per unit weight under roll at vertical lever `lz`.
    #[must_use]
    pub fn horizontal_roll(&self, lz: f64) -> f64 {
        self.roll.sin() + (lz / self.gravity) * self.roll_acceleration() + self.heave * self.roll.sin()
    }

    /// Horizontal force per unit weight under pitch at vertical lever `lz`.
    #[must_use]
    pub fn horizontal_pitch(&self, lz: f64) -> f64 {
        self.pitch.sin()
            + (lz / self.gravity) * self.pitch_acceleration()
            + self.heave * self.pitch.sin()
    }
}

/// Vessel classes with default motion criteria.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VesselClass {
    /// LOA > 140 m, B > 30 m.
    Large,
    /// Medium vessels and large cargo barges, LOA ≥ 76 m, B ≥ 23 m.
    Medium,
    /// Small cargo barges, LOA < 76 m, B < 23 m.
    SmallBarge,
    /// Small vessels, LOA < 76 m, B < 23 m.
    SmallVessel,
}

impl VesselClass {
    /// Single amplitude roll and pitch in degrees.
    #[must_use]
    pub fn angles(self) -> (f64, f64) {
        match self {
            Self::Large => (20.0, 10.0),
            Self::Medium => (20.0, 12.5),
            Self::SmallBarge => (25.0, 15.0),
            Self::SmallVessel => (30.0, 15.0),
        }
    }

    /// Chart caption.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Large => "Large vessels (LOA > 140m, B > 30m)",
            Self::Medium => "Medium vessels & large cargo barges (≥76m, ≥23m)",
            Self::SmallBarge => "Small cargo barges (<76m, <23m)",
            Self::SmallVessel => "Small vessels (<76m, <23m)",
        }
    }

    /// Artifact the chart is saved to.
    #[must_use]
    pub fn artifact(self) -> &'static str {
        match self {
            Self::Large => "ves_l.svg",
            Self::Medium => "ves_m.svg",
            Self::SmallBarge => "ves_s.svg",
            Self::SmallVessel => "ves_v.svg",
        }
    }
}

/// Lever arm ranges from the vessel's centre of rotation to the cargo (m).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LeverArms {
    /// Longest longitudinal lever `Lx`.
    pub lx_max: f64,
    /// Longest transverse lever `Ly`.
    pub ly_max: f64,
    /// Longest vertical lever `Lz`.
    pub lz_max: f64,
}

impl Default for LeverArms {
    fn default() -> Self {
        Self {
            lx_max: 30.0,
            ly_max: 15.0,
            lz_max: 30.0,
        }
    }
}

/// Periods and lever ranges for a standard vessel class.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VesselParams {
    /// Full cycle roll period `Tr` (s).
    pub roll_period: f64,
    /// Full cycle pitch period `Tp` (s).
    pub pitch_period: f64,
    /// Heave acceleration as a fraction of `g`.
    pub heave: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    /// Lever arm ranges.
    pub levers: LeverArms,
}

impl Default for VesselParams {
    fn default() -> Self {
        Self {
            roll_period: 10.0,
            pitch_period: 10.0,
            heave: 0.2,
            gravity: 9.81,
            levers: LeverArms::default(),
        }
    }
}

impl Parameters for VesselParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("roll_period", self.roll_period)?;
        positive("pitch_period", self.pitch_period)
    }
}

impl VesselParams {
    /// Motions of `class` with these periods.
    #[must_use]
    pub fn motion(&self, class: VesselClass) -> Motion {
        let (roll, pitch) = class.angles();
        Motion {
            roll: deg_to_rad(roll),
            pitch: deg_to_rad(pitch),
            roll_period: self.roll_period,
            pitch_period: self.pitch_period,
            heave: self.heave,
            gravity: self.gravity,
        }
    }
}

/// Motions and lever ranges for a vessel with its own motion response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CustomVesselParams {
    /// Single amplitude roll angle (deg).
    pub roll: f64,
    /// Single amplitude pitch angle (deg).
    pub pitch: f64,
    /// Full cycle roll period `Tr` (s).
    pub roll_period: f64,
    /// Full cycle pitch period `Tp` (s).
    pub pitch_period: f64,
    /// Heave acceleration as a fraction of `g`.
    pub heave: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    /// Lever arm ranges.
    pub levers: LeverArms,
}

impl Default for CustomVesselParams {
    fn default() -> Self {
        Self {
            roll: 20.0,
            pitch: 12.5,
            roll_period: 10.0,
            pitch_period: 10.0,
            heave: 0.2,
            gravity: 9.81,
            levers: LeverArms::default(),
        }
    }
}

impl Parameters for CustomVesselParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("roll_period", self.roll_period)?;
        positive("pitch_period", self.pitch_period)
    }
}

impl CustomVesselParams {
    /// Motions described by these parameters.
    #[must_use]
    pub fn motion(&self) -> Motion {
        Motion {
            roll: deg_to_rad(self.roll),
            pitch: deg_to_rad(self.pitch),
            roll_period: self.roll_period,
            pitch_period: self.pitch_period,
            heave: self.heave,
            gravity: self.gravity,
        }
    }
}

/// The four inertia force components, each against its own lever sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct InertiaCurves {
    /// Longitudinal levers `Lx`.
    pub lx: Sweep,
    /// Transverse levers `Ly`.
    pub ly: Sweep,
    /// Vertical levers `Lz`.
    pub lz: Sweep,
    /// `Fv` under roll against `Ly`.
    pub vertical_roll: Sweep,
    /// `Fv` under pitch against `Lx`.
    pub vertical_pitch: Sweep,
    /// `Fh` under roll against `Lz`.
    pub horizontal_roll: Sweep,
    /// `Fh` under pitch against `Lz`.
    pub horizontal_pitch: Sweep,
}

/// Evaluate the inertia components over the lever ranges.
#[must_use]
pub fn inertia_curves(motion: &Motion, levers: &LeverArms) -> InertiaCurves {
    let lx = span(0.0, levers.lx_max);
    let ly = span(0.0, levers.ly_max);
    let lz = span(0.0, levers.lz_max);
    InertiaCurves {
        vertical_roll: ly.mapv(|ly| motion.vertical_roll(ly)),
        vertical_pitch: lx.mapv(|lx| motion.vertical_pitch(lx)),
        horizontal_roll: lz.mapv(|lz| motion.horizontal_roll(lz)),
        horizontal_pitch: lz.mapv(|lz| motion.horizontal_pitch(lz)),
        lx,
        ly,
        lz,
    }
}

/// Inertia force per unit weight against lever arm.
#[must_use]
pub fn figure(title: &str, curves: &InertiaCurves) -> Figure {
    let mut figure = Figure::new("L (m)", "Inertia force in terms of W").title(title);
    figure
        .plot(&curves.ly, &curves.vertical_roll)
        .label("Fv (roll) incl. gravity (L => Ly)");
    figure
        .plot(&curves.lx, &curves.vertical_pitch)
        .label("Fv (pitch) incl. gravity (L => Lx)");
    figure
        .plot(&curves.lz, &curves.horizontal_roll)
        .label("Fh (roll) (L => Lz)");
    figure
        .plot(&curves.lz, &curves.horizontal_pitch)
        .label("Fh (pitch) (L => Lz)");
    figure
}

/// Inertia force chart for one motion.
fn draw(title: &str, motion: &Motion, levers: &LeverArms, path: &Path) -> Result<Outcome, CalcError> {
    debug!(?motion, "inertia forces");
    save(&figure(title, &inertia_curves(motion, levers)), path)?;
    record(path);
    Ok(Outcome::written(vec![path.to_path_buf()]))
}

/// Draw the inertia forces for a standard vessel class.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run(params: &VesselParams, class: Option<VesselClass>, out_dir: &Path) -> Result<Outcome, CalcError> {
    let Some(class) = class else {
        return Ok(Outcome::no_selection("vessel"));
    };
    draw(
        class.title(),
        &params.motion(class),
        &params.levers,
        &artifact(out_dir, class.artifact()),
    )
}

/// Draw the inertia forces for a custom vessel.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run_custom(params: &CustomVesselParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    draw(
        "Custom vessel",
        &params.motion(),
        &params.levers,
        &artifact(out_dir, CUSTOM_ARTIFACT),
    )
}
