//! Bending and shear in a pile overhung beyond the stern of a barge during
//! tow, as the overhang grows.

use std::path::Path;

use ndarray::Zip;
use plotters::style::RED;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::marine::motions::Motion;
use crate::plot::{save, Figure};
use crate::sweep::{span, Sweep};
use crate::tubular::section::PipeSection;
use crate::units::deg_to_rad;

/// Which stress the charts show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StressKind {
    /// Cantilever bending `fb = w F Lp² / Ze`.
    Bending,
    /// Shear `fv = 2 w F Lp / A`.
    Shear,
}

impl StressKind {
    /// Artifacts for the roll and pitch charts.
    #[must_use]
    pub fn artifacts(self) -> [&'static str; 2] {
        match self {
            Self::Bending => ["pp-fb-roll-ls.png", "pp-fb-pitch-ls.png"],
            Self::Shear => ["pp-fv-roll-ls.png", "pp-fv-pitch-ls.png"],
        }
    }
}

/// Barge motions, pile geometry and lever arms; lengths in m.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PileTowParams {
    /// Largest distance from the stern to the pile centre of gravity.
    pub overhang_max: f64,
    /// Distance from the centre of rotation to the stern, added to `Lx`.
    pub stern_lever: f64,
    /// Transverse lever `Ly`.
    pub ly: f64,
    /// Vertical lever `Lz`.
    pub lz: f64,
    /// Pile outside diameter.
    pub diameter: f64,
    /// Pile wall thickness.
    pub thickness: f64,
    /// Roll angle (deg).
    pub roll: f64,
    /// Pitch angle (deg).
    pub pitch: f64,
    /// Full cycle roll period (s).
    pub roll_period: f64,
    /// Full cycle pitch period (s).
    pub pitch_period: f64,
    /// Heave acceleration as a fraction of `g`.
    pub heave: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    /// Load factor applied to the inertia forces.
    pub load_factor: f64,
    /// Steel unit weight (MN/m³).
    pub unit_weight: f64,
    /// Stress band shaded on the roll bending chart (MPa).
    pub roll_band: (f64, f64),
    /// Stress band shaded on the pitch bending chart (MPa).
    pub pitch_band: (f64, f64),
}

impl Default for PileTowParams {
    fn default() -> Self {
        Self {
            overhang_max: 20.0,
            stern_lever: 80.0,
            ly: 20.0,
            lz: 15.25,
            diameter: 3.0,
            thickness: 0.038,
            roll: 20.0,
            pitch: 10.0,
            roll_period: 10.0,
            pitch_period: 10.0,
            heave: 0.2,
            gravity: 9.81,
            load_factor: 1.1 * 1.35,
            unit_weight: 0.077,
            roll_band: (396.0, 500.0),
            pitch_band: (396.0, 700.0),
        }
    }
}

impl Parameters for PileTowParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("diameter", self.diameter)?;
        positive("thickness", self.thickness)?;
        positive("roll_period", self.roll_period)?;
        positive("pitch_period", self.pitch_period)
    }
}

impl PileTowParams {
    /// Barge motion with angles in radians.
    fn motion(&self) -> Motion {
        Motion {
            roll: deg_to_rad(self.roll),
            pitch: deg_to_rad(self.pitch),
            roll_period: self.roll_period,
            pitch_period: self.pitch_period,
            heave: self.heave,
            gravity: self.gravity,
        }
    }

    /// Pile cross-section.
    fn section(&self) -> PipeSection {
        PipeSection::new(self.diameter, self.thickness)
    }

    /// Pile weight per metre (MN/m).
    #[must_use]
    pub fn weight_per_length(&self) -> f64 {
        self.section().area() * self.unit_weight
    }
}

/// Factored inertia forces per unit weight along the overhang sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct PileInertia {
    /// Overhung length `Lp = 2 Lx0`.
    pub overhang: Sweep,
    /// Vertical under roll.
    pub vertical_roll: Sweep,
    /// Horizontal under roll.
    pub horizontal_roll: Sweep,
    /// Vertical under pitch.
    pub vertical_pitch: Sweep,
    /// Horizontal under pitch.
    pub horizontal_pitch: Sweep,
}

impl PileInertia {
    /// Resultant under roll.
    #[must_use]
    pub fn roll(&self) -> Sweep {
        resultant(&self.vertical_roll, &self.horizontal_roll)
    }

    /// Resultant under pitch.
    #[must_use]
    pub fn pitch(&self) -> Sweep {
        resultant(&self.vertical_pitch, &self.horizontal_pitch)
    }

    /// Quartering resultant `√((0.6 Fr)² + (0.6 Fp)²)`.
    #[must_use]
    pub fn quartering(&self) -> Sweep {
        resultant(&(self.roll() * 0.6), &(self.pitch() * 0.6))
    }
}

/// Element-wise `√(a² + b²)`.
fn resultant(a: &Sweep, b: &Sweep) -> Sweep {
    Zip::from(a).and(b).map_collect(|a, b| a.hypot(*b))
}

/// Factored inertia forces for every overhang.
#[must_use]
pub fn inertia(params: &PileTowParams) -> PileInertia {
    let motion = params.motion();
    let lx0 = span(0.0, params.overhang_max);
    let factor = params.load_factor;
    let lx = &lx0 + params.stern_lever;
    let vertical_roll = motion.vertical_roll(params.ly) * factor;
    let horizontal_roll = motion.horizontal_roll(params.lz) * factor;
    let horizontal_pitch = motion.horizontal_pitch(params.lz) * factor;
    PileInertia {
        vertical_roll: Sweep::from_elem(lx0.len(), vertical_roll),
        horizontal_roll: Sweep::from_elem(lx0.len(), horizontal_roll),
        vertical_pitch: lx.mapv(|lx| motion.vertical_pitch(lx) * factor),
        horizontal_pitch: Sweep::from_elem(lx0.len(), horizontal_pitch),
        overhang: lx0 * 2.0,
    }
}

/// Stress components for one motion (MPa).
#[derive(Clone, Debug, PartialEq)]
pub struct StressComponents {
    /// From the vertical force.
    pub vertical: Sweep,
    /// From the horizontal force.
    pub horizontal: Sweep,
}

impl StressComponents {
    /// `√(fv² + fh²)`.
    #[must_use]
    pub fn resultant(&self) -> Sweep {
        resultant(&self.vertical, &self.horizontal)
    }
}

/// Stress of `kind` in the pile for inertia factor `force` at each overhang.
///
/// Bending is `w·f·Lp²/Z` and shear `2·w·f·Lp/A`, with `w` the pile weight per metre.
fn stresses(params: &PileTowParams, kind: StressKind, force: &Sweep, overhang: &Sweep) -> Sweep {
    let section = params.section();
    let w = params.weight_per_length();
    match kind {
        StressKind::Bending => {
            let modulus = section.elastic_modulus();
            Zip::from(force)
                .and(overhang)
                .map_collect(|f, lp| w * f * lp.powi(2) / modulus)
        }
        StressKind::Shear => {
            let area = section.area();
            Zip::from(force)
                .and(overhang)
                .map_collect(|f, lp| 2.0 * w * f * lp / area)
        }
    }
}

/// Roll and pitch stress components of `kind`.
#[must_use]
pub fn evaluate(params: &PileTowParams, kind: StressKind) -> (PileInertia, StressComponents, StressComponents) {
    let forces = inertia(params);
    let lp = &forces.overhang;
    let roll = StressComponents {
        vertical: stresses(params, kind, &forces.vertical_roll, lp),
        horizontal: stresses(params, kind, &forces.horizontal_roll, lp),
    };
    let pitch = StressComponents {
        vertical: stresses(params, kind, &forces.vertical_pitch, lp),
        horizontal: stresses(params, kind, &forces.horizontal_pitch, lp),
    };
    (forces, roll, pitch)
}

/// Vertical, horizontal and resultant stress of one motion against overhang.
fn stress_figure(kind: StressKind, motion: &str, overhang: &Sweep, components: &StressComponents) -> Figure {
    let (y_label, symbol) = match kind {
        StressKind::Bending => ("Bending stress (MPa)", "fb"),
        StressKind::Shear => ("Shear stress (MPa)", "fv"),
    };
    let mut figure = Figure::new("Pile length overhung beyond stern (m)", y_label);
    figure.plot(overhang, &components.resultant()).label(format!(
        "{symbol}{motion} = √({symbol}v{motion}² + {symbol}h{motion}²)"
    ));
    figure
        .plot(overhang, &components.vertical)
        .label(format!("{symbol}v{motion}"));
    figure
        .plot(overhang, &components.horizontal)
        .label(format!("{symbol}h{motion}"));
    figure
}

/// Roll and pitch charts for `kind`; bending charts carry the shaded stress bands.
#[must_use]
pub fn figures(params: &PileTowParams, kind: StressKind) -> [Figure; 2] {
    let (forces, roll, pitch) = evaluate(params, kind);
    let mut roll_figure = stress_figure(kind, "r", &forces.overhang, &roll);
    let mut pitch_figure = stress_figure(kind, "p", &forces.overhang, &pitch);
    if kind == StressKind::Bending {
        roll_figure.band(params.roll_band.0, params.roll_band.1, RED, 0.18);
        pitch_figure.band(params.pitch_band.0, params.pitch_band.1, RED, 0.18);
    }
    [roll_figure, pitch_figure]
}

/// Draw the roll and pitch charts of the selected stress.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when a chart cannot be written.
pub fn run(params: &PileTowParams, kind: Option<StressKind>, out_dir: &Path) -> Result<Outcome, CalcError> {
    let Some(kind) = kind else {
        return Ok(Outcome::no_selection("pile-tow"));
    };
    debug!(?kind, "pile tow stresses");
    let mut written = Vec::with_capacity(2);
    for (figure, name) in figures(params, kind).iter().zip(kind.artifacts()) {
        let path = artifact(out_dir, name);
        save(figure, &path)?;
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
    fn no_overhang_means_no_stress() {
        let params = PileTowParams::default();
        for kind in [StressKind::Bending, StressKind::Shear] {
            let (_, roll, pitch) = evaluate(&params, kind);
            assert_relative_eq!(roll.resultant()[0], 0.0);
            assert_relative_eq!(pitch.resultant()[0], 0.0);
        }
    }

    #[test]
    fn bending_at_full_overhang_matches_hand_calculation() {
        let params = PileTowParams::default();
        let (forces, roll, _) = evaluate(&params, StressKind::Bending);
        let last = forces.overhang.len() - 1;
        assert_relative_eq!(forces.overhang[last], 40.0, max_relative = 1.0e-12);

        let section = PipeSection::new(3.0, 0.038);
        let w = section.area() * 0.077;
        let expected = w * forces.vertical_roll[last] * 1600.0 / section.elastic_modulus();
        assert_relative_eq!(roll.vertical[last], expected, max_relative = 1.0e-12);
    }

    #[test]
    fn pitch_force_grows_with_lever() {
        let forces = inertia(&PileTowParams::default());
        let fp = forces.pitch();
        assert!(fp[fp.len() - 1] > fp[0]);
        let fq = forces.quartering();
        assert_relative_eq!(fq[0], 0.6 * forces.roll()[0].hypot(fp[0]), max_relative = 1.0e-12);
    }

    #[test]
    fn only_bending_charts_carry_bands() {
        let params = PileTowParams::default();
        let [roll, pitch] = figures(&params, StressKind::Bending);
        assert_eq!(roll.bands.len(), 1);
        assert_relative_eq!(pitch.bands[0].high, 700.0);
        let [shear, _] = figures(&params, StressKind::Shear);
        assert!(shear.bands.is_empty());
    }

    #[test]
    fn run_writes_roll_and_pitch_bitmaps() {
        let dir = tempfile::tempdir().expect("temporary directory");
        for kind in [StressKind::Bending, StressKind::Shear] {
            let outcome = run(&PileTowParams::default(), Some(kind), dir.path()).expect("charts render");
            assert_eq!(outcome.artifacts().len(), 2);
            for (path, name) in outcome.artifacts().iter().zip(kind.artifacts()) {
                assert!(path.ends_with(name));
                assert!(std::fs::read(path).expect("chart readable").starts_with(b"\x89PNG"));
            }
        }
    }
}
