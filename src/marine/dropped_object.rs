//! Velocity and depth of a pipe dropped through seawater, falling at a
//! given terminal velocity.

use std::path::Path;

use plotters::style::RED;
use serde::{Deserialize, Serialize};

use crate::config::{positive, Parameters};
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::{CalcError, ConfigurationError};
use crate::plot::{save, Figure};
use crate::sweep::{arange, Sweep};

/// Artifact for velocity against time.
pub const VELOCITY_ARTIFACT: &str = "t_v.png";
/// Artifact for depth against time.
pub const DEPTH_ARTIFACT: &str = "t_d.png";

/// Drop inputs; SI units.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DroppedObjectParams {
    /// Terminal velocity `vt` (m/s).
    pub terminal_velocity: f64,
    /// Starting elevation `y0` (m).
    pub start_depth: f64,
    /// Seabed elevation marked on the depth chart (m).
    pub seabed: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    /// End of the velocity time sweep, exclusive (s).
    pub velocity_duration: f64,
    /// End of the depth time sweep, exclusive (s).
    pub depth_duration: f64,
}

impl Default for DroppedObjectParams {
    fn default() -> Self {
        Self {
            terminal_velocity: 13.654,
            start_depth: 0.0,
            seabed: -168.5,
            gravity: 9.81,
            velocity_duration: 10.0,
            depth_duration: 14.0,
        }
    }
}

impl Parameters for DroppedObjectParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("terminal_velocity", self.terminal_velocity)?;
        positive("gravity", self.gravity)
    }
}

/// Time samples from 0.1 s in 0.01 s steps up to `duration`.
#[must_use]
pub fn times(duration: f64) -> Sweep {
    arange(0.1, duration, 0.01)
}

/// Velocity `v = vt tanh(g t / vt)`.
#[must_use]
pub fn velocity(params: &DroppedObjectParams, t: &Sweep) -> Sweep {
    let vt = params.terminal_velocity;
    t.mapv(|t| vt * (params.gravity * t / vt).tanh())
}

/// Elevation `y = y0 - (vt²/g) ln cosh(g t / vt)`.
#[must_use]
pub fn depth(params: &DroppedObjectParams, t: &Sweep) -> Sweep {
    let vt = params.terminal_velocity;
    let g = params.gravity;
    t.mapv(|t| params.start_depth - (vt.powi(2) / g) * (g * t / vt).cosh().ln())
}

/// Draw velocity and depth against time.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when a chart cannot be written.
pub fn run(params: &DroppedObjectParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    let t = times(params.velocity_duration);
    let mut velocity_chart = Figure::new("Time, t (s)", "Velocity, v (m/s)");
    velocity_chart.plot(&t, &velocity(params, &t));

    let t = times(params.depth_duration);
    let mut depth_chart = Figure::new("Time, t (s)", "Depth, d (m)");
    depth_chart.plot(&t, &depth(params, &t));
    depth_chart.hline(params.seabed, RED);

    let mut written = Vec::with_capacity(2);
    for (figure, name) in [(velocity_chart, VELOCITY_ARTIFACT), (depth_chart, DEPTH_ARTIFACT)] {
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
    fn velocity_approaches_terminal() {
        let params = DroppedObjectParams::default();
        let t = times(params.velocity_duration);
        let v = velocity(&params, &t);
        assert_eq!(v.len(), 990);
        assert!(v[v.len() - 1] < params.terminal_velocity);
        assert!(params.terminal_velocity - v[v.len() - 1] < 1.0e-3);
    }

    #[test]
    fn early_fall_is_nearly_free() {
        let params = DroppedObjectParams::default();
        let t = Sweep::from(vec![0.1]);
        assert_relative_eq!(velocity(&params, &t)[0], 0.981, max_relative = 5.0e-3);
        assert_relative_eq!(depth(&params, &t)[0], -0.5 * 9.81 * 0.01, max_relative = 5.0e-3);
    }

    #[test]
    fn object_reaches_the_seabed_within_the_sweep() {
        let params = DroppedObjectParams::default();
        let y = depth(&params, &times(params.depth_duration));
        assert!(y[y.len() - 1] < params.seabed);
    }

    #[test]
    fn run_writes_both_bitmaps() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let outcome = run(&DroppedObjectParams::default(), dir.path()).expect("charts render");
        let names: Vec<_> = outcome.artifacts().iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(names, [VELOCITY_ARTIFACT, DEPTH_ARTIFACT]);
        for path in outcome.artifacts() {
            let bytes = std::fs::read(path).expect("chart readable");
            assert!(bytes.starts_with(b"\x89PNG"));
        }
    }
}
