//! Cosine interaction form for the axial term of combined axial and bending
//! utilisation.

use std::f64::consts::FRAC_PI_2;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Parameters;
use crate::dispatch::{artifact, record, Outcome};
use crate::errors::CalcError;
use crate::plot::{save, Figure};
use crate::sweep::{arange, Sweep};

/// Artifact written by [`run`].
pub const ARTIFACT: &str = "tuc_under_cosint.svg";

/// Utilisation sweep bounds.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InteractionParams {
    /// First axial utilisation.
    pub start: f64,
    /// Utilisation at which the sweep stops (exclusive).
    pub stop: f64,
    /// Sweep increment.
    pub step: f64,
}

impl Default for InteractionParams {
    fn default() -> Self {
        Self {
            start: 0.01,
            stop: 1.0,
            step: 0.01,
        }
    }
}

impl Parameters for InteractionParams {}

/// `1 - cos(π/2 · uc)` for each axial utilisation `uc`.
#[must_use]
pub fn cosine_term(utilisation: &Sweep) -> Sweep {
    utilisation.mapv(|uc| 1.0 - (uc * FRAC_PI_2).cos())
}

/// Chart of the cosine term against axial utilisation.
#[must_use]
pub fn figure(utilisation: &Sweep, term: &Sweep) -> Figure {
    let mut figure = Figure::new(
        "Axial utilisation, γR σ / fy",
        "1 - cos(π/2 · γR σ / fy)",
    );
    figure.plot(utilisation, term);
    figure
}

/// Evaluate and draw the cosine interaction term.
///
/// # Errors
///
/// Returns [`CalcError::Render`] when the chart cannot be written.
pub fn run(params: &InteractionParams, out_dir: &Path) -> Result<Outcome, CalcError> {
    let utilisation = arange(params.start, params.stop, params.step);
    let term = cosine_term(&utilisation);
    let path = artifact(out_dir, ARTIFACT);
    save(&figure(&utilisation, &term), &path)?;
    record(&path);
    Ok(Outcome::written(vec![path]))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn term_spans_zero_to_one() {
        let uc = Sweep::from(vec![0.0, 0.5, 1.0]);
        let term = cosine_term(&uc);
        assert_relative_eq!(term[0], 0.0);
        assert_relative_eq!(term[1], 1.0 - std::f64::consts::FRAC_1_SQRT_2, max_relative = 1.0e-12);
        assert_relative_eq!(term[2], 1.0, max_relative = 1.0e-12);
    }

    #[test]
    fn default_sweep_has_ninety_nine_points() {
        let params = InteractionParams::default();
        let uc = arange(params.start, params.stop, params.step);
        assert_eq!(cosine_term(&uc).len(), 99);
    }
}
