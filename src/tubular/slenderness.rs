//! Tube slenderness and local buckling checks to ISO 19902.

use std::fmt::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{positive, Parameters};
use crate::dispatch::Outcome;
use crate::errors::{CalcError, ConfigurationError};
use crate::report::{format_list, save_text};
use crate::sweep::round_to;
use crate::tubular::section::PipeSection;

/// `fy / fxe` at or below which local buckling does not reduce the yield strength.
pub const LOCAL_BUCKLING_RATIO: f64 = 0.170;
/// Upper limit on `KL/r` (ISO 19902, 11.4).
pub const KLR_LIMIT: f64 = 80.0;
/// Upper limit on `fy D / (E t)` (ISO 19902, 11.4).
pub const WALL_SLENDERNESS_LIMIT: f64 = 0.069;

/// Tube properties; lengths in mm, stresses in MPa.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SlendernessParams {
    /// Yield strength `fy`.
    pub yield_strength: f64,
    /// Young's modulus `E`.
    pub elastic_modulus: f64,
    /// Outside diameters `D`.
    pub diameters: Vec<f64>,
    /// Wall thicknesses `t`, one per diameter.
    pub thicknesses: Vec<f64>,
    /// Member lengths `L`, one per diameter.
    pub lengths: Vec<f64>,
    /// Effective length factor `K` (Table 13.5-1).
    pub effective_length_factor: f64,
    /// Elastic critical buckling coefficient `Cx` (13.2.3.3).
    pub buckling_coefficient: f64,
}

impl Default for SlendernessParams {
    fn default() -> Self {
        Self {
            yield_strength: 400.0,
            elastic_modulus: 2.05e5,
            diameters: vec![1300.0, 900.0, 1000.0, 1200.0],
            thicknesses: vec![50.0, 20.0, 20.0, 30.0],
            lengths: vec![20518.0, 52151.0, 59685.0, 77500.0],
            effective_length_factor: 0.7,
            buckling_coefficient: 0.3,
        }
    }
}

impl Parameters for SlendernessParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("yield_strength", self.yield_strength)?;
        positive("elastic_modulus", self.elastic_modulus)?;
        if self.thicknesses.len() != self.diameters.len() || self.lengths.len() != self.diameters.len()
        {
            return Err(ConfigurationError::MalformedOption(
                "diameters, thicknesses and lengths must list the same number of tubes".to_string(),
            ));
        }
        Ok(())
    }
}

/// Results for a single tube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TubeSlenderness {
    /// Outside diameter.
    pub diameter: f64,
    /// Wall thickness.
    pub thickness: f64,
    /// Member length.
    pub length: f64,
    /// Cross-sectional area, rounded to 0.1 mm².
    pub area: f64,
    /// Second moment of area, rounded to 0.1 mm⁴.
    pub inertia: f64,
    /// Radius of gyration, rounded to 0.001 mm.
    pub radius: f64,
    /// Representative elastic local buckling strength `fxe`.
    pub fxe: f64,
    /// Representative local buckling strength `fyc`.
    pub fyc: f64,
    /// `D/t`.
    pub d_over_t: f64,
    /// `KL/r`.
    pub klr: f64,
    /// Column buckling parameter `λ` (13.2.3.2).
    pub lambda: f64,
    /// Limit on `λ` corresponding to `KL/r = 80`.
    pub lambda_limit: f64,
    /// `fy D / (E t)`.
    pub wall_slenderness: f64,
}

impl TubeSlenderness {
    /// Whether the tube satisfies every slenderness limit of clause 11.4.
    #[must_use]
    pub fn within_limits(&self) -> bool {
        self.klr <= KLR_LIMIT
            && self.lambda <= self.lambda_limit
            && self.wall_slenderness <= WALL_SLENDERNESS_LIMIT
    }
}

/// Representative elastic local buckling strength `fxe = 2 Cx E t / D`.
#[must_use]
pub fn elastic_local_buckling_strength(cx: f64, elastic_modulus: f64, thickness: f64, diameter: f64) -> f64 {
    2.0 * cx * elastic_modulus * thickness / diameter
}

/// Representative local buckling strength `fyc`.
///
/// Equal to `fy` while `fy / fxe <= 0.170`; beyond that the strength reduces to
/// `(1.047 - 0.274 fy/fxe) fy`.
///
/// # Examples
/// ```
/// use offshorex::tubular::slenderness::local_buckling_strength;
///
/// assert_eq!(local_buckling_strength(17.0, 100.0), 17.0);
/// assert!(local_buckling_strength(17.0, 99.0) < 17.0);
/// ```
#[must_use]
pub fn local_buckling_strength(fy: f64, fxe: f64) -> f64 {
    let ratio = fy / fxe;
    if ratio <= LOCAL_BUCKLING_RATIO {
        fy
    } else {
        (1.047 - 0.274 * ratio) * fy
    }
}

/// Evaluate every tube in `params`.
#[must_use]
pub fn evaluate(params: &SlendernessParams) -> Vec<TubeSlenderness> {
    let fy = params.yield_strength;
    let e = params.elastic_modulus;
    params
        .diameters
        .iter()
        .zip(&params.thicknesses)
        .zip(&params.lengths)
        .map(|((&diameter, &thickness), &length)| {
            let section = PipeSection::new(diameter, thickness);
            let area = round_to(section.area(), 1);
            let inertia = round_to(section.moment_of_inertia(), 1);
            let radius = round_to((inertia / area).sqrt(), 3);

            let fxe = elastic_local_buckling_strength(params.buckling_coefficient, e, thickness, diameter);
            let fyc = local_buckling_strength(fy, fxe);
            let klr = params.effective_length_factor * length / radius;

            TubeSlenderness {
                diameter,
                thickness,
                length,
                area,
                inertia,
                radius,
                fxe,
                fyc,
                d_over_t: diameter / thickness,
                klr,
                lambda: (klr / std::f64::consts::PI) * (fyc / e).sqrt(),
                lambda_limit: (KLR_LIMIT / std::f64::consts::PI) * (fyc / e).sqrt(),
                wall_slenderness: fy * diameter / (e * thickness),
            }
        })
        .collect()
}

/// Lay the results out one quantity per line, values rounded to three decimals.
#[must_use]
pub fn render(params: &SlendernessParams, tubes: &[TubeSlenderness]) -> String {
    let column = |pick: fn(&TubeSlenderness) -> f64| -> Vec<f64> {
        tubes.iter().map(|tube| round_to(pick(tube), 3)).collect()
    };
    let rows: [(&str, Vec<f64>); 14] = [
        ("D (mm)", column(|tube| tube.diameter)),
        ("t (mm)", column(|tube| tube.thickness)),
        ("L (mm)", column(|tube| tube.length)),
        ("A (mm^2)", column(|tube| tube.area)),
        ("I (mm^4)", column(|tube| tube.inertia)),
        ("r (mm)", column(|tube| tube.radius)),
        ("fy (MPa)", vec![round_to(params.yield_strength, 3); tubes.len()]),
        ("fxe (MPa)", column(|tube| tube.fxe)),
        ("fyc (MPa)", column(|tube| tube.fyc)),
        ("D/t", column(|tube| tube.d_over_t)),
        ("KL/r (NTE 80)", column(|tube| tube.klr)),
        ("lambda", column(|tube| tube.lambda)),
        ("lambda (NTE)", column(|tube| tube.lambda_limit)),
        ("fyD/Et (NTE 0.069)", column(|tube| tube.wall_slenderness)),
    ];

    let mut output = String::new();
    writeln!(&mut output, "{:<18} = {:?}", "fy (MPa)", params.yield_strength)
        .expect("writing to string cannot fail");
    for (label, values) in &rows {
        writeln!(&mut output, "{label:<18} = {}", format_list(values))
            .expect("writing to string cannot fail");
    }
    let verdicts: Vec<&str> = tubes
        .iter()
        .map(|tube| if tube.within_limits() { "OK" } else { "EXCEEDS" })
        .collect();
    writeln!(&mut output, "{:<18} = [{}]", "Within limits", verdicts.join(", "))
        .expect("writing to string cannot fail");
    output
}

/// Evaluate, print and optionally save the slenderness report.
///
/// # Errors
///
/// Returns [`CalcError::Io`] when `output` cannot be written.
pub fn run(params: &SlendernessParams, output: Option<&Path>) -> Result<Outcome, CalcError> {
    let tubes = evaluate(params);
    debug!(tubes = tubes.len(), "slenderness evaluated");
    let text = render(params, &tubes);
    save_text(&text, output)?;
    let artifacts = output.map(Path::to_path_buf).into_iter().collect();
    Ok(Outcome::reported(text, artifacts))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn threshold_ratio_keeps_full_yield_strength() {
        // 17 / 100 lands exactly on the 0.170 limit.
        assert_relative_eq!(local_buckling_strength(17.0, 100.0), 17.0);
        let reduced = local_buckling_strength(17.0, 99.0);
        assert_relative_eq!(reduced, (1.047 - 0.274 * 17.0 / 99.0) * 17.0);
    }

    #[test]
    fn default_tubes_are_stocky_enough_for_full_yield() {
        let tubes = evaluate(&SlendernessParams::default());
        assert_eq!(tubes.len(), 4);
        for tube in &tubes {
            assert_relative_eq!(tube.fyc, 400.0);
        }
        let first = tubes[0];
        assert_relative_eq!(first.fxe, 2.0 * 0.3 * 2.05e5 * 50.0 / 1300.0, max_relative = 1.0e-12);
        assert_relative_eq!(first.d_over_t, 26.0);
        assert_relative_eq!(first.radius, 442.295, max_relative = 1.0e-6);
        assert_relative_eq!(first.klr, 0.7 * 20518.0 / first.radius, max_relative = 1.0e-12);
    }

    #[test]
    fn slender_tube_fails_the_limits() {
        let params = SlendernessParams {
            diameters: vec![500.0],
            thicknesses: vec![10.0],
            lengths: vec![80_000.0],
            ..SlendernessParams::default()
        };
        let tubes = evaluate(&params);
        assert!(tubes[0].klr > KLR_LIMIT);
        assert!(!tubes[0].within_limits());
    }

    #[test]
    fn mismatched_tube_lists_are_rejected() {
        let params = SlendernessParams {
            lengths: vec![1.0],
            ..SlendernessParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigurationError::MalformedOption(_))
        ));
    }

    #[test]
    fn report_lists_every_quantity() {
        let params = SlendernessParams::default();
        let text = render(&params, &evaluate(&params));
        assert!(text.starts_with("fy (MPa)           = 400.0\n"));
        assert!(text.contains("D (mm)             = [1300.0, 900.0, 1000.0, 1200.0]"));
        assert!(text.contains("KL/r (NTE 80)"));
        assert_eq!(text.lines().count(), 16);
    }
}
