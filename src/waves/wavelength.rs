//! Water depth classification and wave length for a set of wave periods.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{positive, Parameters};
use crate::dispatch::Outcome;
use crate::errors::ConfigurationError;
use crate::report::format_list;

/// `d/L` at or above which water counts as deep.
pub const DEEP_RATIO: f64 = 0.5;
/// `d/L` at or below which water counts as shallow.
pub const SHALLOW_RATIO: f64 = 0.05;

/// Site inputs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WavelengthParams {
    /// Water depth `d` (m).
    pub depth: f64,
    /// Wave periods `T` (s).
    pub periods: Vec<f64>,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
}

impl Default for WavelengthParams {
    fn default() -> Self {
        Self {
            depth: 171.18,
            periods: vec![9.4, 11.5, 12.0],
            gravity: 9.81,
        }
    }
}

impl Parameters for WavelengthParams {
    fn validate(&self) -> Result<(), ConfigurationError> {
        positive("depth", self.depth)?;
        positive("gravity", self.gravity)
    }
}

/// Water depth type relative to wave length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthType {
    /// `d/L >= 0.5`.
    Deep,
    /// `0.05 < d/L < 0.5`.
    Intermediate,
    /// `d/L <= 0.05`.
    Shallow,
}

impl DepthType {
    /// Classify a depth-to-length ratio.
    ///
    /// # Examples
    /// ```
    /// use offshorex::waves::wavelength::DepthType;
    ///
    /// assert_eq!(DepthType::classify(0.5), DepthType::Deep);
    /// assert_eq!(DepthType::classify(0.05), DepthType::Shallow);
    /// assert_eq!(DepthType::classify(0.2), DepthType::Intermediate);
    /// ```
    #[must_use]
    pub fn classify(ratio: f64) -> Self {
        if ratio >= DEEP_RATIO {
            Self::Deep
        } else if ratio <= SHALLOW_RATIO {
            Self::Shallow
        } else {
            Self::Intermediate
        }
    }

    /// Symbol of the wave length family that applies.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Deep => "Ld",
            Self::Intermediate => "Li",
            Self::Shallow => "Ls",
        }
    }
}

impl fmt::Display for DepthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Deep => "Deep",
            Self::Intermediate => "Intermediate",
            Self::Shallow => "Shallow",
        };
        f.write_str(name)
    }
}

/// Deep water wave lengths `Ld = g T² / 2π`.
#[must_use]
pub fn deep_water_lengths(params: &WavelengthParams) -> Vec<f64> {
    params
        .periods
        .iter()
        .map(|period| params.gravity * period.powi(2) / (2.0 * PI))
        .collect()
}

/// Shallow water wave lengths `Ls = T √(g d)`.
#[must_use]
pub fn shallow_water_lengths(params: &WavelengthParams) -> Vec<f64> {
    let celerity = (params.gravity * params.depth).sqrt();
    params.periods.iter().map(|period| period * celerity).collect()
}

/// Intermediate depth wave lengths `Li = Ld √(tanh(2π d / Ld))`.
#[must_use]
pub fn intermediate_lengths(params: &WavelengthParams) -> Vec<f64> {
    deep_water_lengths(params)
        .into_iter()
        .map(|ld| ld * (2.0 * PI * params.depth / ld).tanh().sqrt())
        .collect()
}

/// Wave lengths of the family matching `depth_type`.
#[must_use]
pub fn lengths_for(params: &WavelengthParams, depth_type: DepthType) -> Vec<f64> {
    match depth_type {
        DepthType::Deep => deep_water_lengths(params),
        DepthType::Intermediate => intermediate_lengths(params),
        DepthType::Shallow => shallow_water_lengths(params),
    }
}

/// Classify every `d/L` ratio of all three families and take the majority.
///
/// Ties go to the class seen first, scanning deep, shallow then intermediate
/// lengths in period order. Returns `None` when no periods are given.
#[must_use]
pub fn classify(params: &WavelengthParams) -> Option<DepthType> {
    let votes: Vec<DepthType> = [
        deep_water_lengths(params),
        shallow_water_lengths(params),
        intermediate_lengths(params),
    ]
    .iter()
    .flatten()
    .map(|length| DepthType::classify(params.depth / length))
    .collect();
    debug!(?votes, "depth type votes");

    let count = |candidate: DepthType| votes.iter().filter(|&&vote| vote == candidate).count();
    let mut winner: Option<(DepthType, usize)> = None;
    for &vote in &votes {
        let tally = count(vote);
        if winner.map_or(true, |(_, best)| tally > best) {
            winner = Some((vote, tally));
        }
    }
    winner.map(|(depth_type, _)| depth_type)
}

/// Report depth, periods, the majority class and the matching wave lengths.
#[must_use]
pub fn report(params: &WavelengthParams) -> String {
    let mut lines = vec![
        format!("Water depth: {:?}", params.depth),
        format!("Wave periods: {}", format_list(&params.periods)),
    ];
    match classify(params) {
        Some(depth_type) => {
            lines.push(format!("Water depth type (by majority): {depth_type}"));
            lines.push(format!(
                "Wave length, {}: {}",
                depth_type.symbol(),
                format_list(&lengths_for(params, depth_type))
            ));
        }
        None => lines.push("d/T ratio does not match a criteria.".to_string()),
    }
    lines.join("\n") + "\n"
}

/// Print the wave length report.
#[must_use]
pub fn run(params: &WavelengthParams) -> Outcome {
    Outcome::reported(report(params), Vec::new())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn ratio_thresholds_are_inclusive() {
        assert_eq!(DepthType::classify(0.500_000_1), DepthType::Deep);
        assert_eq!(DepthType::classify(0.499_999_9), DepthType::Intermediate);
        assert_eq!(DepthType::classify(0.050_000_1), DepthType::Intermediate);
    }

    #[test]
    fn intermediate_lengths_never_exceed_deep_water_lengths() {
        let params = WavelengthParams {
            depth: 20.0,
            ..WavelengthParams::default()
        };
        for (li, ld) in intermediate_lengths(&params).iter().zip(deep_water_lengths(&params)) {
            assert!(*li < ld);
        }
    }

    #[test]
    fn shallow_site_votes_shallow() {
        let params = WavelengthParams {
            depth: 2.0,
            periods: vec![14.0, 16.0],
            gravity: 9.81,
        };
        assert_eq!(classify(&params), Some(DepthType::Shallow));
    }

    #[test]
    fn tie_goes_to_the_first_class_seen() {
        // A 2 s wave votes Deep three times and a 40 s wave votes Shallow
        // three times; period order decides which is seen first.
        let mut params = WavelengthParams {
            depth: 10.0,
            periods: vec![2.0, 40.0],
            gravity: 9.81,
        };
        assert_eq!(classify(&params), Some(DepthType::Deep));
        params.periods.reverse();
        assert_eq!(classify(&params), Some(DepthType::Shallow));

        let empty = WavelengthParams {
            periods: Vec::new(),
            ..WavelengthParams::default()
        };
        assert_eq!(classify(&empty), None);
    }

    #[test]
    fn default_site_is_deep() {
        let params = WavelengthParams::default();
        assert_eq!(classify(&params), Some(DepthType::Deep));
        let lengths = deep_water_lengths(&params);
        assert_relative_eq!(lengths[0], 137.957_350_869, max_relative = 1.0e-9);
        let text = report(&params);
        assert!(text.contains("Water depth type (by majority): Deep"));
        assert!(text.contains("Wave length, Ld: [137.9"));
    }
}
