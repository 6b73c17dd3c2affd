//! Error types produced while resolving parameters, evaluating and rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Error returned when a parameter set cannot be resolved.
///
/// Any of these stops the run before an evaluator is called, so no artifact is
/// produced.
///
/// # Examples
///
/// ```
/// use offshorex::config::{resolve, Overrides};
/// use offshorex::wind::iso19901::IsoWindParams;
/// use offshorex::ConfigurationError;
///
/// let error = resolve::<IsoWindParams>(&Overrides::new())
///     .expect_err("reference speed has no default");
/// assert_eq!(error, ConfigurationError::MissingOption("speed".to_string()));
/// ```
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    /// Returned when a required option has no default and was not supplied.
    #[error("required option `{0}` was not supplied")]
    MissingOption(String),
    /// Returned when a supplied value does not parse as the option's type.
    #[error("malformed option value: {0}")]
    MalformedOption(String),
    /// Returned when an override names an option the calculation does not have.
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    /// Returned when a value parses but lies outside its admissible range.
    #[error("option `{name}` = {value} is out of range: {reason}")]
    OutOfRange {
        /// Name of the offending option.
        name: String,
        /// Rejected value.
        value: f64,
        /// Admissible range, in words.
        reason: &'static str,
    },
    /// Returned when a parameter file cannot be read.
    #[error("cannot read parameter file {path:?}: {message}")]
    Unreadable {
        /// Location of the parameter file.
        path: PathBuf,
        /// Underlying I/O message.
        message: String,
    },
}

impl ConfigurationError {
    /// Shorthand for [`ConfigurationError::OutOfRange`].
    pub(crate) fn out_of_range(name: &str, value: f64, reason: &'static str) -> Self {
        Self::OutOfRange {
            name: name.to_string(),
            value,
            reason,
        }
    }
}

/// Non-fatal notice that an input lies outside a formula's applicability range.
///
/// The affected computation is skipped instead of drawing a misleading chart.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainWarning {
    /// Structure height above the reference height of EN 1991-1-4 Annex B.
    #[error("height {height} m > {limit} m, for which these plots are not appropriate")]
    HeightAboveReference {
        /// Requested structure height in metres.
        height: f64,
        /// Reference height `zt` in metres.
        limit: f64,
    },
}

/// Error returned when a figure cannot be drawn or saved.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Returned when the backend fails while drawing or writing the artifact.
    #[error("failed to draw {path:?}: {message}")]
    Draw {
        /// Artifact being written.
        path: PathBuf,
        /// Backend error message.
        message: String,
    },
    /// Returned when the artifact extension maps to no known backend.
    #[error("unsupported artifact format {0:?} (expected .svg or .png)")]
    UnsupportedFormat(PathBuf),
}

/// Umbrella error for a single calculation run.
#[derive(Debug, Error)]
pub enum CalcError {
    /// Parameter resolution failed.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Rendering a figure failed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Reading an input table or writing a report failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Parsing or writing CSV data failed.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// An input table lacks a column the calculation needs.
    #[error("input table has no `{0}` column")]
    MissingColumn(String),
}
