//! Mode selection and run outcomes shared by every calculation.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::DomainWarning;

/// What a single calculation run produced.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Artifacts were written; `text` holds any report meant for standard output.
    Completed {
        /// Files written during the run, in the order they were produced.
        artifacts: Vec<PathBuf>,
        /// Report text for standard output, if the calculation prints one.
        text: Option<String>,
    },
    /// An input lies outside the formula's applicability range; nothing was written.
    Skipped(DomainWarning),
    /// No mode (or more than one) was selected; nothing was written.
    NoSelection {
        /// Diagnostic telling the user how to pick a mode.
        hint: String,
    },
}

impl Outcome {
    /// A run that wrote `artifacts` and printed nothing.
    #[must_use]
    pub fn written(artifacts: Vec<PathBuf>) -> Self {
        Self::Completed {
            artifacts,
            text: None,
        }
    }

    /// A run that printed `text`, optionally alongside artifacts.
    #[must_use]
    pub fn reported(text: String, artifacts: Vec<PathBuf>) -> Self {
        Self::Completed {
            artifacts,
            text: Some(text),
        }
    }

    /// A run skipped because of `warning`.
    #[must_use]
    pub fn skipped(warning: DomainWarning) -> Self {
        warn!("{warning}");
        Self::Skipped(warning)
    }

    /// A run that had no mode to dispatch to.
    #[must_use]
    pub fn no_selection(command: &str) -> Self {
        let hint = format!("No option was selected. For help, try: offshorex {command} --help");
        warn!("{hint}");
        Self::NoSelection { hint }
    }

    /// Files written by the run; empty unless the run completed.
    #[must_use]
    pub fn artifacts(&self) -> &[PathBuf] {
        match self {
            Self::Completed { artifacts, .. } => artifacts,
            Self::Skipped(_) | Self::NoSelection { .. } => &[],
        }
    }
}

/// Pick the single mode whose flag is set.
///
/// Returns `None` when no flag or more than one flag is set.
///
/// # Examples
/// ```
/// use offshorex::dispatch::select_mode;
///
/// assert_eq!(select_mode(&[(false, 'i'), (true, 'p')]), Some('p'));
/// assert_eq!(select_mode::<char>(&[(false, 'i'), (false, 'p')]), None);
/// assert_eq!(select_mode(&[(true, 'i'), (true, 'p')]), None);
/// ```
#[must_use]
pub fn select_mode<M: Copy>(flags: &[(bool, M)]) -> Option<M> {
    let mut selected = flags.iter().filter(|(set, _)| *set).map(|(_, mode)| *mode);
    match (selected.next(), selected.next()) {
        (Some(mode), None) => Some(mode),
        _ => None,
    }
}

/// Location of artifact `name` inside `out_dir`.
pub(crate) fn artifact(out_dir: &Path, name: &str) -> PathBuf {
    out_dir.join(name)
}

/// Log a finished artifact.
pub(crate) fn record(path: &Path) {
    info!(artifact = %path.display(), "written");
}
