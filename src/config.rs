//! Parameter resolution: compiled-in defaults, then a parameter file, then
//! command-line options.
//!
//! Every calculation describes its options as a plain struct implementing
//! [`Parameters`]. Serialising the default value yields the option schema, so
//! unknown names and ill-typed values are caught before any evaluator runs.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ConfigurationError;

/// A typed set of named options with documented defaults.
pub trait Parameters: Serialize + DeserializeOwned + Default {
    /// Check required options and admissible ranges after all layers merge.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingOption`] or
    /// [`ConfigurationError::OutOfRange`] for the first offending option.
    fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

/// Option values supplied at invocation, keyed by option name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    /// Raw values awaiting resolution.
    values: Map<String, Value>,
}

impl Overrides {
    /// Create an empty set of overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse overrides from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MalformedOption`] when `text` is not a JSON object.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigurationError> {
        match serde_json::from_str(text) {
            Ok(Value::Object(values)) => Ok(Self { values }),
            Ok(other) => Err(ConfigurationError::MalformedOption(format!(
                "parameter file must hold a JSON object, found {other}"
            ))),
            Err(error) => Err(ConfigurationError::MalformedOption(error.to_string())),
        }
    }

    /// Read overrides from a JSON parameter file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Unreadable`] when the file cannot be read and
    /// [`ConfigurationError::MalformedOption`] when it does not hold a JSON object.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigurationError> {
        let text = fs::read_to_string(path).map_err(|error| ConfigurationError::Unreadable {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    /// Set an option, replacing any earlier value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Set an option only when a value was supplied.
    pub fn set_some<T: Into<Value>>(&mut self, name: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.set(name, value);
        }
        self
    }

    /// Set a list-valued option when the list is not empty.
    pub fn set_list(&mut self, name: &str, values: &[f64]) -> &mut Self {
        if !values.is_empty() {
            self.set(name, values.to_vec());
        }
        self
    }

    /// Layer `other` on top of these overrides.
    pub fn merge(&mut self, other: Overrides) -> &mut Self {
        self.values.extend(other.values);
        self
    }

    /// Return `true` when no option is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolve the final parameter set for `P`.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownOption`] for names `P` does not define,
/// [`ConfigurationError::MalformedOption`] for values of the wrong type, and any
/// error raised by [`Parameters::validate`].
///
/// # Examples
/// ```
/// use offshorex::config::{resolve, Overrides};
/// use offshorex::wind::en1991::EnWindParams;
///
/// let mut overrides = Overrides::new();
/// overrides.set("height", 150.0);
/// let params: EnWindParams = resolve(&overrides).expect("valid height");
/// assert_eq!(params.height, 150.0);
/// ```
pub fn resolve<P: Parameters>(overrides: &Overrides) -> Result<P, ConfigurationError> {
    let mut merged = match serde_json::to_value(P::default()) {
        Ok(Value::Object(defaults)) => defaults,
        Ok(_) | Err(_) => {
            return Err(ConfigurationError::MalformedOption(
                "parameter defaults do not form an option table".to_string(),
            ))
        }
    };

    for (name, value) in &overrides.values {
        if !merged.contains_key(name) {
            return Err(ConfigurationError::UnknownOption(name.clone()));
        }
        debug!(option = %name, %value, "override applied");
        merged.insert(name.clone(), value.clone());
    }

    let params: P = serde_json::from_value(Value::Object(merged))
        .map_err(|error| ConfigurationError::MalformedOption(error.to_string()))?;
    params.validate()?;
    Ok(params)
}

/// Reject values that are not strictly positive.
pub(crate) fn positive(name: &str, value: f64) -> Result<(), ConfigurationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::out_of_range(name, value, "must be positive"))
    }
}
