#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod fatigue;
pub mod fenders;
pub mod lifting;
pub mod marine;
pub mod plate;
pub mod plot;
pub mod register;
pub mod reliability;
pub mod report;
pub mod sweep;
pub mod tubular;
pub mod units;
pub mod waves;
pub mod wind;

pub use errors::{CalcError, ConfigurationError, DomainWarning, RenderError};
