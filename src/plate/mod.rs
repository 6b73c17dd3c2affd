//! Plate checks.

pub mod yield_line;
