//! Offshore crane lifting.

pub mod hoist;
