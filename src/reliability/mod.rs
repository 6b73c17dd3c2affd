//! Structural reliability: load and resistance densities, and the partial
//! action factor against return period.

pub mod density;
pub mod partial_factor;
