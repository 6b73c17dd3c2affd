//! Waves: depth classification and design wave encounter probability.

pub mod storm_safety;
pub mod wavelength;
