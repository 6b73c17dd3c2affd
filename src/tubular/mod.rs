//! Tubular member checks: section properties, slenderness, interaction and VIV.

pub mod interaction;
pub mod section;
pub mod slenderness;
pub mod viv;
