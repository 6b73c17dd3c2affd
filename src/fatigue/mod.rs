//! Fatigue S-N curves.

pub mod sn;
