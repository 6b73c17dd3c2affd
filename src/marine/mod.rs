//! Marine operations: transport inertia forces, overhung piles during tow,
//! dropped objects and jacket flooding.

pub mod dropped_object;
pub mod flooding;
pub mod motions;
pub mod pile_tow;
