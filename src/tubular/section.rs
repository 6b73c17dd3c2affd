//! Section properties of circular hollow sections.

use std::f64::consts::PI;

/// A tubular (pipe) cross section. Units are whatever the caller uses for
/// both dimensions; results carry the matching powers of that unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipeSection {
    /// Outside diameter.
    pub diameter: f64,
    /// Wall thickness.
    pub thickness: f64,
}

impl PipeSection {
    /// Create a section from its outside diameter and wall thickness.
    #[must_use]
    pub const fn new(diameter: f64, thickness: f64) -> Self {
        Self {
            diameter,
            thickness,
        }
    }

    /// Inside diameter `D - 2t`.
    #[must_use]
    pub fn inner_diameter(&self) -> f64 {
        self.diameter - 2.0 * self.thickness
    }

    /// Area measured on the mean diameter, `π (D - t) t`.
    #[must_use]
    pub fn area(&self) -> f64 {
        PI * (self.diameter - self.thickness) * self.thickness
    }

    /// Exact annulus area `π/4 (D² - (D - 2t)²)`.
    #[must_use]
    pub fn annulus_area(&self) -> f64 {
        (PI / 4.0) * (self.diameter.powi(2) - self.inner_diameter().powi(2))
    }

    /// Second moment of area `π/64 (D⁴ - (D - 2t)⁴)`.
    #[must_use]
    pub fn moment_of_inertia(&self) -> f64 {
        (PI / 64.0) * (self.diameter.powi(4) - self.inner_diameter().powi(4))
    }

    /// Polar moment of area, twice the second moment.
    #[must_use]
    pub fn polar_moment(&self) -> f64 {
        (PI / 32.0) * (self.diameter.powi(4) - self.inner_diameter().powi(4))
    }

    /// Elastic section modulus `I / (D/2)`.
    #[must_use]
    pub fn elastic_modulus(&self) -> f64 {
        self.moment_of_inertia() / (self.diameter / 2.0)
    }

    /// Plastic section modulus `(D³ - (D - 2t)³) / 6`.
    #[must_use]
    pub fn plastic_modulus(&self) -> f64 {
        (self.diameter.powi(3) - self.inner_diameter().powi(3)) / 6.0
    }

    /// Radius of gyration `√(I / A)`.
    #[must_use]
    pub fn radius_of_gyration(&self) -> f64 {
        (self.moment_of_inertia() / self.area()).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn mean_diameter_area_equals_annulus() {
        let pile = PipeSection::new(3.0, 0.038);
        assert_relative_eq!(pile.area(), pile.annulus_area(), max_relative = 1.0e-12);
    }

    #[test]
    fn moduli_follow_from_inertia() {
        let tube = PipeSection::new(1300.0, 50.0);
        assert_relative_eq!(tube.polar_moment(), 2.0 * tube.moment_of_inertia(), max_relative = 1.0e-12);
        assert_relative_eq!(
            tube.elastic_modulus(),
            tube.moment_of_inertia() / 650.0,
            max_relative = 1.0e-12
        );
        assert!(tube.plastic_modulus() > tube.elastic_modulus());
        assert_relative_eq!(tube.radius_of_gyration(), 442.295, max_relative = 1.0e-5);
    }
}
