//! Unit conversions backed by `uom`.

use uom::si::angle::{degree, radian};
use uom::si::f64::{Angle, Length};
use uom::si::length::{foot, meter, millimeter};

use crate::sweep::Sweep;

/// Millimetres to metres.
///
/// # Examples
/// ```
/// use offshorex::units::mm_to_m;
///
/// assert!((mm_to_m(50.0) - 0.05).abs() < 1.0e-15);
/// ```
#[must_use]
pub fn mm_to_m(value: f64) -> f64 {
    Length::new::<millimeter>(value).get::<meter>()
}

/// Metres to millimetres.
#[must_use]
pub fn m_to_mm(value: f64) -> f64 {
    Length::new::<meter>(value).get::<millimeter>()
}

/// Feet to metres.
#[must_use]
pub fn ft_to_m(value: f64) -> f64 {
    Length::new::<foot>(value).get::<meter>()
}

/// Metres to feet.
#[must_use]
pub fn m_to_ft(value: f64) -> f64 {
    Length::new::<meter>(value).get::<foot>()
}

/// Degrees to radians.
#[must_use]
pub fn deg_to_rad(value: f64) -> f64 {
    Angle::new::<degree>(value).get::<radian>()
}

/// Radians to degrees.
#[must_use]
pub fn rad_to_deg(value: f64) -> f64 {
    Angle::new::<radian>(value).get::<degree>()
}

/// Convert every millimetre value in a sweep to metres.
#[must_use]
pub fn sweep_mm_to_m(values: &Sweep) -> Sweep {
    values.mapv(mm_to_m)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn conversions_invert_each_other() {
        for value in [0.0, 1.0e-3, 0.022, 3.0, 171.18, 5400.0, -12.5] {
            assert_relative_eq!(m_to_mm(mm_to_m(value)), value, max_relative = 1.0e-12);
            assert_relative_eq!(mm_to_m(m_to_mm(value)), value, max_relative = 1.0e-12);
            assert_relative_eq!(m_to_ft(ft_to_m(value)), value, max_relative = 1.0e-12);
            assert_relative_eq!(rad_to_deg(deg_to_rad(value)), value, max_relative = 1.0e-12);
        }
    }

    #[test]
    fn known_factors() {
        assert_relative_eq!(ft_to_m(1.0), 0.3048, max_relative = 1.0e-12);
        assert_relative_eq!(deg_to_rad(180.0), std::f64::consts::PI, max_relative = 1.0e-12);
    }

    #[test]
    fn sweep_conversion_keeps_length() {
        let diameters = crate::sweep::arange(1.0, 100.0, 1.0);
        let metres = sweep_mm_to_m(&diameters);
        assert_eq!(metres.len(), diameters.len());
        assert_relative_eq!(metres[49], 0.05, max_relative = 1.0e-12);
    }
}
