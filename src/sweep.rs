//! Builders for the independent-variable sequences every calculation sweeps over.

use ndarray::Array1;

/// An ordered, finite sequence of an independent variable.
pub type Sweep = Array1<f64>;

/// Number of samples used when a sweep is only bounded, not sized.
pub const DEFAULT_POINTS: usize = 50;

/// Evenly spaced values from `start` to `end`, both inclusive.
///
/// # Examples
/// ```
/// use offshorex::sweep::linspace;
///
/// let z = linspace(1.0, 2.0, 5);
/// assert_eq!(z.len(), 5);
/// assert_eq!(z[4], 2.0);
/// ```
#[must_use]
pub fn linspace(start: f64, end: f64, n: usize) -> Sweep {
    Array1::linspace(start, end, n)
}

/// [`linspace`] with [`DEFAULT_POINTS`] samples.
#[must_use]
pub fn span(start: f64, end: f64) -> Sweep {
    linspace(start, end, DEFAULT_POINTS)
}

/// Values `start, start + step, …` strictly below `stop`.
///
/// # Examples
/// ```
/// use offshorex::sweep::arange;
///
/// let n = arange(1.0, 4.0, 1.0);
/// assert_eq!(n.to_vec(), vec![1.0, 2.0, 3.0]);
/// ```
#[must_use]
pub fn arange(start: f64, stop: f64, step: f64) -> Sweep {
    Array1::range(start, stop, step)
}

/// `n` values spaced evenly in log10 between `start` and `end`, both inclusive.
///
/// Both bounds must be positive.
#[must_use]
pub fn logspace(start: f64, end: f64, n: usize) -> Sweep {
    Array1::logspace(10.0, start.log10(), end.log10(), n)
}

/// A sweep holding `value` `n` times, for broadcasting constants against a sweep.
#[must_use]
pub fn constant(value: f64, n: usize) -> Sweep {
    Array1::from_elem(n, value)
}

/// Round to `decimals` places, resolving halves to the even neighbour.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}
