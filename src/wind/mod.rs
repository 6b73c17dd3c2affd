//! Wind: EN 1991-1-4 action profiles, ISO 19901-1 speed profiles and the
//! Weibull gust density.

pub mod en1991;
pub mod gust_pdf;
pub mod iso19901;
