//! Fits piecewise-cubic Bezier splines to streams of 2D points.
//!
//! Two entry points cover the two ways curves get built in practice:
//!
//! - [`fit`] and [`reduce`] for batch fitting: hand over a whole polyline up
//!   front and get back a `Vec<CubicBezier>` approximating it within a
//!   maximum error.
//! - [`builder::CurveBuilder`] / [`spline::SplineBuilder`] for incremental
//!   fitting: feed points one at a time (e.g. from a pointer-move stream)
//!   and sample a continuously-updated spline at any point.
//!
//! The least-squares kernel ([`fit::generate_bezier`], Newton-Raphson
//! reparameterization, and the split-on-max-error driver) is shared between
//! both paths.

pub mod bezier;
pub mod builder;
pub mod consts;
pub mod error;
pub mod fit;
pub mod point;
pub mod preprocess;
pub mod spline;

pub use bezier::{four_point_bezier, CubicBezier};
pub use builder::{AddPointResult, CurveBuilder};
pub use error::{CurveFitError, CurveFitResult};
pub use fit::{fit, fit_curve_raw};
pub use point::Point;
pub use preprocess::rdp_reduce as reduce;
pub use spline::{SamplePos, Spline, SplineBuilder};
