//! Cubic Bezier curve type and evaluation.

use crate::point::Point;

/// A cubic Bezier curve defined by two on-curve endpoints and two control points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        CubicBezier { p0, p1, p2, p3 }
    }

    /// A degenerate curve with both control points pinned to the endpoints.
    pub fn linear(p0: Point, p3: Point) -> Self {
        CubicBezier {
            p0,
            p1: p0,
            p2: p3,
            p3,
        }
    }

    /// Evaluates the curve position at parameter `t` in `[0, 1]`.
    pub fn sample(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let uu = u * u;
        let tt = t * t;
        let uuu = uu * u;
        let ttt = tt * t;
        self.p0 * uuu + self.p1 * (3.0 * uu * t) + self.p2 * (3.0 * u * tt) + self.p3 * ttt
    }

    /// Evaluates the first derivative (not normalized) at parameter `t`.
    pub fn derivative(&self, t: f64) -> Point {
        let u = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * u * u)
            + (self.p2 - self.p1) * (6.0 * u * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }

    /// Evaluates the unit tangent direction at parameter `t`.
    pub fn tangent(&self, t: f64) -> Point {
        self.derivative(t).normalized()
    }
}

impl std::fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CubicBezier: ({} {} {} {})",
            self.p0, self.p1, self.p2, self.p3
        )
    }
}

/// Builds the two interior control points of a cubic Bezier that interpolates
/// four given on-curve points, using centripetal parameterization.
///
/// Unlike [`crate::fit::fit_curve`], this does not run a least-squares
/// search -- it solves directly for control points that make the curve pass
/// through all four samples at the centripetal parameter values. Returns
/// `(p1, p2)`, the control points sitting between `p0`/`p3`.
///
/// See <https://apoorvaj.io/cubic-bezier-through-four-points/>.
pub fn four_point_bezier(p0: Point, p1: Point, p2: Point, p3: Point) -> (Point, Point) {
    const ALPHA: f64 = 0.5;
    let d1 = p1.distance_to(p0).powf(ALPHA);
    let d2 = p2.distance_to(p1).powf(ALPHA);
    let d3 = p3.distance_to(p2).powf(ALPHA);

    let a = d1 * d1;
    let b = d2 * d2;
    let c = 2.0 * d1 * d1 + 3.0 * d1 * d2 + d2 * d2;
    let d = 3.0 * d1 * (d1 + d2);
    let t1 = Point::new(
        (a * p2.x - b * p0.x + c * p1.x) / d,
        (a * p2.y - b * p0.y + c * p1.y) / d,
    );

    let a = d3 * d3;
    let b = d2 * d2;
    let c = 2.0 * d3 * d3 + 3.0 * d3 * d2 + d2 * d2;
    let d = 3.0 * d3 * (d3 + d2);
    let t2 = Point::new(
        (a * p1.x - b * p3.x + c * p2.x) / d,
        (a * p1.y - b * p3.y + c * p2.y) / d,
    );

    (t1, t2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_endpoints() {
        let c = CubicBezier::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 0.0),
        );
        assert_eq!(c.sample(0.0), c.p0);
        assert_eq!(c.sample(1.0), c.p3);
    }

    #[test]
    fn linear_curve_is_a_line() {
        let p0 = Point::new(0.0, 0.0);
        let p3 = Point::new(10.0, 0.0);
        let c = CubicBezier::linear(p0, p3);
        let mid = c.sample(0.5);
        assert!((mid.x - 5.0).abs() < 1e-9);
        assert!(mid.y.abs() < 1e-9);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let c = CubicBezier::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(3.0, 2.0),
            Point::new(4.0, 0.0),
        );
        let t = 0.37;
        let h = 1e-6;
        let numeric = (c.sample(t + h) - c.sample(t - h)) * (1.0 / (2.0 * h));
        let analytic = c.derivative(t);
        assert!((numeric.x - analytic.x).abs() < 1e-3);
        assert!((numeric.y - analytic.y).abs() < 1e-3);
    }

    #[test]
    fn tangent_is_unit_length() {
        let c = CubicBezier::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(3.0, 2.0),
            Point::new(4.0, 0.0),
        );
        let t = c.tangent(0.5);
        assert!((t.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn display_format() {
        let c = CubicBezier::linear(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let s = c.to_string();
        assert!(s.starts_with("CubicBezier:"));
    }

    #[test]
    fn four_point_bezier_hits_endpoints() {
        let p0 = Point::new(0.0, 0.0);
        let p1 = Point::new(1.0, 1.0);
        let p2 = Point::new(2.0, 1.0);
        let p3 = Point::new(3.0, 0.0);
        let (c1, c2) = four_point_bezier(p0, p1, p2, p3);
        let curve = CubicBezier::new(p0, c1, c2, p3);
        assert_eq!(curve.sample(0.0), p0);
        assert_eq!(curve.sample(1.0), p3);
    }
}
