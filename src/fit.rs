//! Least-squares cubic Bezier fitting kernel.
//!
//! This is the shared numeric core used by both the batch [`fit`] entry
//! point and the incremental [`crate::builder::CurveBuilder`]. It operates
//! on plain slices rather than an owning struct so both callers can reuse
//! the same point/arc-length buffers without extra allocation or a shared
//! mutable-state object.

use crate::bezier::CubicBezier;
use crate::consts::{END_TANGENT_N_PTS, MAX_ITERS, MID_TANGENT_N_PTS};
use crate::error::{CurveFitError, CurveFitResult};
use crate::point::Point;
use crate::preprocess::rdp_reduce;

/// Outcome of attempting to fit a single cubic Bezier to a point range. The
/// fitted curve is always present, even when the error tolerance was not
/// met -- callers that do a final, unconditional refit per sub-range (as
/// [`crate::builder::CurveBuilder`] does) need that curve regardless.
pub(crate) enum FitStatus {
    /// The curve fit within tolerance.
    Fit,
    /// The curve did not fit within tolerance; split at this index.
    Split(usize),
}

/// Builds the cumulative chord-length table for `pts`: `arclen[0] == 0.0`
/// and `arclen[i]` is the total polyline length from `pts[0]` to `pts[i]`.
pub fn initialize_arc_lengths(pts: &[Point]) -> Vec<f64> {
    let mut arclen = Vec::with_capacity(pts.len());
    arclen.push(0.0);
    let mut clen = 0.0;
    let mut pp = pts[0];
    for &np in &pts[1..] {
        clen += pp.distance_to(np);
        arclen.push(clen);
        pp = np;
    }
    arclen
}

/// Estimates the tangent direction leaving the start of the range ending at
/// `last`, weighting nearby points more heavily via cubic falloff.
pub fn get_left_tangent(pts: &[Point], arclen: &[f64], last: usize) -> Point {
    let count = pts.len();
    let total_len = arclen[count - 1];
    let p0 = pts[0];
    let mut tan_l = (pts[1] - p0).normalized();
    let mut total = tan_l;
    let mut weight_total = 1.0;
    let last = END_TANGENT_N_PTS.min(last - 1);
    for i in 2..=last {
        let ti = 1.0 - (arclen[i] / total_len);
        let weight = ti * ti * ti;
        let v = (pts[i] - p0).normalized();
        total = total + v * weight;
        weight_total += weight;
    }
    if total.length() > f64::EPSILON {
        tan_l = (total * (1.0 / weight_total)).normalized();
    }
    tan_l
}

/// Estimates the tangent direction entering the end of the range starting at
/// `first`, weighting nearby points more heavily via cubic falloff.
pub fn get_right_tangent(pts: &[Point], arclen: &[f64], first: usize) -> Point {
    let count = pts.len();
    let total_len = arclen[count - 1];
    let p3 = pts[count - 1];
    let mut tan_r = (pts[count - 2] - p3).normalized();
    let mut total = tan_r;
    let mut weight_total = 1.0;
    let first = (count as isize - (END_TANGENT_N_PTS as isize + 1)).max(first as isize + 1);
    let mut i = count as isize - 3;
    while i >= first {
        let idx = i as usize;
        let t = arclen[idx] / total_len;
        let weight = t * t * t;
        let v = (pts[idx] - p3).normalized();
        total = total + v * weight;
        weight_total += weight;
        i -= 1;
    }
    if total.length() > f64::EPSILON {
        tan_r = (total * (1.0 / weight_total)).normalized();
    }
    tan_r
}

/// Estimates the pair of opposing tangents at an interior split point,
/// looking inward at the points bracketing the split on each side.
pub fn get_center_tangent(pts: &[Point], arclen: &[f64], first: usize, last: usize, split: usize) -> Point {
    let split_len = arclen[split];
    let p_split = pts[split];

    let first_len = arclen[first];
    let part_len = split_len - first_len;
    let mut total = Point::ZERO;
    let mut weight_total = 0.0;
    let lo = first.max(split.saturating_sub(MID_TANGENT_N_PTS));
    for i in lo..split {
        let t = (arclen[i] - first_len) / part_len;
        let weight = t * t * t;
        let v = (pts[i] - p_split).normalized();
        total = total + v * weight;
        weight_total += weight;
    }
    let tan_l = if total.length() > f64::EPSILON && weight_total > f64::EPSILON {
        (total * (1.0 / weight_total)).normalized()
    } else {
        (pts[split - 1] - p_split).normalized()
    };

    let part_len = arclen[last] - split_len;
    let r_max = last.min(split + MID_TANGENT_N_PTS);
    let mut total = Point::ZERO;
    let mut weight_total = 0.0;
    for i in (split + 1)..=r_max {
        let ti = 1.0 - ((arclen[i] - split_len) / part_len);
        let weight = ti * ti * ti;
        let v = (p_split - pts[i]).normalized();
        total = total + v * weight;
        weight_total += weight;
    }
    let tan_r = if total.length() > f64::EPSILON && weight_total > f64::EPSILON {
        (total * (1.0 / weight_total)).normalized()
    } else {
        (p_split - pts[split + 1]).normalized()
    };

    let total = tan_l + tan_r;
    if total.length_squared() < f64::EPSILON {
        let tan_l = (pts[split - 1] - p_split).normalized();
        let tan_r = (p_split - pts[split + 1]).normalized();
        let total = tan_l + tan_r;
        if total.length_squared() < f64::EPSILON {
            tan_l
        } else {
            (total * 0.5).normalized()
        }
    } else {
        (total * 0.5).normalized()
    }
}

/// Assigns an initial chord-length parameter value in `[0, 1]` to every
/// point in `pts[first..=last]`, stored as `u[0..=last-first]`.
pub fn arc_length_parameterize(arclen: &[f64], first: usize, last: usize) -> Vec<f64> {
    let diff = arclen[last] - arclen[first];
    let start = arclen[first];
    let n_pts = last - first;
    let mut u = Vec::with_capacity(n_pts + 1);
    u.push(0.0);
    for i in 1..n_pts {
        u.push((arclen[first + i] - start) / diff);
    }
    u.push(1.0);
    u
}

/// Solves for the two interior control points of a cubic Bezier from
/// `first`/`last` endpoints, fixed end tangents, and parameter values `u`,
/// via least squares. Falls back to the Wu/Barsky heuristic when the normal
/// equations are degenerate or yield an untrustworthy (negative/tiny) alpha.
pub fn generate_bezier(pts: &[Point], u: &[f64], first: usize, last: usize, tan_l: Point, tan_r: Point) -> CubicBezier {
    let n_pts = last - first + 1;
    let p0 = pts[first];
    let p3 = pts[last];
    let (mut c00, mut c01, mut c11, mut x0, mut x1) = (0.0, 0.0, 0.0, 0.0, 0.0);

    for i in 1..n_pts {
        let t = u[i];
        let ti = 1.0 - t;
        let t0 = ti * ti * ti;
        let t1 = 3.0 * ti * ti * t;
        let t2 = 3.0 * ti * t * t;
        let t3 = t * t * t;

        let s = (p0 * t0) + (p0 * t1) + (p3 * t2) + (p3 * t3);
        let v = pts[first + i] - s;

        let a0 = tan_l * t1;
        let a1 = tan_r * t2;
        c00 += a0.dot(a0);
        c01 += a0.dot(a1);
        c11 += a1.dot(a1);

        x0 += a0.dot(v);
        x1 += a1.dot(v);
    }

    let det_c0_c1 = c00 * c11 - c01 * c01;
    let det_c0_x = c00 * x1 - c01 * x0;
    let det_x_c1 = x0 * c11 - x1 * c01;
    let alpha_l = det_x_c1 / det_c0_c1;
    let alpha_r = det_c0_x / det_c0_c1;

    let lin_dist = p0.distance_to(p3);
    let epsilon2 = f64::EPSILON * lin_dist;
    if det_c0_c1.abs() < f64::EPSILON || alpha_l < epsilon2 || alpha_r < epsilon2 {
        let alpha = lin_dist / 3.0;
        let p1 = (tan_l * alpha) + p0;
        let p2 = (tan_r * alpha) + p3;
        CubicBezier::new(p0, p1, p2, p3)
    } else {
        let p1 = (tan_l * alpha_l) + p0;
        let p2 = (tan_r * alpha_r) + p3;
        CubicBezier::new(p0, p1, p2, p3)
    }
}

/// Refines parameter values `u` in place using one Newton-Raphson step per
/// interior point against the curve produced from the previous parameters.
pub fn reparameterize(pts: &[Point], u: &mut [f64], first: usize, last: usize, curve: &CubicBezier) {
    let n_pts = last - first;
    for i in 1..n_pts {
        let p = pts[first + i];
        let t = u[i];
        let ti = 1.0 - t;

        let qp0 = (curve.p1 - curve.p0) * 3.0;
        let qp1 = (curve.p2 - curve.p1) * 3.0;
        let qp2 = (curve.p3 - curve.p2) * 3.0;

        let qpp0 = (qp1 - qp0) * 2.0;
        let qpp1 = (qp2 - qp1) * 2.0;

        let p0 = curve.sample(t);
        let p1 = (qp0 * (ti * ti)) + (qp1 * (2.0 * ti * t)) + (qp2 * (t * t));
        let p2 = (qpp0 * ti) + (qpp1 * t);

        let num = (p0.x - p.x) * p1.x + (p0.y - p.y) * p1.y;
        let den = p1.x * p1.x + p1.y * p1.y + (p0.x - p.x) * p2.x + (p0.y - p.y) * p2.y;
        let new_u = t - num / den;
        if den.abs() > f64::EPSILON && (0.0..=1.0).contains(&new_u) {
            u[i] = new_u;
        }
    }
}

/// Finds the point in `pts[first..=last]` with the greatest squared distance
/// from `curve` under the current parameterization `u`. Returns `(max
/// squared error, split index)`; the split index is clamped to the open
/// interval `(first, last)` so it is always usable as a recursion boundary.
pub fn find_max_squared_error(pts: &[Point], u: &[f64], first: usize, last: usize, curve: &CubicBezier) -> (f64, usize) {
    let n_pts = last - first + 1;
    let mut s = n_pts / 2;
    let mut max = 0.0;
    for i in 1..n_pts {
        let v0 = pts[first + i];
        let v1 = curve.sample(u[i]);
        let d = v0.distance_squared_to(v1);
        if d > max {
            max = d;
            s = i;
        }
    }

    let mut split = s + first;
    if split <= first {
        split = first + 1;
    }
    if split >= last {
        split = last - 1;
    }

    (max, split)
}

/// Attempts to fit one cubic Bezier to `pts[first..=last]`. Always returns a
/// curve; the accompanying [`FitStatus`] says whether it met `squared_error`
/// or should be split at the returned index.
pub(crate) fn fit_curve(pts: &[Point], arclen: &[f64], first: usize, last: usize, tan_l: Point, tan_r: Point, squared_error: f64) -> (CubicBezier, FitStatus) {
    let n_pts = last - first + 1;
    assert!(n_pts >= 2, "fit_curve requires at least 2 points");

    if n_pts == 2 {
        let p0 = pts[first];
        let p3 = pts[last];
        let alpha = p0.distance_to(p3) / 3.0;
        let p1 = (tan_l * alpha) + p0;
        let p2 = (tan_r * alpha) + p3;
        return (CubicBezier::new(p0, p1, p2, p3), FitStatus::Fit);
    }

    let mut u = arc_length_parameterize(arclen, first, last);
    let mut curve = CubicBezier::linear(pts[first], pts[last]);
    let mut split = first + 1;
    for i in 0..=MAX_ITERS {
        if i != 0 {
            reparameterize(pts, &mut u, first, last, &curve);
        }
        curve = generate_bezier(pts, &u, first, last, tan_l, tan_r);
        let (error, s) = find_max_squared_error(pts, &u, first, last, &curve);
        split = s;
        if error < squared_error {
            return (curve, FitStatus::Fit);
        }
    }
    (curve, FitStatus::Split(split))
}

/// Fits a sequence of cubic Beziers to `pts[first..=last]` within
/// `max_error`, seeding the end tangents with `tan_l`/`tan_r` and appending
/// results to `out` in left-to-right order.
///
/// Implemented with an explicit work stack (rather than native recursion)
/// so fitting depth is bounded only by available memory, not call-stack
/// size -- long, high-detail inputs can otherwise recurse arbitrarily deep.
pub fn fit_range(pts: &[Point], arclen: &[f64], first: usize, last: usize, tan_l: Point, tan_r: Point, max_error: f64, out: &mut Vec<CubicBezier>) {
    let squared_error = max_error * max_error;
    let mut stack = vec![(first, last, tan_l, tan_r)];

    while let Some((first, last, tan_l, tan_r)) = stack.pop() {
        let (curve, status) = fit_curve(pts, arclen, first, last, tan_l, tan_r, squared_error);
        match status {
            FitStatus::Fit => {
                log::trace!("fit segment [{first}, {last}] directly");
                out.push(curve);
            }
            FitStatus::Split(split) => {
                log::debug!("splitting [{first}, {last}] at {split}, error exceeded tolerance");
                let tan_m1 = get_center_tangent(pts, arclen, first, last, split);
                let tan_m2 = -tan_m1;

                let mut tan_l = tan_l;
                let mut tan_r = tan_r;
                if first == 0 && split < END_TANGENT_N_PTS {
                    tan_l = get_left_tangent(pts, arclen, split);
                }
                let right_tangent_boundary = pts.len() as isize - (END_TANGENT_N_PTS as isize + 1);
                if last == pts.len() - 1 && split as isize > right_tangent_boundary {
                    tan_r = get_right_tangent(pts, arclen, split);
                }

                stack.push((split, last, tan_m2, tan_r));
                stack.push((first, split, tan_l, tan_m1));
            }
        }
    }
}

/// Fits a piecewise-cubic Bezier approximation directly to `points`, without
/// any preprocessing. `points` must already be deduplicated; callers that
/// have raw, possibly-noisy input should use [`fit`] instead.
///
/// Returns an empty vector (not an error) when `points.len() < 2`, matching
/// the convention that a degenerate input simply has no segments to fit.
pub fn fit_curve_raw(points: &[Point], max_error: f64) -> CurveFitResult<Vec<CubicBezier>> {
    if max_error < f64::EPSILON {
        return Err(CurveFitError::invalid_argument(
            "max_error cannot be negative/zero/less than epsilon value",
        ));
    }
    if points.len() < 2 {
        return Ok(Vec::new());
    }

    let arclen = initialize_arc_lengths(points);
    let last = points.len() - 1;
    let tan_l = get_left_tangent(points, &arclen, last);
    let tan_r = get_right_tangent(points, &arclen, 0);

    let mut result = Vec::new();
    fit_range(points, &arclen, 0, last, tan_l, tan_r, max_error, &mut result);
    Ok(result)
}

/// Fits a piecewise-cubic Bezier approximation to `points`.
///
/// First reduces `points` via [`rdp_reduce`] with a fixed chord-error
/// tolerance to thin out redundant samples, then runs the least-squares fit
/// against the reduced polyline.
pub fn fit(points: &[Point], max_error: f64) -> CurveFitResult<Vec<CubicBezier>> {
    if points.is_empty() {
        return Ok(Vec::new());
    }
    log::debug!("fitting {} points with max_error={max_error}", points.len());
    let reduced = rdp_reduce(points, crate::consts::DEFAULT_REDUCE_ERROR)?;
    fit_curve_raw(&reduced, max_error)
}

#[cfg(test)]
#[path = "fit_tests.rs"]
mod fit_tests;
