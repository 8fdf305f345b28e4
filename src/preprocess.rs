//! Polyline preprocessing: deduplication, resampling, and RDP reduction.
//!
//! These operate purely on point sequences and have no knowledge of the
//! Bezier fitting kernel in [`crate::fit`].

use crate::consts::PREPROCESS_EPSILON;
use crate::error::{CurveFitError, CurveFitResult};
use crate::point::Point;

fn component_wise_close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < PREPROCESS_EPSILON && (a.y - b.y).abs() < PREPROCESS_EPSILON
}

/// Removes consecutive duplicate points (within [`PREPROCESS_EPSILON`]).
///
/// Returns `pts` unchanged (cloned) if it has fewer than two points.
pub fn remove_duplicates(pts: &[Point]) -> Vec<Point> {
    if pts.len() < 2 {
        return pts.to_vec();
    }
    let mut dst = Vec::with_capacity(pts.len());
    dst.push(pts[0]);
    for &cur in &pts[1..] {
        let prev = *dst.last().unwrap();
        if !component_wise_close(prev, cur) {
            dst.push(cur);
        }
    }
    dst
}

/// Resamples a polyline to (approximately) uniform chord-length spacing `md`.
///
/// `src` must be non-empty and `md` must exceed [`PREPROCESS_EPSILON`].
pub fn linearize(src: &[Point], md: f64) -> CurveFitResult<Vec<Point>> {
    if src.is_empty() {
        return Err(CurveFitError::invalid_argument("src cannot be empty"));
    }
    if md <= PREPROCESS_EPSILON {
        return Err(CurveFitError::invalid_argument(
            "md must be greater than epsilon",
        ));
    }

    let mut dst = Vec::new();
    let mut pp = src[0];
    dst.push(pp);
    let mut cd = 0.0f64;

    for ip in 1..src.len() {
        let p0 = src[ip - 1];
        let p1 = src[ip];
        let td = p0.distance_to(p1);
        if cd + td > md {
            let pd = md - cd;
            dst.push(p0.lerp(p1, pd / td));
            let mut rd = td - pd;
            while rd > md {
                rd -= md;
                let np = p0.lerp(p1, (td - rd) / td);
                if !component_wise_close(np, pp) {
                    dst.push(np);
                    pp = np;
                }
            }
            cd = rd;
        } else {
            cd += td;
        }
    }

    let lp = *src.last().unwrap();
    if !component_wise_close(pp, lp) {
        dst.push(lp);
    }

    Ok(dst)
}

/// Reduces a polyline to a subset of its own points via Ramer-Douglas-Peucker
/// simplification, after first removing consecutive duplicates.
///
/// `pts` must be non-empty. Inputs that collapse to fewer than 3 unique
/// points are returned as-is (nothing to simplify).
pub fn rdp_reduce(pts: &[Point], error: f64) -> CurveFitResult<Vec<Point>> {
    if pts.is_empty() {
        return Err(CurveFitError::invalid_argument("pts cannot be empty"));
    }
    let unique_pts = remove_duplicates(pts);
    if unique_pts.len() < 3 {
        return Ok(unique_pts);
    }

    let mut keep_index = Vec::with_capacity((unique_pts.len() / 2).max(16));
    keep_index.push(0usize);
    keep_index.push(unique_pts.len() - 1);
    rdp_recursive(&unique_pts, error, 0, unique_pts.len() - 1, &mut keep_index);
    keep_index.sort_unstable();

    Ok(keep_index.into_iter().map(|idx| unique_pts[idx]).collect())
}

fn rdp_recursive(pts: &[Point], error: f64, first: usize, last: usize, keep_index: &mut Vec<usize>) {
    let n_pts = last - first + 1;
    if n_pts < 3 {
        return;
    }

    let a = pts[first];
    let b = pts[last];
    let ab_dist = a.distance_to(b);
    let a_cross_b = a.x * b.y - a.y * b.x;
    let mut max_dist = error;
    let mut split = 0usize;

    for i in (first + 1)..(last - 1) {
        let p = pts[i];
        let p_dist = perpendicular_distance(a, b, ab_dist, a_cross_b, p);
        if p_dist > max_dist {
            max_dist = p_dist;
            split = i;
        }
    }

    if split != 0 {
        keep_index.push(split);
        rdp_recursive(pts, error, first, split, keep_index);
        rdp_recursive(pts, error, split, last, keep_index);
    }
}

fn perpendicular_distance(a: Point, b: Point, ab_dist: f64, a_cross_b: f64, p: Point) -> f64 {
    let area = (a_cross_b + a.x * b.y + p.x * a.y - p.x * b.y - a.x * p.y).abs();
    area / ab_dist
}

#[cfg(test)]
#[path = "preprocess_tests.rs"]
mod preprocess_tests;
