//! Incremental curve fitting: feed points one at a time and get back a
//! running, always-valid set of cubic Beziers.
//!
//! Unlike [`crate::fit::fit`], `CurveBuilder` never re-examines points once
//! they've been folded into a finished curve earlier than the current tail:
//! each call to [`CurveBuilder::add_point`] either extends/refits the last
//! curve in place or splits it into two, so cost per point stays bounded
//! regardless of how long the overall stream runs.

use crate::bezier::CubicBezier;
use crate::consts::END_TANGENT_N_PTS;
use crate::error::{CurveFitError, CurveFitResult};
use crate::fit::{fit_curve, get_center_tangent, get_left_tangent, get_right_tangent, FitStatus};
use crate::point::Point;

/// Outcome of a single [`CurveBuilder::add_point`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddPointResult {
    changed: bool,
    first_changed_index: usize,
    was_added: bool,
}

impl AddPointResult {
    const NO_CHANGE: AddPointResult = AddPointResult {
        changed: false,
        first_changed_index: 0,
        was_added: false,
    };

    fn new(first_changed_index: usize, was_added: bool) -> Self {
        AddPointResult {
            changed: true,
            first_changed_index,
            was_added,
        }
    }

    /// True if this point changed the set of curves (updated the tail or
    /// added a new one). False means the point was absorbed without
    /// crossing the builder's internal resampling distance.
    pub fn was_changed(&self) -> bool {
        self.changed
    }

    /// Index of the earliest curve touched by this update. Only meaningful
    /// when [`Self::was_changed`] is true.
    pub fn first_changed_index(&self) -> usize {
        self.first_changed_index
    }

    /// True if a new curve was appended (a split occurred, or this was the
    /// very first curve); false if an existing curve was only updated.
    pub fn was_added(&self) -> bool {
        self.was_added
    }
}

/// Incrementally fits a sequence of cubic Beziers to points added one at a
/// time, resampling the incoming stream to a fixed step distance internally.
pub struct CurveBuilder {
    lin_dist: f64,
    squared_error: f64,
    pts: Vec<Point>,
    arclen: Vec<f64>,
    result: Vec<CubicBezier>,
    total_length: f64,
    first: usize,
    tan_l: Point,
    prev: Point,
}

impl CurveBuilder {
    /// Creates a builder that resamples its input to `lin_dist`-spaced
    /// points and fits curves within `error`.
    pub fn new(lin_dist: f64, error: f64) -> CurveFitResult<Self> {
        if lin_dist <= crate::consts::PREPROCESS_EPSILON {
            return Err(CurveFitError::invalid_argument(
                "lin_dist must be greater than epsilon",
            ));
        }
        if error < f64::EPSILON {
            return Err(CurveFitError::invalid_argument(
                "error cannot be negative/zero/less than epsilon value",
            ));
        }
        Ok(CurveBuilder {
            lin_dist,
            squared_error: error * error,
            pts: Vec::new(),
            arclen: Vec::new(),
            result: Vec::new(),
            total_length: 0.0,
            first: 0,
            tan_l: Point::ZERO,
            prev: Point::ZERO,
        })
    }

    /// Current fitted curves, in order.
    pub fn curves(&self) -> &[CubicBezier] {
        &self.result
    }

    /// Resets the builder to its freshly-constructed state.
    pub fn clear(&mut self) {
        self.result.clear();
        self.pts.clear();
        self.arclen.clear();
        self.total_length = 0.0;
        self.first = 0;
        self.tan_l = Point::ZERO;
        self.prev = Point::ZERO;
    }

    /// Feeds one raw point into the builder. Points closer than `lin_dist`
    /// to the previous raw point are buffered without affecting the curve
    /// set until enough distance accumulates.
    pub fn add_point(&mut self, p: Point) -> AddPointResult {
        if self.pts.is_empty() {
            self.prev = p;
            self.pts.push(p);
            self.arclen.push(0.0);
            return AddPointResult::NO_CHANGE;
        }

        let mut prev = self.prev;
        let td = prev.distance_to(p);
        let md = self.lin_dist;
        if td <= md {
            return AddPointResult::NO_CHANGE;
        }

        let mut first = usize::MAX;
        let mut added = false;
        let mut rd = td - md;
        let dir = (p - prev).normalized();
        loop {
            let np = prev + dir * md;
            let res = self.add_internal(np);
            first = first.min(res.first_changed_index);
            added |= res.was_added;
            prev = np;
            rd -= md;
            if rd <= md {
                break;
            }
        }
        self.prev = prev;
        AddPointResult::new(first, added)
    }

    fn add_internal(&mut self, np: Point) -> AddPointResult {
        let last = self.pts.len();
        debug_assert!(last != 0);

        self.pts.push(np);
        self.total_length += self.lin_dist;
        self.arclen.push(self.total_length);

        if last == 1 {
            debug_assert!(self.result.is_empty());
            let p0 = self.pts[0];
            let tan_l = (np - p0).normalized();
            let tan_r = -tan_l;
            self.tan_l = tan_l;
            let alpha = self.lin_dist / 3.0;
            let p1 = tan_l * alpha + p0;
            let p2 = tan_r * alpha + np;
            self.result.push(CubicBezier::new(p0, p1, p2, np));
            return AddPointResult::new(0, true);
        }

        let last_curve = self.result.len() - 1;
        let first = self.first;

        let mut tan_l = if last_curve == 0 {
            get_left_tangent(&self.pts, &self.arclen, last)
        } else {
            self.tan_l
        };
        let tan_r = get_right_tangent(&self.pts, &self.arclen, first);

        let (curve, status) = fit_curve(&self.pts, &self.arclen, first, last, tan_l, tan_r, self.squared_error);
        match status {
            FitStatus::Fit => {
                self.result[last_curve] = curve;
                AddPointResult::new(last_curve, false)
            }
            FitStatus::Split(split) => {
                log::debug!("incremental fit split at {split} (points [{first}, {last}])");
                let tan_m1 = get_center_tangent(&self.pts, &self.arclen, first, last, split);
                let tan_m2 = -tan_m1;

                if first == 0 && split < END_TANGENT_N_PTS {
                    tan_l = get_left_tangent(&self.pts, &self.arclen, split);
                }

                let (curve, _) = fit_curve(&self.pts, &self.arclen, first, split, tan_l, tan_m1, self.squared_error);
                self.result[last_curve] = curve;

                let (curve, _) = fit_curve(&self.pts, &self.arclen, split, last, tan_m2, tan_r, self.squared_error);
                self.result.push(curve);
                self.first = split;
                self.tan_l = tan_m2;

                AddPointResult::new(last_curve, true)
            }
        }
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod builder_tests;
