//! Arc-length indexed sampling over a sequence of continuous cubic Beziers.

use crate::bezier::CubicBezier;
use crate::builder::{AddPointResult, CurveBuilder};
use crate::consts::{MAX_SAMPLES_PER_CURVE, MIN_SAMPLES_PER_CURVE};
use crate::error::{CurveFitError, CurveFitResult};
use crate::point::Point;

/// A position within a [`Spline`]: the curve index and the local parameter
/// `t` within that curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePos {
    pub index: usize,
    pub time: f64,
}

/// A sequence of C0-continuous cubic Beziers, indexed by cumulative arc
/// length so a caller can sample by overall fraction-of-length traveled
/// rather than by curve index and local parameter.
pub struct Spline {
    samples_per_curve: usize,
    curves: Vec<CubicBezier>,
    arclen: Vec<f64>,
}

impl Spline {
    /// Creates an empty spline sampling `samples_per_curve` arc-length
    /// checkpoints per curve added.
    pub fn new(samples_per_curve: usize) -> CurveFitResult<Self> {
        if !(MIN_SAMPLES_PER_CURVE..=MAX_SAMPLES_PER_CURVE).contains(&samples_per_curve) {
            return Err(CurveFitError::invalid_argument(format!(
                "samples_per_curve must be between {MIN_SAMPLES_PER_CURVE} and {MAX_SAMPLES_PER_CURVE}"
            )));
        }
        Ok(Spline {
            samples_per_curve,
            curves: Vec::with_capacity(16),
            arclen: Vec::with_capacity(16 * samples_per_curve),
        })
    }

    /// Creates a spline by adding each of `curves` in order; equivalent to
    /// calling [`Spline::add`] once per curve, but preallocates storage.
    pub fn from_curves(curves: &[CubicBezier], samples_per_curve: usize) -> CurveFitResult<Self> {
        if curves.is_empty() {
            return Err(CurveFitError::invalid_argument("curves cannot be empty"));
        }
        let mut spline = Spline::new(samples_per_curve)?;
        spline.curves.reserve(curves.len());
        spline.arclen.reserve(curves.len() * samples_per_curve);
        for curve in curves {
            spline.add(*curve)?;
        }
        Ok(spline)
    }

    /// Appends `curve` to the end of the spline. `curve.p0` must coincide
    /// with the current last curve's `p3` (checked against
    /// [`crate::consts::EQUALS_EPSILON_SQ`]).
    pub fn add(&mut self, curve: CubicBezier) -> CurveFitResult<()> {
        if let Some(last) = self.curves.last() {
            if !last.p3.equals_or_close(curve.p0) {
                return Err(CurveFitError::invalid_argument(format!(
                    "the new curve at index {} does not connect with the previous curve at index {}",
                    self.curves.len(),
                    self.curves.len() - 1
                )));
            }
        }
        self.curves.push(curve);
        self.arclen.resize(self.arclen.len() + self.samples_per_curve, 0.0);
        self.update_arc_lengths(self.curves.len() - 1);
        Ok(())
    }

    /// Replaces the curve at `index`, checked for continuity against both
    /// neighbors (if present), and refreshes arc lengths from `index` on.
    pub fn update(&mut self, index: usize, curve: CubicBezier) -> CurveFitResult<()> {
        if index >= self.curves.len() {
            return Err(CurveFitError::out_of_range(index, self.curves.len()));
        }
        if index > 0 && !self.curves[index - 1].p3.equals_or_close(curve.p0) {
            return Err(CurveFitError::invalid_argument(format!(
                "the updated curve at index {index} does not connect with the previous curve at index {}",
                index - 1
            )));
        }
        if index < self.curves.len() - 1 && !self.curves[index + 1].p0.equals_or_close(curve.p3) {
            return Err(CurveFitError::invalid_argument(format!(
                "the updated curve at index {index} does not connect with the next curve at index {}",
                index + 1
            )));
        }

        self.curves[index] = curve;
        for i in index..self.curves.len() {
            self.update_arc_lengths(i);
        }
        Ok(())
    }

    /// Removes every curve, returning the spline to its freshly-created state.
    pub fn clear(&mut self) {
        self.curves.clear();
        self.arclen.clear();
    }

    /// Total arc length of the spline, or `0.0` if it has no curves.
    pub fn length(&self) -> f64 {
        self.arclen.last().copied().unwrap_or(0.0)
    }

    /// The spline's curves, in order.
    pub fn curves(&self) -> &[CubicBezier] {
        &self.curves
    }

    /// Samples the spline's position at fraction `u` of its total length.
    /// `u` is clamped to `[0, 1]`.
    pub fn sample(&self, u: f64) -> CurveFitResult<Point> {
        let pos = self.get_sample_position(u)?;
        Ok(self.curves[pos.index].sample(pos.time))
    }

    /// Resolves a fraction-of-length `u` to a `(curve index, local t)` pair
    /// via binary search over the cumulative arc-length table.
    ///
    /// `u < 0` clamps to the start; `u > 1` clamps to the end.
    pub fn get_sample_position(&self, u: f64) -> CurveFitResult<SamplePos> {
        if self.curves.is_empty() {
            return Err(CurveFitError::invalid_argument(
                "no curves have been added to the spline",
            ));
        }
        if u < 0.0 {
            return Ok(SamplePos { index: 0, time: 0.0 });
        }
        if u > 1.0 {
            return Ok(SamplePos {
                index: self.curves.len() - 1,
                time: 1.0,
            });
        }

        let total = self.length();
        let target = u * total;

        let mut low = 0isize;
        let mut high = self.arclen.len() as isize - 1;
        let mut index = 0isize;
        let mut found = f64::NAN;
        while low < high {
            index = (low + high) / 2;
            found = self.arclen[index as usize];
            if found < target {
                low = index + 1;
            } else {
                high = index;
            }
        }

        if index >= self.arclen.len() as isize - 1 {
            return Ok(SamplePos {
                index: self.curves.len() - 1,
                time: 1.0,
            });
        }

        if found > target {
            index -= 1;
        }

        let samples_per_curve = self.samples_per_curve as f64;
        if index < 0 {
            let max = self.arclen[0];
            let part = target / max;
            let t = part / samples_per_curve;
            Ok(SamplePos { index: 0, time: t })
        } else {
            let idx = index as usize;
            let min = self.arclen[idx];
            let max = self.arclen[idx + 1];
            let part = if target < min {
                0.0
            } else if target > max {
                1.0
            } else {
                (target - min) / (max - min)
            };
            let t = (((idx + 1) % self.samples_per_curve) as f64 + part) / samples_per_curve;
            let curve_index = (idx + 1) / self.samples_per_curve;
            Ok(SamplePos { index: curve_index, time: t })
        }
    }

    fn update_arc_lengths(&mut self, i_curve: usize) {
        let curve = self.curves[i_curve];
        let n_samples = self.samples_per_curve;
        let mut clen = if i_curve > 0 {
            self.arclen[i_curve * n_samples - 1]
        } else {
            0.0
        };
        let mut pp = curve.sample(0.0);
        for i_point in 0..n_samples {
            let idx = i_curve * n_samples + i_point;
            let t = (i_point + 1) as f64 / n_samples as f64;
            let np = curve.sample(t);
            clen += np.distance_to(pp);
            self.arclen[idx] = clen;
            pp = np;
        }
    }
}

/// Drives a [`Spline`] from an incremental point stream via [`CurveBuilder`],
/// translating each builder update into the matching spline add/update call.
pub struct SplineBuilder {
    builder: CurveBuilder,
    spline: Spline,
}

impl SplineBuilder {
    pub fn new(point_distance: f64, error: f64, samples_per_curve: usize) -> CurveFitResult<Self> {
        Ok(SplineBuilder {
            builder: CurveBuilder::new(point_distance, error)?,
            spline: Spline::new(samples_per_curve)?,
        })
    }

    /// Feeds one raw point into the underlying builder and, if it changed
    /// the curve set, applies the corresponding add/update to the spline.
    /// Returns whether the spline was modified.
    pub fn add(&mut self, p: Point) -> CurveFitResult<bool> {
        let res: AddPointResult = self.builder.add_point(p);
        if !res.was_changed() {
            return Ok(false);
        }

        let curves = self.builder.curves();
        if res.was_added() && curves.len() == 1 {
            debug_assert!(self.spline.curves().is_empty());
            self.spline.add(curves[0])?;
        } else if res.was_added() {
            let last_index = self.spline.curves().len() - 1;
            self.spline.update(last_index, curves[res.first_changed_index()])?;
            for curve in &curves[(res.first_changed_index() + 1)..] {
                self.spline.add(*curve)?;
            }
        } else {
            debug_assert_eq!(res.first_changed_index(), curves.len() - 1);
            let last_index = self.spline.curves().len() - 1;
            self.spline.update(last_index, curves[curves.len() - 1])?;
        }

        Ok(true)
    }

    pub fn sample(&self, u: f64) -> CurveFitResult<Point> {
        self.spline.sample(u)
    }

    /// Samples the unit tangent direction at fraction `u` of the spline's length.
    pub fn tangent(&self, u: f64) -> CurveFitResult<Point> {
        let pos = self.spline.get_sample_position(u)?;
        Ok(self.spline.curves()[pos.index].tangent(pos.time))
    }

    pub fn clear(&mut self) {
        self.builder.clear();
        self.spline.clear();
    }

    pub fn curves(&self) -> &[CubicBezier] {
        self.spline.curves()
    }
}

#[cfg(test)]
#[path = "spline_tests.rs"]
mod spline_tests;
