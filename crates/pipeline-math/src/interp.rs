//! Piecewise-linear interpolation of tabulated series.
//!
//! Follows the usual `interp(x, xp, fp, left, right)` contract: `xp` must be
//! non-decreasing, queries below `xp[0]` return `left` (default `fp[0]`) and
//! queries above `xp[last]` return `right` (default `fp[last]`).

use ndarray::{Array1, ArrayView1};

/// Interpolate `fp(xp)` at a single point `x`.
///
/// Returns NaN for empty series or a NaN query.
pub fn interp1d(x: f64, xp: &[f64], fp: &[f64], left: Option<f64>, right: Option<f64>) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 || x.is_nan() {
        return f64::NAN;
    }
    if x < xp[0] {
        return left.unwrap_or(fp[0]);
    }
    if x > xp[n - 1] {
        return right.unwrap_or(fp[n - 1]);
    }
    // Last index with xp[j] <= x
    let j = xp[..n].partition_point(|&v| v <= x).saturating_sub(1);
    if j >= n - 1 {
        return fp[n - 1];
    }
    let dx = xp[j + 1] - xp[j];
    if dx == 0.0 {
        return fp[j];
    }
    let t = (x - xp[j]) / dx;
    fp[j] + t * (fp[j + 1] - fp[j])
}

/// Vectorised [`interp1d`] over every query point.
pub fn interp_array(
    x: ArrayView1<f64>,
    xp: ArrayView1<f64>,
    fp: ArrayView1<f64>,
    left: Option<f64>,
    right: Option<f64>,
) -> Array1<f64> {
    let xp = xp.to_vec();
    let fp = fp.to_vec();
    x.mapv(|xi| interp1d(xi, &xp, &fp, left, right))
}

/// Locate the cell of a sorted axis containing `x` and the fractional
/// position inside it, clamping to the axis ends.
///
/// Returns `(lower_index, weight, clamped)`. Single-point axes always give
/// `(0, 0.0, x != point)`.
pub fn locate(axis: &[f64], x: f64) -> (usize, f64, bool) {
    let n = axis.len();
    if n < 2 {
        return (0, 0.0, n == 1 && x != axis[0]);
    }
    let clamped = x < axis[0] || x > axis[n - 1];
    let xc = x.clamp(axis[0], axis[n - 1]);
    let j = axis
        .partition_point(|&v| v <= xc)
        .saturating_sub(1)
        .min(n - 2);
    let dx = axis[j + 1] - axis[j];
    let t = if dx > 0.0 { (xc - axis[j]) / dx } else { 0.0 };
    (j, t.clamp(0.0, 1.0), clamped)
}
