// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Latin Hypercube Sampling
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Latin hypercube designs on the unit cube, with optional
//! centered-discrepancy optimization by random column swaps.

use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;

/// Swap attempts before giving up on the optimization.
pub const MAX_ITERATIONS: usize = 10_000;
/// Consecutive rejected swaps that end the optimization.
pub const MAX_NO_CHANGE: usize = 100;

/// Plain LHS: one point per stratum and dimension, strata shuffled
/// independently per column.
pub fn latin_hypercube<R: Rng + ?Sized>(n_samples: usize, n_dims: usize, rng: &mut R) -> Array2<f64> {
    let mut samples = Array2::zeros((n_samples, n_dims));
    if n_samples == 0 || n_dims == 0 {
        return samples;
    }
    for j in 0..n_dims {
        let mut values: Vec<f64> = (0..n_samples)
            .map(|i| (i as f64 + rng.gen::<f64>()) / n_samples as f64)
            .collect();
        values.shuffle(rng);
        for (i, v) in values.into_iter().enumerate() {
            samples[[i, j]] = v;
        }
    }
    samples
}

/// LHS whose columns are permuted to lower the centered L2 discrepancy.
///
/// One-dimensional designs are returned unoptimized.
pub fn optimized_latin_hypercube<R: Rng + ?Sized>(
    n_samples: usize,
    n_dims: usize,
    rng: &mut R,
) -> Array2<f64> {
    let mut samples = latin_hypercube(n_samples, n_dims, rng);
    if n_dims > 1 {
        random_cd(&mut samples, rng);
    }
    samples
}

fn point_term(x: f64) -> f64 {
    let d = (x - 0.5).abs();
    1.0 + 0.5 * d - 0.5 * d * d
}

fn pair_term(xi: f64, xj: f64) -> f64 {
    1.0 + 0.5 * (xi - 0.5).abs() + 0.5 * (xj - 0.5).abs() - 0.5 * (xi - xj).abs()
}

/// Squared centered L2 discrepancy (Hickernell) of points in `[0, 1]^d`.
pub fn centered_discrepancy(samples: &Array2<f64>) -> f64 {
    let (n, d) = samples.dim();
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    let first = (13.0f64 / 12.0).powi(d as i32);
    let second: f64 = samples
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|&x| point_term(x)).product::<f64>())
        .sum();
    let mut third = 0.0;
    for i in 0..n {
        for j in 0..n {
            third += (0..d)
                .map(|k| pair_term(samples[[i, k]], samples[[j, k]]))
                .product::<f64>();
        }
    }
    first - 2.0 / nf * second + third / (nf * nf)
}

/// Discrepancy after swapping `samples[[r1, col]]` and `samples[[r2, col]]`,
/// updated from `current` in O(n·d).
fn discrepancy_after_swap(samples: &Array2<f64>, r1: usize, r2: usize, col: usize, current: f64) -> f64 {
    if r1 == r2 {
        return current;
    }
    let (n, d) = samples.dim();
    let nf = n as f64;
    let value = |row: usize, k: usize, swapped: bool| -> f64 {
        if swapped && k == col {
            if row == r1 {
                samples[[r2, col]]
            } else if row == r2 {
                samples[[r1, col]]
            } else {
                samples[[row, k]]
            }
        } else {
            samples[[row, k]]
        }
    };
    let point = |row: usize, swapped: bool| -> f64 {
        (0..d).map(|k| point_term(value(row, k, swapped))).product()
    };
    let pair = |i: usize, j: usize, swapped: bool| -> f64 {
        (0..d)
            .map(|k| pair_term(value(i, k, swapped), value(j, k, swapped)))
            .product()
    };

    let point_delta = point(r1, true) + point(r2, true) - point(r1, false) - point(r2, false);

    let mut pair_delta = 0.0;
    for j in 0..n {
        if j == r1 || j == r2 {
            continue;
        }
        pair_delta += 2.0 * (pair(r1, j, true) - pair(r1, j, false));
        pair_delta += 2.0 * (pair(r2, j, true) - pair(r2, j, false));
    }
    pair_delta += pair(r1, r1, true) - pair(r1, r1, false);
    pair_delta += pair(r2, r2, true) - pair(r2, r2, false);
    pair_delta += 2.0 * (pair(r1, r2, true) - pair(r1, r2, false));

    current - 2.0 / nf * point_delta + pair_delta / (nf * nf)
}

/// Greedy random swaps within columns, kept only when they lower the
/// discrepancy. Column swaps preserve the Latin property.
fn random_cd<R: Rng + ?Sized>(samples: &mut Array2<f64>, rng: &mut R) {
    let (n, d) = samples.dim();
    if n < 2 || d < 2 {
        return;
    }
    let mut best = centered_discrepancy(samples);
    let mut no_change = 0;
    let mut iterations = 0;
    while no_change < MAX_NO_CHANGE && iterations < MAX_ITERATIONS {
        iterations += 1;
        let col = rng.gen_range(0..d);
        let r1 = rng.gen_range(0..n);
        let r2 = rng.gen_range(0..n);
        let candidate = discrepancy_after_swap(samples, r1, r2, col, best);
        if candidate < best {
            samples.swap([r1, col], [r2, col]);
            best = candidate;
            no_change = 0;
        } else {
            no_change += 1;
        }
    }
    log::trace!("random-cd: {iterations} swaps tried, discrepancy {best:.3e}");
}
