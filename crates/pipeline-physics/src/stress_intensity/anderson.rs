// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Anderson Stress Intensity Solution
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Closed-form fits for internal axial surface flaws (Anderson).
//!
//! Valid for inside-surface flaws at the deepest point; the angular
//! position argument is accepted for interface compatibility only.

use super::{
    calc_q, depth_ratio_warning, governing_solution, AngularPosition, StressIntensity,
    StressIntensitySolver,
};
use crate::stress_state::StressState;
use ndarray::{Array1, Zip};
use pipeline_math::broadcast::broadcast_to;
use pipeline_types::config::{StressMethod, SurfaceLocation};
use pipeline_types::error::{PipelineError, PipelineResult};
use pipeline_types::run::AnalysisWarning;
use std::f64::consts::PI;

/// Validity range of the finite-length fit in R_avg/t.
const RADIUS_RATIO_MIN: f64 = 5.0;
const RADIUS_RATIO_MAX: f64 = 20.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct AndersonSolver;

/// Geometry factor of the finite-length flaw, `ξ = 2c/t`.
fn finite_length_f(radius_ratio: f64, xi: f64) -> f64 {
    let term1 = 1.12 + 0.053 * xi + 0.0055 * xi * xi;
    let term2 = 1.0 + 0.02 * xi + 0.0191 * xi * xi;
    let term3 = (20.0 - radius_ratio).powi(2) / 1400.0;
    term1 + term2 * term3
}

fn infinite_length_a(inner_radius_ratio: f64) -> f64 {
    let base = if (5.0..=10.0).contains(&inner_radius_ratio) {
        0.125 * inner_radius_ratio - 0.25
    } else {
        0.2 * inner_radius_ratio - 1.0
    };
    base.max(0.0).powf(0.25)
}

fn infinite_length_f(parameter_a: f64, a_over_t: f64) -> f64 {
    1.1 + parameter_a * (4.951 * a_over_t.powi(2) + 1.092 * a_over_t.powi(4))
}

impl AndersonSolver {
    /// Finite-length solution `K = p·(R/t)·sqrt(πa/Q)·F`.
    pub fn finite_length(
        state: &StressState,
        crack_depth: &Array1<f64>,
        crack_length: &Array1<f64>,
        q: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        let pipe = state.pipe();
        let t = pipe.wall_thickness();
        let radius_ratio = pipe.avg_radius() / t;
        let xi = crack_length / t;
        let f = Zip::from(&radius_ratio)
            .and(&xi)
            .map_collect(|&rt, &xi| finite_length_f(rt, xi));
        let p = state.environment().max_pressure();
        let mut k = Array1::zeros(t.len());
        Zip::from(&mut k)
            .and(p)
            .and(&radius_ratio)
            .and(crack_depth)
            .and(q)
            .and(&f)
            .for_each(|k, &p, &rt, &a, &q, &f| {
                *k = p * rt * (PI * a / q).sqrt() * f;
            });
        (k, f)
    }

    /// Long-flaw solution `K = 2p·Ro²/(Ro² − Ri²)·sqrt(πa)·F`.
    pub fn infinite_length(
        state: &StressState,
        crack_depth: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        let pipe = state.pipe();
        let t = pipe.wall_thickness();
        let ri = pipe.inner_radius();
        let ro = pipe.outer_radius();
        let a_over_t = crack_depth / t;
        let f = Zip::from(&ri)
            .and(t)
            .and(&a_over_t)
            .map_collect(|&ri, &t, &at| infinite_length_f(infinite_length_a(ri / t), at));
        let p = state.environment().max_pressure();
        let mut k = Array1::zeros(t.len());
        Zip::from(&mut k)
            .and(p)
            .and(&ri)
            .and(&ro)
            .and(crack_depth)
            .and(&f)
            .for_each(|k, &p, &ri, &ro, &a, &f| {
                let first = 2.0 * p * ro * ro / (ro * ro - ri * ri);
                *k = first * (PI * a).sqrt() * f;
            });
        (k, f)
    }
}

impl StressIntensitySolver for AndersonSolver {
    fn method(&self) -> StressMethod {
        StressMethod::Anderson
    }

    fn check_surface(&self, surface: SurfaceLocation) -> PipelineResult<()> {
        match surface {
            SurfaceLocation::Inside => Ok(()),
            other => Err(PipelineError::InvalidSurface(format!(
                "Anderson solution requires an inside flaw, got {other}"
            ))),
        }
    }

    fn calc_stress_intensity_factor(
        &self,
        state: &StressState,
        crack_depth: &Array1<f64>,
        crack_length: &Array1<f64>,
        _position: AngularPosition,
    ) -> PipelineResult<StressIntensity> {
        self.check_surface(state.defect().surface())?;
        let n = state.sample_size();
        let a = broadcast_to(crack_depth, n)?;
        let two_c = broadcast_to(crack_length, n)?;

        let a_over_c = &a / &(&two_c / 2.0);
        let q = calc_q(&a_over_c);

        let (k_finite, f_finite) = Self::finite_length(state, &a, &two_c, &q);
        let (k_infinite, f_infinite) = Self::infinite_length(state, &a);
        let (k_max, f) = governing_solution(&k_finite, &f_finite, &k_infinite, &f_infinite);

        let mut warnings = Vec::new();
        let pipe = state.pipe();
        let radius_ratio = pipe.avg_radius() / pipe.wall_thickness();
        if radius_ratio
            .iter()
            .any(|&rt| !(RADIUS_RATIO_MIN..=RADIUS_RATIO_MAX).contains(&rt))
        {
            warnings.push(AnalysisWarning::RatioOutOfRange {
                ratio: "R/t".to_string(),
                lower: RADIUS_RATIO_MIN,
                upper: RADIUS_RATIO_MAX,
            });
        }
        depth_ratio_warning(&(&a / pipe.wall_thickness()), &mut warnings);

        Ok(StressIntensity {
            k_max,
            f,
            q,
            warnings,
        })
    }
}
