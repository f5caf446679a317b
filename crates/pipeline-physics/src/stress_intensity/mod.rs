// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Stress Intensity Factor Solvers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Mode-I stress intensity of a semi-elliptical axial surface flaw.
//!
//! Two interchangeable solutions implement [`StressIntensitySolver`] for
//! axial flaws under hoop stress: the closed-form Anderson fits and the
//! table-driven API 579-1 Annex 9B weight-function solution. Both evaluate
//! a finite-length and an infinite-length flaw and keep the smaller K per
//! member. [`CircumferentialSolver`] covers circumferential flaws under the
//! longitudinal stress.

pub mod anderson;
pub mod api579;
pub mod circumferential;

pub use anderson::AndersonSolver;
pub use api579::{Api579Solver, Api579Tables};
pub use circumferential::CircumferentialSolver;

use crate::stress_state::StressState;
use ndarray::{Array1, Zip};
use pipeline_types::config::{StressMethod, SurfaceLocation};
use pipeline_types::constants::CRITICAL_DEPTH_RATIO;
use pipeline_types::error::{PipelineError, PipelineResult};
use pipeline_types::run::AnalysisWarning;
use std::f64::consts::FRAC_PI_2;

/// Point on the crack front at which K is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngularPosition {
    /// φ = π/2
    Deepest,
    /// φ = 0
    Surface,
    /// Arbitrary elliptical angle φ [rad].
    General(f64),
}

impl AngularPosition {
    pub fn phi(&self) -> f64 {
        match self {
            AngularPosition::Deepest => FRAC_PI_2,
            AngularPosition::Surface => 0.0,
            AngularPosition::General(phi) => *phi,
        }
    }
}

/// Per-member K [MPa·√m], geometry factor F and shape factor Q.
#[derive(Debug, Clone)]
pub struct StressIntensity {
    pub k_max: Array1<f64>,
    pub f: Array1<f64>,
    pub q: Array1<f64>,
    pub warnings: Vec<AnalysisWarning>,
}

pub trait StressIntensitySolver {
    fn method(&self) -> StressMethod;

    /// Reject flaw surfaces the solution does not cover.
    fn check_surface(&self, _surface: SurfaceLocation) -> PipelineResult<()> {
        Ok(())
    }

    /// K at maximum pressure for crack depth `a` and surface length `2c`.
    fn calc_stress_intensity_factor(
        &self,
        state: &StressState,
        crack_depth: &Array1<f64>,
        crack_length: &Array1<f64>,
        position: AngularPosition,
    ) -> PipelineResult<StressIntensity>;
}

/// Flaw shape factor, API 579-1 Eq. 9B.95.
pub fn calc_q(a_over_c: &Array1<f64>) -> Array1<f64> {
    a_over_c.mapv(|ac| {
        if ac <= 1.0 {
            1.0 + 1.464 * ac.powf(1.65)
        } else {
            1.0 + 1.464 * (1.0 / ac).powf(1.65)
        }
    })
}

/// Elementwise minimum of two K solutions, carrying the F of the governing one.
pub(crate) fn governing_solution(
    k_a: &Array1<f64>,
    f_a: &Array1<f64>,
    k_b: &Array1<f64>,
    f_b: &Array1<f64>,
) -> (Array1<f64>, Array1<f64>) {
    let mut k = Array1::zeros(k_a.len());
    let mut f = Array1::zeros(k_a.len());
    Zip::from(&mut k)
        .and(&mut f)
        .and(k_a)
        .and(f_a)
        .and(k_b)
        .and(f_b)
        .for_each(|k, f, &ka, &fa, &kb, &fb| {
            if kb < ka {
                *k = kb;
                *f = fb;
            } else {
                *k = ka;
                *f = fa;
            }
        });
    (k, f)
}

pub(crate) fn depth_ratio_warning(a_over_t: &Array1<f64>, warnings: &mut Vec<AnalysisWarning>) {
    if a_over_t.iter().any(|&v| v > CRITICAL_DEPTH_RATIO) {
        warnings.push(AnalysisWarning::DepthRatioExceeded {
            limit: CRITICAL_DEPTH_RATIO,
        });
    }
}

/// Solver for the requested method. API 579-1 needs lookup tables.
pub fn build_solver(
    method: StressMethod,
    tables: Option<Api579Tables>,
) -> PipelineResult<Box<dyn StressIntensitySolver>> {
    match method {
        StressMethod::Anderson => Ok(Box::new(AndersonSolver)),
        StressMethod::Circumferential => Ok(Box::new(CircumferentialSolver)),
        StressMethod::Api => {
            let tables = tables.ok_or_else(|| {
                PipelineError::MissingParameter("API 579-1 lookup tables".to_string())
            })?;
            Ok(Box::new(Api579Solver::new(tables)))
        }
    }
}
