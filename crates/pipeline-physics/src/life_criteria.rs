// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Life Criteria
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reduction of a stepped crack history to cycles-to-X criteria.

use crate::cycle_evolution::{CycleColumn, CycleState};
use crate::material::Material;
use crate::pipe::Pipe;
use ndarray::Array1;
use pipeline_math::interp::interp1d;
use pipeline_types::constants::CRITICAL_DEPTH_RATIO;
use pipeline_types::error::{PipelineError, PipelineResult};
use pipeline_types::run::{AnalysisWarning, WarningLog};
use serde::{Deserialize, Serialize};

/// Fraction of a_crit used for the early-warning criterion.
const QUARTER_A_CRIT: f64 = 0.25;
/// Value returned when a criterion lies before the first step.
const BEFORE_FIRST_STEP: f64 = 1.0;

/// Per-member life criteria of an ensemble.
#[derive(Debug, Clone)]
pub struct LifeCriteria {
    /// Critical crack depth [m]; NaN if never reached.
    pub a_crit: Array1<f64>,
    pub cycles_to_a_crit: Array1<f64>,
    pub a_over_t_at_a_crit: Array1<f64>,
    pub cycles_to_quarter_a_crit: Array1<f64>,
    pub a_over_t_at_quarter_a_crit: Array1<f64>,
    pub cycles_to_half_nc: Array1<f64>,
    pub a_over_t_at_half_nc: Array1<f64>,
    pub warnings: WarningLog,
}

/// Life criteria of a single member.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberLifeCriteria {
    pub a_crit: f64,
    pub cycles_to_a_crit: f64,
    pub a_over_t_at_a_crit: f64,
    pub cycles_to_quarter_a_crit: f64,
    pub a_over_t_at_quarter_a_crit: f64,
    pub cycles_to_half_nc: f64,
    pub a_over_t_at_half_nc: f64,
}

impl LifeCriteria {
    pub fn len(&self) -> usize {
        self.a_crit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a_crit.is_empty()
    }

    pub fn member(&self, index: usize) -> PipelineResult<MemberLifeCriteria> {
        if index >= self.len() {
            return Err(PipelineError::InconsistentDimensions(format!(
                "member {index} requested from {} life criteria",
                self.len()
            )));
        }
        Ok(MemberLifeCriteria {
            a_crit: self.a_crit[index],
            cycles_to_a_crit: self.cycles_to_a_crit[index],
            a_over_t_at_a_crit: self.a_over_t_at_a_crit[index],
            cycles_to_quarter_a_crit: self.cycles_to_quarter_a_crit[index],
            a_over_t_at_quarter_a_crit: self.a_over_t_at_quarter_a_crit[index],
            cycles_to_half_nc: self.cycles_to_half_nc[index],
            a_over_t_at_half_nc: self.a_over_t_at_half_nc[index],
        })
    }
}

/// Crack depth at the first step where Kmax reaches `fracture_resistance`,
/// linearly interpolated within that step.
fn first_crossing(k_max: &[f64], a: &[f64], fracture_resistance: f64) -> Option<f64> {
    let j = k_max.iter().position(|&k| k >= fracture_resistance)?;
    if j == 0 {
        return Some(a[0]);
    }
    let (k0, k1) = (k_max[j - 1], k_max[j]);
    let t = if k1 > k0 {
        (fracture_resistance - k0) / (k1 - k0)
    } else {
        1.0
    };
    Some(a[j - 1] + t * (a[j] - a[j - 1]))
}

/// Life criteria of every member of `state`.
pub fn calc_pipe_life_criteria(
    state: &CycleState,
    pipe: &Pipe,
    material: &Material,
) -> PipelineResult<LifeCriteria> {
    let n = state.ensemble_size();
    if pipe.sample_size() != n || material.sample_size() != n {
        return Err(PipelineError::InconsistentDimensions(format!(
            "cycle state has {n} members, pipe {} and material {}",
            pipe.sample_size(),
            material.sample_size()
        )));
    }

    let t = pipe.wall_thickness();
    let k_ic = material.fracture_resistance();
    let mut warnings = WarningLog::new();
    let mut fallback_members = 0;

    let mut out = LifeCriteria {
        a_crit: Array1::zeros(n),
        cycles_to_a_crit: Array1::zeros(n),
        a_over_t_at_a_crit: Array1::zeros(n),
        cycles_to_quarter_a_crit: Array1::zeros(n),
        a_over_t_at_quarter_a_crit: Array1::zeros(n),
        cycles_to_half_nc: Array1::zeros(n),
        a_over_t_at_half_nc: Array1::zeros(n),
        warnings: WarningLog::new(),
    };

    for i in 0..n {
        let a = state.series(CycleColumn::A, i);
        let k_max = state.series(CycleColumn::KMax, i);
        let cycles = state.series(CycleColumn::TotalCycles, i);
        let a_over_t = state.series(CycleColumn::AOverT, i);
        let a_limit = CRITICAL_DEPTH_RATIO * t[i];

        let a_crit = match first_crossing(&k_max, &a, k_ic[i]) {
            Some(value) => value.min(a_limit),
            None if a_over_t.iter().any(|&v| v > CRITICAL_DEPTH_RATIO) => {
                fallback_members += 1;
                a_limit
            }
            None => f64::NAN,
        };

        let right = Some(f64::NAN);
        let left = Some(BEFORE_FIRST_STEP);
        let n_crit = interp1d(a_crit, &a, &cycles, left, right);
        let n_quarter = interp1d(QUARTER_A_CRIT * a_crit, &a, &cycles, left, right);
        let half_nc = n_crit / 2.0;

        out.a_crit[i] = a_crit;
        out.cycles_to_a_crit[i] = n_crit;
        out.a_over_t_at_a_crit[i] = a_crit / t[i];
        out.cycles_to_quarter_a_crit[i] = n_quarter;
        out.a_over_t_at_quarter_a_crit[i] = QUARTER_A_CRIT * a_crit / t[i];
        out.cycles_to_half_nc[i] = half_nc;
        out.a_over_t_at_half_nc[i] = interp1d(half_nc, &cycles, &a_over_t, left, right);
    }

    if fallback_members > 0 {
        warnings.push(AnalysisWarning::CriticalDepthFallback {
            members: fallback_members,
        });
    }
    out.warnings = warnings;
    Ok(out)
}
