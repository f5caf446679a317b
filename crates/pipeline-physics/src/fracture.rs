// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Failure Assessment
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Failure assessment diagram coordinates along a crack history.

use crate::cycle_evolution::{CycleColumn, CycleState};
use crate::stress_state::StressState;
use ndarray::{Array2, Axis};
use pipeline_types::error::{PipelineError, PipelineResult};

/// `(steps × ensemble)` FAD coordinates.
#[derive(Debug, Clone)]
pub struct FailureAssessment {
    /// Kr = Kmax / K_IC
    pub toughness_ratio: Array2<f64>,
    /// Lr = σ_ref / σy, with σ_ref the uncracked hoop stress
    pub load_ratio: Array2<f64>,
}

pub fn assess_failure_state(
    cycles: &CycleState,
    stress_state: &StressState,
) -> PipelineResult<FailureAssessment> {
    let n = cycles.ensemble_size();
    if stress_state.sample_size() != n {
        return Err(PipelineError::InconsistentDimensions(format!(
            "cycle state has {n} members, stress state {}",
            stress_state.sample_size()
        )));
    }
    let k_ic = stress_state.material().fracture_resistance();
    let yield_strength = stress_state.material().yield_strength();

    let mut toughness_ratio = cycles.column(CycleColumn::KMax);
    for mut row in toughness_ratio.axis_iter_mut(Axis(0)) {
        row /= k_ic;
    }

    let lr = stress_state.reference_stress() / yield_strength;
    let mut load_ratio = Array2::zeros(toughness_ratio.raw_dim());
    for mut row in load_ratio.axis_iter_mut(Axis(0)) {
        row.assign(&lr);
    }

    Ok(FailureAssessment {
        toughness_ratio,
        load_ratio,
    })
}
