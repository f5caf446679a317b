// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Analysis Summary
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Serializable digest of an analysis for collaborators that persist or
//! display results.

use crate::analysis::AnalysisResults;
use pipeline_physics::life_criteria::MemberLifeCriteria;
use pipeline_types::error::PipelineResult;
use pipeline_types::run::{AnalysisWarning, RunStatus};
use serde::{Deserialize, Serialize};

/// Spread of one life criterion across the ensemble, NaN members excluded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionSpread {
    pub reached: usize,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

impl CriterionSpread {
    fn from_values(values: impl Iterator<Item = f64>) -> Option<Self> {
        let mut finite: Vec<f64> = values.filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        finite.sort_by(|a, b| a.total_cmp(b));
        let n = finite.len();
        let median = if n % 2 == 1 {
            finite[n / 2]
        } else {
            0.5 * (finite[n / 2 - 1] + finite[n / 2])
        };
        Some(CriterionSpread {
            reached: n,
            min: finite[0],
            median,
            max: finite[n - 1],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub analysis_name: String,
    pub sample_type: String,
    pub random_seed: u64,
    pub status: RunStatus,
    pub uncertain_parameters: Vec<String>,
    pub nominal_life: Option<MemberLifeCriteria>,
    pub nominal_steps: Option<usize>,
    pub ensemble_size: usize,
    pub ensemble_cycles_to_a_crit: Option<CriterionSpread>,
    pub warnings: Vec<AnalysisWarning>,
    pub solve_time_ms: f64,
}

impl AnalysisSummary {
    pub fn from_results(results: &AnalysisResults) -> PipelineResult<Self> {
        let nominal_life = match &results.nominal {
            Some(nominal) => Some(nominal.life_criteria.member(0)?),
            None => None,
        };
        Ok(AnalysisSummary {
            analysis_name: results.analysis_name.clone(),
            sample_type: results.sample_type.to_string(),
            random_seed: results.random_seed,
            status: results.status,
            uncertain_parameters: results.uncertain_parameters.clone(),
            nominal_life,
            nominal_steps: results.nominal.as_ref().map(|n| n.cycles.len()),
            ensemble_size: results.ensemble.as_ref().map_or(0, |e| e.sample_size()),
            ensemble_cycles_to_a_crit: results.ensemble.as_ref().and_then(|e| {
                CriterionSpread::from_values(e.life_criteria.cycles_to_a_crit.iter().copied())
            }),
            warnings: results.warnings.as_slice().to_vec(),
            solve_time_ms: results.solve_time_ms,
        })
    }

    pub fn to_json(&self) -> PipelineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread_skips_nan() {
        let s = CriterionSpread::from_values([3.0, f64::NAN, 1.0, 2.0].into_iter()).unwrap();
        assert_eq!(s.reached, 3);
        assert_eq!((s.min, s.median, s.max), (1.0, 2.0, 3.0));
        let even = CriterionSpread::from_values([4.0, 1.0].into_iter()).unwrap();
        assert_eq!(even.median, 2.5);
        assert!(CriterionSpread::from_values([f64::NAN].into_iter()).is_none());
    }
}
