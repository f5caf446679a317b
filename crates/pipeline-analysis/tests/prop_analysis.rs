// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Analysis Property Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based checks of whole deterministic analyses.

use pipeline_analysis::analysis::CrackEvolutionAnalysis;
use pipeline_types::config::{AnalysisConfig, ParameterSpec, StudyConfig};
use pipeline_types::run::{CancellationToken, RunStatus};
use proptest::prelude::*;

const WALL: f64 = 0.0103;

fn config(flaw_depth: f64, max_pressure: f64) -> AnalysisConfig {
    let parameters = [
        ("outer_diameter", 0.9144),
        ("wall_thickness", WALL),
        ("flaw_depth", flaw_depth),
        ("flaw_length", 0.04),
        ("max_pressure", max_pressure),
        ("min_pressure", 0.7 * max_pressure),
        ("temperature", 293.0),
        ("volume_fraction_h2", 1.0),
        ("yield_strength", 358.5),
        ("fracture_resistance", 55.0),
    ]
    .iter()
    .map(|&(name, value)| ParameterSpec::deterministic(name, value))
    .collect();
    AnalysisConfig {
        analysis_name: "prop".into(),
        parameters,
        study: StudyConfig::default(),
        stress_method: "anderson".into(),
        surface: "inside".into(),
        delta_c_rule: "proportional".into(),
        crack_growth_model: Default::default(),
        max_cycles: None,
        cycle_step: None,
        api_tables: None,
    }
}

// ── Nominal runs ─────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Crack depth and cycle count never decrease, and the critical depth
    /// lies between the initial flaw and the depth limit.
    #[test]
    fn nominal_run_is_monotone(
        flaw_depth in 10.0f64..40.0,
        max_pressure in 4.0f64..6.0,
    ) {
        let results = CrackEvolutionAnalysis::new(config(flaw_depth, max_pressure))
            .unwrap()
            .perform_study(&CancellationToken::new())
            .unwrap();
        prop_assert_eq!(results.status, RunStatus::Finished);
        let nominal = results.nominal.unwrap();
        let rows = nominal.cycles.rows();
        for pair in rows.windows(2) {
            prop_assert!(pair[1].a[0] >= pair[0].a[0]);
            prop_assert!(pair[1].total_cycles[0] >= pair[0].total_cycles[0]);
        }
        let a0 = flaw_depth / 100.0 * WALL;
        let a_crit = nominal.life_criteria.a_crit[0];
        prop_assert!(a_crit > a0 && a_crit <= 0.8 * WALL + 1e-12, "a_crit = {}", a_crit);
    }
}
