// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Property-Based Tests (proptest) for pipeline-physics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for pipeline-physics using proptest.
//!
//! Covers: Paris law inversion, Anderson minimum and monotonicity,
//! fixed crack length coupling, max_cycles stopping.

use ndarray::array;
use pipeline_physics::crack_growth::CrackGrowth;
use pipeline_physics::cycle_evolution::{CycleEvolution, StepControl};
use pipeline_physics::defect::Defect;
use pipeline_physics::environment::Environment;
use pipeline_physics::material::Material;
use pipeline_physics::pipe::Pipe;
use pipeline_physics::stress_intensity::{
    calc_q, AndersonSolver, AngularPosition, StressIntensitySolver,
};
use pipeline_physics::stress_state::StressState;
use pipeline_types::config::{DeltaCRule, GrowthModelSpec, SurfaceLocation};
use pipeline_types::run::CancellationToken;
use proptest::prelude::*;

const WALL: f64 = 0.0103;

fn state_with(depth_pct: f64, length: f64) -> StressState {
    StressState::new(
        Pipe::from_scalars(0.9144, WALL).unwrap(),
        Environment::from_scalars(5.79, 4.40, 293.0, 1.0).unwrap(),
        Material::from_scalars(358.5, 55.0).unwrap(),
        Defect::from_scalars(depth_pct, length, SurfaceLocation::Inside).unwrap(),
    )
    .unwrap()
}

// ── Crack Growth Rate ────────────────────────────────────────────────

proptest! {
    /// ΔN from Δa maps back to the same Δa under the Paris law.
    #[test]
    fn paris_law_round_trip(
        c in 1e-13f64..1e-10,
        m in 2.0f64..5.0,
        delta_a in 1e-7f64..1e-3,
        delta_k in 0.5f64..60.0,
    ) {
        let growth = CrackGrowth::from_ratios(
            &GrowthModelSpec::paris_law(c, m),
            array![0.5],
            array![1.0],
        ).unwrap();
        let dk = array![delta_k];
        let dn = growth.calc_delta_n(&array![delta_a], &dk);
        let back = growth.calc_delta_a(&dn, &dk);
        prop_assert!((back[0] - delta_a).abs() <= 1e-9 * delta_a,
            "Δa {} came back as {}", delta_a, back[0]);
    }

    /// Non-positive ΔK never produces growth.
    #[test]
    fn paris_law_masks_non_positive_delta_k(delta_k in -50.0f64..=0.0, delta_n in 1.0f64..1e6) {
        let growth = CrackGrowth::from_ratios(
            &GrowthModelSpec::paris_law(6.89e-12, 3.0),
            array![0.1],
            array![1.0],
        ).unwrap();
        let da = growth.calc_delta_a(&array![delta_n], &array![delta_k]);
        prop_assert_eq!(da[0], 0.0);
    }

    /// The hydrogen curve never falls below the air curve.
    #[test]
    fn code_case_floored_by_air(
        r in 0.0f64..0.95,
        f in 0.0f64..1.0,
        delta_k in 0.5f64..80.0,
    ) {
        let growth = CrackGrowth::from_ratios(
            &GrowthModelSpec::code_case_2938(),
            array![r],
            array![f],
        ).unwrap();
        let rate = growth.growth_rate(&array![delta_k]);
        let air = 6.89e-12 * delta_k.powi(3);
        prop_assert!(rate[0] >= air * (1.0 - 1e-12));
    }
}

// ── Stress Intensity ─────────────────────────────────────────────────

proptest! {
    /// Anderson K is the elementwise minimum of its two branches.
    #[test]
    fn anderson_is_minimum_of_branches(a_over_t in 0.01f64..0.8, length in 0.005f64..0.3) {
        let state = state_with(25.0, length);
        let a = array![a_over_t * WALL];
        let two_c = array![length];
        let q = calc_q(&(&a / &(&two_c / 2.0)));
        let (k_fin, _) = AndersonSolver::finite_length(&state, &a, &two_c, &q);
        let (k_inf, _) = AndersonSolver::infinite_length(&state, &a);
        let sif = AndersonSolver
            .calc_stress_intensity_factor(&state, &a, &two_c, AngularPosition::Deepest)
            .unwrap();
        prop_assert!((sif.k_max[0] - k_fin[0].min(k_inf[0])).abs() < 1e-12);
    }

    /// Deeper cracks of the same length never have a lower K.
    #[test]
    fn anderson_non_decreasing_in_depth(
        lo in 0.01f64..0.79,
        span in 0.0f64..0.2,
        length in 0.005f64..0.3,
    ) {
        let hi = (lo + span).min(0.8);
        let state = state_with(25.0, length);
        let two_c = array![length];
        let k_at = |a_over_t: f64| {
            AndersonSolver
                .calc_stress_intensity_factor(
                    &state,
                    &array![a_over_t * WALL],
                    &two_c,
                    AngularPosition::Deepest,
                )
                .unwrap()
                .k_max[0]
        };
        let (k_lo, k_hi) = (k_at(lo), k_at(hi));
        prop_assert!(k_hi >= k_lo - 1e-12, "K({}) = {} < K({}) = {}", hi, k_hi, lo, k_lo);
    }
}

// ── Cycle Evolution ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Fixed coupling never changes the crack half-length.
    #[test]
    fn fixed_rule_keeps_length(length in 0.01f64..0.2, step in 200.0f64..2000.0) {
        let state = state_with(25.0, length);
        let growth = CrackGrowth::new(&GrowthModelSpec::code_case_2938(), state.environment()).unwrap();
        let control = StepControl { max_cycles: Some(10.0 * step), cycle_step: Some(step) };
        let evolution = CycleEvolution::new(
            &state, &AndersonSolver, &growth, DeltaCRule::Fixed, control,
        ).unwrap();
        let run = evolution.run(&CancellationToken::new()).unwrap();
        prop_assert_eq!(run.state.last().c[0], length / 2.0);
        prop_assert!(run.state.last().a[0] > run.state.first().a[0]);
    }

    /// A cycle cap below natural completion stops the run just past it.
    #[test]
    fn max_cycles_stops_before_critical_depth(max_cycles in 100.0f64..20_000.0) {
        let state = state_with(25.0, 0.04);
        let growth = CrackGrowth::new(&GrowthModelSpec::code_case_2938(), state.environment()).unwrap();
        let control = StepControl { max_cycles: Some(max_cycles), cycle_step: None };
        let evolution = CycleEvolution::new(
            &state, &AndersonSolver, &growth, DeltaCRule::Proportional, control,
        ).unwrap();
        let run = evolution.run(&CancellationToken::new()).unwrap();
        let rows = run.state.rows();
        let last = &rows[rows.len() - 1];
        let before = &rows[rows.len() - 2];
        prop_assert!(last.a_over_t[0] < 0.8);
        prop_assert!(last.total_cycles[0] >= max_cycles);
        prop_assert!(before.total_cycles[0] < max_cycles);
    }
}
