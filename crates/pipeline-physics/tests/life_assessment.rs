// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Life Assessment Integration Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Full crack growth runs through life criteria and failure assessment.

use ndarray::{array, Array1};
use pipeline_math::table::{LookupTable, TableAxis};
use pipeline_physics::crack_growth::CrackGrowth;
use pipeline_physics::cycle_evolution::{CycleColumn, CycleEvolution, StepControl};
use pipeline_physics::defect::Defect;
use pipeline_physics::environment::Environment;
use pipeline_physics::fracture::assess_failure_state;
use pipeline_physics::life_criteria::calc_pipe_life_criteria;
use pipeline_physics::material::Material;
use pipeline_physics::pipe::Pipe;
use pipeline_physics::stress_intensity::{AndersonSolver, Api579Solver, Api579Tables};
use pipeline_physics::stress_state::StressState;
use pipeline_types::config::{DeltaCRule, GrowthModelSpec, SurfaceLocation};
use pipeline_types::run::{AnalysisWarning, CancellationToken, RunStatus};

const WALL: f64 = 0.0103;

fn nominal_state(surface: SurfaceLocation) -> StressState {
    StressState::new(
        Pipe::from_scalars(0.9144, WALL).unwrap(),
        Environment::from_scalars(5.79, 4.40, 293.0, 1.0).unwrap(),
        Material::from_scalars(358.5, 55.0).unwrap(),
        Defect::from_scalars(25.0, 0.04, surface).unwrap(),
    )
    .unwrap()
}

/// Influence coefficients roughly shaped like the published tables:
/// G rises with a/t, weakly with a/c.
fn synthetic_tables() -> Api579Tables {
    let axis = |name: &str, points: &[f64]| TableAxis {
        name: name.into(),
        points: points.to_vec(),
    };
    let infinite = LookupTable::from_fn(
        vec![
            axis("Ri/t", &[5.0, 10.0, 20.0, 60.0, 100.0]),
            axis("a/t", &[0.0, 0.2, 0.4, 0.6, 0.8]),
        ],
        (0..5).map(|k| format!("G{k}")).collect(),
        |c, o| {
            let base = [1.12, 0.68, 0.52, 0.43, 0.37][o];
            base * (1.0 + 2.5 * c[1] * c[1])
        },
    )
    .unwrap();
    let finite = LookupTable::from_fn(
        vec![
            axis("Ri/t", &[5.0, 10.0, 20.0, 60.0, 100.0]),
            axis("a/c", &[0.03125, 0.0625, 0.125, 0.25, 0.5, 1.0, 2.0]),
            axis("a/t", &[0.0, 0.2, 0.4, 0.6, 0.8]),
        ],
        (0..14).map(|k| format!("A{}{}", k / 2, k % 2)).collect(),
        |c, o| {
            let growth = 1.0 + 1.5 * c[2] * c[2] * (1.0 - 0.3 * c[1].min(1.0));
            match o {
                0 => 0.65 * growth,
                1 => 0.10 * growth,
                2 => 0.45 * growth,
                3 => 0.40 * growth,
                _ => 0.0,
            }
        },
    )
    .unwrap();
    Api579Tables {
        infinite_inside: infinite.clone(),
        infinite_outside: infinite,
        finite_inside: finite.clone(),
        finite_outside: finite,
    }
}

#[test]
fn nominal_anderson_code_case_scenario() {
    let state = nominal_state(SurfaceLocation::Inside);
    let growth = CrackGrowth::new(&GrowthModelSpec::code_case_2938(), state.environment()).unwrap();
    let evolution = CycleEvolution::new(
        &state,
        &AndersonSolver,
        &growth,
        DeltaCRule::Proportional,
        StepControl::default(),
    )
    .unwrap();
    let run = evolution.run(&CancellationToken::new()).unwrap();
    assert_eq!(run.status, RunStatus::Finished);
    assert!(run.state.last().a_over_t[0] > 0.8);

    let life = calc_pipe_life_criteria(&run.state, state.pipe(), state.material()).unwrap();
    let a0 = 0.25 * WALL;
    let a_crit = life.a_crit[0];
    assert!(a_crit.is_finite(), "a_crit should be reached");
    assert!(a0 < a_crit && a_crit < 0.8 * WALL, "a_crit = {a_crit}");

    let member = life.member(0).unwrap();
    assert!(member.cycles_to_a_crit > 0.0);
    assert!(member.cycles_to_quarter_a_crit <= member.cycles_to_a_crit);
    assert!((member.cycles_to_half_nc - member.cycles_to_a_crit / 2.0).abs() < 1e-9);
    assert!(member.a_over_t_at_half_nc > 0.25 && member.a_over_t_at_half_nc < a_crit / WALL);
    assert!((member.a_over_t_at_quarter_a_crit - 0.25 * a_crit / WALL).abs() < 1e-12);
    // 25 % of a_crit lies below a0, so the criterion sits before the first step.
    assert_eq!(member.cycles_to_quarter_a_crit, 1.0);
}

#[test]
fn failure_assessment_coordinates() {
    let state = nominal_state(SurfaceLocation::Inside);
    let growth = CrackGrowth::new(&GrowthModelSpec::code_case_2938(), state.environment()).unwrap();
    let control = StepControl {
        max_cycles: Some(1000.0),
        cycle_step: Some(250.0),
    };
    let evolution =
        CycleEvolution::new(&state, &AndersonSolver, &growth, DeltaCRule::Fixed, control).unwrap();
    let run = evolution.run(&CancellationToken::new()).unwrap();
    let fad = assess_failure_state(&run.state, &state).unwrap();

    let k = run.state.column(CycleColumn::KMax);
    assert_eq!(fad.toughness_ratio.dim(), k.dim());
    assert!((fad.toughness_ratio[[2, 0]] - k[[2, 0]] / 55.0).abs() < 1e-12);
    let lr = 5.79 * 0.45205 / WALL / 358.5;
    assert!(fad.load_ratio.iter().all(|&v| (v - lr).abs() < 1e-12));
}

#[test]
fn life_criteria_nan_when_not_reached() {
    let state = StressState::new(
        Pipe::from_scalars(0.9144, WALL).unwrap(),
        Environment::from_scalars(5.79, 4.40, 293.0, 1.0).unwrap(),
        Material::from_scalars(358.5, 500.0).unwrap(),
        Defect::from_scalars(25.0, 0.04, SurfaceLocation::Inside).unwrap(),
    )
    .unwrap();
    let growth = CrackGrowth::new(&GrowthModelSpec::code_case_2938(), state.environment()).unwrap();
    let control = StepControl {
        max_cycles: Some(500.0),
        cycle_step: None,
    };
    let evolution =
        CycleEvolution::new(&state, &AndersonSolver, &growth, DeltaCRule::Proportional, control)
            .unwrap();
    let run = evolution.run(&CancellationToken::new()).unwrap();
    let life = calc_pipe_life_criteria(&run.state, state.pipe(), state.material()).unwrap();
    assert!(life.a_crit[0].is_nan());
    assert!(life.cycles_to_a_crit[0].is_nan());
    assert!(life.warnings.is_empty());
}

#[test]
fn life_criteria_fall_back_past_critical_depth() {
    // Toughness far above any reachable K: a_crit falls back to 0.8·t.
    let state = StressState::new(
        Pipe::from_scalars(0.9144, WALL).unwrap(),
        Environment::from_scalars(5.79, 4.40, 293.0, 1.0).unwrap(),
        Material::from_scalars(358.5, 5000.0).unwrap(),
        Defect::from_scalars(25.0, 0.04, SurfaceLocation::Inside).unwrap(),
    )
    .unwrap();
    let growth = CrackGrowth::new(&GrowthModelSpec::code_case_2938(), state.environment()).unwrap();
    let evolution = CycleEvolution::new(
        &state,
        &AndersonSolver,
        &growth,
        DeltaCRule::Proportional,
        StepControl::default(),
    )
    .unwrap();
    let run = evolution.run(&CancellationToken::new()).unwrap();
    let life = calc_pipe_life_criteria(&run.state, state.pipe(), state.material()).unwrap();
    assert!((life.a_crit[0] - 0.8 * WALL).abs() < 1e-15);
    assert!(life
        .warnings
        .iter()
        .any(|w| matches!(w, AnalysisWarning::CriticalDepthFallback { members: 1 })));
}

#[test]
fn ensemble_members_evolve_independently() {
    // Specifications must share an ensemble size.
    let mismatched = StressState::new(
        Pipe::from_scalars(0.9144, WALL).unwrap(),
        Environment::new(
            &array![5.79, 5.79],
            &array![4.40],
            &array![293.0],
            &array![1.0, 0.1],
        )
        .unwrap(),
        Material::from_scalars(358.5, 55.0).unwrap(),
        Defect::from_scalars(25.0, 0.04, SurfaceLocation::Inside).unwrap(),
    );
    assert!(mismatched.is_err());

    let n = 2;
    let ones = |v: f64| Array1::from_elem(n, v);
    let state = StressState::new(
        Pipe::new(&ones(0.9144), &ones(WALL)).unwrap(),
        Environment::new(&ones(5.79), &ones(4.40), &ones(293.0), &array![1.0, 0.1]).unwrap(),
        Material::new(&ones(358.5), &ones(55.0)).unwrap(),
        Defect::new(&ones(25.0), &ones(0.04), SurfaceLocation::Inside).unwrap(),
    )
    .unwrap();
    let growth = CrackGrowth::new(&GrowthModelSpec::code_case_2938(), state.environment()).unwrap();
    let evolution = CycleEvolution::new(
        &state,
        &AndersonSolver,
        &growth,
        DeltaCRule::Proportional,
        StepControl::default(),
    )
    .unwrap();
    let run = evolution.run(&CancellationToken::new()).unwrap();
    let life = calc_pipe_life_criteria(&run.state, state.pipe(), state.material()).unwrap();
    // Less hydrogen, slower growth, longer life.
    assert!(life.cycles_to_a_crit[1] > life.cycles_to_a_crit[0]);
    let single = run.state.member(1).unwrap();
    assert_eq!(single.ensemble_size(), 1);
    assert_eq!(single.len(), run.state.len());
}

#[test]
fn api_solver_with_independent_length_growth() {
    let state = nominal_state(SurfaceLocation::Inside);
    let solver = Api579Solver::new(synthetic_tables());
    let growth = CrackGrowth::new(&GrowthModelSpec::code_case_2938(), state.environment()).unwrap();
    let control = StepControl {
        max_cycles: Some(20_000.0),
        cycle_step: None,
    };
    let evolution =
        CycleEvolution::new(&state, &solver, &growth, DeltaCRule::Independent, control).unwrap();
    let run = evolution.run(&CancellationToken::new()).unwrap();
    let first = run.state.first();
    let last = run.state.last();
    assert!(last.a[0] > first.a[0]);
    assert!(last.c[0] >= first.c[0], "c must not shrink");
    assert!(last.k_max[0] > first.k_max[0]);
}

#[test]
fn api_solver_outside_flaw_runs() {
    let state = nominal_state(SurfaceLocation::Outside);
    let solver = Api579Solver::new(synthetic_tables());
    let growth = CrackGrowth::new(&GrowthModelSpec::paris_law(8.0e-12, 3.0), state.environment())
        .unwrap();
    let control = StepControl {
        max_cycles: Some(5_000.0),
        cycle_step: Some(500.0),
    };
    let evolution =
        CycleEvolution::new(&state, &solver, &growth, DeltaCRule::Proportional, control).unwrap();
    let run = evolution.run(&CancellationToken::new()).unwrap();
    assert_eq!(run.status, RunStatus::Finished);
    assert_eq!(run.state.len(), 11);
}
