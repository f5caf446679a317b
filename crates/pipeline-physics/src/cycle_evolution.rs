// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Cycle Evolution
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cycle-by-cycle crack growth integration.
//!
//! Each step advances every ensemble member together, either by an adaptive
//! increment in a/t (default) or by a fixed number of load cycles. A member
//! deeper than 0.8·t or past `max_cycles` is frozen: its increment is zero
//! and later rows repeat its crack. Stepping ends once every member is
//! frozen, when no active member grows, or when the caller cancels.

use crate::crack_growth::CrackGrowth;
use crate::stress_intensity::{AngularPosition, StressIntensity, StressIntensitySolver};
use crate::stress_state::StressState;
use ndarray::{Array1, Array2, Zip};
use pipeline_types::config::{DeltaCRule, StressMethod};
use pipeline_types::constants::CRITICAL_DEPTH_RATIO;
use pipeline_types::error::{PipelineError, PipelineResult};
use pipeline_types::run::{AnalysisWarning, CancellationToken, RunStatus, WarningLog};

/// Initial a/t step as a fraction of the initial a/t.
const INITIAL_STEP_FRACTION: f64 = 0.001;
/// Relative a/t change below which the step grows.
const MIN_RELATIVE_CHANGE: f64 = 0.1;
/// Relative a/t change above which the step shrinks.
const MAX_RELATIVE_CHANGE: f64 = 0.5;
const STEP_SIZE_CHANGE: f64 = 0.005;
/// Rows needed before the step controller adapts.
const ADAPTIVE_MIN_ROWS: usize = 4;

/// Crack state of every ensemble member after one integration step.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleRow {
    pub total_cycles: Array1<f64>,
    pub a: Array1<f64>,
    pub c: Array1<f64>,
    pub a_over_t: Array1<f64>,
    pub k_max: Array1<f64>,
    pub delta_k: Array1<f64>,
    pub f: Array1<f64>,
    pub q: Array1<f64>,
    pub delta_n: Array1<f64>,
    pub delta_a: Array1<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleColumn {
    TotalCycles,
    A,
    C,
    AOverT,
    KMax,
    DeltaK,
    F,
    Q,
    DeltaN,
    DeltaA,
}

impl CycleColumn {
    pub const ALL: [CycleColumn; 10] = [
        CycleColumn::TotalCycles,
        CycleColumn::A,
        CycleColumn::C,
        CycleColumn::AOverT,
        CycleColumn::KMax,
        CycleColumn::DeltaK,
        CycleColumn::F,
        CycleColumn::Q,
        CycleColumn::DeltaN,
        CycleColumn::DeltaA,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CycleColumn::TotalCycles => "Total cycles",
            CycleColumn::A => "a (m)",
            CycleColumn::C => "c (m)",
            CycleColumn::AOverT => "a/t",
            CycleColumn::KMax => "Kmax (MPa m^1/2)",
            CycleColumn::DeltaK => "Delta K (MPa m^1/2)",
            CycleColumn::F => "F",
            CycleColumn::Q => "Q",
            CycleColumn::DeltaN => "Delta N",
            CycleColumn::DeltaA => "Delta a (m)",
        }
    }
}

impl CycleRow {
    pub fn get(&self, column: CycleColumn) -> &Array1<f64> {
        match column {
            CycleColumn::TotalCycles => &self.total_cycles,
            CycleColumn::A => &self.a,
            CycleColumn::C => &self.c,
            CycleColumn::AOverT => &self.a_over_t,
            CycleColumn::KMax => &self.k_max,
            CycleColumn::DeltaK => &self.delta_k,
            CycleColumn::F => &self.f,
            CycleColumn::Q => &self.q,
            CycleColumn::DeltaN => &self.delta_n,
            CycleColumn::DeltaA => &self.delta_a,
        }
    }

    fn member(&self, i: usize) -> CycleRow {
        let one = |v: &Array1<f64>| Array1::from_elem(1, v[i]);
        CycleRow {
            total_cycles: one(&self.total_cycles),
            a: one(&self.a),
            c: one(&self.c),
            a_over_t: one(&self.a_over_t),
            k_max: one(&self.k_max),
            delta_k: one(&self.delta_k),
            f: one(&self.f),
            q: one(&self.q),
            delta_n: one(&self.delta_n),
            delta_a: one(&self.delta_a),
        }
    }
}

/// Append-only table of integration steps. Row 0 is the initial flaw.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleState {
    rows: Vec<CycleRow>,
    ensemble_size: usize,
}

impl CycleState {
    fn new(initial: CycleRow) -> Self {
        let ensemble_size = initial.a.len();
        CycleState {
            rows: vec![initial],
            ensemble_size,
        }
    }

    fn push(&mut self, row: CycleRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ensemble_size(&self) -> usize {
        self.ensemble_size
    }

    pub fn rows(&self) -> &[CycleRow] {
        &self.rows
    }

    pub fn first(&self) -> &CycleRow {
        &self.rows[0]
    }

    pub fn last(&self) -> &CycleRow {
        &self.rows[self.rows.len() - 1]
    }

    /// `(steps × ensemble)` matrix of one column.
    pub fn column(&self, column: CycleColumn) -> Array2<f64> {
        let mut out = Array2::zeros((self.rows.len(), self.ensemble_size));
        for (mut dst, row) in out.rows_mut().into_iter().zip(self.rows.iter()) {
            dst.assign(row.get(column));
        }
        out
    }

    /// Step series of one column for a single member.
    pub fn series(&self, column: CycleColumn, member: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row.get(column)[member]).collect()
    }

    /// Single-member cycle state.
    pub fn member(&self, index: usize) -> PipelineResult<CycleState> {
        if index >= self.ensemble_size {
            return Err(PipelineError::InconsistentDimensions(format!(
                "member {index} requested from an ensemble of {}",
                self.ensemble_size
            )));
        }
        Ok(CycleState {
            rows: self.rows.iter().map(|row| row.member(index)).collect(),
            ensemble_size: 1,
        })
    }
}

/// Step size policy and termination limit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepControl {
    /// Stop once a member reaches this many cycles; unlimited if absent.
    pub max_cycles: Option<f64>,
    /// Fixed cycles per step; adaptive a/t stepping if absent.
    pub cycle_step: Option<f64>,
}

/// Result of one integration run.
#[derive(Debug, Clone)]
pub struct CycleRun {
    pub state: CycleState,
    pub status: RunStatus,
    pub warnings: WarningLog,
}

/// `values` with terminal members zeroed, which freezes their crack.
fn masked(values: Array1<f64>, active: &Array1<bool>) -> Array1<f64> {
    Zip::from(&values)
        .and(active)
        .map_collect(|&v, &active| if active { v } else { 0.0 })
}

/// New a/t increment for each member from the two most recent rows.
fn adaptive_step(previous: f64, current: f64) -> f64 {
    let step = current - previous;
    let change = step / current;
    if change < MIN_RELATIVE_CHANGE {
        step * (1.0 + STEP_SIZE_CHANGE)
    } else if change > MAX_RELATIVE_CHANGE {
        step * (1.0 - STEP_SIZE_CHANGE)
    } else {
        step
    }
}

pub struct CycleEvolution<'a> {
    stress_state: &'a StressState,
    solver: &'a dyn StressIntensitySolver,
    crack_growth: &'a CrackGrowth,
    delta_c_rule: DeltaCRule,
    control: StepControl,
    wall_thickness: Array1<f64>,
    r_ratio: Array1<f64>,
    initial_depth: Array1<f64>,
    initial_half_length: Array1<f64>,
}

impl<'a> CycleEvolution<'a> {
    pub fn new(
        stress_state: &'a StressState,
        solver: &'a dyn StressIntensitySolver,
        crack_growth: &'a CrackGrowth,
        delta_c_rule: DeltaCRule,
        control: StepControl,
    ) -> PipelineResult<Self> {
        if delta_c_rule == DeltaCRule::Independent && solver.method() != StressMethod::Api {
            return Err(PipelineError::InvalidGrowthRule(format!(
                "independent crack length growth requires the API 579-1 method, not {}",
                solver.method()
            )));
        }
        solver.check_surface(stress_state.defect().surface())?;
        let n = stress_state.sample_size();
        if crack_growth.sample_size() != n {
            return Err(PipelineError::InconsistentDimensions(format!(
                "crack growth model has {} members, stress state {n}",
                crack_growth.sample_size()
            )));
        }
        if let Some(step) = control.cycle_step {
            if !(step > 0.0) {
                return Err(PipelineError::Config(format!(
                    "cycle_step must be positive, got {step}"
                )));
            }
        }
        if let Some(max) = control.max_cycles {
            if !(max > 0.0) {
                return Err(PipelineError::Config(format!(
                    "max_cycles must be positive, got {max}"
                )));
            }
        }
        Ok(CycleEvolution {
            stress_state,
            solver,
            crack_growth,
            delta_c_rule,
            control,
            wall_thickness: stress_state.pipe().wall_thickness().clone(),
            r_ratio: stress_state.environment().r_ratio(),
            initial_depth: stress_state.initial_depth(),
            initial_half_length: stress_state.initial_half_length(),
        })
    }

    fn stress_intensity(
        &self,
        a: &Array1<f64>,
        c: &Array1<f64>,
        position: AngularPosition,
        warnings: &mut WarningLog,
    ) -> PipelineResult<StressIntensity> {
        let mut sif =
            self.solver
                .calc_stress_intensity_factor(self.stress_state, a, &(c * 2.0), position)?;
        warnings.extend(sif.warnings.drain(..));
        Ok(sif)
    }

    fn delta_k(&self, k_max: &Array1<f64>) -> Array1<f64> {
        k_max * &self.r_ratio.mapv(|r| 1.0 - r)
    }

    fn initial_row(&self, warnings: &mut WarningLog) -> PipelineResult<CycleRow> {
        let n = self.stress_state.sample_size();
        let a = self.initial_depth.clone();
        let c = self.initial_half_length.clone();
        let sif = self.stress_intensity(&a, &c, AngularPosition::Deepest, warnings)?;
        Ok(CycleRow {
            total_cycles: Array1::zeros(n),
            a_over_t: &a / &self.wall_thickness,
            delta_k: self.delta_k(&sif.k_max),
            a,
            c,
            k_max: sif.k_max,
            f: sif.f,
            q: sif.q,
            delta_n: Array1::zeros(n),
            delta_a: Array1::zeros(n),
        })
    }

    /// Members still below 0.8·t and short of `max_cycles`.
    fn active_members(&self, row: &CycleRow) -> Array1<bool> {
        let max_cycles = self.control.max_cycles.unwrap_or(f64::INFINITY);
        Zip::from(&row.a_over_t)
            .and(&row.total_cycles)
            .map_collect(|&at, &n| !(at > CRITICAL_DEPTH_RATIO || n >= max_cycles))
    }

    fn is_terminal(&self, row: &CycleRow) -> bool {
        !self.active_members(row).iter().any(|&active| active)
    }

    /// Next a/t increment per member; zero for terminal members.
    fn a_over_t_step(&self, state: &CycleState) -> Array1<f64> {
        let step = if state.len() < ADAPTIVE_MIN_ROWS {
            &self.initial_depth / &self.wall_thickness * INITIAL_STEP_FRACTION
        } else {
            let rows = state.rows();
            let previous = &rows[rows.len() - 2].a_over_t;
            let current = &rows[rows.len() - 1].a_over_t;
            Zip::from(previous)
                .and(current)
                .map_collect(|&p, &c| adaptive_step(p, c))
        };
        masked(step, &self.active_members(state.last()))
    }

    /// Crack half-length at depth `a_new` for the non-independent rules.
    fn coupled_half_length(&self, a_new: &Array1<f64>, c_prev: &Array1<f64>) -> Array1<f64> {
        match self.delta_c_rule {
            DeltaCRule::Proportional => Zip::from(a_new)
                .and(&self.initial_depth)
                .and(&self.initial_half_length)
                .map_collect(|&a, &a0, &c0| if a0 > 0.0 { a * c0 / a0 } else { c0 }),
            DeltaCRule::Fixed | DeltaCRule::Independent => c_prev.clone(),
        }
    }

    /// Surface-point growth over `delta_n` cycles for the independent rule.
    fn surface_growth(
        &self,
        a: &Array1<f64>,
        c: &Array1<f64>,
        delta_n: &Array1<f64>,
        warnings: &mut WarningLog,
    ) -> PipelineResult<Array1<f64>> {
        let surface = self.stress_intensity(a, c, AngularPosition::Surface, warnings)?;
        let delta_k_surface = self.delta_k(&surface.k_max);
        Ok(self.crack_growth.calc_delta_a(delta_n, &delta_k_surface))
    }

    /// One adaptive a/t step.
    fn step_a_over_t(&self, state: &CycleState, warnings: &mut WarningLog) -> PipelineResult<CycleRow> {
        let prev = state.last();
        let a_over_t = &prev.a_over_t + &self.a_over_t_step(state);
        let a = Zip::from(&a_over_t)
            .and(&self.wall_thickness)
            .and(&prev.a)
            .and(&self.active_members(prev))
            .map_collect(|&at, &t, &a_prev, &active| if active { at * t } else { a_prev });
        let delta_a = &a - &prev.a;

        let (c, sif, delta_k, delta_n) = if self.delta_c_rule == DeltaCRule::Independent {
            let deep = self.stress_intensity(&a, &prev.c, AngularPosition::Deepest, warnings)?;
            let delta_n = self
                .crack_growth
                .calc_delta_n(&delta_a, &self.delta_k(&deep.k_max));
            let delta_c = self.surface_growth(&a, &prev.c, &delta_n, warnings)?;
            let c = &prev.c + &delta_c;
            let sif = self.stress_intensity(&a, &c, AngularPosition::Deepest, warnings)?;
            let delta_k = self.delta_k(&sif.k_max);
            (c, sif, delta_k, delta_n)
        } else {
            let c = self.coupled_half_length(&a, &prev.c);
            let sif = self.stress_intensity(&a, &c, AngularPosition::Deepest, warnings)?;
            let delta_k = self.delta_k(&sif.k_max);
            let delta_n = self.crack_growth.calc_delta_n(&delta_a, &delta_k);
            (c, sif, delta_k, delta_n)
        };

        Ok(CycleRow {
            total_cycles: &prev.total_cycles + &delta_n,
            a,
            c,
            a_over_t,
            k_max: sif.k_max,
            delta_k,
            f: sif.f,
            q: sif.q,
            delta_n,
            delta_a,
        })
    }

    /// One fixed-cycle step driven by the previous ΔK.
    fn step_cycles(
        &self,
        state: &CycleState,
        cycle_step: f64,
        warnings: &mut WarningLog,
    ) -> PipelineResult<CycleRow> {
        let prev = state.last();
        let delta_n = masked(
            Array1::from_elem(prev.a.len(), cycle_step),
            &self.active_members(prev),
        );
        let delta_a = self.crack_growth.calc_delta_a(&delta_n, &prev.delta_k);
        let a = &prev.a + &delta_a;
        let c = if self.delta_c_rule == DeltaCRule::Independent {
            &prev.c + &self.surface_growth(&prev.a, &prev.c, &delta_n, warnings)?
        } else {
            self.coupled_half_length(&a, &prev.c)
        };
        let sif = self.stress_intensity(&a, &c, AngularPosition::Deepest, warnings)?;
        Ok(CycleRow {
            total_cycles: &prev.total_cycles + &delta_n,
            a_over_t: &a / &self.wall_thickness,
            delta_k: self.delta_k(&sif.k_max),
            a,
            c,
            k_max: sif.k_max,
            f: sif.f,
            q: sif.q,
            delta_n,
            delta_a,
        })
    }

    /// Integrate until every member is terminal or `token` is cancelled.
    pub fn run(&self, token: &CancellationToken) -> PipelineResult<CycleRun> {
        let mut warnings = WarningLog::new();
        let mut state = CycleState::new(self.initial_row(&mut warnings)?);
        log::debug!(
            "cycle evolution start: {} member(s), rule {}, {}",
            state.ensemble_size(),
            self.delta_c_rule,
            match self.control.cycle_step {
                Some(step) => format!("{step} cycles per step"),
                None => "adaptive a/t stepping".to_string(),
            }
        );

        let mut status = RunStatus::Finished;
        while !self.is_terminal(state.last()) {
            if token.is_cancelled() {
                status = RunStatus::Stopped;
                break;
            }
            let active = self.active_members(state.last());
            let row = match self.control.cycle_step {
                Some(step) => self.step_cycles(&state, step, &mut warnings)?,
                None => self.step_a_over_t(&state, &mut warnings)?,
            };
            let stalled = Zip::from(&row.delta_a)
                .and(&active)
                .all(|&da, &active| !active || !(da > 0.0));
            let total = row.total_cycles.iter().cloned().fold(0.0, f64::max);
            state.push(row);
            if stalled {
                warnings.push(AnalysisWarning::GrowthStalled {
                    total_cycles: total,
                });
                break;
            }
        }

        log::debug!(
            "cycle evolution {:?} after {} steps",
            status,
            state.len() - 1
        );
        Ok(CycleRun {
            state,
            status,
            warnings,
        })
    }
}
