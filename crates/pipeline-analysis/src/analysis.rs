// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Crack Evolution Analysis
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! CrackEvolutionAnalysis: nominal and ensemble crack growth studies.
//!
//! A probabilistic study runs the sampled ensemble first, then the
//! nominal pipe. A deterministic study runs only the nominal pipe.
//! Every specification is built and validated before any integration
//! starts.

use crate::derived::DerivedQuantities;
use ndarray::Array1;
use pipeline_physics::crack_growth::{design_curve, CrackGrowth};
use pipeline_physics::cycle_evolution::{CycleEvolution, CycleState, StepControl};
use pipeline_physics::defect::Defect;
use pipeline_physics::environment::Environment;
use pipeline_physics::fracture::{assess_failure_state, FailureAssessment};
use pipeline_physics::life_criteria::{calc_pipe_life_criteria, LifeCriteria};
use pipeline_physics::material::Material;
use pipeline_physics::pipe::Pipe;
use pipeline_physics::stress_intensity::{build_solver, Api579Tables, StressIntensitySolver};
use pipeline_physics::stress_state::StressState;
use pipeline_types::config::{
    AnalysisConfig, DeltaCRule, SampleType, StressMethod, SurfaceLocation,
};
use pipeline_types::error::{PipelineError, PipelineResult};
use pipeline_types::run::{CancellationToken, RunStatus, WarningLog};
use pipeline_uq::sample_sheet::SampleSheet;
use pipeline_uq::study::{study_from_config, UncertaintyStudy};

pub const OUTER_DIAMETER: &str = "outer_diameter";
pub const WALL_THICKNESS: &str = "wall_thickness";
pub const FLAW_DEPTH: &str = "flaw_depth";
pub const FLAW_LENGTH: &str = "flaw_length";
pub const MAX_PRESSURE: &str = "max_pressure";
pub const MIN_PRESSURE: &str = "min_pressure";
pub const TEMPERATURE: &str = "temperature";
pub const VOLUME_FRACTION_H2: &str = "volume_fraction_h2";
pub const YIELD_STRENGTH: &str = "yield_strength";
pub const FRACTURE_RESISTANCE: &str = "fracture_resistance";
/// Optional; defaults to 1.
pub const LOCATION_FACTOR: &str = "location_factor";

/// Parameters every analysis must characterize.
pub const REQUIRED_PARAMETERS: [&str; 10] = [
    OUTER_DIAMETER,
    WALL_THICKNESS,
    FLAW_DEPTH,
    MAX_PRESSURE,
    MIN_PRESSURE,
    TEMPERATURE,
    VOLUME_FRACTION_H2,
    YIELD_STRENGTH,
    FRACTURE_RESISTANCE,
    FLAW_LENGTH,
];

/// Results of one integrated ensemble (nominal or sampled).
#[derive(Debug, Clone)]
pub struct EnsembleResult {
    pub inputs: SampleSheet,
    pub stress_state: StressState,
    pub cycles: CycleState,
    pub life_criteria: LifeCriteria,
    pub derived: DerivedQuantities,
    pub status: RunStatus,
    pub warnings: WarningLog,
}

impl EnsembleResult {
    pub fn sample_size(&self) -> usize {
        self.stress_state.sample_size()
    }

    /// FAD coordinates along every member's crack history.
    pub fn failure_assessment(&self) -> PipelineResult<FailureAssessment> {
        assess_failure_state(&self.cycles, &self.stress_state)
    }
}

/// Outcome of [`CrackEvolutionAnalysis::perform_study`].
#[derive(Debug, Clone)]
pub struct AnalysisResults {
    pub analysis_name: String,
    pub sample_type: SampleType,
    pub random_seed: u64,
    pub status: RunStatus,
    pub uncertain_parameters: Vec<String>,
    /// `None` when the study was stopped during the ensemble run.
    pub nominal: Option<EnsembleResult>,
    /// Present for probabilistic studies with a non-empty ensemble.
    pub ensemble: Option<EnsembleResult>,
    pub warnings: WarningLog,
    pub solve_time_ms: f64,
}

/// A specification ready to integrate.
struct PreparedRun {
    inputs: SampleSheet,
    stress_state: StressState,
    crack_growth: CrackGrowth,
}

/// Pipeline fatigue life analysis described by an [`AnalysisConfig`].
pub struct CrackEvolutionAnalysis {
    config: AnalysisConfig,
    stress_method: StressMethod,
    surface: SurfaceLocation,
    delta_c_rule: DeltaCRule,
    sample_type: SampleType,
    tables: Option<Api579Tables>,
    random_seed: u64,
}

impl CrackEvolutionAnalysis {
    /// Validates selectors and required parameters; loads lookup tables
    /// when the configuration names a table file. Without a configured
    /// seed a random one is drawn and reported.
    pub fn new(config: AnalysisConfig) -> PipelineResult<Self> {
        let stress_method: StressMethod = config.stress_method.parse()?;
        let surface: SurfaceLocation = config.surface.parse()?;
        let delta_c_rule: DeltaCRule = config.delta_c_rule.parse()?;
        let sample_type: SampleType = config.study.sample_type.parse()?;
        for name in REQUIRED_PARAMETERS {
            if config.parameter(name).is_none() {
                return Err(PipelineError::MissingParameter(format!(
                    "analysis parameter '{name}' is not specified"
                )));
            }
        }
        let tables = match &config.api_tables {
            Some(path) => Some(Api579Tables::from_file(path)?),
            None => None,
        };
        let random_seed = config.study.random_seed.unwrap_or_else(rand::random);
        Ok(CrackEvolutionAnalysis {
            config,
            stress_method,
            surface,
            delta_c_rule,
            sample_type,
            tables,
            random_seed,
        })
    }

    pub fn from_file(path: &str) -> PipelineResult<Self> {
        Self::new(AnalysisConfig::from_file(path)?)
    }

    /// Replace the lookup tables used by the API 579-1 method.
    pub fn with_tables(mut self, tables: Api579Tables) -> PipelineResult<Self> {
        tables.validate()?;
        self.tables = Some(tables);
        Ok(self)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn random_seed(&self) -> u64 {
        self.random_seed
    }

    pub fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    fn step_control(&self) -> StepControl {
        StepControl {
            max_cycles: self.config.max_cycles,
            cycle_step: self.config.cycle_step,
        }
    }

    fn build_stress_state(&self, sheet: &SampleSheet) -> PipelineResult<StressState> {
        let column = |name: &str| sheet.require(name);
        let pipe = Pipe::new(column(OUTER_DIAMETER)?, column(WALL_THICKNESS)?)?;
        let environment = Environment::new(
            column(MAX_PRESSURE)?,
            column(MIN_PRESSURE)?,
            column(TEMPERATURE)?,
            column(VOLUME_FRACTION_H2)?,
        )?;
        let material = Material::new(column(YIELD_STRENGTH)?, column(FRACTURE_RESISTANCE)?)?;
        let location_factor = match sheet.get(LOCATION_FACTOR) {
            Some(values) => values.clone(),
            None => Array1::ones(1),
        };
        let defect = Defect::with_location_factor(
            column(FLAW_DEPTH)?,
            column(FLAW_LENGTH)?,
            &location_factor,
            self.surface,
        )?;
        StressState::new(pipe, environment, material, defect)
    }

    fn prepare(&self, inputs: SampleSheet) -> PipelineResult<PreparedRun> {
        let stress_state = self.build_stress_state(&inputs)?;
        let crack_growth =
            CrackGrowth::new(&self.config.crack_growth_model, stress_state.environment())?;
        Ok(PreparedRun {
            inputs,
            stress_state,
            crack_growth,
        })
    }

    fn execute(
        &self,
        prepared: PreparedRun,
        solver: &dyn StressIntensitySolver,
        token: &CancellationToken,
    ) -> PipelineResult<EnsembleResult> {
        let PreparedRun {
            inputs,
            stress_state,
            crack_growth,
        } = prepared;
        let run = CycleEvolution::new(
            &stress_state,
            solver,
            &crack_growth,
            self.delta_c_rule,
            self.step_control(),
        )?
        .run(token)?;
        let life_criteria =
            calc_pipe_life_criteria(&run.state, stress_state.pipe(), stress_state.material())?;
        let mut warnings = run.warnings;
        warnings.extend(life_criteria.warnings.iter().cloned());
        Ok(EnsembleResult {
            inputs,
            derived: DerivedQuantities::from_stress_state(&stress_state),
            stress_state,
            cycles: run.state,
            life_criteria,
            status: run.status,
            warnings,
        })
    }

    /// Run the configured study. Cancellation through `token` ends the
    /// study with [`RunStatus::Stopped`] and whatever results exist.
    pub fn perform_study(&self, token: &CancellationToken) -> PipelineResult<AnalysisResults> {
        let start = std::time::Instant::now();
        let mut study = study_from_config(
            &self.config.study,
            &self.config.parameters,
            self.random_seed,
        )?;
        let solver = build_solver(self.stress_method, self.tables.clone())?;
        solver.check_surface(self.surface)?;

        let ensemble = if study.is_probabilistic() && study.total_sample_size() > 0 {
            Some(self.prepare(study.create_variable_sample_sheet()?)?)
        } else {
            None
        };
        let nominal = self.prepare(study.create_variable_nominal_sheet()?)?;
        log::debug!(
            "{}: {} study, seed {}, ensemble of {}",
            self.config.analysis_name,
            self.sample_type,
            self.random_seed,
            ensemble.as_ref().map_or(0, |e| e.stress_state.sample_size())
        );

        let mut results = AnalysisResults {
            analysis_name: self.config.analysis_name.clone(),
            sample_type: self.sample_type,
            random_seed: self.random_seed,
            status: RunStatus::Finished,
            uncertain_parameters: study.uncertain_parameter_names(),
            nominal: None,
            ensemble: None,
            warnings: WarningLog::new(),
            solve_time_ms: 0.0,
        };

        if let Some(prepared) = ensemble {
            let outcome = self.execute(prepared, solver.as_ref(), token)?;
            results.warnings.extend(outcome.warnings.iter().cloned());
            let stopped = outcome.status == RunStatus::Stopped || token.is_cancelled();
            results.ensemble = Some(outcome);
            if stopped {
                results.status = RunStatus::Stopped;
                results.solve_time_ms = start.elapsed().as_secs_f64() * 1000.0;
                return Ok(results);
            }
        }

        let outcome = self.execute(nominal, solver.as_ref(), token)?;
        results.warnings.extend(outcome.warnings.iter().cloned());
        results.status = outcome.status;
        results.nominal = Some(outcome);
        results.solve_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        log::debug!(
            "{}: {:?} in {:.1} ms",
            self.config.analysis_name,
            results.status,
            results.solve_time_ms
        );
        Ok(results)
    }

    /// Design curve of the configured growth model at the nominal load
    /// and fugacity ratios, ΔK = 1..=`samples`.
    pub fn design_curve(
        &self,
        nominal: &EnsembleResult,
        samples: usize,
    ) -> PipelineResult<(Array1<f64>, Array1<f64>)> {
        design_curve(
            &self.config.crack_growth_model,
            nominal.derived.r_ratio[0],
            nominal.derived.fugacity_ratio[0],
            samples,
        )
    }
}
