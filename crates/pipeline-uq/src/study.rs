// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Uncertainty Studies
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Experiment designs turning parameter characterizations into sample
//! sheets.
//!
//! Random and LHS studies cross the two axes: aleatory columns are tiled
//! `max(n_e, 1)` times, each epistemic value is repeated `max(n_a, 1)`
//! times, so member `k` pairs aleatory sample `k % n_a` with epistemic
//! sample `k / n_a`. Sensitivity designs vary one variable at a time and
//! hold the rest at nominal.

use crate::distributions::UncertaintyDistribution;
use crate::lhs::{latin_hypercube, optimized_latin_hypercube};
use crate::sample_sheet::SampleSheet;
use ndarray::Array1;
use pipeline_types::config::{ParameterSpec, SampleType, StudyConfig, UncertaintyType};
use pipeline_types::constants::BOUNDING_PERCENTILES;
use pipeline_types::error::{PipelineError, PipelineResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

/// An input described by a distribution on one sampling axis.
#[derive(Debug, Clone)]
pub struct UncertainVariable {
    pub name: String,
    pub nominal: f64,
    pub uncertainty_type: UncertaintyType,
    pub distribution: UncertaintyDistribution,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeterministicVariable {
    pub name: String,
    pub value: f64,
}

/// Named per-variable sample vectors of one axis.
pub type Columns = Vec<(String, Array1<f64>)>;

/// Parameters sorted into their groups, not yet part of a study.
#[derive(Debug, Clone, Default)]
pub struct VariableSet {
    pub aleatory: Vec<UncertainVariable>,
    pub epistemic: Vec<UncertainVariable>,
    pub deterministic: Vec<DeterministicVariable>,
}

/// Variables, sample counts and random stream shared by every design.
#[derive(Debug, Clone)]
pub struct StudyCore {
    aleatory_samples: usize,
    epistemic_samples: usize,
    rng: StdRng,
    aleatory: Vec<UncertainVariable>,
    epistemic: Vec<UncertainVariable>,
    deterministic: Vec<DeterministicVariable>,
}

impl StudyCore {
    pub fn new(aleatory_samples: usize, epistemic_samples: usize, seed: u64) -> Self {
        StudyCore {
            aleatory_samples,
            epistemic_samples,
            rng: StdRng::seed_from_u64(seed),
            aleatory: Vec::new(),
            epistemic: Vec::new(),
            deterministic: Vec::new(),
        }
    }

    pub fn aleatory_samples(&self) -> usize {
        self.aleatory_samples
    }

    pub fn epistemic_samples(&self) -> usize {
        self.epistemic_samples
    }

    pub fn aleatory(&self) -> &[UncertainVariable] {
        &self.aleatory
    }

    pub fn epistemic(&self) -> &[UncertainVariable] {
        &self.epistemic
    }

    pub fn deterministic(&self) -> &[DeterministicVariable] {
        &self.deterministic
    }

    /// Deterministic names first, then aleatory, then epistemic.
    pub fn parameter_names(&self) -> Vec<String> {
        self.deterministic
            .iter()
            .map(|v| v.name.clone())
            .chain(self.uncertain_parameter_names())
            .collect()
    }

    pub fn uncertain_parameter_names(&self) -> Vec<String> {
        self.aleatory
            .iter()
            .chain(self.epistemic.iter())
            .map(|v| v.name.clone())
            .collect()
    }

    pub fn uncertain_count(&self) -> usize {
        self.aleatory.len() + self.epistemic.len()
    }

    /// Sorts parameters into the three groups, rejecting malformed
    /// parameters and names already used here or earlier in the list.
    pub fn sort_parameters(&self, parameters: &[ParameterSpec]) -> PipelineResult<VariableSet> {
        let mut seen: HashSet<String> = self.parameter_names().into_iter().collect();
        let mut aleatory = Vec::new();
        let mut epistemic = Vec::new();
        let mut deterministic = Vec::new();
        for parameter in parameters {
            parameter.validate()?;
            if !seen.insert(parameter.name.clone()) {
                return Err(PipelineError::DuplicateName(format!(
                    "parameter '{}' is specified more than once",
                    parameter.name
                )));
            }
            match (&parameter.uncertainty_type, &parameter.distribution) {
                (Some(kind), Some(spec)) => {
                    let variable = UncertainVariable {
                        name: parameter.name.clone(),
                        nominal: parameter.nominal_value,
                        uncertainty_type: *kind,
                        distribution: UncertaintyDistribution::from_spec(&parameter.name, spec)?,
                    };
                    match kind {
                        UncertaintyType::Aleatory => aleatory.push(variable),
                        UncertaintyType::Epistemic => epistemic.push(variable),
                    }
                }
                _ => deterministic.push(DeterministicVariable {
                    name: parameter.name.clone(),
                    value: parameter.nominal_value,
                }),
            }
        }
        Ok(VariableSet {
            aleatory,
            epistemic,
            deterministic,
        })
    }

    fn commit(&mut self, set: VariableSet) {
        self.aleatory.extend(set.aleatory);
        self.epistemic.extend(set.epistemic);
        self.deterministic.extend(set.deterministic);
    }

    /// Each axis needs both variables and samples, or neither, counting
    /// `incoming` alongside the variables already held.
    pub fn check_samples_match_variables(&self, incoming: &VariableSet) -> PipelineResult<()> {
        let aleatory = !self.aleatory.is_empty() || !incoming.aleatory.is_empty();
        let epistemic = !self.epistemic.is_empty() || !incoming.epistemic.is_empty();
        for (axis, has_variables, samples) in [
            ("aleatory", aleatory, self.aleatory_samples),
            ("epistemic", epistemic, self.epistemic_samples),
        ] {
            if has_variables != (samples > 0) {
                return Err(PipelineError::InconsistentSampling(if has_variables {
                    format!("{axis} variables specified without {axis} samples")
                } else {
                    format!("{samples} {axis} samples requested without {axis} variables")
                }));
            }
        }
        Ok(())
    }

    /// `max(n_a, 1) · max(n_e, 1)`
    pub fn double_loop_size(&self) -> usize {
        self.aleatory_samples.max(1) * self.epistemic_samples.max(1)
    }

    /// Every variable at its nominal value, one member.
    pub fn nominal_sheet(&self) -> PipelineResult<SampleSheet> {
        let mut sheet = SampleSheet::new();
        for v in self.aleatory.iter().chain(self.epistemic.iter()) {
            sheet.insert(&v.name, Array1::from_elem(1, v.nominal))?;
        }
        for v in &self.deterministic {
            sheet.insert(&v.name, Array1::from_elem(1, v.value))?;
        }
        Ok(sheet)
    }

    fn add_deterministic(&self, sheet: &mut SampleSheet, sample_size: usize) -> PipelineResult<()> {
        for v in &self.deterministic {
            sheet.insert(&v.name, Array1::from_elem(sample_size, v.value))?;
        }
        Ok(())
    }

    fn random_columns(&mut self, axis: UncertaintyType) -> Columns {
        let (variables, n) = match axis {
            UncertaintyType::Aleatory => (&self.aleatory, self.aleatory_samples),
            UncertaintyType::Epistemic => (&self.epistemic, self.epistemic_samples),
        };
        let rng = &mut self.rng;
        variables
            .iter()
            .map(|v| (v.name.clone(), v.distribution.sample(n, rng)))
            .collect()
    }

    /// One optimized LHS over all uncertain dimensions; the axis's
    /// variables take its leading columns.
    fn lhs_columns(&mut self, axis: UncertaintyType) -> Columns {
        let dims = self.uncertain_count();
        let (variables, n) = match axis {
            UncertaintyType::Aleatory => (&self.aleatory, self.aleatory_samples),
            UncertaintyType::Epistemic => (&self.epistemic, self.epistemic_samples),
        };
        if variables.is_empty() || n == 0 {
            return Vec::new();
        }
        let design = optimized_latin_hypercube(n, dims, &mut self.rng);
        variables
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let values = design.column(i).mapv(|p| v.distribution.ppf(p));
                (v.name.clone(), values)
            })
            .collect()
    }

    /// Sorted quantiles of one 1-D LHS, shared by the axis's variables.
    fn sensitivity_columns(&mut self, axis: UncertaintyType) -> Columns {
        let (variables, n) = match axis {
            UncertaintyType::Aleatory => (&self.aleatory, self.aleatory_samples),
            UncertaintyType::Epistemic => (&self.epistemic, self.epistemic_samples),
        };
        if variables.is_empty() || n == 0 {
            return Vec::new();
        }
        let mut cdf: Vec<f64> = latin_hypercube(n, 1, &mut self.rng).column(0).to_vec();
        cdf.sort_by(|a, b| a.total_cmp(b));
        variables
            .iter()
            .map(|v| {
                let values = cdf.iter().map(|&p| v.distribution.ppf(p)).collect();
                (v.name.clone(), values)
            })
            .collect()
    }

    fn crossed_sheet(&self, aleatory: Columns, epistemic: Columns) -> PipelineResult<SampleSheet> {
        let epistemic_repeats = self.epistemic_samples.max(1);
        let aleatory_repeats = self.aleatory_samples.max(1);
        let mut sheet = SampleSheet::new();
        for (name, values) in aleatory {
            let tiled: Array1<f64> = values
                .iter()
                .cycle()
                .take(values.len() * epistemic_repeats)
                .copied()
                .collect();
            sheet.insert(&name, tiled)?;
        }
        for (name, values) in epistemic {
            let repeated: Array1<f64> = values
                .iter()
                .flat_map(|&v| std::iter::repeat(v).take(aleatory_repeats))
                .collect();
            sheet.insert(&name, repeated)?;
        }
        self.add_deterministic(&mut sheet, self.double_loop_size())?;
        Ok(sheet)
    }

    /// Columns at nominal except where `blocks` place a variable's samples.
    fn one_at_a_time_sheet(
        &self,
        blocks: Vec<(String, Array1<f64>)>,
        sample_size: usize,
    ) -> PipelineResult<SampleSheet> {
        let nominal = |name: &str| {
            self.aleatory
                .iter()
                .chain(self.epistemic.iter())
                .find(|v| v.name == name)
                .map(|v| v.nominal)
                .unwrap_or(f64::NAN)
        };
        let mut sheet = SampleSheet::new();
        let mut offset = 0;
        for (name, values) in blocks {
            let mut column = Array1::from_elem(sample_size, nominal(&name));
            for (k, v) in values.iter().enumerate() {
                column[offset + k] = *v;
            }
            offset += values.len();
            sheet.insert(&name, column)?;
        }
        self.add_deterministic(&mut sheet, sample_size)?;
        Ok(sheet)
    }
}

/// One experiment design over a [`StudyCore`].
pub trait UncertaintyStudy {
    fn sample_type(&self) -> SampleType;
    fn core(&self) -> &StudyCore;
    fn core_mut(&mut self) -> &mut StudyCore;

    /// Design-specific validation of `incoming` before it is added.
    fn check_variables(&self, incoming: &VariableSet) -> PipelineResult<()>;

    /// Ensemble length of the sample sheet.
    fn total_sample_size(&self) -> usize;

    /// Samples of every variable on `axis`, before crossing with the other
    /// axis and broadcasting deterministic values.
    fn collect_variables(&mut self, axis: UncertaintyType) -> Columns;

    fn create_variable_sample_sheet(&mut self) -> PipelineResult<SampleSheet>;

    /// `false` for designs that only produce the nominal sheet.
    fn is_probabilistic(&self) -> bool {
        true
    }

    fn add_variables(&mut self, parameters: &[ParameterSpec]) -> PipelineResult<()> {
        let incoming = self.core().sort_parameters(parameters)?;
        self.check_variables(&incoming)?;
        self.core_mut().commit(incoming);
        Ok(())
    }

    fn create_variable_nominal_sheet(&self) -> PipelineResult<SampleSheet> {
        self.core().nominal_sheet()
    }

    fn parameter_names(&self) -> Vec<String> {
        self.core().parameter_names()
    }

    fn uncertain_parameter_names(&self) -> Vec<String> {
        self.core().uncertain_parameter_names()
    }
}

macro_rules! study_core_access {
    () => {
        fn core(&self) -> &StudyCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut StudyCore {
            &mut self.core
        }
    };
}

/// Direct draws from each distribution.
#[derive(Debug, Clone)]
pub struct RandomStudy {
    core: StudyCore,
}

impl RandomStudy {
    pub fn new(aleatory_samples: usize, epistemic_samples: usize, seed: u64) -> Self {
        RandomStudy {
            core: StudyCore::new(aleatory_samples, epistemic_samples, seed),
        }
    }
}

impl UncertaintyStudy for RandomStudy {
    study_core_access!();

    fn sample_type(&self) -> SampleType {
        SampleType::Random
    }

    fn check_variables(&self, incoming: &VariableSet) -> PipelineResult<()> {
        self.core.check_samples_match_variables(incoming)
    }

    fn total_sample_size(&self) -> usize {
        self.core.double_loop_size()
    }

    fn collect_variables(&mut self, axis: UncertaintyType) -> Columns {
        self.core.random_columns(axis)
    }

    fn create_variable_sample_sheet(&mut self) -> PipelineResult<SampleSheet> {
        let aleatory = self.collect_variables(UncertaintyType::Aleatory);
        let epistemic = self.collect_variables(UncertaintyType::Epistemic);
        let sheet = self.core.crossed_sheet(aleatory, epistemic)?;
        log::debug!(
            "random study: {} columns × {} samples",
            sheet.len(),
            sheet.sample_size()
        );
        Ok(sheet)
    }
}

/// Latin hypercube samples mapped through inverse CDFs.
#[derive(Debug, Clone)]
pub struct LhsStudy {
    core: StudyCore,
}

impl LhsStudy {
    pub fn new(aleatory_samples: usize, epistemic_samples: usize, seed: u64) -> Self {
        LhsStudy {
            core: StudyCore::new(aleatory_samples, epistemic_samples, seed),
        }
    }
}

impl UncertaintyStudy for LhsStudy {
    study_core_access!();

    fn sample_type(&self) -> SampleType {
        SampleType::Lhs
    }

    fn check_variables(&self, incoming: &VariableSet) -> PipelineResult<()> {
        self.core.check_samples_match_variables(incoming)
    }

    fn total_sample_size(&self) -> usize {
        self.core.double_loop_size()
    }

    fn collect_variables(&mut self, axis: UncertaintyType) -> Columns {
        self.core.lhs_columns(axis)
    }

    fn create_variable_sample_sheet(&mut self) -> PipelineResult<SampleSheet> {
        let aleatory = self.collect_variables(UncertaintyType::Aleatory);
        let epistemic = self.collect_variables(UncertaintyType::Epistemic);
        let sheet = self.core.crossed_sheet(aleatory, epistemic)?;
        log::debug!(
            "lhs study: {} columns × {} samples",
            sheet.len(),
            sheet.sample_size()
        );
        Ok(sheet)
    }
}

/// Each variable at sorted LHS quantiles in its own block of rows.
///
/// Block layout: aleatory variables in order, `n_a` rows each, then
/// epistemic variables, `n_e` rows each.
#[derive(Debug, Clone)]
pub struct OneAtATimeSensitivityStudy {
    core: StudyCore,
}

impl OneAtATimeSensitivityStudy {
    pub fn new(aleatory_samples: usize, epistemic_samples: usize, seed: u64) -> Self {
        OneAtATimeSensitivityStudy {
            core: StudyCore::new(aleatory_samples, epistemic_samples, seed),
        }
    }
}

impl UncertaintyStudy for OneAtATimeSensitivityStudy {
    study_core_access!();

    fn sample_type(&self) -> SampleType {
        SampleType::Sensitivity
    }

    fn check_variables(&self, _incoming: &VariableSet) -> PipelineResult<()> {
        Ok(())
    }

    fn total_sample_size(&self) -> usize {
        self.core.aleatory_samples * self.core.aleatory.len()
            + self.core.epistemic_samples * self.core.epistemic.len()
    }

    fn collect_variables(&mut self, axis: UncertaintyType) -> Columns {
        self.core.sensitivity_columns(axis)
    }

    fn create_variable_sample_sheet(&mut self) -> PipelineResult<SampleSheet> {
        let mut blocks = self.collect_variables(UncertaintyType::Aleatory);
        blocks.extend(self.collect_variables(UncertaintyType::Epistemic));
        let sheet = self.core.one_at_a_time_sheet(blocks, self.total_sample_size())?;
        log::debug!(
            "sensitivity study: {} columns × {} samples",
            sheet.len(),
            sheet.sample_size()
        );
        Ok(sheet)
    }
}

/// Each uncertain variable at its 1st and 99th percentile, two rows per
/// variable, everything else nominal. Sample counts are ignored.
#[derive(Debug, Clone)]
pub struct BoundingStudy {
    core: StudyCore,
}

impl BoundingStudy {
    pub fn new(aleatory_samples: usize, epistemic_samples: usize, seed: u64) -> Self {
        BoundingStudy {
            core: StudyCore::new(aleatory_samples, epistemic_samples, seed),
        }
    }
}

impl UncertaintyStudy for BoundingStudy {
    study_core_access!();

    fn sample_type(&self) -> SampleType {
        SampleType::Bounding
    }

    fn check_variables(&self, _incoming: &VariableSet) -> PipelineResult<()> {
        Ok(())
    }

    fn total_sample_size(&self) -> usize {
        BOUNDING_PERCENTILES.len() * self.core.uncertain_count()
    }

    fn collect_variables(&mut self, axis: UncertaintyType) -> Columns {
        let variables = match axis {
            UncertaintyType::Aleatory => &self.core.aleatory,
            UncertaintyType::Epistemic => &self.core.epistemic,
        };
        variables
            .iter()
            .map(|v| {
                let values = BOUNDING_PERCENTILES
                    .iter()
                    .map(|&p| v.distribution.ppf(p))
                    .collect();
                (v.name.clone(), values)
            })
            .collect()
    }

    fn create_variable_sample_sheet(&mut self) -> PipelineResult<SampleSheet> {
        let mut blocks = self.collect_variables(UncertaintyType::Aleatory);
        blocks.extend(self.collect_variables(UncertaintyType::Epistemic));
        let sheet = self.core.one_at_a_time_sheet(blocks, self.total_sample_size())?;
        log::debug!(
            "bounding study: {} columns × {} samples",
            sheet.len(),
            sheet.sample_size()
        );
        Ok(sheet)
    }
}

/// Nominal values only; no probabilistic ensemble.
#[derive(Debug, Clone)]
pub struct DeterministicStudy {
    core: StudyCore,
}

impl DeterministicStudy {
    pub fn new() -> Self {
        DeterministicStudy {
            core: StudyCore::new(0, 0, 0),
        }
    }
}

impl Default for DeterministicStudy {
    fn default() -> Self {
        Self::new()
    }
}

impl UncertaintyStudy for DeterministicStudy {
    study_core_access!();

    fn sample_type(&self) -> SampleType {
        SampleType::Deterministic
    }

    fn check_variables(&self, _incoming: &VariableSet) -> PipelineResult<()> {
        Ok(())
    }

    fn total_sample_size(&self) -> usize {
        1
    }

    fn collect_variables(&mut self, _axis: UncertaintyType) -> Columns {
        Vec::new()
    }

    fn is_probabilistic(&self) -> bool {
        false
    }

    fn create_variable_sample_sheet(&mut self) -> PipelineResult<SampleSheet> {
        self.core.nominal_sheet()
    }
}

/// Empty study of the requested design.
pub fn specify_study(
    sample_type: SampleType,
    aleatory_samples: usize,
    epistemic_samples: usize,
    seed: u64,
) -> Box<dyn UncertaintyStudy> {
    match sample_type {
        SampleType::Deterministic => Box::new(DeterministicStudy::new()),
        SampleType::Random => Box::new(RandomStudy::new(aleatory_samples, epistemic_samples, seed)),
        SampleType::Lhs => Box::new(LhsStudy::new(aleatory_samples, epistemic_samples, seed)),
        SampleType::Bounding => {
            Box::new(BoundingStudy::new(aleatory_samples, epistemic_samples, seed))
        }
        SampleType::Sensitivity => Box::new(OneAtATimeSensitivityStudy::new(
            aleatory_samples,
            epistemic_samples,
            seed,
        )),
    }
}

/// Study described by `config`, populated with `parameters`.
pub fn study_from_config(
    config: &StudyConfig,
    parameters: &[ParameterSpec],
    seed: u64,
) -> PipelineResult<Box<dyn UncertaintyStudy>> {
    let sample_type: SampleType = config.sample_type.parse()?;
    let mut study = specify_study(
        sample_type,
        config.aleatory_samples,
        config.epistemic_samples,
        seed,
    );
    study.add_variables(parameters)?;
    Ok(study)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline_types::config::DistributionSpec;

    fn normal(name: &str, axis: UncertaintyType, mean: f64) -> ParameterSpec {
        ParameterSpec::uncertain(
            name,
            mean,
            axis,
            DistributionSpec::Normal {
                mean,
                std_deviation: 0.1 * mean,
            },
        )
    }

    fn unit_uniform(name: &str, axis: UncertaintyType) -> ParameterSpec {
        ParameterSpec::uncertain(
            name,
            0.5,
            axis,
            DistributionSpec::Uniform {
                lower_bound: 0.0,
                upper_bound: 1.0,
            },
        )
    }

    fn mixed_parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::deterministic("outer_diameter", 0.9144),
            normal("max_pressure", UncertaintyType::Aleatory, 5.79),
            normal("yield_strength", UncertaintyType::Epistemic, 358.5),
        ]
    }

    fn check_crossing(sheet: &SampleSheet) {
        assert_eq!(sheet.sample_size(), 6);
        let ale = sheet.require("max_pressure").unwrap();
        let epi = sheet.require("yield_strength").unwrap();
        assert_eq!(ale[0], ale[3]);
        assert_eq!(ale[1], ale[4]);
        assert_ne!(ale[0], ale[1]);
        assert_eq!(epi[0], epi[2]);
        assert_ne!(epi[0], epi[3]);
        assert_eq!(epi[3], epi[5]);
        assert!(sheet
            .require("outer_diameter")
            .unwrap()
            .iter()
            .all(|&v| v == 0.9144));
    }

    #[test]
    fn test_random_study_crosses_axes() {
        let mut study = RandomStudy::new(3, 2, 7);
        study.add_variables(&mixed_parameters()).unwrap();
        assert_eq!(study.total_sample_size(), 6);
        check_crossing(&study.create_variable_sample_sheet().unwrap());
    }

    #[test]
    fn test_lhs_study_crosses_axes() {
        let mut study = LhsStudy::new(3, 2, 7);
        study.add_variables(&mixed_parameters()).unwrap();
        check_crossing(&study.create_variable_sample_sheet().unwrap());
    }

    #[test]
    fn test_lhs_values_are_stratified() {
        let mut study = LhsStudy::new(5, 0, 11);
        study
            .add_variables(&[
                unit_uniform("u", UncertaintyType::Aleatory),
                unit_uniform("v", UncertaintyType::Aleatory),
            ])
            .unwrap();
        let sheet = study.create_variable_sample_sheet().unwrap();
        for name in ["u", "v"] {
            let mut strata: Vec<usize> = sheet
                .require(name)
                .unwrap()
                .iter()
                .map(|&x| (x * 5.0).floor() as usize)
                .collect();
            strata.sort_unstable();
            assert_eq!(strata, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_same_seed_same_sheet() {
        let build = || {
            let mut study = RandomStudy::new(4, 3, 2026);
            study.add_variables(&mixed_parameters()).unwrap();
            study.create_variable_sample_sheet().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_bounding_study_rows() {
        let mut study = BoundingStudy::new(0, 0, 7);
        let mut params = mixed_parameters();
        params.push(unit_uniform("volume_fraction_h2", UncertaintyType::Aleatory));
        study.add_variables(&params).unwrap();
        assert_eq!(study.total_sample_size(), 6);
        let sheet = study.create_variable_sample_sheet().unwrap();
        assert_eq!(sheet.sample_size(), 6);

        // Aleatory first in declaration order, then epistemic.
        let p = sheet.require("max_pressure").unwrap();
        let x = sheet.require("volume_fraction_h2").unwrap();
        let s = sheet.require("yield_strength").unwrap();
        assert!(p[0] < 5.79 && p[1] > 5.79);
        assert!(p.iter().skip(2).all(|&v| v == 5.79));
        assert!((x[2] - 0.01).abs() < 1e-12 && (x[3] - 0.99).abs() < 1e-12);
        assert!(x.iter().take(2).chain(x.iter().skip(4)).all(|&v| v == 0.5));
        assert!(s[4] < 358.5 && s[5] > 358.5);
        assert!(s.iter().take(4).all(|&v| v == 358.5));
    }

    #[test]
    fn test_sensitivity_study_blocks() {
        let mut study = OneAtATimeSensitivityStudy::new(4, 3, 7);
        study
            .add_variables(&[
                unit_uniform("a", UncertaintyType::Aleatory),
                unit_uniform("b", UncertaintyType::Aleatory),
                unit_uniform("e", UncertaintyType::Epistemic),
                ParameterSpec::deterministic("d", 2.0),
            ])
            .unwrap();
        assert_eq!(study.total_sample_size(), 11);
        let sheet = study.create_variable_sample_sheet().unwrap();
        let a = sheet.require("a").unwrap();
        let b = sheet.require("b").unwrap();
        let e = sheet.require("e").unwrap();
        assert!(a.iter().take(4).zip(a.iter().skip(1).take(3)).all(|(x, y)| x <= y));
        assert!(a.iter().skip(4).all(|&v| v == 0.5));
        assert!(b.iter().take(4).all(|&v| v == 0.5));
        assert!(b.iter().skip(8).all(|&v| v == 0.5));
        assert!(e.iter().take(8).all(|&v| v == 0.5));
        assert!(e[8] <= e[9] && e[9] <= e[10]);
        assert!(sheet.require("d").unwrap().iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut study = RandomStudy::new(2, 0, 1);
        let err = study
            .add_variables(&[
                normal("max_pressure", UncertaintyType::Aleatory, 5.0),
                ParameterSpec::deterministic("max_pressure", 5.0),
            ])
            .unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateName(_)));
        assert!(study.parameter_names().is_empty());
    }

    #[test]
    fn test_inconsistent_sampling_rejected() {
        let mut study = LhsStudy::new(0, 2, 1);
        let err = study
            .add_variables(&[normal("max_pressure", UncertaintyType::Aleatory, 5.0)])
            .unwrap_err();
        assert!(matches!(err, PipelineError::InconsistentSampling(_)));

        let mut study = RandomStudy::new(3, 0, 1);
        let err = study
            .add_variables(&[ParameterSpec::deterministic("outer_diameter", 0.9)])
            .unwrap_err();
        assert!(matches!(err, PipelineError::InconsistentSampling(_)));
    }

    #[test]
    fn test_rejected_sampling_leaves_study_unchanged() {
        let mut study = LhsStudy::new(4, 0, 1);
        study
            .add_variables(&[normal("max_pressure", UncertaintyType::Aleatory, 5.0)])
            .unwrap();
        let err = study
            .add_variables(&[
                ParameterSpec::deterministic("outer_diameter", 0.9),
                normal("yield_strength", UncertaintyType::Epistemic, 358.5),
            ])
            .unwrap_err();
        assert!(matches!(err, PipelineError::InconsistentSampling(_)));
        assert_eq!(study.parameter_names(), vec!["max_pressure".to_string()]);
        assert!(study.core().epistemic().is_empty());

        // A later valid call still succeeds.
        study
            .add_variables(&[normal("flaw_length", UncertaintyType::Aleatory, 0.04)])
            .unwrap();
        assert_eq!(study.total_sample_size(), 4);
        assert_eq!(study.uncertain_parameter_names().len(), 2);
    }

    #[test]
    fn test_sensitivity_designs_accept_any_sample_counts() {
        let mut study = BoundingStudy::new(5, 0, 1);
        assert!(study
            .add_variables(&[normal("t", UncertaintyType::Epistemic, 0.01)])
            .is_ok());

        let mut study = OneAtATimeSensitivityStudy::new(0, 3, 1);
        study
            .add_variables(&[
                normal("p", UncertaintyType::Aleatory, 5.0),
                normal("t", UncertaintyType::Epistemic, 0.01),
            ])
            .unwrap();
        assert_eq!(study.total_sample_size(), 3);
        let columns = study.collect_variables(UncertaintyType::Aleatory);
        assert!(columns.is_empty());
        let columns = study.collect_variables(UncertaintyType::Epistemic);
        assert_eq!(columns[0].0, "t");
        assert_eq!(columns[0].1.len(), 3);
    }

    #[test]
    fn test_nominal_sheet() {
        let mut study = RandomStudy::new(3, 2, 7);
        study.add_variables(&mixed_parameters()).unwrap();
        let sheet = study.create_variable_nominal_sheet().unwrap();
        assert_eq!(sheet.sample_size(), 1);
        assert_eq!(sheet.require("max_pressure").unwrap()[0], 5.79);
        assert_eq!(sheet.require("yield_strength").unwrap()[0], 358.5);
        assert_eq!(sheet.require("outer_diameter").unwrap()[0], 0.9144);
        assert_eq!(
            study.uncertain_parameter_names(),
            vec!["max_pressure".to_string(), "yield_strength".to_string()]
        );
    }

    #[test]
    fn test_factory_and_config() {
        let config = StudyConfig {
            sample_type: "lhs".into(),
            aleatory_samples: 3,
            epistemic_samples: 2,
            random_seed: Some(5),
        };
        let mut study = study_from_config(&config, &mixed_parameters(), 5).unwrap();
        assert_eq!(study.sample_type(), SampleType::Lhs);
        assert!(study.is_probabilistic());
        assert_eq!(study.create_variable_sample_sheet().unwrap().sample_size(), 6);

        let det = specify_study(SampleType::Deterministic, 0, 0, 0);
        assert!(!det.is_probabilistic());
        assert_eq!(det.total_sample_size(), 1);
    }
}
