// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Stress State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Internal-pressure hoop stress on an axially cracked pipe.

use crate::defect::Defect;
use crate::environment::Environment;
use crate::material::Material;
use crate::pipe::Pipe;
use ndarray::{Array1, Zip};
use pipeline_types::error::{PipelineError, PipelineResult};

/// Specifications of one ensemble, validated for mutual consistency.
#[derive(Debug, Clone)]
pub struct StressState {
    pipe: Pipe,
    environment: Environment,
    material: Material,
    defect: Defect,
}

impl StressState {
    /// Fails if ensemble sizes differ or the uncracked hoop stress exceeds
    /// the allowable stress of any member.
    pub fn new(
        pipe: Pipe,
        environment: Environment,
        material: Material,
        defect: Defect,
    ) -> PipelineResult<Self> {
        let n = pipe.sample_size();
        for (name, size) in [
            ("environment", environment.sample_size()),
            ("material", material.sample_size()),
            ("defect", defect.sample_size()),
        ] {
            if size != n {
                return Err(PipelineError::InconsistentDimensions(format!(
                    "pipe has {n} members but {name} has {size}"
                )));
            }
        }
        let state = StressState {
            pipe,
            environment,
            material,
            defect,
        };
        state.check_initial_stress_criteria()?;
        Ok(state)
    }

    fn check_initial_stress_criteria(&self) -> PipelineResult<()> {
        let hoop = self.reference_stress();
        let allowable = self.allowable_stress();
        for (&s, &lim) in hoop.iter().zip(allowable.iter()) {
            if s > lim {
                return Err(PipelineError::AllowableStressExceeded {
                    hoop_stress: s,
                    allowable: lim,
                });
            }
        }
        Ok(())
    }

    pub fn pipe(&self) -> &Pipe {
        &self.pipe
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn defect(&self) -> &Defect {
        &self.defect
    }

    pub fn sample_size(&self) -> usize {
        self.pipe.sample_size()
    }

    pub fn initial_depth(&self) -> Array1<f64> {
        self.defect.initial_depth(&self.pipe)
    }

    pub fn initial_half_length(&self) -> Array1<f64> {
        self.defect.initial_half_length()
    }

    /// `p_max·R_avg / (t − a)` [MPa].
    pub fn hoop_stress(&self, crack_depth: &Array1<f64>) -> Array1<f64> {
        let remaining = self.pipe.wall_thickness() - crack_depth;
        let load = self.environment.max_pressure() * &self.pipe.avg_radius();
        Zip::from(&load)
            .and(&remaining)
            .map_collect(|&l, &r| if r > 0.0 { l / r } else { f64::INFINITY })
    }

    /// Longitudinal stress of a closed-end pipe, half the hoop stress [MPa].
    pub fn longitudinal_stress(&self, crack_depth: &Array1<f64>) -> Array1<f64> {
        self.hoop_stress(crack_depth) / 2.0
    }

    /// Hoop stress of the uncracked wall.
    pub fn reference_stress(&self) -> Array1<f64> {
        self.hoop_stress(&Array1::zeros(self.sample_size()))
    }

    /// `σy · location factor` [MPa].
    pub fn allowable_stress(&self) -> Array1<f64> {
        self.material.yield_strength() * self.defect.location_factor()
    }

    /// Reference hoop stress as a percentage of specified minimum yield strength.
    pub fn percent_smys(&self) -> Array1<f64> {
        self.reference_stress() / self.material.yield_strength() * 100.0
    }

    pub fn single(&self, index: usize) -> PipelineResult<Self> {
        Ok(StressState {
            pipe: self.pipe.single(index)?,
            environment: self.environment.single(index)?,
            material: self.material.single(index)?,
            defect: self.defect.single(index)?,
        })
    }
}
