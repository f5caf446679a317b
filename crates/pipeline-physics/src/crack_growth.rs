// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Fatigue Crack Growth Rate
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Crack growth per cycle, `da/dN = C·ΔK^m`.
//!
//! ASME BPVC Code Case 2938 combines two hydrogen-assisted power laws with
//! a fugacity and load-ratio corrected coefficient. The governing rate is
//! the smaller hydrogen branch, never below the air curve. Conversions
//! between Δa and ΔN are masked to zero wherever the inputs or the rate are
//! not positive.

use crate::environment::Environment;
use ndarray::{Array1, Zip};
use pipeline_types::config::GrowthModelSpec;
use pipeline_types::error::{PipelineError, PipelineResult};

/// Air curve
const AIR_C: f64 = 6.89e-12;
const AIR_M: f64 = 3.0;
/// Low-ΔK hydrogen branch
const LOW_K_C: f64 = 3.5e-14;
const LOW_K_M: f64 = 6.5;
const LOW_K_MULTIPLIER: f64 = 0.4286;
/// High-ΔK hydrogen branch
const HIGH_K_C: f64 = 1.5e-11;
const HIGH_K_M: f64 = 3.66;
const HIGH_K_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthModel {
    ParisLaw { c: f64, m: f64 },
    CodeCase2938,
}

impl GrowthModel {
    pub fn from_spec(spec: &GrowthModelSpec) -> PipelineResult<Self> {
        match spec.model_name.as_str() {
            "code_case_2938" => Ok(GrowthModel::CodeCase2938),
            "paris_law" => match (spec.c, spec.m) {
                (Some(c), Some(m)) => Ok(GrowthModel::ParisLaw { c, m }),
                _ => Err(PipelineError::MissingParameter(
                    "paris_law requires both c and m".to_string(),
                )),
            },
            other => Err(PipelineError::UnknownModel(format!(
                "'{other}'; expected code_case_2938 or paris_law"
            ))),
        }
    }
}

/// Code Case 2938 coefficient `C·(1 + k·r)/(1 − r)`, scaled by `scale`.
fn corrected_coefficient(c: f64, multiplier: f64, r: f64, scale: f64) -> f64 {
    if r < 1.0 {
        scale * c * (1.0 + multiplier * r) / (1.0 - r)
    } else {
        0.0
    }
}

fn power_law(c: f64, m: f64, delta_k: f64) -> f64 {
    c * delta_k.powf(m)
}

/// Crack growth law bound to the load ratio and fugacity ratio of an ensemble.
#[derive(Debug, Clone)]
pub struct CrackGrowth {
    model: GrowthModel,
    r_ratio: Array1<f64>,
    fugacity_ratio: Array1<f64>,
}

impl CrackGrowth {
    pub fn new(spec: &GrowthModelSpec, environment: &Environment) -> PipelineResult<Self> {
        Self::from_ratios(spec, environment.r_ratio(), environment.fugacity_ratio())
    }

    pub fn from_ratios(
        spec: &GrowthModelSpec,
        r_ratio: Array1<f64>,
        fugacity_ratio: Array1<f64>,
    ) -> PipelineResult<Self> {
        if r_ratio.len() != fugacity_ratio.len() {
            return Err(PipelineError::InconsistentDimensions(format!(
                "{} load ratios but {} fugacity ratios",
                r_ratio.len(),
                fugacity_ratio.len()
            )));
        }
        Ok(CrackGrowth {
            model: GrowthModel::from_spec(spec)?,
            r_ratio,
            fugacity_ratio,
        })
    }

    pub fn model(&self) -> GrowthModel {
        self.model
    }

    pub fn sample_size(&self) -> usize {
        self.r_ratio.len()
    }

    fn member(&self, values: &Array1<f64>, i: usize) -> f64 {
        if values.len() == 1 {
            values[0]
        } else {
            values[i]
        }
    }

    /// da/dN of one member [m/cycle].
    fn rate(&self, delta_k: f64, r: f64, f: f64) -> f64 {
        match self.model {
            GrowthModel::ParisLaw { c, m } => {
                if c > 0.0 {
                    power_law(c, m, delta_k)
                } else {
                    0.0
                }
            }
            GrowthModel::CodeCase2938 => {
                let air = power_law(AIR_C, AIR_M, delta_k);
                let c_low = corrected_coefficient(LOW_K_C, LOW_K_MULTIPLIER, r, f);
                let c_high = if f > 0.0 {
                    corrected_coefficient(HIGH_K_C, HIGH_K_MULTIPLIER, r, 1.0)
                } else {
                    0.0
                };
                let hydrogen =
                    power_law(c_low, LOW_K_M, delta_k).min(power_law(c_high, HIGH_K_M, delta_k));
                hydrogen.max(air)
            }
        }
    }

    /// Growth rate da/dN for each member at `delta_k`.
    pub fn growth_rate(&self, delta_k: &Array1<f64>) -> Array1<f64> {
        Array1::from_iter(delta_k.iter().enumerate().map(|(i, &dk)| {
            if dk > 0.0 {
                self.rate(dk, self.member(&self.r_ratio, i), self.member(&self.fugacity_ratio, i))
            } else {
                0.0
            }
        }))
    }

    /// Cycles needed to grow by `delta_a` at `delta_k`.
    pub fn calc_delta_n(&self, delta_a: &Array1<f64>, delta_k: &Array1<f64>) -> Array1<f64> {
        let rate = self.growth_rate(delta_k);
        Zip::from(delta_a)
            .and(delta_k)
            .and(&rate)
            .map_collect(|&da, &dk, &rate| {
                if dk > 0.0 && da > 0.0 && rate > 0.0 {
                    da / rate
                } else {
                    0.0
                }
            })
    }

    /// Crack extension over `delta_n` cycles at `delta_k`.
    pub fn calc_delta_a(&self, delta_n: &Array1<f64>, delta_k: &Array1<f64>) -> Array1<f64> {
        let rate = self.growth_rate(delta_k);
        Zip::from(delta_n)
            .and(delta_k)
            .and(&rate)
            .map_collect(|&dn, &dk, &rate| {
                if dk > 0.0 && dn > 0.0 && rate > 0.0 {
                    dn * rate
                } else {
                    0.0
                }
            })
    }
}

/// Design curve `(ΔK, da/dN)` for ΔK = 1, 2, …, `samples` at a single load
/// ratio and fugacity ratio.
pub fn design_curve(
    spec: &GrowthModelSpec,
    r_ratio: f64,
    fugacity_ratio: f64,
    samples: usize,
) -> PipelineResult<(Array1<f64>, Array1<f64>)> {
    let growth = CrackGrowth::from_ratios(
        spec,
        Array1::from_elem(samples, r_ratio),
        Array1::from_elem(samples, fugacity_ratio),
    )?;
    let delta_k = Array1::from_iter((1..=samples).map(|k| k as f64));
    let delta_a = Array1::from_elem(samples, 0.01);
    let delta_n = growth.calc_delta_n(&delta_a, &delta_k);
    let da_dn = Zip::from(&delta_a)
        .and(&delta_n)
        .map_collect(|&da, &dn| if dn > 0.0 { da / dn } else { 0.0 });
    Ok((delta_k, da_dn))
}
