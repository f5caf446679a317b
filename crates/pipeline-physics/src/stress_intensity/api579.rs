// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — API 579-1 Stress Intensity Solution
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! API 579-1 Annex 9B solutions for longitudinal surface cracks in
//! cylinders (infinite length and finite length, inside or outside).
//!
//! The through-wall Lamé hoop stress is expanded as a 4th-order polynomial
//! `σ(x) = Σ σi·(x/t)^i` from the cracked surface. Influence coefficients
//! come from interpolated tables:
//!
//! - infinite length: `(Ri/t, a/t) → G0..G4`
//! - finite length: `(Ri/t, a/c, a/t) → A(j,i)`, `j = 0..6`, `i = 0..1`,
//!   stored j-major (`A00, A01, A10, A11, ...`)
//!
//! Tables are not bundled and must be supplied as JSON.

use super::{
    calc_q, depth_ratio_warning, AngularPosition, StressIntensity, StressIntensitySolver,
};
use crate::stress_state::StressState;
use ndarray::Array1;
use pipeline_math::broadcast::broadcast_to;
use pipeline_math::table::{LookupTable, TableLookup};
use pipeline_types::config::{StressMethod, SurfaceLocation};
use pipeline_types::error::{PipelineError, PipelineResult};
use pipeline_types::run::AnalysisWarning;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Influence coefficients G0..G4 of the infinite-length solution.
const INFINITE_OUTPUTS: usize = 5;
/// Polynomial degree in β of the finite-length coefficients.
const FINITE_BETA_TERMS: usize = 7;
const FINITE_OUTPUTS: usize = 2 * FINITE_BETA_TERMS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Api579Tables {
    pub infinite_inside: LookupTable,
    pub infinite_outside: LookupTable,
    pub finite_inside: LookupTable,
    pub finite_outside: LookupTable,
}

impl Api579Tables {
    pub fn from_file(path: &str) -> PipelineResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let tables: Self = serde_json::from_str(&contents)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        for (name, table, axes, outputs) in [
            ("infinite_inside", &self.infinite_inside, 2, INFINITE_OUTPUTS),
            ("infinite_outside", &self.infinite_outside, 2, INFINITE_OUTPUTS),
            ("finite_inside", &self.finite_inside, 3, FINITE_OUTPUTS),
            ("finite_outside", &self.finite_outside, 3, FINITE_OUTPUTS),
        ] {
            table.validate()?;
            if table.axes.len() != axes || table.outputs.len() != outputs {
                return Err(PipelineError::Config(format!(
                    "table '{name}' must have {axes} axes and {outputs} outputs, found {} and {}",
                    table.axes.len(),
                    table.outputs.len()
                )));
            }
        }
        Ok(())
    }

    fn infinite(&self, surface: SurfaceLocation) -> &LookupTable {
        match surface {
            SurfaceLocation::Inside => &self.infinite_inside,
            SurfaceLocation::Outside => &self.infinite_outside,
        }
    }

    fn finite(&self, surface: SurfaceLocation) -> &LookupTable {
        match surface {
            SurfaceLocation::Inside => &self.finite_inside,
            SurfaceLocation::Outside => &self.finite_outside,
        }
    }
}

/// Coefficients σ0..σ4 of the hoop stress polynomial in `x/t`,
/// with `x` measured from the cracked surface into the wall.
///
/// Inside flaws include the pressure acting on the crack faces in σ0.
pub fn hoop_stress_coefficients(
    pressure: f64,
    inner_radius: f64,
    outer_radius: f64,
    surface: SurfaceLocation,
) -> [f64; 5] {
    let (ri2, ro2) = (inner_radius * inner_radius, outer_radius * outer_radius);
    let lame = pressure * ri2 / (ro2 - ri2);
    let t = outer_radius - inner_radius;
    let mut sigma = [0.0; 5];
    match surface {
        SurfaceLocation::Inside => {
            // 1/r² about r = Ri with r = Ri(1 + εξ)
            let eps = t / inner_radius;
            let scale = lame * ro2 / ri2;
            for (n, s) in sigma.iter_mut().enumerate() {
                *s = scale * (n as f64 + 1.0) * (-eps).powi(n as i32);
            }
            sigma[0] += lame + pressure;
        }
        SurfaceLocation::Outside => {
            // 1/r² about r = Ro with r = Ro(1 − εξ)
            let eps = t / outer_radius;
            for (n, s) in sigma.iter_mut().enumerate() {
                *s = lame * (n as f64 + 1.0) * eps.powi(n as i32);
            }
            sigma[0] += lame;
        }
    }
    sigma
}

/// Weight-function influence coefficients G0..G4 of a finite flaw.
///
/// At a general angle only G0 and G1 are available.
pub fn finite_influence_coefficients(g0: f64, g1: f64, q: f64, position: AngularPosition) -> [f64; 5] {
    match position {
        AngularPosition::Deepest => {
            let s = (2.0 * q).sqrt();
            let m1 = 2.0 * PI / s * (3.0 * g1 - g0) - 24.0 / 5.0;
            let m2 = 3.0;
            let m3 = 6.0 * PI / s * (g0 - 2.0 * g1) + 8.0 / 5.0;
            let g2 = s / PI * (16.0 / 15.0 + m1 / 3.0 + 16.0 * m2 / 105.0 + m3 / 12.0);
            let g3 = s / PI * (32.0 / 35.0 + m1 / 4.0 + 32.0 * m2 / 315.0 + m3 / 20.0);
            let g4 = s / PI * (256.0 / 315.0 + m1 / 5.0 + 256.0 * m2 / 3465.0 + m3 / 30.0);
            [g0, g1, g2, g3, g4]
        }
        AngularPosition::Surface => {
            let s = (4.0 * q).sqrt();
            let m1 = PI / s * (30.0 * g1 - 18.0 * g0) - 8.0;
            let m2 = PI / s * (60.0 * g0 - 90.0 * g1) + 15.0;
            let m3 = -(1.0 + m1 + m2);
            let g2 = s / PI * (4.0 / 5.0 + 2.0 * m1 / 3.0 + 4.0 * m2 / 7.0 + m3 / 2.0);
            let g3 = s / PI * (4.0 / 7.0 + m1 / 2.0 + 4.0 * m2 / 9.0 + 2.0 * m3 / 5.0);
            let g4 = s / PI * (4.0 / 9.0 + 2.0 * m1 / 5.0 + 4.0 * m2 / 11.0 + m3 / 3.0);
            [g0, g1, g2, g3, g4]
        }
        AngularPosition::General(_) => [g0, g1, 0.0, 0.0, 0.0],
    }
}

/// `Σ Gi·σi·(a/t)^i`
fn weighted_stress(g: &[f64; 5], sigma: &[f64; 5], a_over_t: f64) -> f64 {
    g.iter()
        .zip(sigma.iter())
        .enumerate()
        .map(|(i, (g, s))| g * s * a_over_t.powi(i as i32))
        .sum()
}

fn clamp_warnings(table: &LookupTable, lookup: &TableLookup, warnings: &mut Vec<AnalysisWarning>) {
    for (axis, &clamped) in table.axes.iter().zip(lookup.clamped.iter()) {
        if clamped {
            warnings.push(AnalysisWarning::RatioOutOfRange {
                ratio: axis.name.clone(),
                lower: axis.points[0],
                upper: axis.points[axis.points.len() - 1],
            });
        }
    }
}

#[derive(Debug, Clone)]
pub struct Api579Solver {
    tables: Api579Tables,
}

impl Api579Solver {
    pub fn new(tables: Api579Tables) -> Self {
        Api579Solver { tables }
    }

    pub fn tables(&self) -> &Api579Tables {
        &self.tables
    }
}

impl StressIntensitySolver for Api579Solver {
    fn method(&self) -> StressMethod {
        StressMethod::Api
    }

    /// `F` is reported relative to the membrane hoop stress,
    /// `F = K / (p·R_avg/t · sqrt(πa/Q))`.
    fn calc_stress_intensity_factor(
        &self,
        state: &StressState,
        crack_depth: &Array1<f64>,
        crack_length: &Array1<f64>,
        position: AngularPosition,
    ) -> PipelineResult<StressIntensity> {
        let n = state.sample_size();
        let surface = state.defect().surface();
        let a = broadcast_to(crack_depth, n)?;
        let two_c = broadcast_to(crack_length, n)?;

        let pipe = state.pipe();
        let t = pipe.wall_thickness();
        let ri = pipe.inner_radius();
        let ro = pipe.outer_radius();
        let r_avg = pipe.avg_radius();
        let p = state.environment().max_pressure();

        let a_over_c = &a / &(&two_c / 2.0);
        let a_over_t = &a / t;
        let ri_over_t = &ri / t;
        let q = calc_q(&a_over_c);

        let infinite_table = self.tables.infinite(surface);
        let finite_table = self.tables.finite(surface);
        let infinite = infinite_table.interpolate(&[ri_over_t.clone(), a_over_t.clone()])?;
        let finite = finite_table.interpolate(&[ri_over_t, a_over_c, a_over_t.clone()])?;

        let mut warnings = Vec::new();
        clamp_warnings(infinite_table, &infinite, &mut warnings);
        clamp_warnings(finite_table, &finite, &mut warnings);
        depth_ratio_warning(&a_over_t, &mut warnings);

        let beta = position.phi() / FRAC_PI_2;
        let mut k_max = Array1::zeros(n);
        let mut f = Array1::zeros(n);
        for i in 0..n {
            let sigma = hoop_stress_coefficients(p[i], ri[i], ro[i], surface);

            let g_inf: [f64; 5] = std::array::from_fn(|k| infinite.values[[i, k]]);
            let k_inf = weighted_stress(&g_inf, &sigma, a_over_t[i]) * (PI * a[i]).sqrt();

            let mut g0 = 0.0;
            let mut g1 = 0.0;
            for j in 0..FINITE_BETA_TERMS {
                let bj = beta.powi(j as i32);
                g0 += finite.values[[i, 2 * j]] * bj;
                g1 += finite.values[[i, 2 * j + 1]] * bj;
            }
            let g_fin = finite_influence_coefficients(g0, g1, q[i], position);
            let root = (PI * a[i] / q[i]).sqrt();
            let k_fin = weighted_stress(&g_fin, &sigma, a_over_t[i]) * root;

            let k = k_fin.min(k_inf);
            let membrane = p[i] * r_avg[i] / t[i] * root;
            k_max[i] = k;
            f[i] = if membrane > 0.0 { k / membrane } else { 0.0 };
        }

        Ok(StressIntensity {
            k_max,
            f,
            q,
            warnings,
        })
    }
}
