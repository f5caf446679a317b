// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Circumferential Flaw Stress Intensity Solution
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Internal circumferential surface flaw loaded by the longitudinal
//! (pressure end-cap) stress, `σ_L = σ_hoop / 2`.

use super::{calc_q, depth_ratio_warning, AngularPosition, StressIntensity, StressIntensitySolver};
use crate::stress_state::StressState;
use ndarray::{Array1, Zip};
use pipeline_math::broadcast::broadcast_to;
use pipeline_types::config::{StressMethod, SurfaceLocation};
use pipeline_types::error::{PipelineError, PipelineResult};
use pipeline_types::run::AnalysisWarning;
use std::f64::consts::PI;

/// Smallest R_avg/t covered by the fit.
const RADIUS_RATIO_MIN: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct CircumferentialSolver;

/// Geometry factor with `ξ = 2c/t`.
fn circumferential_f(radius_ratio: f64, xi: f64, q: f64) -> f64 {
    let term1 = xi * (0.0103 + 0.00617 * xi);
    let term2 = 1.0 + 0.7 * xi;
    let term3 = (radius_ratio - RADIUS_RATIO_MIN).max(0.0).powf(0.7);
    1.0 + (0.02 + term1 + 0.0035 * term2 * term3) * q * q
}

impl StressIntensitySolver for CircumferentialSolver {
    fn method(&self) -> StressMethod {
        StressMethod::Circumferential
    }

    fn check_surface(&self, surface: SurfaceLocation) -> PipelineResult<()> {
        match surface {
            SurfaceLocation::Inside => Ok(()),
            other => Err(PipelineError::InvalidSurface(format!(
                "circumferential solution requires an inside flaw, got {other}"
            ))),
        }
    }

    fn calc_stress_intensity_factor(
        &self,
        state: &StressState,
        crack_depth: &Array1<f64>,
        crack_length: &Array1<f64>,
        _position: AngularPosition,
    ) -> PipelineResult<StressIntensity> {
        self.check_surface(state.defect().surface())?;
        let n = state.sample_size();
        let a = broadcast_to(crack_depth, n)?;
        let two_c = broadcast_to(crack_length, n)?;

        let pipe = state.pipe();
        let t = pipe.wall_thickness();
        let radius_ratio = pipe.avg_radius() / t;
        let q = calc_q(&(&a / &(&two_c / 2.0)));
        let f = Zip::from(&radius_ratio)
            .and(&(&two_c / t))
            .and(&q)
            .map_collect(|&rt, &xi, &q| circumferential_f(rt, xi, q));
        let stress = state.longitudinal_stress(&a);
        let k_max = Zip::from(&stress)
            .and(&a)
            .and(&q)
            .and(&f)
            .map_collect(|&s, &a, &q, &f| s * (PI * a / q).sqrt() * f);

        let mut warnings = Vec::new();
        if radius_ratio.iter().any(|&rt| rt < RADIUS_RATIO_MIN) {
            warnings.push(AnalysisWarning::RatioOutOfRange {
                ratio: "R/t".to_string(),
                lower: RADIUS_RATIO_MIN,
                upper: f64::INFINITY,
            });
        }
        depth_ratio_warning(&(&a / t), &mut warnings);

        Ok(StressIntensity {
            k_max,
            f,
            q,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defect::Defect;
    use crate::environment::Environment;
    use crate::material::Material;
    use crate::pipe::Pipe;
    use crate::stress_intensity::AndersonSolver;
    use ndarray::array;

    fn state(surface: SurfaceLocation) -> StressState {
        StressState::new(
            Pipe::from_scalars(0.9144, 0.0103).unwrap(),
            Environment::from_scalars(5.79, 4.40, 293.0, 1.0).unwrap(),
            Material::from_scalars(358.5, 55.0).unwrap(),
            Defect::from_scalars(25.0, 0.04, surface).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_hand_calculation() {
        let s = state(SurfaceLocation::Inside);
        let a = 0.002575;
        let sif = CircumferentialSolver
            .calc_stress_intensity_factor(&s, &array![a], &array![0.04], AngularPosition::Deepest)
            .unwrap();

        let rt = 0.45205_f64 / 0.0103;
        let xi = 0.04 / 0.0103;
        let q = 1.0 + 1.464 * (a / 0.02f64).powf(1.65);
        let f = 1.0
            + (0.02
                + xi * (0.0103 + 0.00617 * xi)
                + 0.0035 * (1.0 + 0.7 * xi) * (rt - 5.0).powf(0.7))
                * q
                * q;
        let sigma_l = 5.79 * 0.45205 / (0.0103 - a) / 2.0;
        let k = sigma_l * (PI * a / q).sqrt() * f;
        assert!((sif.q[0] - q).abs() < 1e-12);
        assert!((sif.f[0] - f).abs() < 1e-12, "F = {}, expected {f}", sif.f[0]);
        assert!((sif.k_max[0] - k).abs() < 1e-9, "K = {}, expected {k}", sif.k_max[0]);
        assert!(sif.warnings.is_empty());
    }

    #[test]
    fn test_below_axial_flaw() {
        // Longitudinal stress is half the hoop stress.
        let s = state(SurfaceLocation::Inside);
        let a = array![0.002575, 0.005];
        let two_c = array![0.04, 0.04];
        let circ = CircumferentialSolver
            .calc_stress_intensity_factor(&s, &a, &two_c, AngularPosition::Deepest)
            .unwrap();
        let axial = AndersonSolver
            .calc_stress_intensity_factor(&s, &a, &two_c, AngularPosition::Deepest)
            .unwrap();
        assert!(circ.k_max.iter().zip(axial.k_max.iter()).all(|(c, x)| c < x));
        assert!(circ.k_max[1] > circ.k_max[0]);
    }

    #[test]
    fn test_rejects_outside_flaw() {
        let s = state(SurfaceLocation::Outside);
        let err = CircumferentialSolver
            .calc_stress_intensity_factor(&s, &array![0.001], &array![0.04], AngularPosition::Deepest)
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidSurface(_)));
    }
}
