// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Gas Environment
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cyclic pressure loading and hydrogen fugacity.
//!
//! Fugacity follows the Abel–Noble equation of state,
//! `f = p·x·exp(b·p / (R·T))`. With `b` in cm³/mol and `p` in MPa the
//! product `b·p` is in J/mol, so no unit conversion is needed.

use ndarray::{Array1, Zip};
use pipeline_math::broadcast::{broadcast_len, broadcast_to};
use pipeline_types::bounded::{BoundedQuantity, Bounds};
use pipeline_types::constants::{
    ABEL_NOBLE_CO_VOLUME, GAS_CONSTANT, REFERENCE_PRESSURE, TEMPERATURE_MAX, TEMPERATURE_MIN,
};
use pipeline_types::error::PipelineResult;

#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    max_pressure: BoundedQuantity,
    min_pressure: BoundedQuantity,
    temperature: BoundedQuantity,
    volume_fraction_h2: BoundedQuantity,
    reference_pressure: f64,
}

/// Abel–Noble fugacity [MPa].
pub fn fugacity(pressure: f64, temperature: f64, volume_fraction_h2: f64) -> f64 {
    pressure
        * volume_fraction_h2
        * (ABEL_NOBLE_CO_VOLUME * pressure / (GAS_CONSTANT * temperature)).exp()
}

impl Environment {
    pub fn new(
        max_pressure: &Array1<f64>,
        min_pressure: &Array1<f64>,
        temperature: &Array1<f64>,
        volume_fraction_h2: &Array1<f64>,
    ) -> PipelineResult<Self> {
        let n = broadcast_len(&[
            max_pressure.len(),
            min_pressure.len(),
            temperature.len(),
            volume_fraction_h2.len(),
        ])?;
        let max_pressure = BoundedQuantity::from_vector(
            "max_pressure",
            broadcast_to(max_pressure, n)?,
            &Bounds::non_negative(),
        )?;
        let min_pressure = BoundedQuantity::from_vector(
            "min_pressure",
            broadcast_to(min_pressure, n)?,
            &Bounds::new(0.0, max_pressure.values().clone()),
        )?;
        let temperature = BoundedQuantity::from_vector(
            "temperature",
            broadcast_to(temperature, n)?,
            &Bounds::new(TEMPERATURE_MIN, TEMPERATURE_MAX),
        )?;
        let volume_fraction_h2 = BoundedQuantity::from_vector(
            "volume_fraction_h2",
            broadcast_to(volume_fraction_h2, n)?,
            &Bounds::fraction(),
        )?;
        Ok(Environment {
            max_pressure,
            min_pressure,
            temperature,
            volume_fraction_h2,
            reference_pressure: REFERENCE_PRESSURE,
        })
    }

    pub fn from_scalars(
        max_pressure: f64,
        min_pressure: f64,
        temperature: f64,
        volume_fraction_h2: f64,
    ) -> PipelineResult<Self> {
        let one = |v: f64| Array1::from_elem(1, v);
        Self::new(
            &one(max_pressure),
            &one(min_pressure),
            &one(temperature),
            &one(volume_fraction_h2),
        )
    }

    pub fn with_reference_pressure(mut self, reference_pressure: f64) -> PipelineResult<Self> {
        BoundedQuantity::from_scalar(
            "reference_pressure",
            reference_pressure,
            1,
            &Bounds::positive(),
        )?;
        self.reference_pressure = reference_pressure;
        Ok(self)
    }

    pub fn sample_size(&self) -> usize {
        self.max_pressure.sample_size()
    }

    pub fn max_pressure(&self) -> &Array1<f64> {
        self.max_pressure.values()
    }

    pub fn min_pressure(&self) -> &Array1<f64> {
        self.min_pressure.values()
    }

    pub fn temperature(&self) -> &Array1<f64> {
        self.temperature.values()
    }

    pub fn volume_fraction_h2(&self) -> &Array1<f64> {
        self.volume_fraction_h2.values()
    }

    pub fn reference_pressure(&self) -> f64 {
        self.reference_pressure
    }

    /// Load ratio `p_min / p_max`; zero where `p_max` is zero.
    pub fn r_ratio(&self) -> Array1<f64> {
        Zip::from(self.min_pressure())
            .and(self.max_pressure())
            .map_collect(|&lo, &hi| if hi > 0.0 { lo / hi } else { 0.0 })
    }

    /// Hydrogen fugacity at maximum pressure.
    pub fn fugacity(&self) -> Array1<f64> {
        Zip::from(self.max_pressure())
            .and(self.temperature())
            .and(self.volume_fraction_h2())
            .map_collect(|&p, &t, &x| fugacity(p, t, x))
    }

    /// Fugacity of pure hydrogen at the reference pressure.
    pub fn reference_fugacity(&self) -> Array1<f64> {
        let p_ref = self.reference_pressure;
        self.temperature().mapv(|t| fugacity(p_ref, t, 1.0))
    }

    /// `sqrt(f / f_ref)`, the Code Case 2938 fugacity correction.
    pub fn fugacity_ratio(&self) -> Array1<f64> {
        let f = self.fugacity();
        let f_ref = self.reference_fugacity();
        Zip::from(&f)
            .and(&f_ref)
            .map_collect(|&f, &f_ref| (f / f_ref).sqrt())
    }

    pub fn single(&self, index: usize) -> PipelineResult<Self> {
        Ok(Environment {
            max_pressure: self.max_pressure.single(index)?,
            min_pressure: self.min_pressure.single(index)?,
            temperature: self.temperature.single(index)?,
            volume_fraction_h2: self.volume_fraction_h2.single(index)?,
            reference_pressure: self.reference_pressure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use pipeline_types::error::PipelineError;

    #[test]
    fn test_r_ratio() {
        let env = Environment::from_scalars(5.79, 4.40, 293.0, 1.0).unwrap();
        assert!((env.r_ratio()[0] - 4.40 / 5.79).abs() < 1e-12);
    }

    #[test]
    fn test_fugacity_formula() {
        let env = Environment::from_scalars(10.0, 1.0, 300.0, 0.5).unwrap();
        let expected = 10.0 * 0.5 * (15.84_f64 * 10.0 / (8.314462618 * 300.0)).exp();
        assert!((env.fugacity()[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fugacity_ratio_is_one_for_pure_h2_at_reference() {
        let env = Environment::from_scalars(106.0, 0.0, 293.0, 1.0).unwrap();
        assert!((env.fugacity_ratio()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fugacity_ratio_zero_without_hydrogen() {
        let env = Environment::from_scalars(5.0, 1.0, 293.0, 0.0).unwrap();
        assert_eq!(env.fugacity_ratio()[0], 0.0);
    }

    #[test]
    fn test_reference_pressure_override() {
        let env = Environment::from_scalars(50.0, 0.0, 293.0, 1.0)
            .unwrap()
            .with_reference_pressure(50.0)
            .unwrap();
        assert!((env.fugacity_ratio()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_pressure_above_max_rejected() {
        let err = Environment::from_scalars(4.0, 5.0, 293.0, 1.0).unwrap_err();
        assert!(matches!(err, PipelineError::Bounds { .. }), "got {err}");
    }

    #[test]
    fn test_temperature_bounds() {
        assert!(Environment::from_scalars(5.0, 1.0, 229.0, 1.0).is_err());
        assert!(Environment::from_scalars(5.0, 1.0, 331.0, 1.0).is_err());
        assert!(Environment::from_scalars(5.0, 1.0, 330.0, 1.0).is_ok());
    }

    #[test]
    fn test_volume_fraction_bounds() {
        assert!(Environment::from_scalars(5.0, 1.0, 293.0, 1.01).is_err());
    }

    #[test]
    fn test_vector_members() {
        let env = Environment::new(
            &array![5.0, 6.0],
            &array![1.0, 3.0],
            &array![293.0],
            &array![1.0],
        )
        .unwrap();
        let r = env.r_ratio();
        assert!((r[0] - 0.2).abs() < 1e-12);
        assert!((r[1] - 0.5).abs() < 1e-12);
        let single = env.single(1).unwrap();
        assert_eq!(single.max_pressure()[0], 6.0);
    }
}
