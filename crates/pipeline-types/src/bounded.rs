// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Bounded Quantities
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ensemble-sized physical quantities with enforced limits.
//!
//! Every input of the fatigue model is a 1-D array with one entry per
//! ensemble member. A nominal run is simply an ensemble of size one.

use crate::error::{PipelineError, PipelineResult};
use ndarray::Array1;

/// One side of a bound: a single value or one value per ensemble member.
#[derive(Debug, Clone, PartialEq)]
pub enum Limit {
    Scalar(f64),
    PerMember(Array1<f64>),
}

impl Limit {
    fn at(&self, index: usize) -> f64 {
        match self {
            Limit::Scalar(v) => *v,
            Limit::PerMember(values) => values[index],
        }
    }

    fn member_count(&self) -> Option<usize> {
        match self {
            Limit::Scalar(_) => None,
            Limit::PerMember(values) => Some(values.len()),
        }
    }
}

impl From<f64> for Limit {
    fn from(value: f64) -> Self {
        Limit::Scalar(value)
    }
}

impl From<Array1<f64>> for Limit {
    fn from(values: Array1<f64>) -> Self {
        Limit::PerMember(values)
    }
}

/// Closed interval `[lower, upper]` applied elementwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub lower: Limit,
    pub upper: Limit,
}

impl Bounds {
    pub fn new(lower: impl Into<Limit>, upper: impl Into<Limit>) -> Self {
        Bounds {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    pub fn unbounded() -> Self {
        Bounds::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn non_negative() -> Self {
        Bounds::new(0.0, f64::INFINITY)
    }

    /// Strictly positive values.
    pub fn positive() -> Self {
        Bounds::new(f64::MIN_POSITIVE, f64::INFINITY)
    }

    pub fn fraction() -> Self {
        Bounds::new(0.0, 1.0)
    }

    fn check(&self, name: &str, values: &Array1<f64>) -> PipelineResult<()> {
        for limit in [&self.lower, &self.upper] {
            if let Some(n) = limit.member_count() {
                if n != values.len() {
                    return Err(PipelineError::InconsistentDimensions(format!(
                        "'{name}' has {} members but its bound has {n}",
                        values.len()
                    )));
                }
            }
        }
        for (i, &v) in values.iter().enumerate() {
            let lo = self.lower.at(i);
            let hi = self.upper.at(i);
            // NaN fails both comparisons, so test the admissible case.
            if !(v >= lo && v <= hi) {
                return Err(PipelineError::Bounds {
                    name: name.to_string(),
                    message: format!("member {i} = {v} outside [{lo}, {hi}]"),
                });
            }
        }
        Ok(())
    }
}

/// A named, validated 1-D array of physical values.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedQuantity {
    name: String,
    values: Array1<f64>,
}

impl BoundedQuantity {
    /// Broadcast `value` to `ensemble_size` members.
    pub fn from_scalar(
        name: &str,
        value: f64,
        ensemble_size: usize,
        bounds: &Bounds,
    ) -> PipelineResult<Self> {
        if ensemble_size == 0 {
            return Err(PipelineError::InconsistentDimensions(format!(
                "'{name}' requested with an empty ensemble"
            )));
        }
        Self::from_vector(name, Array1::from_elem(ensemble_size, value), bounds)
    }

    pub fn from_vector(name: &str, values: Array1<f64>, bounds: &Bounds) -> PipelineResult<Self> {
        if values.is_empty() {
            return Err(PipelineError::InconsistentDimensions(format!(
                "'{name}' has no values"
            )));
        }
        bounds.check(name, &values)?;
        Ok(BoundedQuantity {
            name: name.to_string(),
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array1<f64> {
        self.values
    }

    pub fn sample_size(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Single-member quantity holding member `index`.
    pub fn single(&self, index: usize) -> PipelineResult<Self> {
        if index >= self.values.len() {
            return Err(PipelineError::InconsistentDimensions(format!(
                "member {index} requested from '{}' with {} members",
                self.name,
                self.values.len()
            )));
        }
        Ok(BoundedQuantity {
            name: self.name.clone(),
            values: Array1::from_elem(1, self.values[index]),
        })
    }
}
