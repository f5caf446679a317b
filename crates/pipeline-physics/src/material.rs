// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Material
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array1;
use pipeline_math::broadcast::{broadcast_len, broadcast_to};
use pipeline_types::bounded::{BoundedQuantity, Bounds};
use pipeline_types::error::PipelineResult;

/// Yield strength [MPa] and fracture resistance K_IC [MPa·√m].
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    yield_strength: BoundedQuantity,
    fracture_resistance: BoundedQuantity,
}

impl Material {
    pub fn new(yield_strength: &Array1<f64>, fracture_resistance: &Array1<f64>) -> PipelineResult<Self> {
        let n = broadcast_len(&[yield_strength.len(), fracture_resistance.len()])?;
        Ok(Material {
            yield_strength: BoundedQuantity::from_vector(
                "yield_strength",
                broadcast_to(yield_strength, n)?,
                &Bounds::positive(),
            )?,
            fracture_resistance: BoundedQuantity::from_vector(
                "fracture_resistance",
                broadcast_to(fracture_resistance, n)?,
                &Bounds::positive(),
            )?,
        })
    }

    pub fn from_scalars(yield_strength: f64, fracture_resistance: f64) -> PipelineResult<Self> {
        Self::new(
            &Array1::from_elem(1, yield_strength),
            &Array1::from_elem(1, fracture_resistance),
        )
    }

    pub fn sample_size(&self) -> usize {
        self.yield_strength.sample_size()
    }

    pub fn yield_strength(&self) -> &Array1<f64> {
        self.yield_strength.values()
    }

    pub fn fracture_resistance(&self) -> &Array1<f64> {
        self.fracture_resistance.values()
    }

    pub fn single(&self, index: usize) -> PipelineResult<Self> {
        Ok(Material {
            yield_strength: self.yield_strength.single(index)?,
            fracture_resistance: self.fracture_resistance.single(index)?,
        })
    }
}
