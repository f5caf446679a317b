// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Pipe Geometry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array1;
use pipeline_math::broadcast::{broadcast_len, broadcast_to};
use pipeline_types::bounded::{BoundedQuantity, Bounds};
use pipeline_types::error::PipelineResult;

/// Pipe cross-section, one entry per ensemble member [m].
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    outer_diameter: BoundedQuantity,
    wall_thickness: BoundedQuantity,
}

impl Pipe {
    /// Wall thickness is bounded by half the outer diameter of the same member.
    pub fn new(outer_diameter: &Array1<f64>, wall_thickness: &Array1<f64>) -> PipelineResult<Self> {
        let n = broadcast_len(&[outer_diameter.len(), wall_thickness.len()])?;
        let outer_diameter = BoundedQuantity::from_vector(
            "outer_diameter",
            broadcast_to(outer_diameter, n)?,
            &Bounds::positive(),
        )?;
        let half_diameter = outer_diameter.values() / 2.0;
        let wall_thickness = BoundedQuantity::from_vector(
            "wall_thickness",
            broadcast_to(wall_thickness, n)?,
            &Bounds::new(f64::MIN_POSITIVE, half_diameter),
        )?;
        Ok(Pipe {
            outer_diameter,
            wall_thickness,
        })
    }

    pub fn from_scalars(outer_diameter: f64, wall_thickness: f64) -> PipelineResult<Self> {
        Self::new(
            &Array1::from_elem(1, outer_diameter),
            &Array1::from_elem(1, wall_thickness),
        )
    }

    pub fn sample_size(&self) -> usize {
        self.outer_diameter.sample_size()
    }

    pub fn outer_diameter(&self) -> &Array1<f64> {
        self.outer_diameter.values()
    }

    pub fn wall_thickness(&self) -> &Array1<f64> {
        self.wall_thickness.values()
    }

    pub fn inner_diameter(&self) -> Array1<f64> {
        self.outer_diameter() - &(self.wall_thickness() * 2.0)
    }

    pub fn outer_radius(&self) -> Array1<f64> {
        self.outer_diameter() / 2.0
    }

    pub fn inner_radius(&self) -> Array1<f64> {
        self.inner_diameter() / 2.0
    }

    /// Mid-wall radius `(D − t)/2`.
    pub fn avg_radius(&self) -> Array1<f64> {
        (self.outer_diameter() - self.wall_thickness()) / 2.0
    }

    pub fn single(&self, index: usize) -> PipelineResult<Self> {
        Ok(Pipe {
            outer_diameter: self.outer_diameter.single(index)?,
            wall_thickness: self.wall_thickness.single(index)?,
        })
    }
}
