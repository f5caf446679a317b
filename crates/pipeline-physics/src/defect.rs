// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Initial Defect
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::pipe::Pipe;
use ndarray::Array1;
use pipeline_math::broadcast::{broadcast_len, broadcast_to};
use pipeline_types::bounded::{BoundedQuantity, Bounds};
use pipeline_types::config::SurfaceLocation;
use pipeline_types::error::PipelineResult;

/// Axial surface flaw described relative to the pipe wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Defect {
    /// Depth as percent of wall thickness.
    flaw_depth: BoundedQuantity,
    /// Full surface length 2c [m].
    flaw_length: BoundedQuantity,
    location_factor: BoundedQuantity,
    surface: SurfaceLocation,
}

impl Defect {
    pub fn new(
        flaw_depth: &Array1<f64>,
        flaw_length: &Array1<f64>,
        surface: SurfaceLocation,
    ) -> PipelineResult<Self> {
        Self::with_location_factor(flaw_depth, flaw_length, &Array1::ones(1), surface)
    }

    pub fn with_location_factor(
        flaw_depth: &Array1<f64>,
        flaw_length: &Array1<f64>,
        location_factor: &Array1<f64>,
        surface: SurfaceLocation,
    ) -> PipelineResult<Self> {
        let n = broadcast_len(&[flaw_depth.len(), flaw_length.len(), location_factor.len()])?;
        Ok(Defect {
            flaw_depth: BoundedQuantity::from_vector(
                "flaw_depth",
                broadcast_to(flaw_depth, n)?,
                &Bounds::new(0.0, 100.0),
            )?,
            flaw_length: BoundedQuantity::from_vector(
                "flaw_length",
                broadcast_to(flaw_length, n)?,
                &Bounds::positive(),
            )?,
            location_factor: BoundedQuantity::from_vector(
                "location_factor",
                broadcast_to(location_factor, n)?,
                &Bounds::positive(),
            )?,
            surface,
        })
    }

    pub fn from_scalars(
        flaw_depth: f64,
        flaw_length: f64,
        surface: SurfaceLocation,
    ) -> PipelineResult<Self> {
        Self::new(
            &Array1::from_elem(1, flaw_depth),
            &Array1::from_elem(1, flaw_length),
            surface,
        )
    }

    pub fn sample_size(&self) -> usize {
        self.flaw_depth.sample_size()
    }

    pub fn flaw_depth(&self) -> &Array1<f64> {
        self.flaw_depth.values()
    }

    pub fn flaw_length(&self) -> &Array1<f64> {
        self.flaw_length.values()
    }

    pub fn location_factor(&self) -> &Array1<f64> {
        self.location_factor.values()
    }

    pub fn surface(&self) -> SurfaceLocation {
        self.surface
    }

    /// Initial depth `a0 = t·depth/100` [m].
    pub fn initial_depth(&self, pipe: &Pipe) -> Array1<f64> {
        pipe.wall_thickness() * self.flaw_depth() / 100.0
    }

    /// Initial half-length `c0` [m].
    pub fn initial_half_length(&self) -> Array1<f64> {
        self.flaw_length() / 2.0
    }

    /// Initial aspect ratio `a0/c0`.
    pub fn a_over_c(&self, pipe: &Pipe) -> Array1<f64> {
        self.initial_depth(pipe) / self.initial_half_length()
    }

    pub fn single(&self, index: usize) -> PipelineResult<Self> {
        Ok(Defect {
            flaw_depth: self.flaw_depth.single(index)?,
            flaw_length: self.flaw_length.single(index)?,
            location_factor: self.location_factor.single(index)?,
            surface: self.surface,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_geometry() {
        let pipe = Pipe::from_scalars(0.9144, 0.0103).unwrap();
        let defect = Defect::from_scalars(25.0, 0.04, SurfaceLocation::Inside).unwrap();
        let a0 = defect.initial_depth(&pipe)[0];
        assert!((a0 - 0.002575).abs() < 1e-12, "a0 = {a0}");
        assert!((defect.initial_half_length()[0] - 0.02).abs() < 1e-12);
        assert!((defect.a_over_c(&pipe)[0] - 0.12875).abs() < 1e-12);
        assert_eq!(defect.location_factor()[0], 1.0);
    }

    #[test]
    fn test_depth_percent_bounds() {
        assert!(Defect::from_scalars(100.0, 0.04, SurfaceLocation::Inside).is_ok());
        assert!(Defect::from_scalars(100.5, 0.04, SurfaceLocation::Inside).is_err());
        assert!(Defect::from_scalars(-1.0, 0.04, SurfaceLocation::Inside).is_err());
    }

    #[test]
    fn test_surface_kept() {
        let d = Defect::from_scalars(10.0, 0.02, SurfaceLocation::Outside).unwrap();
        assert_eq!(d.single(0).unwrap().surface(), SurfaceLocation::Outside);
    }
}
