// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Multilinear Lookup Tables
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gridded tables interpolated linearly along every axis.
//!
//! JSON layout:
//! ```json
//! {
//!   "axes": [{"name": "ri_over_t", "points": [5, 10, 20]},
//!            {"name": "a_over_t", "points": [0.0, 0.2, 0.4, 0.6, 0.8]}],
//!   "outputs": ["G0", "G1"],
//!   "values": [ ... ]
//! }
//! ```
//! `values` is row-major over the axes with the output index fastest.

use crate::broadcast::{broadcast_at, broadcast_len};
use crate::interp::locate;
use ndarray::{Array1, Array2};
use pipeline_types::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableAxis {
    pub name: String,
    pub points: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupTable {
    pub axes: Vec<TableAxis>,
    pub outputs: Vec<String>,
    pub values: Vec<f64>,
}

/// Interpolated outputs for a batch of query points.
#[derive(Debug, Clone)]
pub struct TableLookup {
    /// `(points × outputs)`
    pub values: Array2<f64>,
    /// Per axis: whether any query coordinate had to be clamped.
    pub clamped: Vec<bool>,
}

impl TableLookup {
    pub fn column(&self, output: usize) -> Array1<f64> {
        self.values.column(output).to_owned()
    }
}

impl LookupTable {
    pub fn from_file(path: &str) -> PipelineResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table: Self = serde_json::from_str(&contents)?;
        table.validate()?;
        Ok(table)
    }

    /// Build from axes, output names and a row-major value function.
    pub fn from_fn<F>(axes: Vec<TableAxis>, outputs: Vec<String>, f: F) -> PipelineResult<Self>
    where
        F: Fn(&[f64], usize) -> f64,
    {
        let shape: Vec<usize> = axes.iter().map(|a| a.points.len()).collect();
        let n_cells: usize = shape.iter().product();
        let n_out = outputs.len();
        let mut values = Vec::with_capacity(n_cells * n_out);
        let mut coord = vec![0.0; axes.len()];
        for cell in 0..n_cells {
            let mut rem = cell;
            for d in (0..axes.len()).rev() {
                coord[d] = axes[d].points[rem % shape[d]];
                rem /= shape[d];
            }
            for o in 0..n_out {
                values.push(f(&coord, o));
            }
        }
        let table = LookupTable {
            axes,
            outputs,
            values,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.axes.is_empty() || self.outputs.is_empty() {
            return Err(PipelineError::Config(
                "lookup table needs at least one axis and one output".to_string(),
            ));
        }
        for axis in &self.axes {
            if axis.points.is_empty() {
                return Err(PipelineError::Config(format!(
                    "table axis '{}' has no points",
                    axis.name
                )));
            }
            if axis.points.windows(2).any(|w| !(w[1] > w[0])) {
                return Err(PipelineError::Config(format!(
                    "table axis '{}' is not strictly increasing",
                    axis.name
                )));
            }
        }
        let expected = self.axes.iter().map(|a| a.points.len()).product::<usize>()
            * self.outputs.len();
        if self.values.len() != expected {
            return Err(PipelineError::InconsistentDimensions(format!(
                "table holds {} values, axes and outputs require {expected}",
                self.values.len()
            )));
        }
        Ok(())
    }

    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|o| o == name)
    }

    /// Multilinear interpolation at each query point.
    ///
    /// `coords[d]` holds the coordinates along axis `d`; each may be a
    /// single broadcast value or a vector of the common length.
    pub fn interpolate(&self, coords: &[Array1<f64>]) -> PipelineResult<TableLookup> {
        let dims = self.axes.len();
        if coords.len() != dims {
            return Err(PipelineError::InconsistentDimensions(format!(
                "table has {dims} axes, {} coordinates given",
                coords.len()
            )));
        }
        let lengths: Vec<usize> = coords.iter().map(|c| c.len()).collect();
        let n = broadcast_len(&lengths)?;
        let n_out = self.outputs.len();

        let shape: Vec<usize> = self.axes.iter().map(|a| a.points.len()).collect();
        let mut strides = vec![n_out; dims];
        for d in (0..dims.saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * shape[d + 1];
        }

        let mut values = Array2::zeros((n, n_out));
        let mut clamped = vec![false; dims];
        let mut cell = vec![(0usize, 0.0f64); dims];

        for i in 0..n {
            for d in 0..dims {
                let (j, t, c) = locate(&self.axes[d].points, broadcast_at(&coords[d], i));
                clamped[d] |= c;
                cell[d] = (j, t);
            }
            // Sum over the 2^dims corners of the enclosing cell.
            for corner in 0..(1usize << dims) {
                let mut weight = 1.0;
                let mut offset = 0;
                for d in 0..dims {
                    let (j, t) = cell[d];
                    let upper = (corner >> d) & 1 == 1;
                    if upper && shape[d] < 2 {
                        weight = 0.0;
                        break;
                    }
                    weight *= if upper { t } else { 1.0 - t };
                    offset += (j + usize::from(upper)) * strides[d];
                }
                if weight == 0.0 {
                    continue;
                }
                for o in 0..n_out {
                    values[[i, o]] += weight * self.values[offset + o];
                }
            }
        }

        Ok(TableLookup { values, clamped })
    }
}
