use ndarray::Array1;
use pipeline_types::error::{PipelineError, PipelineResult};
use std::collections::BTreeMap;

/// Parameter name → ensemble values, every column the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSheet {
    columns: BTreeMap<String, Array1<f64>>,
    sample_size: Option<usize>,
}

impl SampleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, values: Array1<f64>) -> PipelineResult<()> {
        match self.sample_size {
            Some(n) if n != values.len() => {
                return Err(PipelineError::InconsistentDimensions(format!(
                    "column '{name}' has {} samples, sheet has {n}",
                    values.len()
                )));
            }
            _ => self.sample_size = Some(values.len()),
        }
        if self.columns.insert(name.to_string(), values).is_some() {
            return Err(PipelineError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Array1<f64>> {
        self.columns.get(name)
    }

    /// Column `name`, or `MissingParameter`.
    pub fn require(&self, name: &str) -> PipelineResult<&Array1<f64>> {
        self.columns
            .get(name)
            .ok_or_else(|| PipelineError::MissingParameter(format!("sample sheet has no '{name}'")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Ensemble length; 0 for an empty sheet.
    pub fn sample_size(&self) -> usize {
        self.sample_size.unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array1<f64>)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Values of every column for one ensemble member.
    pub fn row(&self, index: usize) -> PipelineResult<BTreeMap<String, f64>> {
        if index >= self.sample_size() {
            return Err(PipelineError::InconsistentDimensions(format!(
                "row {index} requested from {} samples",
                self.sample_size()
            )));
        }
        Ok(self
            .columns
            .iter()
            .map(|(k, v)| (k.clone(), v[index]))
            .collect())
    }
}
