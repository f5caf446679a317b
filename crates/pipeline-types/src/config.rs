// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Full description of one crack-evolution analysis.
///
/// Method selectors are kept as strings so that an unknown value surfaces
/// as the matching domain error when the analysis is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_analysis_name")]
    pub analysis_name: String,
    pub parameters: Vec<ParameterSpec>,
    #[serde(default)]
    pub study: StudyConfig,
    /// "anderson", "api" or "circumferential"
    #[serde(default = "default_stress_method")]
    pub stress_method: String,
    /// "inside" or "outside"
    #[serde(default = "default_surface")]
    pub surface: String,
    /// "proportional", "fixed" or "independent"
    #[serde(default = "default_delta_c_rule")]
    pub delta_c_rule: String,
    #[serde(default)]
    pub crack_growth_model: GrowthModelSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cycles: Option<f64>,
    /// Fixed cycle increment; adaptive a/t stepping when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_step: Option<f64>,
    /// JSON file with API 579-1 lookup tables, required for `stress_method = "api"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_tables: Option<String>,
}

fn default_analysis_name() -> String {
    "crack_evolution".to_string()
}
fn default_stress_method() -> String {
    "anderson".to_string()
}
fn default_surface() -> String {
    "inside".to_string()
}
fn default_delta_c_rule() -> String {
    "proportional".to_string()
}

impl AnalysisConfig {
    pub fn from_file(path: &str) -> PipelineResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> PipelineResult<Self> {
        let config: Self = serde_json::from_str(contents)?;
        for p in &config.parameters {
            p.validate()?;
        }
        Ok(config)
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Sampling design and ensemble sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// deterministic | random | lhs | bounding | sensitivity
    #[serde(default = "default_sample_type")]
    pub sample_type: String,
    #[serde(default)]
    pub aleatory_samples: usize,
    #[serde(default)]
    pub epistemic_samples: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
}

fn default_sample_type() -> String {
    "deterministic".to_string()
}

impl Default for StudyConfig {
    fn default() -> Self {
        StudyConfig {
            sample_type: default_sample_type(),
            aleatory_samples: 0,
            epistemic_samples: 0,
            random_seed: None,
        }
    }
}

/// Named fatigue law with optional Paris coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthModelSpec {
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<f64>,
}

impl GrowthModelSpec {
    pub fn paris_law(c: f64, m: f64) -> Self {
        GrowthModelSpec {
            model_name: "paris_law".to_string(),
            c: Some(c),
            m: Some(m),
        }
    }

    pub fn code_case_2938() -> Self {
        GrowthModelSpec {
            model_name: "code_case_2938".to_string(),
            c: None,
            m: None,
        }
    }
}

impl Default for GrowthModelSpec {
    fn default() -> Self {
        Self::code_case_2938()
    }
}

/// One input quantity: deterministic when `uncertainty_type` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub nominal_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty_type: Option<UncertaintyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionSpec>,
}

impl ParameterSpec {
    pub fn deterministic(name: &str, value: f64) -> Self {
        ParameterSpec {
            name: name.to_string(),
            nominal_value: value,
            uncertainty_type: None,
            distribution: None,
        }
    }

    pub fn uncertain(
        name: &str,
        nominal_value: f64,
        uncertainty_type: UncertaintyType,
        distribution: DistributionSpec,
    ) -> Self {
        ParameterSpec {
            name: name.to_string(),
            nominal_value,
            uncertainty_type: Some(uncertainty_type),
            distribution: Some(distribution),
        }
    }

    pub fn is_uncertain(&self) -> bool {
        self.uncertainty_type.is_some()
    }

    pub fn validate(&self) -> PipelineResult<()> {
        match (&self.uncertainty_type, &self.distribution) {
            (Some(_), Some(_)) | (None, None) => Ok(()),
            (Some(_), None) => Err(PipelineError::Config(format!(
                "parameter '{}' is uncertain but has no distribution",
                self.name
            ))),
            (None, Some(_)) => Err(PipelineError::Config(format!(
                "parameter '{}' has a distribution but no uncertainty type",
                self.name
            ))),
        }
    }
}

/// Sampling axis of an uncertain variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UncertaintyType {
    Aleatory,
    Epistemic,
}

/// Probability distribution of an uncertain input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionSpec {
    Normal {
        mean: f64,
        std_deviation: f64,
    },
    /// `mu` and `sigma` describe ln(X).
    LogNormal {
        mu: f64,
        sigma: f64,
    },
    TruncNormal {
        mean: f64,
        std_deviation: f64,
        lower_bound: f64,
        upper_bound: f64,
    },
    Uniform {
        lower_bound: f64,
        upper_bound: f64,
    },
    Beta {
        a: f64,
        b: f64,
    },
}

/// Stress intensity factor method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressMethod {
    Anderson,
    Api,
    /// Circumferential flaw under longitudinal stress.
    Circumferential,
}

impl FromStr for StressMethod {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anderson" => Ok(StressMethod::Anderson),
            "api" | "api_579" | "api579" => Ok(StressMethod::Api),
            "circumferential" | "longitudinal" => Ok(StressMethod::Circumferential),
            other => Err(PipelineError::Config(format!(
                "unknown stress intensity method '{other}'"
            ))),
        }
    }
}

impl fmt::Display for StressMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StressMethod::Anderson => write!(f, "anderson"),
            StressMethod::Api => write!(f, "api"),
            StressMethod::Circumferential => write!(f, "circumferential"),
        }
    }
}

/// Pipe wall surface on which the flaw sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceLocation {
    Inside,
    Outside,
}

impl FromStr for SurfaceLocation {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inside" => Ok(SurfaceLocation::Inside),
            "outside" => Ok(SurfaceLocation::Outside),
            other => Err(PipelineError::InvalidSurface(format!(
                "'{other}' is not one of inside, outside"
            ))),
        }
    }
}

impl fmt::Display for SurfaceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceLocation::Inside => write!(f, "inside"),
            SurfaceLocation::Outside => write!(f, "outside"),
        }
    }
}

/// How crack half-length c evolves with depth a.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaCRule {
    /// c grows with a at the initial aspect ratio
    Proportional,
    /// c stays at its initial value
    Fixed,
    /// c grows from the stress intensity at the surface point
    Independent,
}

impl FromStr for DeltaCRule {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proportional" | "prop" => Ok(DeltaCRule::Proportional),
            "fixed" | "fix" => Ok(DeltaCRule::Fixed),
            "independent" | "ind" => Ok(DeltaCRule::Independent),
            other => Err(PipelineError::InvalidGrowthRule(format!(
                "'{other}' is not one of proportional, fixed, independent"
            ))),
        }
    }
}

impl fmt::Display for DeltaCRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaCRule::Proportional => write!(f, "proportional"),
            DeltaCRule::Fixed => write!(f, "fixed"),
            DeltaCRule::Independent => write!(f, "independent"),
        }
    }
}

/// Experiment design of an uncertainty study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    Deterministic,
    Random,
    Lhs,
    Bounding,
    Sensitivity,
}

impl FromStr for SampleType {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deterministic" | "det" => Ok(SampleType::Deterministic),
            "random" | "rand" => Ok(SampleType::Random),
            "lhs" => Ok(SampleType::Lhs),
            "bounding" | "bound" => Ok(SampleType::Bounding),
            "sensitivity" | "sam" => Ok(SampleType::Sensitivity),
            other => Err(PipelineError::Config(format!("unknown sample type '{other}'"))),
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleType::Deterministic => write!(f, "deterministic"),
            SampleType::Random => write!(f, "random"),
            SampleType::Lhs => write!(f, "lhs"),
            SampleType::Bounding => write!(f, "bounding"),
            SampleType::Sensitivity => write!(f, "sensitivity"),
        }
    }
}
