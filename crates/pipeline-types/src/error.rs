use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Value out of bounds for '{name}': {message}")]
    Bounds { name: String, message: String },

    #[error("Unknown crack growth model: {0}")]
    UnknownModel(String),

    #[error("Invalid crack growth rule: {0}")]
    InvalidGrowthRule(String),

    #[error("Invalid crack surface: {0}")]
    InvalidSurface(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Inconsistent dimensions: {0}")]
    InconsistentDimensions(String),

    #[error("Duplicate parameter name: {0}")]
    DuplicateName(String),

    #[error("Inconsistent sampling: {0}")]
    InconsistentSampling(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hoop stress {hoop_stress:.2} MPa exceeds allowable stress {allowable:.2} MPa")]
    AllowableStressExceeded { hoop_stress: f64, allowable: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
