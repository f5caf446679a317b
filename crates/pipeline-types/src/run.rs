// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Run Status, Cancellation and Warnings
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Outcome of a simulation run. Cancellation is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Finished,
    Stopped,
}

/// Cooperative stop flag shared between the caller and a running analysis.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Non-fatal condition raised while solving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// A geometric ratio fell outside the validity range of a solution.
    RatioOutOfRange {
        ratio: String,
        lower: f64,
        upper: f64,
    },
    /// a/t exceeded the limit of the stress-intensity solutions.
    DepthRatioExceeded { limit: f64 },
    /// Fracture resistance was never reached; a_crit fell back to a/t limit.
    CriticalDepthFallback { members: usize },
    /// No active member grew during a step.
    GrowthStalled { total_cycles: f64 },
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::RatioOutOfRange {
                ratio,
                lower,
                upper,
            } => write!(f, "{ratio} outside the valid range [{lower}, {upper}]"),
            AnalysisWarning::DepthRatioExceeded { limit } => {
                write!(f, "a/t exceeds {limit}; stress intensity solution extrapolated")
            }
            AnalysisWarning::CriticalDepthFallback { members } => write!(
                f,
                "fracture resistance not reached for {members} member(s); a_crit set to a/t limit"
            ),
            AnalysisWarning::GrowthStalled { total_cycles } => write!(
                f,
                "crack growth stalled at {total_cycles:.0} cycles; stepping stopped"
            ),
        }
    }
}

/// Deduplicated warning collection. Each warning is logged on first insertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarningLog {
    warnings: Vec<AnalysisWarning>,
}

impl WarningLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: AnalysisWarning) {
        if !self.warnings.contains(&warning) {
            log::warn!("{warning}");
            self.warnings.push(warning);
        }
    }

    pub fn extend<I: IntoIterator<Item = AnalysisWarning>>(&mut self, warnings: I) {
        for w in warnings {
            self.push(w);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisWarning> {
        self.warnings.iter()
    }

    pub fn as_slice(&self) -> &[AnalysisWarning] {
        &self.warnings
    }
}
