// ─────────────────────────────────────────────────────────────────────
// H2 Pipeline Life — Input Distributions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Probability distributions of uncertain inputs.
//!
//! Direct draws go through `rand_distr`; quantiles (`ppf`) through
//! `statrs` inverse CDFs.

use ndarray::Array1;
use pipeline_types::config::DistributionSpec;
use pipeline_types::error::{PipelineError, PipelineResult};
use rand::Rng;
use rand_distr::{
    Beta as BetaSampler, Distribution, LogNormal as LogNormalSampler, Normal as NormalSampler,
    Uniform,
};
use statrs::distribution::{Beta, ContinuousCDF, LogNormal, Normal};
use std::fmt;

#[derive(Debug, Clone)]
enum Kind {
    Normal {
        sampler: NormalSampler<f64>,
        cdf: Normal,
    },
    LogNormal {
        sampler: LogNormalSampler<f64>,
        cdf: LogNormal,
    },
    TruncNormal {
        cdf: Normal,
        lower: f64,
        upper: f64,
        p_lower: f64,
        p_upper: f64,
    },
    Uniform {
        lower: f64,
        upper: f64,
    },
    Beta {
        sampler: BetaSampler<f64>,
        cdf: Beta,
    },
}

/// Validated distribution of one input.
#[derive(Debug, Clone)]
pub struct UncertaintyDistribution {
    spec: DistributionSpec,
    kind: Kind,
}

fn invalid(name: &str, err: impl fmt::Display) -> PipelineError {
    PipelineError::Config(format!("invalid distribution for '{name}': {err}"))
}

fn require_positive(name: &str, label: &str, value: f64) -> PipelineResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, format!("{label} must be positive, got {value}")))
    }
}

impl UncertaintyDistribution {
    /// `name` only labels error messages.
    pub fn from_spec(name: &str, spec: &DistributionSpec) -> PipelineResult<Self> {
        let kind = match *spec {
            DistributionSpec::Normal {
                mean,
                std_deviation,
            } => {
                require_positive(name, "std_deviation", std_deviation)?;
                Kind::Normal {
                    sampler: NormalSampler::new(mean, std_deviation).map_err(|e| invalid(name, e))?,
                    cdf: Normal::new(mean, std_deviation).map_err(|e| invalid(name, e))?,
                }
            }
            DistributionSpec::LogNormal { mu, sigma } => {
                require_positive(name, "sigma", sigma)?;
                Kind::LogNormal {
                    sampler: LogNormalSampler::new(mu, sigma).map_err(|e| invalid(name, e))?,
                    cdf: LogNormal::new(mu, sigma).map_err(|e| invalid(name, e))?,
                }
            }
            DistributionSpec::TruncNormal {
                mean,
                std_deviation,
                lower_bound,
                upper_bound,
            } => {
                require_positive(name, "std_deviation", std_deviation)?;
                if !(lower_bound < upper_bound) {
                    return Err(invalid(
                        name,
                        format!("lower bound {lower_bound} is not below upper bound {upper_bound}"),
                    ));
                }
                let cdf = Normal::new(mean, std_deviation).map_err(|e| invalid(name, e))?;
                Kind::TruncNormal {
                    cdf,
                    lower: lower_bound,
                    upper: upper_bound,
                    p_lower: cdf.cdf(lower_bound),
                    p_upper: cdf.cdf(upper_bound),
                }
            }
            DistributionSpec::Uniform {
                lower_bound,
                upper_bound,
            } => {
                if !(lower_bound <= upper_bound) {
                    return Err(invalid(
                        name,
                        format!("lower bound {lower_bound} is greater than upper bound {upper_bound}"),
                    ));
                }
                Kind::Uniform {
                    lower: lower_bound,
                    upper: upper_bound,
                }
            }
            DistributionSpec::Beta { a, b } => {
                require_positive(name, "a", a)?;
                require_positive(name, "b", b)?;
                Kind::Beta {
                    sampler: BetaSampler::new(a, b).map_err(|e| invalid(name, e))?,
                    cdf: Beta::new(a, b).map_err(|e| invalid(name, e))?,
                }
            }
        };
        Ok(UncertaintyDistribution {
            spec: spec.clone(),
            kind,
        })
    }

    pub fn spec(&self) -> &DistributionSpec {
        &self.spec
    }

    /// `n` independent draws.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Array1<f64> {
        match &self.kind {
            Kind::Normal { sampler, .. } => Array1::from_shape_fn(n, |_| sampler.sample(rng)),
            Kind::LogNormal { sampler, .. } => Array1::from_shape_fn(n, |_| sampler.sample(rng)),
            Kind::Beta { sampler, .. } => Array1::from_shape_fn(n, |_| sampler.sample(rng)),
            Kind::Uniform { lower, upper } => {
                let uniform = Uniform::new_inclusive(*lower, *upper);
                Array1::from_shape_fn(n, |_| uniform.sample(rng))
            }
            Kind::TruncNormal { .. } => Array1::from_shape_fn(n, |_| self.ppf(rng.gen::<f64>())),
        }
    }

    /// Quantile at cumulative probability `p`.
    pub fn ppf(&self, p: f64) -> f64 {
        match &self.kind {
            Kind::Normal { cdf, .. } => cdf.inverse_cdf(p),
            Kind::LogNormal { cdf, .. } => cdf.inverse_cdf(p),
            Kind::Beta { cdf, .. } => cdf.inverse_cdf(p),
            Kind::Uniform { lower, upper } => lower + p * (upper - lower),
            Kind::TruncNormal {
                cdf,
                lower,
                upper,
                p_lower,
                p_upper,
            } => {
                let q = p_lower + p * (p_upper - p_lower);
                cdf.inverse_cdf(q).clamp(*lower, *upper)
            }
        }
    }

    pub fn ppf_array(&self, p: &Array1<f64>) -> Array1<f64> {
        p.mapv(|p| self.ppf(p))
    }
}
