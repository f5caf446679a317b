//! Fatigue crack growth physics for pressurised pipe.
//!
//! Specifications ([`pipe`], [`environment`], [`material`], [`defect`])
//! feed a [`stress_state::StressState`]; a
//! [`stress_intensity::StressIntensitySolver`] and a
//! [`crack_growth::CrackGrowth`] law drive the
//! [`cycle_evolution::CycleEvolution`] integrator, whose output is reduced
//! by [`life_criteria`] and [`fracture`].

pub mod crack_growth;
pub mod cycle_evolution;
pub mod defect;
pub mod environment;
pub mod fracture;
pub mod life_criteria;
pub mod material;
pub mod pipe;
pub mod stress_intensity;
pub mod stress_state;
