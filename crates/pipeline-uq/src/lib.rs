//! Sampling of uncertain inputs.
//!
//! Aleatory and epistemic variables are sampled on separate axes and
//! crossed into one ensemble, aleatory fastest.

pub mod distributions;
pub mod lhs;
pub mod sample_sheet;
pub mod study;
