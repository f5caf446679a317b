//! End-to-end crack evolution analysis: sample inputs, build the
//! specifications, integrate crack growth and extract life criteria.

pub mod analysis;
pub mod derived;
pub mod summary;
