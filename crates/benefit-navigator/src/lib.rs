//! Incremental eligibility screening for German social-benefit programs.

pub mod config;
pub mod eligibility;
pub mod error;
pub mod telemetry;
