//! # Workflows Module
//!
//! High-level entry points that tie the `engine` and `core` layers together into
//! complete simulation procedures.
//!
//! - **Sampling Workflow** ([`sample`]) - Burn-in followed by periodic measurement of
//!   energy, end-to-end distance and contact statistics.

pub mod sample;
