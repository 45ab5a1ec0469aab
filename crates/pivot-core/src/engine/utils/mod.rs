//! Utility functions for the engine module.
//!
//! Random draws shared by the pivot engine and the mixing driver: the
//! Metropolis acceptance test and the pivot site sampler.

pub mod sampling;
