//! # Engine Module
//!
//! The stateful layer of the sampler: it mutates a [`Polymer`](crate::core::models::polymer::Polymer)
//! through pivot moves and drives long Monte Carlo sweeps over it.
//!
//! ## Architecture
//!
//! - **Pivot Moves** ([`pivot`]) - A single pivot attempt with strict self-avoidance or
//!   Metropolis acceptance, committing the candidate only when accepted
//! - **Mixing** ([`mixing`]) - The sweep loop drawing pivot sites and symmetry operators,
//!   with cooperative cancellation and acceptance statistics
//! - **Configuration** ([`config`]) - Sweep and sampling settings with builder validation
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! Every stochastic operation takes the random source as an explicit `&mut impl Rng`,
//! so a seeded generator reproduces a run exactly.

pub mod config;
pub mod error;
pub mod mixing;
pub mod pivot;
pub mod progress;
pub(crate) mod utils;
