//! # Core Module
//!
//! Stateless building blocks of the pivot sampler: lattice points, the
//! polymer model and its construction, the species energy models, and the
//! lattice symmetry operators that pivot moves apply.
//!
//! ## Architecture
//!
//! - **Lattice Representation** ([`models`]) - Points, the [`models::polymer::Polymer`]
//!   chain model and its builder
//! - **Energy Evaluation** ([`energy`]) - Species-keyed energy functions and pair counting
//! - **Lattice Symmetries** ([`symmetry`]) - Signed permutation operators and their
//!   uniform random generation
//! - **Geometry** ([`utils`]) - `L^p` norms used by the distance queries
//! - **Errors** ([`error`]) - Construction-time configuration errors
//!
//! Nothing in this module performs I/O or holds shared mutable state.

pub mod energy;
pub mod error;
pub mod models;
pub mod symmetry;
pub mod utils;
