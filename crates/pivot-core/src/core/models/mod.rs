//! # Core Models Module
//!
//! Data structures describing a lattice polymer.
//!
//! - [`point`] - Integer lattice sites of arbitrary dimension
//! - [`polymer`] - The chain model with its read-only geometric queries
//! - [`builder`] - Validated construction from a step count or an explicit path
//!
//! ```ignore
//! use pivotwalk::core::models::builder::PolymerBuilder;
//! use pivotwalk::core::energy::model::SpeciesKind;
//!
//! let polymer = PolymerBuilder::new()
//!     .steps(100)
//!     .species(SpeciesKind::Mixed)
//!     .repulsion(2.0)
//!     .attraction(0.5)
//!     .build()?;
//! ```

pub mod builder;
pub mod point;
pub mod polymer;
