//! # pivotwalk
//!
//! Pivot-algorithm Monte Carlo sampling of linear polymers on hypercubic lattices.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Lattice points, the `Polymer` chain model and its
//!   builder, the lattice symmetry group, and the species energy models.
//!
//! - **[`engine`]: The Logic Core.** The pivot move with its strict and Metropolis
//!   acceptance rules, and the `Mixer` that runs cancellable sweeps of pivot attempts.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as equilibrating a chain
//!   and recording observables along the trajectory.
//!
//! ## Example
//!
//! ```
//! use pivotwalk::core::models::builder::PolymerBuilder;
//! use pivotwalk::core::utils::geometry::Norm;
//! use pivotwalk::engine::mixing::mix;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut polymer = PolymerBuilder::new().steps(50).build()?;
//! let mut rng = StdRng::seed_from_u64(7);
//! let report = mix(&mut polymer, 1_000, &mut rng)?;
//! assert_eq!(report.attempted, 1_000);
//! assert!(polymer.max_distance(Norm::EUCLIDEAN) <= 49.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
