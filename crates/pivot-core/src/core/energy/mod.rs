//! # Energy Module
//!
//! Energy functions keyed by polymer species. Each species is one variant of
//! [`model::EnergyModel`]; interaction counts shared by the soft species live
//! in [`contacts`].
//!
//! Intersections are unordered point pairs occupying the same site. Contacts
//! are unordered pairs at Manhattan distance one that are not bonded
//! neighbours along the chain.

pub mod contacts;
pub mod model;
