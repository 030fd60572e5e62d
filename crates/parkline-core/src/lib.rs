//! Parkline Core -- shared primitives for the park-building action core.
//!
//! Everything the action layer and its collaborators agree on lives here:
//!
//! - [`fixed::Money`] -- Q32.32 fixed-point currency for deterministic costs.
//! - [`id`] -- style ids, ride entry indices, ride ids.
//! - [`registry::ObjectRegistry`] -- immutable registry of loaded objects
//!   (terrain surfaces and edges, ride entries, scenery) plus the repository
//!   of installed ride objects.
//! - [`strings::StringId`] -- localizable message ids carried by results.
//! - [`hash::StateHash`] -- FNV-1a hashing used to compare peer state.

pub mod fixed;
pub mod hash;
pub mod id;
pub mod registry;
pub mod strings;
