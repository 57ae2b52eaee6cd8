//! Domain layer for the tour guide
//!
//! Contains the navigation vocabulary: coordinates and great-circle distance,
//! points of interest, routes with maneuvers, and derived guidance state.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
