//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - No randomness
//! - Fixed edge iteration order
//! - No rendering or platform dependencies

pub mod boundary;
pub mod collision;
pub mod geometry;
pub mod state;
pub mod tick;

pub use boundary::Boundary;
pub use collision::{
    AveragedResolver, CollisionBackend, Contact, ContactParams, ResolveReport, SequentialResolver,
    detect_contact, penetration_into, respond,
};
pub use geometry::{Edge, closest_point_on_segment, inradius, polygon_vertices};
pub use state::{Ball, SimState, Snapshot};
pub use tick::{Physics, Simulation, tick};
