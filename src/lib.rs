//! Polybounce - a ball bouncing inside a spinning regular polygon
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, boundary, collisions, stepping)
//! - `config`: Named simulation parameters with JSON loading and validation
//! - `error`: Configuration errors

pub mod config;
pub mod error;
pub mod sim;

pub use config::SimConfig;
pub use error::ConfigError;
pub use sim::{
    AveragedResolver, Ball, Boundary, CollisionBackend, ResolveReport, SequentialResolver,
    Simulation, Snapshot,
};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the fixed-step driver will try to catch up on
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Below this length a contact offset is treated as zero
    pub const NORMAL_EPSILON: f32 = 1.0e-6;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    if !angle.is_finite() {
        return 0.0;
    }
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
