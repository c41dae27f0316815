//! Error types
//!
//! Only configuration can fail. A physics tick never returns an error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::SimConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    #[error("ball_radius must be positive, got {0}")]
    BallRadius(f32),

    #[error("boundary_radius must be positive, got {0}")]
    BoundaryRadius(f32),

    #[error("num_sides must be at least 3, got {0}")]
    TooFewSides(u32),

    #[error("{field} must be within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("air_friction must not be negative, got {0}")]
    NegativeAirFriction(f32),

    #[error("collision_iteration_cap must be at least 1")]
    ZeroIterationCap,

    #[error("penetration_epsilon must not be negative, got {0}")]
    NegativeEpsilon(f32),
}
