//! Simulation configuration
//!
//! Every named parameter the core consumes, with defaults matching a 250px
//! hexagon centered in an 800x600 view. Screen coordinates: +y points down.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::geometry;
use crate::sim::{ContactParams, Physics};

/// All tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Ball ===
    pub ball_radius: f32,
    pub initial_position: Vec2,
    pub initial_velocity: Vec2,

    // === Forces ===
    /// Constant acceleration (units/s²)
    pub gravity: Vec2,
    /// Linear damping coefficient (1/s)
    pub air_friction: f32,

    // === Contact ===
    pub restitution: f32,
    pub friction: f32,
    pub collision_iteration_cap: u32,
    pub penetration_epsilon: f32,

    // === Boundary ===
    pub boundary_center: Vec2,
    /// Center-to-vertex distance
    pub boundary_radius: f32,
    pub num_sides: u32,
    /// Fixed rotation added to every vertex (radians)
    pub phase_offset: f32,
    /// Spin rate (radians/s)
    pub angular_velocity: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        let center = Vec2::new(400.0, 300.0);
        Self {
            ball_radius: 15.0,
            initial_position: center,
            initial_velocity: Vec2::ZERO,

            gravity: Vec2::new(0.0, 500.0),
            air_friction: 0.0,

            restitution: 0.9,
            friction: 0.1,
            collision_iteration_cap: 5,
            penetration_epsilon: 1.0e-3,

            boundary_center: center,
            boundary_radius: 250.0,
            num_sides: 6,
            phase_offset: 0.0,
            angular_velocity: 0.5,
        }
    }
}

impl SimConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let vectors = [
            ("initial_position", self.initial_position),
            ("initial_velocity", self.initial_velocity),
            ("gravity", self.gravity),
            ("boundary_center", self.boundary_center),
        ];
        if let Some(&(field, _)) = vectors.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite { field });
        }
        let scalars = [
            ("ball_radius", self.ball_radius),
            ("air_friction", self.air_friction),
            ("restitution", self.restitution),
            ("friction", self.friction),
            ("penetration_epsilon", self.penetration_epsilon),
            ("boundary_radius", self.boundary_radius),
            ("phase_offset", self.phase_offset),
            ("angular_velocity", self.angular_velocity),
        ];
        if let Some(&(field, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite { field });
        }

        if self.ball_radius <= 0.0 {
            return Err(ConfigError::BallRadius(self.ball_radius));
        }
        if self.boundary_radius <= 0.0 {
            return Err(ConfigError::BoundaryRadius(self.boundary_radius));
        }
        if self.num_sides < 3 {
            return Err(ConfigError::TooFewSides(self.num_sides));
        }
        for (field, value) in [("restitution", self.restitution), ("friction", self.friction)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { field, value });
            }
        }
        if self.air_friction < 0.0 {
            return Err(ConfigError::NegativeAirFriction(self.air_friction));
        }
        if self.collision_iteration_cap == 0 {
            return Err(ConfigError::ZeroIterationCap);
        }
        if self.penetration_epsilon < 0.0 {
            return Err(ConfigError::NegativeEpsilon(self.penetration_epsilon));
        }
        Ok(())
    }

    /// Distance from the boundary center to the middle of an edge
    pub fn inradius(&self) -> f32 {
        geometry::inradius(self.boundary_radius, self.num_sides)
    }

    /// False when the ball is too large to be fully contained
    pub fn fits_inside(&self) -> bool {
        self.ball_radius < self.inradius()
    }

    pub fn contact_params(&self) -> ContactParams {
        ContactParams {
            restitution: self.restitution,
            friction: self.friction,
            iteration_cap: self.collision_iteration_cap,
            penetration_epsilon: self.penetration_epsilon,
        }
    }

    pub fn physics(&self) -> Physics {
        Physics {
            gravity: self.gravity,
            air_friction: self.air_friction,
        }
    }
}
