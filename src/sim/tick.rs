//! Fixed-order simulation tick
//!
//! One tick: spin the boundary, apply gravity and damping, integrate with
//! semi-implicit Euler, then resolve contacts against the rotated edges.
//! The order matters; the resolver must see the post-rotation walls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use super::collision::{CollisionBackend, ContactParams, ResolveReport, SequentialResolver};
use super::state::{Ball, SimState, Snapshot};
use crate::config::SimConfig;
use crate::error::ConfigError;

/// Body forces acting on the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    pub gravity: Vec2,
    /// Linear damping coefficient (1/s)
    pub air_friction: f32,
}

/// Advance the simulation state by one timestep
///
/// A non-finite or non-positive `dt` is skipped rather than corrupting state.
pub fn tick<B: CollisionBackend + ?Sized>(
    state: &mut SimState,
    physics: &Physics,
    contact: &ContactParams,
    backend: &B,
    dt: f32,
) -> ResolveReport {
    if !dt.is_finite() || dt <= 0.0 {
        log::warn!("Skipping tick {} with invalid dt {dt}", state.time_ticks);
        return ResolveReport::default();
    }

    state.boundary.advance(dt);

    let ball = &mut state.ball;
    ball.vel += physics.gravity * dt;
    ball.vel *= (1.0 - physics.air_friction * dt).max(0.0);
    ball.pos += ball.vel * dt;

    let report = backend.resolve(ball, &state.boundary, contact);
    state.time_ticks += 1;
    report
}

/// Owns the ball, the boundary and the collision backend for a whole run
#[derive(Debug, Clone)]
pub struct Simulation<B: CollisionBackend = SequentialResolver> {
    state: SimState,
    physics: Physics,
    contact: ContactParams,
    backend: B,
}

impl Simulation<SequentialResolver> {
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        Self::with_backend(config, SequentialResolver)
    }
}

impl<B: CollisionBackend> Simulation<B> {
    pub fn with_backend(config: &SimConfig, backend: B) -> Result<Self, ConfigError> {
        config.validate()?;

        if !config.fits_inside() {
            log::warn!(
                "Ball radius {} exceeds boundary inradius {:.2}; containment is not guaranteed",
                config.ball_radius,
                config.inradius()
            );
        }

        let ball = Ball::new(config.initial_position, config.initial_velocity, config.ball_radius);
        let boundary = Boundary::new(
            config.boundary_center,
            config.boundary_radius,
            config.num_sides,
            config.angular_velocity,
        )
        .with_phase(config.phase_offset);

        log::info!(
            "Simulation ready: {}-gon r={} ω={} ball r={}",
            config.num_sides,
            config.boundary_radius,
            config.angular_velocity,
            config.ball_radius
        );

        Ok(Self {
            state: SimState::new(ball, boundary),
            physics: config.physics(),
            contact: config.contact_params(),
            backend,
        })
    }

    /// Run one complete tick, including every resolver sweep
    pub fn advance_tick(&mut self, dt: f32) -> ResolveReport {
        tick(&mut self.state, &self.physics, &self.contact, &self.backend, dt)
    }

    pub fn ball(&self) -> &Ball {
        &self.state.ball
    }

    pub fn boundary(&self) -> &Boundary {
        &self.state.boundary
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn vertices(&self) -> Vec<Vec2> {
        self.state.boundary.vertices()
    }

    pub fn time_ticks(&self) -> u64 {
        self.state.time_ticks
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        self.state.boundary.set_angular_velocity(angular_velocity);
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.state.ball.kinetic_energy()
    }
}
