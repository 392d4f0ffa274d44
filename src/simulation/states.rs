//! Core state types for the circle solver.
//!
//! Defines:
//! - `Body`         one circular point-mass with Verlet state
//! - `BodyId`       opaque handle into the solver's body arena
//! - `BodySnapshot` read-only copy handed to renderers
//!
//! Velocity is never stored. It is implicit in `position - previous`.

use std::fmt;

use nalgebra::Vector2;

pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub(crate) position: NVec2,     // current position
    pub(crate) previous: NVec2,     // position one integration step ago
    pub(crate) acceleration: NVec2, // summed contributions, zeroed by integrate
    radius: f64,                    // fixed at creation
}

impl Body {
    /// A body at rest: previous position equals the initial position.
    pub fn new(position: NVec2, radius: f64) -> Self {
        Self {
            position,
            previous: position,
            acceleration: NVec2::zeros(),
            radius,
        }
    }

    /// A body already moving by `velocity` per step
    pub fn with_velocity(position: NVec2, velocity: NVec2, radius: f64) -> Self {
        Self {
            previous: position - velocity,
            ..Self::new(position, radius)
        }
    }

    pub fn position(&self) -> NVec2 {
        self.position
    }

    pub fn previous_position(&self) -> NVec2 {
        self.previous
    }

    pub fn acceleration(&self) -> NVec2 {
        self.acceleration
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Displacement over the last integration step
    pub fn velocity(&self) -> NVec2 {
        self.position - self.previous
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            position: self.position,
            radius: self.radius,
        }
    }
}

/// What a renderer needs to draw one body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub position: NVec2,
    pub radius: f64,
}

/// Handle to a body owned by a `Solver`.
///
/// Unique within one solver for its whole lifetime: a removed body's slot can
/// be reused, but the generation changes so the old handle stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl BodyId {
    /// Slot index inside the arena, the same index the spatial grid stores
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}v{}", self.index, self.generation)
    }
}

/// Rejections from `Solver::add_body`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyError {
    InvalidRadius(f64),
    InvalidPosition(f64, f64),
    InvalidVelocity(f64, f64),
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::InvalidRadius(r) => write!(f, "body radius must be finite and > 0, got {r}"),
            BodyError::InvalidPosition(x, y) => write!(f, "body position must be finite, got ({x}, {y})"),
            BodyError::InvalidVelocity(x, y) => write!(f, "body velocity must be finite, got ({x}, {y})"),
        }
    }
}

impl std::error::Error for BodyError {}
