//! Acceleration contributors for the circle solver
//!
//! Each term implements [`Acceleration`] and is evaluated once per body per
//! substep. Contributions are summed into the body's accumulator through
//! `Body::accelerate`, never overwritten.

use crate::simulation::states::{Body, NVec2};

/// Collection of acceleration terms (gravity, attractors, etc.)
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn push<T>(&mut self, term: T)
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Feed every term's contribution into `body`'s accumulator
    pub fn apply(&self, body: &mut Body) {
        for term in &self.terms {
            let a = term.acceleration(body);
            body.accelerate(a);
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for acceleration sources acting on a single [`Body`]
pub trait Acceleration {
    fn acceleration(&self, body: &Body) -> NVec2;
}

/// Constant field, the same for every body
pub struct UniformGravity {
    pub g: NVec2,
}

impl Acceleration for UniformGravity {
    fn acceleration(&self, _body: &Body) -> NVec2 {
        self.g
    }
}

/// Constant-magnitude pull toward a fixed point.
/// A body sitting exactly on `center` feels nothing.
pub struct PointAttractor {
    pub center: NVec2,
    pub strength: f64,
}

impl Acceleration for PointAttractor {
    fn acceleration(&self, body: &Body) -> NVec2 {
        let r = self.center - body.position();
        let dist = r.norm();
        if dist == 0.0 {
            return NVec2::zeros();
        }
        r * (self.strength / dist)
    }
}
