//! Damped position-Verlet integration
//!
//! Per body and substep: `accelerate` collects force terms, `integrate`
//! advances position from the implicit velocity, and
//! [`integrate_bodies`] runs the whole per-substep body pass.

use super::arena::BodyArena;
use super::constraint::BoundingCircle;
use super::forces::AccelSet;
use super::states::{Body, NVec2};

impl Body {
    /// Add `force` to the acceleration accumulated for the current step.
    /// Calls within one step sum up.
    pub fn accelerate(&mut self, force: NVec2) {
        self.acceleration += force;
    }

    /// Advance one step of length `dt`:
    ///
    /// displacement = (x - x_prev) * damping + a * dt
    /// x_prev = x, x += displacement, a = 0
    ///
    /// The acceleration term is scaled by `dt`, not `dt^2`; the correction
    /// and damping constants are tuned for this form.
    pub fn integrate(&mut self, dt: f64, damping: f64) {
        let displacement = (self.position - self.previous) * damping + self.acceleration * dt;

        self.previous = self.position;
        self.position += displacement;
        self.acceleration = NVec2::zeros();
    }
}

/// Body half of one substep: for every body, sum the force terms, clamp it
/// into `bounds`, then integrate by `sub_dt`.
pub fn integrate_bodies(bodies: &mut BodyArena, forces: &AccelSet, bounds: &BoundingCircle, damping: f64, sub_dt: f64) {
    for (_, b) in bodies.iter_mut() {
        forces.apply(b);
        bounds.constrain(b);
        b.integrate(sub_dt, damping);
    }
}
