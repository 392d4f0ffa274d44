//! Containing circle that every body is clamped into

use crate::simulation::states::{Body, NVec2};

/// Fraction of the smaller window side used as the boundary radius
pub const DEFAULT_FILL: f64 = 0.45;

/// Fixed for the lifetime of a solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCircle {
    pub center: NVec2,
    pub radius: f64,
}

impl BoundingCircle {
    pub fn new(center: NVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Circle centered in a `width` x `height` window, radius
    /// `min(width, height) * fill`. The center uses integer halves of the
    /// window size.
    pub fn from_window(width: u32, height: u32, fill: f64) -> Self {
        let radius = width.min(height) as f64 * fill;
        let center = NVec2::new((width / 2) as f64, (height / 2) as f64);
        Self { center, radius }
    }

    /// Top-left corner of the square enclosing the circle; the grid anchors here
    pub fn origin(&self) -> NVec2 {
        self.center - NVec2::new(self.radius, self.radius)
    }

    /// Furthest distance from `center` a body of `body_radius` may sit at.
    /// Bodies wider than the boundary get pinned to the center.
    pub fn limit(&self, body_radius: f64) -> f64 {
        (self.radius - body_radius).max(0.0)
    }

    /// How far `body` pokes past its limit; negative when inside
    pub fn excess(&self, body: &Body) -> f64 {
        (body.position() - self.center).norm() - self.limit(body.radius())
    }

    /// Project `body` radially back onto its limit when it is outside.
    ///
    /// Only the current position moves, so the correction shows up as
    /// implicit velocity on the next integration. A body exactly on the
    /// center has no direction and is left alone.
    pub fn constrain(&self, body: &mut Body) {
        let offset = body.position - self.center;
        let dist = offset.norm();
        let limit = self.limit(body.radius());

        if dist > limit && dist > 0.0 {
            body.position = self.center + offset * (limit / dist);
        }
    }
}
