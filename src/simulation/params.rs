//! Numerical and physical parameters for the solver
//!
//! `Parameters` holds runtime settings:
//! - number of substeps each frame is split into,
//! - the uniform gravity vector (screen coordinates, +y points down),
//! - Verlet damping applied to the implicit velocity,
//! - the positional correction gain used by the collision resolver

use crate::simulation::states::NVec2;

pub const DEFAULT_SUBSTEPS: usize = 8;
pub const DEFAULT_GRAVITY: [f64; 2] = [0.0, 9.8];
pub const DEFAULT_DAMPING: f64 = 0.99;
pub const DEFAULT_CORRECTION: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub substeps: usize, // substeps per update
    pub gravity: NVec2, // constant acceleration applied every substep
    pub damping: f64, // scales carried-over displacement, in (0, 1]
    pub correction: f64, // overlap push gain, multiplied by the substep length
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            substeps: DEFAULT_SUBSTEPS,
            gravity: NVec2::new(DEFAULT_GRAVITY[0], DEFAULT_GRAVITY[1]),
            damping: DEFAULT_DAMPING,
            correction: DEFAULT_CORRECTION,
        }
    }
}

impl Parameters {
    /// Length of one substep for a frame of length `dt`
    pub fn sub_dt(&self, dt: f64) -> f64 {
        dt / self.substeps.max(1) as f64
    }

    /// Largest per-substep displacement a free body can reach under gravity
    /// alone: the fixed point of `v = damping * v + |g| * sub_dt`.
    pub fn terminal_displacement(&self, dt: f64) -> f64 {
        self.gravity.norm() * self.sub_dt(dt) / (1.0 - self.damping)
    }
}
