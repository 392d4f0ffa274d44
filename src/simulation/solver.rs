//! Frame-driven solver owning every body
//!
//! One `update(dt)` call per external frame:
//! 1. rebuild the spatial grid from current positions (skip if empty)
//! 2. for each of `substeps` substeps of length `dt / substeps`:
//!    a. resolve every candidate pair of the 3x3 grid sweep
//!    b. per body: accumulate forces, clamp into the boundary, integrate
//!
//! The grid is built once per frame and reused by all substeps.
//! `update` runs to completion before returning; nothing observes
//! intermediate substep state.

use std::collections::BTreeSet;

use log::{debug, trace};

use crate::simulation::arena::BodyArena;
use crate::simulation::collision::{brute_force_pairs, grid_pairs, overlap, resolve_pair};
use crate::simulation::constraint::{BoundingCircle, DEFAULT_FILL};
use crate::simulation::forces::{AccelSet, Acceleration, UniformGravity};
use crate::simulation::grid::SpatialGrid;
use crate::simulation::integrator::integrate_bodies;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, BodyError, BodyId, BodySnapshot, NVec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Idle,     // no bodies
    Stepping, // at least one body
}

pub struct Solver {
    bodies: BodyArena,
    bounds: BoundingCircle,
    parameters: Parameters,
    forces: AccelSet,
    grid: SpatialGrid,
}

impl Solver {
    /// Solver with the default constants (8 substeps, gravity (0, 9.8))
    pub fn new(bounds: BoundingCircle) -> Self {
        Self::with_parameters(bounds, Parameters::default())
    }

    /// Boundary centred in a window, radius `0.45 * min(width, height)`
    pub fn for_window(width: u32, height: u32) -> Self {
        Self::new(BoundingCircle::from_window(width, height, DEFAULT_FILL))
    }

    pub fn with_parameters(bounds: BoundingCircle, parameters: Parameters) -> Self {
        debug_assert!(parameters.substeps > 0, "solver needs at least one substep");

        let forces = AccelSet::new().with(UniformGravity { g: parameters.gravity });
        debug!(
            "solver: bounds center=({:.1}, {:.1}) radius={:.1}, substeps={}, gravity=({}, {})",
            bounds.center.x, bounds.center.y, bounds.radius,
            parameters.substeps, parameters.gravity.x, parameters.gravity.y,
        );

        Self {
            bodies: BodyArena::new(),
            bounds,
            parameters,
            forces,
            grid: SpatialGrid::new(),
        }
    }

    /// Register an extra acceleration term next to gravity
    pub fn with_force<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.forces.push(term);
        self
    }

    /// Add a body at rest
    pub fn add_body(&mut self, position: NVec2, radius: f64) -> Result<BodyId, BodyError> {
        self.add_moving_body(position, NVec2::zeros(), radius)
    }

    /// Add a body already displacing by `velocity` per substep
    pub fn add_moving_body(&mut self, position: NVec2, velocity: NVec2, radius: f64) -> Result<BodyId, BodyError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(BodyError::InvalidRadius(radius));
        }
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(BodyError::InvalidPosition(position.x, position.y));
        }
        if !(velocity.x.is_finite() && velocity.y.is_finite()) {
            return Err(BodyError::InvalidVelocity(velocity.x, velocity.y));
        }

        let id = self.bodies.insert(Body::with_velocity(position, velocity, radius));
        trace!("add {id} at ({:.2}, {:.2}) r={radius}", position.x, position.y);
        Ok(id)
    }

    /// Remove a body; unknown or stale ids are a no-op returning `None`
    pub fn remove_body(&mut self, id: BodyId) -> Option<BodySnapshot> {
        let removed = self.bodies.remove(id)?;
        trace!("remove {id}");
        Some(removed.snapshot())
    }

    pub fn get_body(&self, id: BodyId) -> Option<BodySnapshot> {
        self.bodies.get(id).map(Body::snapshot)
    }

    /// Full Verlet state, for diagnostics
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.get(id).is_some()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.bodies.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.grid.clear();
    }

    pub fn state(&self) -> SolverState {
        if self.bodies.is_empty() {
            SolverState::Idle
        } else {
            SolverState::Stepping
        }
    }

    pub fn bounds(&self) -> &BoundingCircle {
        &self.bounds
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Grid as built by the last `update` (or `collision_pairs`)
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Advance every body by one frame of length `dt`.
    ///
    /// `dt` must be finite and non-negative. `dt == 0` is a no-op.
    pub fn update(&mut self, dt: f64) {
        debug_assert!(dt.is_finite() && dt >= 0.0, "update called with dt = {dt}");
        if dt == 0.0 {
            return;
        }

        let Some(range) = self.grid.rebuild(self.bounds.origin(), self.bodies.occupied()) else {
            return;
        };

        trace!(
            "update dt={dt:.5}: {} bodies in {} cells (cell size {}, radii {}..{})",
            self.bodies.len(), self.grid.len(), self.grid.cell_size(), range.min, range.max,
        );

        let sub_dt = self.parameters.sub_dt(dt);
        for _ in 0..self.parameters.substeps {
            self.resolve_collisions(sub_dt);
            integrate_bodies(&mut self.bodies, &self.forces, &self.bounds, self.parameters.damping, sub_dt);
        }
    }

    /// Overlapping pairs found through a grid built from current positions
    pub fn collision_pairs(&mut self) -> BTreeSet<(BodyId, BodyId)> {
        self.grid.rebuild(self.bounds.origin(), self.bodies.occupied());
        let bodies = &self.bodies;
        let pairs = grid_pairs(&self.grid, |i| bodies.slot(i));
        self.to_id_pairs(pairs)
    }

    /// Overlapping pairs found by testing every pair
    pub fn brute_force_collision_pairs(&self) -> BTreeSet<(BodyId, BodyId)> {
        let pairs = brute_force_pairs(self.bodies.occupied());
        self.to_id_pairs(pairs)
    }

    /// Largest distance any body sits past its boundary limit (<= 0 if all inside)
    pub fn max_boundary_excess(&self) -> f64 {
        self.bodies
            .iter()
            .map(|(_, b)| self.bounds.excess(b))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Deepest penetration among all pairs, 0 when nothing overlaps
    pub fn max_overlap(&self) -> f64 {
        let bodies: Vec<&Body> = self.bodies.iter().map(|(_, b)| b).collect();
        let mut deepest = 0.0_f64;
        for (n, a) in bodies.iter().enumerate() {
            for b in &bodies[n + 1..] {
                if let Some(depth) = overlap(a, b) {
                    deepest = deepest.max(depth);
                }
            }
        }
        deepest
    }

    fn resolve_collisions(&mut self, sub_dt: f64) {
        let correction = self.parameters.correction;
        let bodies = &mut self.bodies;

        self.grid.for_each_candidate_pair(|i, j| {
            if let Some((a, b)) = bodies.pair_mut(i, j) {
                resolve_pair(a, b, sub_dt, correction);
            }
        });
    }

    fn to_id_pairs(&self, pairs: BTreeSet<(usize, usize)>) -> BTreeSet<(BodyId, BodyId)> {
        pairs
            .into_iter()
            .filter_map(|(i, j)| Some((self.bodies.id_at(i)?, self.bodies.id_at(j)?)))
            .collect()
    }
}
