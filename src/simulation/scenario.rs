//! Build a runnable scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle:
//! - the `Solver` with every configured and spawned body registered
//! - render colors keyed by `BodyId`, owned here for the viewer rather than
//!   by the solver
//! - the window size a viewer should open with
//!
//! With the `viewer` feature the scenario is a Bevy `Resource`, inserted
//! into the app and driven once per frame.

use std::collections::HashMap;
use std::f64::consts::TAU;

use anyhow::{Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{ScenarioConfig, SpawnConfig};
use crate::simulation::constraint::BoundingCircle;
use crate::simulation::solver::Solver;
use crate::simulation::states::{BodyId, NVec2};

pub type Rgb = [u8; 3];

#[cfg_attr(feature = "viewer", derive(bevy::prelude::Resource))]
pub struct Scenario {
    pub solver: Solver,
    pub colors: HashMap<BodyId, Rgb>,
    pub window: (u32, u32),
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        cfg.validate().context("invalid scenario")?;

        let bounds = cfg.bounds.to_bounds();
        let parameters = cfg.solver.to_parameters();
        let mut solver = Solver::with_parameters(bounds, parameters);
        let mut colors = HashMap::new();

        let mut rng = match cfg.spawn.as_ref().and_then(|s| s.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Hand-placed bodies first, in file order
        for (i, bc) in cfg.bodies.iter().enumerate() {
            let velocity = bc.v.map_or(NVec2::zeros(), |v| NVec2::new(v[0], v[1]));
            let id = solver
                .add_moving_body(NVec2::new(bc.x[0], bc.x[1]), velocity, bc.radius)
                .with_context(|| format!("adding body {i}"))?;
            colors.insert(id, bc.color.unwrap_or_else(|| rng.gen()));
        }

        if let Some(spawn) = &cfg.spawn {
            for (pos, radius) in spawn_layout(spawn, &bounds, &mut rng) {
                let id = solver.add_body(pos, radius).context("adding spawned body")?;
                colors.insert(id, rng.gen());
            }
        }

        info!("scenario: {} bodies, bounding radius {:.1}", solver.len(), bounds.radius);

        Ok(Self {
            solver,
            colors,
            window: cfg.bounds.window_size(),
        })
    }

    pub fn color_of(&self, id: BodyId) -> Option<Rgb> {
        self.colors.get(&id).copied()
    }

    /// Add a body and remember its color
    pub fn add_colored(&mut self, position: NVec2, radius: f64, color: Rgb) -> Option<BodyId> {
        let id = self.solver.add_body(position, radius).ok()?;
        self.colors.insert(id, color);
        Some(id)
    }

    /// Remove a body together with its color
    pub fn remove(&mut self, id: BodyId) -> bool {
        self.colors.remove(&id);
        self.solver.remove_body(id).is_some()
    }
}

/// Positions and radii for a random population: a uniform random angle and a
/// uniform random distance up to half the bounding radius from the center,
/// with integer radii drawn from `[min_radius, max_radius)`.
pub fn spawn_layout<R: Rng>(spawn: &SpawnConfig, bounds: &BoundingCircle, rng: &mut R) -> Vec<(NVec2, f64)> {
    (0..spawn.count)
        .map(|_| {
            let dist = rng.gen::<f64>() * bounds.radius / 2.0;
            let angle = rng.gen::<f64>() * TAU;
            let pos = bounds.center + NVec2::new(angle.cos(), angle.sin()) * dist;
            let radius = rng.gen_range(spawn.min_radius..spawn.max_radius) as f64;
            (pos, radius)
        })
        .collect()
}
