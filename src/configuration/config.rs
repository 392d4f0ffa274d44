//! Configuration types for loading solver scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`BoundsConfig`] – the containing circle, from a window size or explicitly
//! - [`SolverConfig`] – optional overrides of the solver constants
//! - [`BodyConfig`]   – bodies placed by hand
//! - [`SpawnConfig`]  – a random population placed around the center
//! - [`ScenarioConfig`] – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! bounds:                 # either a window ...
//!   width: 1920
//!   height: 1080
//!   fill: 0.45            # radius = min(width, height) * fill
//! # bounds:               # ... or an explicit circle
//! #   center: [400.0, 300.0]
//! #   radius: 250.0
//!
//! solver:                 # every field optional
//!   substeps: 8
//!   gravity: [0.0, 9.8]   # +y points down the screen
//!   damping: 0.99
//!   correction: 50.0
//!
//! bodies:
//!   - x: [900.0, 500.0]
//!     v: [1.5, 0.0]       # optional, per substep
//!     radius: 12.0
//!     color: [255, 200, 40]
//!
//! spawn:
//!   count: 800
//!   min_radius: 5         # integer radii in [min_radius, max_radius)
//!   max_radius: 15
//!   seed: 42
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::simulation::constraint::{BoundingCircle, DEFAULT_FILL};
use crate::simulation::params::Parameters;
use crate::simulation::states::NVec2;

fn default_fill() -> f64 {
    DEFAULT_FILL
}

fn default_min_radius() -> u32 {
    5
}

fn default_max_radius() -> u32 {
    15
}

/// Containing circle, either derived from a window or given directly
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum BoundsConfig {
    Window {
        width: u32,
        height: u32,
        #[serde(default = "default_fill")]
        fill: f64,
    },
    Circle {
        center: [f64; 2],
        radius: f64,
    },
}

impl BoundsConfig {
    pub fn to_bounds(&self) -> BoundingCircle {
        match *self {
            BoundsConfig::Window { width, height, fill } => BoundingCircle::from_window(width, height, fill),
            BoundsConfig::Circle { center, radius } => BoundingCircle::new(NVec2::new(center[0], center[1]), radius),
        }
    }

    /// Window size for a viewer: the configured one, or a square fitting the circle
    pub fn window_size(&self) -> (u32, u32) {
        match *self {
            BoundsConfig::Window { width, height, .. } => (width, height),
            BoundsConfig::Circle { radius, .. } => {
                let side = (2.0 * radius * 1.1).ceil().max(1.0) as u32;
                (side, side)
            }
        }
    }
}

/// Overrides for the solver constants; anything left out keeps its default
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    pub substeps: Option<usize>,
    pub gravity: Option<[f64; 2]>,
    pub damping: Option<f64>,
    pub correction: Option<f64>,
}

impl SolverConfig {
    pub fn to_parameters(&self) -> Parameters {
        let mut p = Parameters::default();
        if let Some(substeps) = self.substeps {
            p.substeps = substeps;
        }
        if let Some([gx, gy]) = self.gravity {
            p.gravity = NVec2::new(gx, gy);
        }
        if let Some(damping) = self.damping {
            p.damping = damping;
        }
        if let Some(correction) = self.correction {
            p.correction = correction;
        }
        p
    }
}

/// Configuration for a single hand-placed body
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub x: [f64; 2],            // initial position
    pub v: Option<[f64; 2]>,    // initial displacement per substep, at rest when absent
    pub radius: f64,            // fixed for the body's lifetime
    pub color: Option<[u8; 3]>, // render color, random when absent
}

/// Random population, placed within half the boundary radius of the center
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SpawnConfig {
    pub count: usize,
    #[serde(default = "default_min_radius")]
    pub min_radius: u32,
    #[serde(default = "default_max_radius")]
    pub max_radius: u32,
    pub seed: Option<u64>, // fixed seed makes the layout reproducible
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub bounds: BoundsConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
    pub spawn: Option<SpawnConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_str(text).context("parsing scenario YAML")?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening scenario {}", path.display()))?;
        let reader = BufReader::new(file);
        let cfg: ScenarioConfig = serde_yaml::from_reader(reader)
            .with_context(|| format!("parsing scenario {}", path.display()))?;
        Ok(cfg)
    }

    /// Reject values the solver cannot run with
    pub fn validate(&self) -> Result<()> {
        let bounds = self.bounds.to_bounds();
        ensure!(
            bounds.radius.is_finite() && bounds.radius > 0.0,
            "bounding radius must be finite and > 0, got {}", bounds.radius
        );
        ensure!(
            bounds.center.x.is_finite() && bounds.center.y.is_finite(),
            "bounding center must be finite"
        );

        let p = self.solver.to_parameters();
        ensure!(p.substeps > 0, "substeps must be at least 1");
        ensure!(
            p.damping > 0.0 && p.damping <= 1.0,
            "damping must be in (0, 1], got {}", p.damping
        );
        ensure!(
            p.gravity.x.is_finite() && p.gravity.y.is_finite(),
            "gravity must be finite"
        );
        ensure!(
            p.correction.is_finite() && p.correction >= 0.0,
            "correction must be finite and >= 0, got {}", p.correction
        );

        for (i, b) in self.bodies.iter().enumerate() {
            ensure!(
                b.radius.is_finite() && b.radius > 0.0,
                "body {i}: radius must be finite and > 0, got {}", b.radius
            );
            ensure!(
                b.radius < bounds.radius,
                "body {i}: radius {} does not fit inside bounding radius {}", b.radius, bounds.radius
            );
            ensure!(
                b.x[0].is_finite() && b.x[1].is_finite(),
                "body {i}: position must be finite"
            );
            if let Some(v) = b.v {
                ensure!(v[0].is_finite() && v[1].is_finite(), "body {i}: velocity must be finite");
            }
        }

        if let Some(spawn) = &self.spawn {
            ensure!(spawn.min_radius > 0, "spawn.min_radius must be > 0");
            ensure!(
                spawn.min_radius < spawn.max_radius,
                "spawn radius range {}..{} is empty", spawn.min_radius, spawn.max_radius
            );
            ensure!(
                (spawn.max_radius as f64) < bounds.radius,
                "spawn.max_radius {} does not fit inside bounding radius {}", spawn.max_radius, bounds.radius
            );
        }

        Ok(())
    }
}
