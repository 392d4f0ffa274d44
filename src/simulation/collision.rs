//! Pairwise overlap resolution plus pair-finding helpers
//!
//! Resolution is positional: overlapping bodies are pushed apart along the
//! line between their centers by `overlap * correction * sub_dt` each. No
//! momentum is exchanged; the push shows up as implicit Verlet velocity.

use std::collections::BTreeSet;

use crate::simulation::grid::SpatialGrid;
use crate::simulation::states::{Body, NVec2};

/// Separation axis used when two centers coincide exactly
pub const COINCIDENT_AXIS: [f64; 2] = [1.0, 0.0];

/// Penetration depth of `a` and `b`, `None` when they do not overlap
pub fn overlap(a: &Body, b: &Body) -> Option<f64> {
    let reach = a.radius() + b.radius();
    let dist = (b.position() - a.position()).norm();
    if dist < reach {
        Some(reach - dist)
    } else {
        None
    }
}

/// Push `a` and `b` apart if they overlap. Returns whether anything moved.
///
/// `a` moves against the a->b direction and `b` along it, each by
/// `overlap * correction * sub_dt`.
pub fn resolve_pair(a: &mut Body, b: &mut Body, sub_dt: f64, correction: f64) -> bool {
    let delta = b.position - a.position;
    let dist = delta.norm();
    let reach = a.radius() + b.radius();

    if dist >= reach {
        return false;
    }

    let unit = if dist > 0.0 {
        delta / dist
    } else {
        NVec2::new(COINCIDENT_AXIS[0], COINCIDENT_AXIS[1])
    };

    let push = unit * ((reach - dist) * correction * sub_dt);
    a.position -= push;
    b.position += push;
    true
}

/// Overlapping unordered pairs `(min, max)` by testing every pair.
/// The O(n^2) reference the grid is checked against.
pub fn brute_force_pairs<'a, I>(bodies: I) -> BTreeSet<(usize, usize)>
where
    I: IntoIterator<Item = (usize, &'a Body)>,
{
    let bodies: Vec<(usize, &Body)> = bodies.into_iter().collect();
    let mut pairs = BTreeSet::new();

    for (n, &(i, bi)) in bodies.iter().enumerate() {
        for &(j, bj) in &bodies[n + 1..] {
            if overlap(bi, bj).is_some() {
                pairs.insert((i.min(j), i.max(j)));
            }
        }
    }
    pairs
}

/// Overlapping unordered pairs `(min, max)` among the grid's 3x3 candidates.
/// `lookup` maps a grid index back to its body.
pub fn grid_pairs<'a, F>(grid: &SpatialGrid, lookup: F) -> BTreeSet<(usize, usize)>
where
    F: Fn(usize) -> Option<&'a Body>,
{
    let mut pairs = BTreeSet::new();

    grid.for_each_candidate_pair(|i, j| {
        if let (Some(bi), Some(bj)) = (lookup(i), lookup(j)) {
            if overlap(bi, bj).is_some() {
                pairs.insert((i.min(j), i.max(j)));
            }
        }
    });
    pairs
}
