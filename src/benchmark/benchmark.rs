use std::time::Instant;

use crate::simulation::collision::{brute_force_pairs, grid_pairs};
use crate::simulation::constraint::BoundingCircle;
use crate::simulation::grid::SpatialGrid;
use crate::simulation::solver::Solver;
use crate::simulation::states::{Body, NVec2};

const DT: f64 = 1.0 / 60.0;

/// Boundary large enough that `n` small bodies do not pile up
fn bench_bounds(n: usize) -> BoundingCircle {
    let radius = 50.0 * (n as f64).sqrt();
    BoundingCircle::new(NVec2::new(radius, radius), radius)
}

/// Deterministic layout inside the bounds, no rand needed
fn make_bodies(n: usize, bounds: &BoundingCircle) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let offset = NVec2::new((i_f * 0.37).sin(), (i_f * 0.13).cos()) * (0.7 * bounds.radius);
            let radius = 5.0 + (i % 10) as f64;
            Body::new(bounds.center + offset, radius)
        })
        .collect()
}

fn make_solver(n: usize) -> Solver {
    let bounds = bench_bounds(n);
    let mut solver = Solver::new(bounds);
    for b in make_bodies(n, &bounds) {
        solver.add_body(b.position(), b.radius()).expect("bench radii are positive");
    }
    solver
}

/// Time overlap detection through the grid against the all-pairs check
pub fn bench_broad_phase() {
    let ns = [200, 400, 800, 1600, 3200, 6400];

    for n in ns {
        let bounds = bench_bounds(n);
        let bodies = make_bodies(n, &bounds);
        let mut grid = SpatialGrid::new();

        // Warm up
        grid.rebuild(bounds.origin(), bodies.iter().enumerate());

        let t0 = Instant::now();
        let direct = brute_force_pairs(bodies.iter().enumerate());
        let dt_direct = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        grid.rebuild(bounds.origin(), bodies.iter().enumerate());
        let gridded = grid_pairs(&grid, |i| bodies.get(i));
        let dt_grid = t1.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, pairs = {:6}, brute force = {:8.6} s, grid = {:8.6} s, agree = {}",
            direct.len(), dt_direct, dt_grid, direct == gridded
        );
    }
}

/// Time full solver frames for a range of n
pub fn bench_update() {
    let ns = [200, 400, 800, 1600, 3200, 6400];
    let frames = 10;

    for n in ns {
        let mut solver = make_solver(n);

        // Warm-up
        solver.update(DT);

        let t0 = Instant::now();
        for _ in 0..frames {
            solver.update(DT);
        }
        let per_frame = t0.elapsed().as_secs_f64() / frames as f64;

        println!("N = {:5}, update = {:8.6} s/frame, cells = {}", n, per_frame, solver.grid().len());
    }
}

/// Frame cost for n in steps of 200, as CSV
/// Paste output directly into a spreadsheet to graph
pub fn bench_update_curve() {
    println!("N,update_ms");

    for n in (200..=6400).step_by(200) {
        // Small n: average over a few frames to smooth noise
        let frames = if n <= 1600 { 5 } else { 1 };
        let mut solver = make_solver(n);

        let t0 = Instant::now();
        for _ in 0..frames {
            solver.update(DT);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / frames as f64;

        println!("{},{:.6}", n, ms);
    }
}
