//! Property-based tests for the circle solver using proptest
//!
//! These tests check invariants across random layouts:
//! - Grid broad phase finds exactly the brute-force overlap set
//! - Bodies stay within one step of their boundary limit
//! - No NaN in positions after stepping
//! - Body count and ids survive updates

use proptest::prelude::*;
use verletsim::{BoundingCircle, NVec2, Parameters, Solver};

const CENTER: [f64; 2] = [400.0, 300.0];
const BOUND_RADIUS: f64 = 250.0;
const DT: f64 = 1.0 / 60.0;
const SIMULATION_STEPS: usize = 20;

fn bounds() -> BoundingCircle {
    BoundingCircle::new(NVec2::new(CENTER[0], CENTER[1]), BOUND_RADIUS)
}

/// Position inside the inner half of the boundary
fn valid_position() -> impl Strategy<Value = NVec2> {
    (0.0..BOUND_RADIUS / 2.0, 0.0..std::f64::consts::TAU)
        .prop_map(|(dist, angle)| NVec2::new(CENTER[0], CENTER[1]) + NVec2::new(angle.cos(), angle.sin()) * dist)
}

fn valid_body() -> impl Strategy<Value = (NVec2, NVec2, f64)> {
    (
        valid_position(),
        (-3.0..3.0, -3.0..3.0).prop_map(|(x, y)| NVec2::new(x, y)),
        1.0..20.0,
    )
}

fn body_set() -> impl Strategy<Value = Vec<(NVec2, NVec2, f64)>> {
    prop::collection::vec(valid_body(), 1..120)
}

fn build(bodies: &[(NVec2, NVec2, f64)], parameters: Parameters) -> Solver {
    let mut solver = Solver::with_parameters(bounds(), parameters);
    for &(p, v, r) in bodies {
        solver.add_moving_body(p, v, r).unwrap();
    }
    solver
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: the 3x3 grid sweep misses no overlapping pair and invents none
    #[test]
    fn grid_pairs_equal_brute_force(bodies in body_set()) {
        let mut solver = build(&bodies, Parameters::default());
        prop_assert_eq!(solver.collision_pairs(), solver.brute_force_collision_pairs());

        // same after bodies have moved and some were removed
        for _ in 0..3 {
            solver.update(DT);
        }
        let doomed: Vec<_> = solver.ids().step_by(3).collect();
        for id in doomed {
            solver.remove_body(id);
        }
        prop_assert_eq!(solver.collision_pairs(), solver.brute_force_collision_pairs());
    }

    /// Property: after any update a body is past its limit by at most its last displacement
    #[test]
    fn bodies_stay_contained(bodies in body_set(), gx in -20.0..20.0f64, gy in -20.0..20.0f64) {
        let parameters = Parameters { gravity: NVec2::new(gx, gy), ..Parameters::default() };
        let mut solver = build(&bodies, parameters);

        for step in 0..SIMULATION_STEPS {
            solver.update(DT);
            for (id, b) in solver.bodies() {
                let excess = solver.bounds().excess(b);
                let slack = b.velocity().norm() + 1e-6;
                prop_assert!(
                    excess <= slack,
                    "step {}: {} is {} past its limit with displacement {}", step, id, excess, slack
                );
            }
        }
    }

    /// Property: positions never become NaN/Inf and no body is lost
    #[test]
    fn positions_stay_finite(bodies in body_set()) {
        let mut solver = build(&bodies, Parameters::default());
        let ids: Vec<_> = solver.ids().collect();

        for _ in 0..SIMULATION_STEPS {
            solver.update(DT);
        }

        prop_assert_eq!(solver.len(), bodies.len());
        for id in ids {
            let snap = solver.get_body(id);
            prop_assert!(snap.is_some(), "{} disappeared", id);
            if let Some(snap) = snap {
                prop_assert!(
                    snap.position.x.is_finite() && snap.position.y.is_finite(),
                    "{} has non-finite position {:?}", id, snap.position
                );
            }
        }
    }

    /// Property: a lone body never outruns the damped terminal displacement
    #[test]
    fn free_body_speed_is_bounded(start in valid_position()) {
        let parameters = Parameters::default();
        let bound = parameters.terminal_displacement(DT);
        let mut solver = Solver::with_parameters(bounds(), parameters);
        let id = solver.add_body(start, 10.0).unwrap();

        for _ in 0..300 {
            solver.update(DT);
            let speed = solver.body(id).unwrap().velocity().norm();
            prop_assert!(speed <= bound + 1e-9, "speed {} above bound {}", speed, bound);
        }
    }
}
