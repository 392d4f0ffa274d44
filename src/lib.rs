pub mod simulation;
pub mod configuration;
#[cfg(feature = "viewer")]
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Body, BodyError, BodyId, BodySnapshot, NVec2};
pub use simulation::params::Parameters;
pub use simulation::forces::{Acceleration, AccelSet, PointAttractor, UniformGravity};
pub use simulation::constraint::BoundingCircle;
pub use simulation::grid::{CellKey, SpatialGrid};
pub use simulation::solver::{Solver, SolverState};
pub use simulation::scenario::Scenario;
pub use configuration::config::{BodyConfig, BoundsConfig, ScenarioConfig, SolverConfig, SpawnConfig};
#[cfg(feature = "viewer")]
pub use visualization::verletsim_vis2d::run_2d;
pub use benchmark::benchmark::{bench_broad_phase, bench_update, bench_update_curve};
