pub mod states;
pub mod params;
pub mod forces;
pub mod constraint;
pub mod arena;
pub mod grid;
pub mod collision;
pub mod integrator;
pub mod solver;
pub mod scenario;
