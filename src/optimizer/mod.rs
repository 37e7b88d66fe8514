pub mod engine;
pub mod solver;

pub use engine::*;
pub use solver::*;
