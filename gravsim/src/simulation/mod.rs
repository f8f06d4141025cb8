pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod trajectory;
pub mod grid;
pub mod scenario;
