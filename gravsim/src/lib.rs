pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;
pub mod error;

pub use simulation::states::{Body, BodyHandle, BodyStore, NVec3, PointMass, Renderable, Rgb, Snapshot};
pub use simulation::forces::{ForceLaw, ForceSet, NewtonianGravity};
pub use simulation::integrator::{integrate_system, semi_implicit_euler};
pub use simulation::trajectory::{predict, TimeDirection, Trajectory, TrajectorySettings};
pub use simulation::grid::{Grid, GridConfig, WellModel};
pub use simulation::engine::{Command, Diagnostic, FrameInput, FrameReport, Simulation};
pub use simulation::params::{Parameters, RunSettings};
pub use simulation::scenario::{BodySpec, Preset, Scenario, ScenarioSpec};

pub use configuration::config::{BodyConfig, GridConfigFile, ParametersConfig, ScenarioConfig};

pub use error::{ConfigError, StateError};

pub use visualization::viewer::run_viewer;

pub use benchmark::benchmark::{bench_forces, bench_step, bench_trajectory_curve};
