//! Numerical and physical parameters for the simulation
//!
//! `Parameters` is fixed for the lifetime of a scenario:
//! - gravitational constant `g` in the scenario's unit system,
//! - `min_distance`, the separation below which the force law clamps.
//!
//! `RunSettings` holds the knobs the viewer changes while running
//! (speed, pause, trajectory options, camera following). It is passed
//! into every frame instead of living in globals.

use bevy::prelude::Resource;

use crate::simulation::trajectory::TrajectorySettings;

/// Gravitational constant of the default unit system
pub const DEFAULT_G: f64 = 1.0;

/// Separations below this (length units) are treated as this distance
pub const MIN_DISTANCE: f64 = 1.0e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub g: f64, // gravitational constant
    pub min_distance: f64, // force-law distance clamp
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            min_distance: MIN_DISTANCE,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct RunSettings {
    pub sim_speed: f64, // multiplier on real elapsed time
    pub paused: bool,
    pub show_trajectories: bool,
    pub trajectory: TrajectorySettings,
    pub follow_camera: bool, // grid lattice follows the viewer in x/z
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            sim_speed: 1.0,
            paused: false,
            show_trajectories: true,
            trajectory: TrajectorySettings::default(),
            follow_camera: false,
        }
    }
}

impl RunSettings {
    /// `dt_real * sim_speed`, or zero when paused or fed garbage
    pub fn scaled_dt(&self, dt_real: f64) -> f64 {
        if self.paused {
            return 0.0;
        }
        let dt = sanitize_dt(dt_real) * self.sim_speed;
        if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
    }
}

/// Non-positive or non-finite frame deltas mean "no time passed"
pub fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}
