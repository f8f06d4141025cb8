//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario file. A scenario consists of:
//!
//! - [`ParametersConfig`] – physical constants and run defaults
//! - [`GridConfigFile`]   – reference grid extent and well-visualization constants (optional)
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   G: 1.0                  # gravitational constant, fixed for the run
//!   min_distance: 0.001     # force-law distance clamp
//!   sim_speed: 1.0          # initial speed multiplier
//!   trajectory_steps: 500   # predicted vertices per body
//!
//! grid:
//!   size: 200.0
//!   divisions: 40
//!   follow_camera: false
//!   speed_of_light: 100.0   # well depth knob
//!   unit_scale: 1.0
//!
//! bodies:
//!   - x: [0.0, 0.0, 0.0]
//!     v: [0.0, 0.0, 0.0]
//!     m: 10000.0
//!     radius: 6.0
//!     color: [1.0, 0.85, 0.4]
//!     glows: true
//!   - x: [40.0, 0.0, 0.0]
//!     v: [0.0, 0.0, -15.8]
//!     m: 5.0
//!     radius: 2.0
//! ```
//!
//! Everything except `bodies` and `G` has a default. The file is turned into
//! a runtime `Scenario` by `Scenario::build_scenario`, which validates it.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::simulation::grid::{DEFAULT_GRID_DIVISIONS, DEFAULT_GRID_SIZE, DEFAULT_SPEED_OF_LIGHT, DEFAULT_UNIT_SCALE};
use crate::simulation::params::MIN_DISTANCE;
use crate::simulation::states::Rgb;
use crate::simulation::trajectory::DEFAULT_TRAJECTORY_STEPS;

fn default_min_distance() -> f64 {
    MIN_DISTANCE
}

fn default_sim_speed() -> f64 {
    1.0
}

fn default_trajectory_steps() -> usize {
    DEFAULT_TRAJECTORY_STEPS
}

fn default_size() -> f64 {
    DEFAULT_GRID_SIZE
}

fn default_divisions() -> u32 {
    DEFAULT_GRID_DIVISIONS
}

fn default_speed_of_light() -> f64 {
    DEFAULT_SPEED_OF_LIGHT
}

fn default_unit_scale() -> f64 {
    DEFAULT_UNIT_SCALE
}

fn default_color() -> Rgb {
    [1.0, 1.0, 1.0]
}

/// Global physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    #[serde(rename = "G")]
    pub g: f64, // gravitational constant
    #[serde(default = "default_min_distance")]
    pub min_distance: f64, // separations below this are clamped in the force law
    #[serde(default = "default_sim_speed")]
    pub sim_speed: f64, // initial simulation speed multiplier
    #[serde(default = "default_trajectory_steps")]
    pub trajectory_steps: usize, // predicted vertices per body
}

/// Reference grid section
#[derive(Deserialize, Debug, Clone)]
pub struct GridConfigFile {
    #[serde(default = "default_size")]
    pub size: f64, // edge length in simulation units
    #[serde(default = "default_divisions")]
    pub divisions: u32, // cells per edge
    #[serde(default)]
    pub follow_camera: bool, // lattice tracks the viewer in x/z
    #[serde(default = "default_speed_of_light")]
    pub speed_of_light: f64, // well-visualization constant
    #[serde(default = "default_unit_scale")]
    pub unit_scale: f64, // grid units -> well length units
}

impl Default for GridConfigFile {
    fn default() -> Self {
        Self {
            size: default_size(),
            divisions: default_divisions(),
            follow_camera: false,
            speed_of_light: default_speed_of_light(),
            unit_scale: default_unit_scale(),
        }
    }
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: [f64; 3], // Initial position in simulation units
    pub v: [f64; 3], // Initial velocity in simulation units per time unit
    pub m: f64, // Mass, 0 for a non-interacting marker
    pub radius: f64, // Visual radius
    #[serde(default = "default_color")]
    pub color: Rgb,
    #[serde(default)]
    pub glows: bool,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub grid: GridConfigFile,
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }
}
