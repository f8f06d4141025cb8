//! Scenario descriptions and built-in presets
//!
//! A `ScenarioSpec` is the in-memory form of a scenario: physical
//! parameters plus an ordered list of `BodySpec`s. It comes from a YAML
//! `ScenarioConfig` or from one of the [`Preset`]s, and is what
//! `Command::LoadScenario` swaps in atomically.

use clap::ValueEnum;

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::error::ConfigError;
use crate::simulation::grid::{GridConfig, WellModel};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3, Rgb};

/// Initial state of one body
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub x: NVec3,
    pub v: NVec3,
    pub m: f64,
    pub radius: f64,
    pub color: Rgb,
    pub glows: bool,
}

impl BodySpec {
    pub fn new(x: NVec3, v: NVec3, m: f64, radius: f64) -> Self {
        Self {
            x,
            v,
            m,
            radius,
            color: [1.0, 1.0, 1.0],
            glows: false,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn glowing(mut self) -> Self {
        self.glows = true;
        self
    }

    pub fn to_body(&self) -> Body {
        Body::new(self.x, self.v, self.m, self.radius)
            .with_color(self.color)
            .glowing(self.glows)
    }

    /// `index` only labels the error
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBody { index, reason };

        if !self.x.iter().all(|c| c.is_finite()) {
            return Err(invalid(format!("position is not finite: {:?}", self.x)));
        }
        if !self.v.iter().all(|c| c.is_finite()) {
            return Err(invalid(format!("velocity is not finite: {:?}", self.v)));
        }
        if !(self.m.is_finite() && self.m >= 0.0) {
            return Err(invalid(format!("mass must be >= 0, got {}", self.m)));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(invalid(format!("radius must be > 0, got {}", self.radius)));
        }
        Ok(())
    }
}

impl From<&BodyConfig> for BodySpec {
    fn from(bc: &BodyConfig) -> Self {
        Self {
            x: NVec3::from(bc.x),
            v: NVec3::from(bc.v),
            m: bc.m,
            radius: bc.radius,
            color: bc.color,
            glows: bc.glows,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioSpec {
    pub parameters: Parameters,
    pub bodies: Vec<BodySpec>,
    pub well: Option<WellModel>, // None = derive from parameters.g
}

impl ScenarioSpec {
    pub fn new(parameters: Parameters, bodies: Vec<BodySpec>) -> Self {
        Self {
            parameters,
            bodies,
            well: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.parameters;
        if !(p.g.is_finite() && p.g > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "G",
                reason: format!("must be > 0, got {}", p.g),
            });
        }
        if !(p.min_distance.is_finite() && p.min_distance > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "min_distance",
                reason: format!("must be > 0, got {}", p.min_distance),
            });
        }
        if let Some(well) = &self.well {
            well.validate()?;
        }
        for (i, b) in self.bodies.iter().enumerate() {
            b.validate(i)?;
        }
        Ok(())
    }
}

/// A scenario file turned into everything the viewer needs to start
#[derive(Debug, Clone)]
pub struct Scenario {
    pub spec: ScenarioSpec,
    pub grid: GridConfig,
    pub sim_speed: f64,
    pub trajectory_steps: usize,
    pub follow_camera: bool,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ConfigError> {
        // Bodies: map `BodyConfig` -> `BodySpec` using nalgebra vectors
        let bodies: Vec<BodySpec> = cfg.bodies.iter().map(BodySpec::from).collect();

        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            g: p_cfg.g,
            min_distance: p_cfg.min_distance,
        };

        let g_cfg = cfg.grid;
        let grid = GridConfig {
            size: g_cfg.size,
            divisions: g_cfg.divisions,
        };
        grid.validate()?;

        let well = WellModel {
            g: parameters.g,
            speed_of_light: g_cfg.speed_of_light,
            unit_scale: g_cfg.unit_scale,
        };

        let spec = ScenarioSpec {
            parameters,
            bodies,
            well: Some(well),
        };
        spec.validate()?;

        if !(p_cfg.sim_speed.is_finite() && p_cfg.sim_speed >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "sim_speed",
                reason: format!("must be >= 0, got {}", p_cfg.sim_speed),
            });
        }

        Ok(Self {
            spec,
            grid,
            sim_speed: p_cfg.sim_speed,
            trajectory_steps: p_cfg.trajectory_steps,
            follow_camera: g_cfg.follow_camera,
        })
    }
}

/// Built-in scenarios, selectable from the command line and number keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Glowing sun with three planets on circular orbits
    Solar,
    /// Two equal stars orbiting their barycentre
    Binary,
    /// Sun and planet with a comet swinging past
    Slingshot,
    /// Nothing; add bodies by hand
    Empty,
}

/// Speed of a circular orbit of radius `r` around mass `m`
pub fn circular_speed(g: f64, m: f64, r: f64) -> f64 {
    (g * m / r).sqrt()
}

const SUN: Rgb = [1.0, 0.85, 0.4];

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Solar, Preset::Binary, Preset::Slingshot, Preset::Empty];

    pub fn build(self) -> ScenarioSpec {
        let parameters = Parameters::default();
        let g = parameters.g;

        let bodies = match self {
            Preset::Solar => {
                let m_sun = 10_000.0;
                let mut bodies = vec![BodySpec::new(NVec3::zeros(), NVec3::zeros(), m_sun, 6.0)
                    .with_color(SUN)
                    .glowing()];
                let planets = [
                    (25.0, 1.0, 1.2, [0.6, 0.6, 0.65]),
                    (45.0, 5.0, 2.0, [0.3, 0.5, 1.0]),
                    (75.0, 20.0, 3.0, [0.9, 0.4, 0.3]),
                ];
                for (r, m, radius, color) in planets {
                    // tangential velocity, orbit in the x/z plane
                    let v = circular_speed(g, m_sun, r);
                    bodies.push(
                        BodySpec::new(NVec3::new(r, 0.0, 0.0), NVec3::new(0.0, 0.0, -v), m, radius)
                            .with_color(color),
                    );
                }
                bodies
            }
            Preset::Binary => {
                let m = 2_000.0;
                let d = 30.0; // separation
                // each star circles the barycentre at d/2 under the partner's pull at d
                let v = (g * m / (2.0 * d)).sqrt();
                vec![
                    BodySpec::new(NVec3::new(-d / 2.0, 0.0, 0.0), NVec3::new(0.0, 0.0, v), m, 3.0)
                        .with_color([0.6, 0.8, 1.0])
                        .glowing(),
                    BodySpec::new(NVec3::new(d / 2.0, 0.0, 0.0), NVec3::new(0.0, 0.0, -v), m, 3.0)
                        .with_color([1.0, 0.6, 0.4])
                        .glowing(),
                ]
            }
            Preset::Slingshot => {
                let m_sun = 10_000.0;
                let r = 40.0;
                vec![
                    BodySpec::new(NVec3::zeros(), NVec3::zeros(), m_sun, 5.0)
                        .with_color(SUN)
                        .glowing(),
                    BodySpec::new(
                        NVec3::new(r, 0.0, 0.0),
                        NVec3::new(0.0, 0.0, -circular_speed(g, m_sun, r)),
                        50.0,
                        2.5,
                    )
                    .with_color([0.3, 0.7, 0.4]),
                    BodySpec::new(NVec3::new(-120.0, 0.0, 60.0), NVec3::new(12.0, 0.0, -4.0), 0.5, 0.8)
                        .with_color([0.8, 0.9, 1.0]),
                ]
            }
            Preset::Empty => Vec::new(),
        };

        ScenarioSpec::new(parameters, bodies)
    }
}
