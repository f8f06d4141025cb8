//! Deformable reference grid.
//!
//! A flat lattice of line segments in the x/z plane whose vertices are
//! pushed down into "gravity wells" around massive bodies. The well shape
//! borrows the Flamm paraboloid of a Schwarzschild mass,
//! `dz = 2 * sqrt(rs * (d - rs))` with `rs = 2 G m / c^2`, summed over all
//! bodies. It is a visual heuristic; `speed_of_light` and `unit_scale` are
//! tuning knobs, not physical constants.
//!
//! After each update the vertex heights are shifted so the highest vertex
//! sits exactly at `y = 0`.

use crate::error::ConfigError;
use crate::simulation::states::{Body, NVec3};

pub const DEFAULT_GRID_SIZE: f64 = 200.0;
pub const DEFAULT_GRID_DIVISIONS: u32 = 40;
pub const DEFAULT_SPEED_OF_LIGHT: f64 = 100.0;
pub const DEFAULT_UNIT_SCALE: f64 = 1.0;

/// Lattice extent and resolution. Changing either needs a full rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub size: f64, // edge length
    pub divisions: u32, // cells per edge
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            divisions: DEFAULT_GRID_DIVISIONS,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ConfigError::InvalidGrid(format!("size must be positive, got {}", self.size)));
        }
        if self.divisions == 0 {
            return Err(ConfigError::InvalidGrid("divisions must be at least 1".into()));
        }
        Ok(())
    }

    pub fn step(&self) -> f64 {
        self.size / self.divisions as f64
    }
}

/// Constants of the well visualization
#[derive(Debug, Clone, PartialEq)]
pub struct WellModel {
    pub g: f64,
    pub speed_of_light: f64,
    pub unit_scale: f64, // grid units -> well-model length units
}

impl WellModel {
    pub fn new(g: f64) -> Self {
        Self {
            g,
            speed_of_light: DEFAULT_SPEED_OF_LIGHT,
            unit_scale: DEFAULT_UNIT_SCALE,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let knobs = [("speed_of_light", self.speed_of_light), ("unit_scale", self.unit_scale)];
        for (name, value) in knobs {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be > 0, got {}", value),
                });
            }
        }
        Ok(())
    }

    /// Schwarzschild-style radius of a mass
    pub fn rs(&self, mass: f64) -> f64 {
        2.0 * self.g * mass / (self.speed_of_light * self.speed_of_light)
    }

    /// Height contribution of one mass at grid distance `distance`.
    ///
    /// Inside `rs` the radicand is negative and the contribution is zero;
    /// anything non-finite also contributes zero.
    pub fn displacement(&self, mass: f64, distance: f64) -> f64 {
        let rs = self.rs(mass);
        let d = distance * self.unit_scale;
        let radicand = rs * (d - rs);
        if !(radicand > 0.0) {
            return 0.0;
        }
        let dz = 2.0 * radicand.sqrt();
        if dz.is_finite() { dz } else { 0.0 }
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    config: GridConfig,
    base: Vec<NVec3>, // undeformed lattice, segment endpoints in pairs
    vertices: Vec<NVec3>,
}

impl Grid {
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let base = build_lattice(&config);
        Ok(Self {
            config,
            vertices: base.clone(),
            base,
        })
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    /// Regenerate the base lattice for a new extent or division count
    pub fn rebuild(&mut self, config: GridConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.base = build_lattice(&config);
        self.vertices = self.base.clone();
        Ok(())
    }

    /// Recompute every vertex height from the current bodies.
    ///
    /// With `follow` set, the lattice is translated by its x and z
    /// components before sampling; the height of the follow point is ignored.
    pub fn deform(&mut self, bodies: &[Body], model: &WellModel, follow: Option<NVec3>) {
        let shift = follow.map_or(NVec3::zeros(), |p| NVec3::new(p.x, 0.0, p.z));
        let shift = if shift.iter().all(|c| c.is_finite()) { shift } else { NVec3::zeros() };

        let mut highest = f64::NEG_INFINITY;
        for (v, base) in self.vertices.iter_mut().zip(self.base.iter()) {
            *v = base + shift;

            let mut total = 0.0;
            for b in bodies.iter().filter(|b| b.is_active()) {
                let distance = (b.x - *v).norm();
                total += model.displacement(b.m, distance);
            }
            v.y = total;
            highest = highest.max(total);
        }

        // pin the ceiling to zero
        if highest.is_finite() {
            for v in self.vertices.iter_mut() {
                v.y -= highest;
            }
        }
    }

    pub fn vertices(&self) -> &[NVec3] {
        &self.vertices
    }

    /// Line segments as endpoint pairs
    pub fn segments(&self) -> impl Iterator<Item = (NVec3, NVec3)> + '_ {
        self.vertices.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn max_height(&self) -> Option<f64> {
        self.vertices.iter().map(|v| v.y).reduce(f64::max)
    }
}

/// Segments parallel to x, then segments parallel to z, all at one height
fn build_lattice(config: &GridConfig) -> Vec<NVec3> {
    let n = config.divisions as usize;
    let step = config.step();
    let half = config.size / 2.0;
    let y = -half * 0.3 + 3.0 * step;

    let mut verts = Vec::with_capacity(4 * n * (n + 1));

    // x axis
    for z_step in 0..=n {
        let z = -half + z_step as f64 * step;
        for x_step in 0..n {
            let x0 = -half + x_step as f64 * step;
            verts.push(NVec3::new(x0, y, z));
            verts.push(NVec3::new(x0 + step, y, z));
        }
    }

    // z axis
    for x_step in 0..=n {
        let x = -half + x_step as f64 * step;
        for z_step in 0..n {
            let z0 = -half + z_step as f64 * step;
            verts.push(NVec3::new(x, y, z0));
            verts.push(NVec3::new(x, y, z0 + step));
        }
    }

    verts
}
