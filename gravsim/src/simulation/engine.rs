//! The running simulation.
//!
//! `Simulation` exclusively owns the live body list. The presentation layer
//! reads bodies, grid and trajectories between frames and asks for changes
//! by submitting [`Command`]s, which are applied at the start of the next
//! [`Simulation::frame`]. One frame runs, in order:
//!
//! 1. queued commands, then selection validation
//! 2. force pass + semi-implicit Euler pass over the live bodies
//! 3. grid deformation
//! 4. trajectory prediction

use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;

use crate::error::{ConfigError, StateError};
use crate::simulation::forces::{ForceSet, NewtonianGravity};
use crate::simulation::grid::{Grid, GridConfig, WellModel};
use crate::simulation::integrator::integrate_system;
use crate::simulation::params::{sanitize_dt, Parameters, RunSettings};
use crate::simulation::scenario::{BodySpec, ScenarioSpec};
use crate::simulation::states::{Body, BodyHandle, BodyStore, NVec3};
use crate::simulation::trajectory::{predict, Trajectory};

/// A mutation requested by the presentation layer
#[derive(Debug, Clone)]
pub enum Command {
    AddBody(BodySpec),
    RemoveBody(BodyHandle),
    EditBody(BodyHandle, BodySpec),
    LoadScenario(ScenarioSpec),
    RebuildGrid(GridConfig),
    Select(Option<BodyHandle>),
    SelectIndex(usize),
}

/// Something the presentation layer may want to show the user
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    BodyFrozen { handle: BodyHandle, reason: StateError },
    CommandRejected(String),
}

/// Per-frame clock and viewer state
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub dt_real: f64, // seconds since last frame
    pub camera: Option<NVec3>, // viewer position, used when the grid follows
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub dt_scaled: f64,
    pub bodies: usize,
    pub frozen: usize, // bodies frozen during this frame
}

#[derive(Resource)]
pub struct Simulation {
    parameters: Parameters,
    bodies: BodyStore,
    forces: ForceSet,
    grid: Grid,
    well: WellModel,
    trajectories: Vec<Trajectory>, // same order as the body store
    selection: Option<BodyHandle>,
    pending: Vec<Command>,
    diagnostics: Vec<Diagnostic>,
    scratch: Vec<NVec3>,
    time: f64, // accumulated simulation time
}

fn gravity_set(p: &Parameters) -> ForceSet {
    ForceSet::new().with(NewtonianGravity {
        g: p.g,
        min_distance: p.min_distance,
    })
}

impl Simulation {
    pub fn new(scenario: ScenarioSpec, grid: GridConfig) -> Result<Self, ConfigError> {
        scenario.validate()?;
        let grid = Grid::new(grid)?;

        let mut bodies = BodyStore::new();
        bodies.replace_all(scenario.bodies.iter().map(BodySpec::to_body));

        let mut well = WellModel::new(scenario.parameters.g);
        if let Some(w) = &scenario.well {
            well = w.clone();
        }

        info!("simulation: {} bodies, G = {}", bodies.len(), scenario.parameters.g);

        Ok(Self {
            forces: gravity_set(&scenario.parameters),
            parameters: scenario.parameters,
            bodies,
            grid,
            well,
            trajectories: Vec::new(),
            selection: None,
            pending: Vec::new(),
            diagnostics: Vec::new(),
            scratch: Vec::new(),
            time: 0.0,
        })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn bodies(&self) -> &BodyStore {
        &self.bodies
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn well(&self) -> &WellModel {
        &self.well
    }

    /// Trajectories from the last frame, paired with their body
    pub fn trajectories(&self) -> impl Iterator<Item = (BodyHandle, &Trajectory)> {
        self.bodies.handles().iter().copied().zip(self.trajectories.iter())
    }

    pub fn selection(&self) -> Option<BodyHandle> {
        self.selection
    }

    pub fn selected_body(&self) -> Option<&Body> {
        self.selection.and_then(|h| self.bodies.get(h))
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Queue a mutation for the start of the next frame
    pub fn submit(&mut self, command: Command) {
        self.pending.push(command);
    }

    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Run one frame of the pipeline
    pub fn frame(&mut self, input: &FrameInput, settings: &RunSettings) -> FrameReport {
        self.apply_pending();
        self.validate_selection();

        let dt_real = sanitize_dt(input.dt_real);
        let dt_scaled = settings.scaled_dt(dt_real);

        let frozen = integrate_system(self.bodies.bodies_mut(), &self.forces, dt_scaled, &mut self.scratch);
        for (index, reason) in &frozen {
            if let Some(handle) = self.bodies.handle_at(*index) {
                warn!("body {:?} frozen: {}", handle, reason);
                self.diagnostics.push(Diagnostic::BodyFrozen { handle, reason: *reason });
            }
        }
        self.time += dt_scaled;

        let follow = if settings.follow_camera { input.camera } else { None };
        self.grid.deform(self.bodies.bodies(), &self.well, follow);

        if settings.show_trajectories {
            self.trajectories = predict(self.bodies.bodies(), &self.forces, dt_real, &settings.trajectory);
        } else {
            self.trajectories.clear();
        }

        FrameReport {
            dt_scaled,
            bodies: self.bodies.len(),
            frozen: frozen.len(),
        }
    }

    fn apply_pending(&mut self) {
        for command in std::mem::take(&mut self.pending) {
            if let Err(reason) = self.apply(command) {
                debug!("command rejected: {}", reason);
                self.diagnostics.push(Diagnostic::CommandRejected(reason));
            }
        }
    }

    fn apply(&mut self, command: Command) -> Result<(), String> {
        match command {
            Command::AddBody(spec) => {
                spec.validate(self.bodies.len()).map_err(|e| e.to_string())?;
                let handle = self.bodies.insert(spec.to_body());
                debug!("added body {:?}", handle);
            }
            Command::RemoveBody(handle) => {
                self.bodies
                    .remove(handle)
                    .ok_or_else(|| format!("remove: stale handle {:?}", handle))?;
            }
            Command::EditBody(handle, spec) => {
                let index = self
                    .bodies
                    .index_of(handle)
                    .ok_or_else(|| format!("edit: stale handle {:?}", handle))?;
                spec.validate(index).map_err(|e| e.to_string())?;
                if let Some(body) = self.bodies.get_mut(handle) {
                    *body = spec.to_body();
                }
            }
            Command::LoadScenario(scenario) => {
                scenario.validate().map_err(|e| e.to_string())?;
                self.load(scenario);
            }
            Command::RebuildGrid(config) => {
                self.grid.rebuild(config).map_err(|e| e.to_string())?;
            }
            Command::Select(handle) => {
                self.selection = handle;
            }
            Command::SelectIndex(index) => {
                self.selection = self.bodies.handle_at(index);
            }
        }
        Ok(())
    }

    /// Replace every body and the physical parameters in one go
    fn load(&mut self, scenario: ScenarioSpec) {
        self.bodies.replace_all(scenario.bodies.iter().map(BodySpec::to_body));
        self.forces = gravity_set(&scenario.parameters);
        self.well = scenario.well.unwrap_or_else(|| WellModel::new(scenario.parameters.g));
        self.parameters = scenario.parameters;
        self.trajectories.clear();
        self.time = 0.0;
        info!("loaded scenario with {} bodies", self.bodies.len());
    }

    fn validate_selection(&mut self) {
        if let Some(handle) = self.selection {
            if !self.bodies.contains(handle) {
                debug!("selection {:?} no longer exists", handle);
                self.selection = None;
            }
        }
    }
}
