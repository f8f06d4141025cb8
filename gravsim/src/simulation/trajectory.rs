//! Forward trajectory prediction.
//!
//! Copies the live bodies into snapshots and integrates the copies with the
//! same force set and the same semi-implicit Euler kernel as the live step.
//! The live bodies are only read.
//!
//! Cost is `steps * n^2` pair evaluations per call, the dominant per-frame
//! cost once body counts grow.

use crate::simulation::forces::ForceSet;
use crate::simulation::integrator::semi_implicit_euler;
use crate::simulation::states::{Body, NVec3, Rgb, Snapshot};

pub const DEFAULT_TRAJECTORY_STEPS: usize = 500;

/// Which way the predictor runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeDirection {
    #[default]
    Forward,
    Backward, // initial velocities are negated
}

impl TimeDirection {
    pub fn sign(self) -> f64 {
        match self {
            TimeDirection::Forward => 1.0,
            TimeDirection::Backward => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            TimeDirection::Forward => TimeDirection::Backward,
            TimeDirection::Backward => TimeDirection::Forward,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrajectorySettings {
    pub steps: usize, // vertices per body
    pub direction: TimeDirection,
}

impl Default for TrajectorySettings {
    fn default() -> Self {
        Self {
            steps: DEFAULT_TRAJECTORY_STEPS,
            direction: TimeDirection::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryVertex {
    pub position: NVec3,
    pub color: Rgb,
}

/// Predicted line strip for one body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    pub points: Vec<TrajectoryVertex>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = NVec3> + '_ {
        self.points.iter().map(|p| p.position)
    }
}

/// Predict `settings.steps` future positions for every body, in body order.
///
/// `dt` is the fixed per-step delta, normally the last real frame delta
/// (not the speed-scaled one), so the look-ahead does not stretch with the
/// simulation speed. A snapshot that would go non-finite stops advancing
/// and its remaining vertices repeat its last finite position.
pub fn predict(
    bodies: &[Body],
    forces: &ForceSet,
    dt: f64,
    settings: &TrajectorySettings,
) -> Vec<Trajectory> {
    let n = bodies.len();
    let sign = settings.direction.sign();

    let mut snapshots: Vec<Snapshot> = bodies
        .iter()
        .map(|b| {
            let mut s = Snapshot::of(b);
            s.v *= sign;
            s
        })
        .collect();

    let mut paths: Vec<Trajectory> = (0..n)
        .map(|_| Trajectory {
            points: Vec::with_capacity(settings.steps),
        })
        .collect();

    let mut f = vec![NVec3::zeros(); n];

    for _ in 0..settings.steps {
        // every force first, then every snapshot moves
        forces.accumulate_forces(&snapshots, &mut f);

        for (s, force) in snapshots.iter_mut().zip(f.iter()) {
            if s.m <= 0.0 || s.stalled {
                continue;
            }
            match semi_implicit_euler(&s.x, &s.v, s.m, force, dt) {
                Ok((x, v)) => {
                    s.x = x;
                    s.v = v;
                }
                Err(_) => s.stalled = true,
            }
        }

        for (path, s) in paths.iter_mut().zip(snapshots.iter()) {
            path.points.push(TrajectoryVertex {
                position: s.x,
                color: s.color,
            });
        }
    }

    paths
}
