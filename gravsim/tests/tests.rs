use gravsim::simulation::states::{Body, BodyStore, NVec3};
use gravsim::simulation::params::{Parameters, RunSettings};
use gravsim::simulation::forces::{ForceSet, NewtonianGravity};
use gravsim::simulation::integrator::integrate_system;
use gravsim::simulation::trajectory::{predict, TimeDirection, TrajectorySettings};
use gravsim::simulation::grid::{Grid, GridConfig, WellModel};
use gravsim::simulation::engine::{Command, Diagnostic, FrameInput, Simulation};
use gravsim::simulation::scenario::{BodySpec, Scenario, ScenarioSpec};
use gravsim::configuration::config::ScenarioConfig;
use gravsim::error::{ConfigError, StateError};

use proptest::prelude::*;

/// Build a simple 2-body list separated along x-axis
pub fn two_bodies(dist: f64, m1: f64, m2: f64) -> Vec<Body> {
    vec![
        Body::new(NVec3::new(-dist / 2.0, 0.0, 0.0), NVec3::zeros(), m1, 1.0),
        Body::new(NVec3::new(dist / 2.0, 0.0, 0.0), NVec3::zeros(), m2, 1.0),
    ]
}

/// Default physics parameters for tests
pub fn test_params() -> Parameters {
    Parameters {
        g: 1.0,
        min_distance: 1.0e-3,
    }
}

pub fn gravity(p: &Parameters) -> NewtonianGravity {
    NewtonianGravity {
        g: p.g,
        min_distance: p.min_distance,
    }
}

/// Build a gravity term + ForceSet
pub fn gravity_set(p: &Parameters) -> ForceSet {
    ForceSet::new().with(gravity(p))
}

fn spec_of(bodies: &[Body]) -> ScenarioSpec {
    let specs = bodies
        .iter()
        .map(|b| BodySpec::new(b.x, b.v, b.m, b.radius))
        .collect();
    ScenarioSpec::new(test_params(), specs)
}

fn simulation(bodies: &[Body]) -> Simulation {
    Simulation::new(spec_of(bodies), GridConfig { size: 40.0, divisions: 8 }).unwrap()
}

fn frame(dt: f64) -> FrameInput {
    FrameInput {
        dt_real: dt,
        camera: None,
    }
}

fn all_finite(v: &NVec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

// ==================================================================================
// Force law tests
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let bodies = two_bodies(1.0, 2.0, 3.0);
    let g = gravity(&test_params());

    let f_ab = g.force_between(&bodies[0], &bodies[1]);
    let f_ba = g.force_between(&bodies[1], &bodies[0]);

    assert!((f_ab + f_ba).norm() < 1e-12, "forces not opposite: {:?} {:?}", f_ab, f_ba);
}

#[test]
fn gravity_points_toward_other_body() {
    let bodies = two_bodies(2.0, 1.0, 1.0);
    let g = gravity(&test_params());

    let dx = bodies[1].x - bodies[0].x;
    let f = g.force_between(&bodies[0], &bodies[1]);

    assert!(f.dot(&dx) > 0.0, "force is not toward second body");
}

#[test]
fn gravity_inverse_square_law() {
    let r = two_bodies(1.0, 1.0, 1.0);
    let r2 = two_bodies(2.0, 1.0, 1.0);
    let g = gravity(&test_params());

    let ratio = g.force_between(&r[0], &r[1]).norm() / g.force_between(&r2[0], &r2[1]).norm();

    assert!((ratio - 4.0).abs() < 1e-9, "Expected 4x, got {}", ratio);
}

#[test]
fn gravity_clamp_prevents_blowup() {
    let bodies = two_bodies(1e-12, 1.0, 1.0);
    let p = test_params();
    let mut out = vec![NVec3::zeros(); 2];
    gravity_set(&p).accumulate_forces(&bodies, &mut out);

    let cap = p.g / (p.min_distance * p.min_distance);
    assert!(all_finite(&out[0]));
    assert!(out[0].norm() <= cap * (1.0 + 1e-9), "clamp failed: {}", out[0].norm());
}

#[test]
fn accumulated_forces_cancel() {
    let bodies = vec![
        Body::new(NVec3::new(0.0, 0.0, 0.0), NVec3::zeros(), 3.0, 1.0),
        Body::new(NVec3::new(4.0, 1.0, 0.0), NVec3::zeros(), 1.0, 1.0),
        Body::new(NVec3::new(-2.0, 5.0, 3.0), NVec3::zeros(), 7.0, 1.0),
    ];
    let mut out = vec![NVec3::zeros(); 3];
    gravity_set(&test_params()).accumulate_forces(&bodies, &mut out);

    let net: NVec3 = out.iter().sum();
    assert!(net.norm() < 1e-12, "net force not zero: {:?}", net);
}

proptest! {
    #[test]
    fn force_law_is_antisymmetric(
        ax in -100.0..100.0f64, ay in -100.0..100.0f64, az in -100.0..100.0f64,
        bx in -100.0..100.0f64, by in -100.0..100.0f64, bz in -100.0..100.0f64,
        ma in 0.0..1.0e4f64, mb in 0.0..1.0e4f64,
    ) {
        let a = Body::new(NVec3::new(ax, ay, az), NVec3::zeros(), ma, 1.0);
        let b = Body::new(NVec3::new(bx, by, bz), NVec3::zeros(), mb, 1.0);
        let g = gravity(&test_params());

        let f_ab = g.force_between(&a, &b);
        let f_ba = g.force_between(&b, &a);

        prop_assert!(all_finite(&f_ab));
        prop_assert!((f_ab + f_ba).norm() <= 1e-9 * (1.0 + f_ab.norm()));
    }
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn zero_mass_body_is_inert() {
    // marker at the origin, mass 5 at distance 10
    let mut bodies = vec![
        Body::new(NVec3::zeros(), NVec3::zeros(), 0.0, 1.0),
        Body::new(NVec3::new(10.0, 0.0, 0.0), NVec3::zeros(), 5.0, 1.0),
    ];
    let before = bodies.clone();

    let frozen = integrate_system(&mut bodies, &gravity_set(&test_params()), 0.1, &mut Vec::new());

    assert!(frozen.is_empty());
    assert_eq!(bodies[0], before[0]);
    // nothing pulls on the heavy body either
    assert_eq!(bodies[1].v, NVec3::zeros());
    assert_eq!(bodies[1].x, before[1].x);
}

#[test]
fn forces_use_start_of_frame_positions() {
    let p = test_params();
    let forces = gravity_set(&p);
    let mut bodies = vec![
        Body::new(NVec3::new(0.0, 0.0, 0.0), NVec3::new(0.0, 1.0, 0.0), 10.0, 1.0),
        Body::new(NVec3::new(5.0, 0.0, 0.0), NVec3::zeros(), 4.0, 1.0),
        Body::new(NVec3::new(0.0, 0.0, 7.0), NVec3::new(1.0, 0.0, 0.0), 2.0, 1.0),
    ];
    let dt = 0.05;

    // reference: every force from the initial positions, then integrate
    let mut f = vec![NVec3::zeros(); 3];
    forces.accumulate_forces(&bodies, &mut f);
    let expected: Vec<NVec3> = bodies
        .iter()
        .zip(f.iter())
        .map(|(b, f)| {
            let v = b.v + (f / b.m) * dt;
            b.x + v * dt
        })
        .collect();

    integrate_system(&mut bodies, &forces, dt, &mut Vec::new());

    for (b, x) in bodies.iter().zip(expected.iter()) {
        assert_eq!(b.x, *x);
    }
}

#[test]
fn circular_orbit_stays_bounded() {
    let p = test_params();
    let forces = gravity_set(&p);
    let big_m = 1000.0;
    let r = 10.0;
    let v = (p.g * big_m / r).sqrt();

    let mut bodies = vec![
        Body::new(NVec3::zeros(), NVec3::zeros(), big_m, 1.0),
        Body::new(NVec3::new(r, 0.0, 0.0), NVec3::new(0.0, 0.0, v), 1.0, 1.0),
    ];
    let mut scratch = Vec::new();

    // about 1.5 orbits
    let dt = 1.0e-3;
    for _ in 0..10_000 {
        integrate_system(&mut bodies, &forces, dt, &mut scratch);
        let d = (bodies[1].x - bodies[0].x).norm();
        assert!((d - r).abs() < 0.02 * r, "orbit drifted to {}", d);
    }
}

#[test]
fn integration_is_deterministic() {
    let start = vec![
        Body::new(NVec3::new(0.0, 0.0, 0.0), NVec3::zeros(), 500.0, 1.0),
        Body::new(NVec3::new(10.0, 0.0, 0.0), NVec3::new(0.0, 0.0, 7.0), 3.0, 1.0),
        Body::new(NVec3::new(-20.0, 1.0, 4.0), NVec3::new(0.0, 0.5, -4.0), 9.0, 1.0),
    ];
    let dts = [0.016, 0.017, 0.015, 0.033, 0.001];
    let forces = gravity_set(&test_params());

    let run = || {
        let mut bodies = start.clone();
        let mut scratch = Vec::new();
        for _ in 0..200 {
            for dt in dts {
                integrate_system(&mut bodies, &forces, dt, &mut scratch);
            }
        }
        bodies
    };

    let a = run();
    let b = run();
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.x, y.x);
        assert_eq!(x.v, y.v);
    }
}

#[test]
fn non_finite_step_freezes_body() {
    let mut bodies = vec![Body::new(NVec3::zeros(), NVec3::new(1.0e308, 0.0, 0.0), 1.0, 1.0)];
    let frozen = integrate_system(&mut bodies, &gravity_set(&test_params()), 10.0, &mut Vec::new());

    assert_eq!(frozen, vec![(0, StateError::NonFinitePosition)]);
    assert!(bodies[0].frozen);
    assert!(all_finite(&bodies[0].x));
    assert!(all_finite(&bodies[0].v));
}

// ==================================================================================
// Trajectory tests
// ==================================================================================

#[test]
fn prediction_does_not_touch_live_bodies() {
    let bodies = vec![
        Body::new(NVec3::zeros(), NVec3::zeros(), 1000.0, 1.0),
        Body::new(NVec3::new(10.0, 0.0, 0.0), NVec3::new(0.0, 0.0, 10.0), 1.0, 1.0),
    ];
    let before = bodies.clone();

    let settings = TrajectorySettings { steps: 300, direction: TimeDirection::Forward };
    let paths = predict(&bodies, &gravity_set(&test_params()), 0.01, &settings);

    assert_eq!(bodies, before);
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| p.len() == 300));
}

#[test]
fn prediction_matches_live_integration() {
    let forces = gravity_set(&test_params());
    let mut bodies = vec![
        Body::new(NVec3::zeros(), NVec3::zeros(), 1000.0, 1.0),
        Body::new(NVec3::new(10.0, 0.0, 0.0), NVec3::new(0.0, 0.0, 10.0), 1.0, 1.0),
    ];
    let dt = 0.01;
    let settings = TrajectorySettings { steps: 50, ..Default::default() };
    let paths = predict(&bodies, &forces, dt, &settings);

    let mut scratch = Vec::new();
    for step in 0..50 {
        integrate_system(&mut bodies, &forces, dt, &mut scratch);
        assert_eq!(paths[1].points[step].position, bodies[1].x);
    }
}

#[test]
fn backward_prediction_retraces_path() {
    let forces = gravity_set(&test_params());
    let bodies = vec![
        Body::new(NVec3::zeros(), NVec3::zeros(), 1000.0, 1.0),
        Body::new(NVec3::new(10.0, 0.0, 0.0), NVec3::new(0.0, 0.0, 10.0), 1.0, 1.0),
    ];
    let fwd = predict(&bodies, &forces, 0.01, &TrajectorySettings { steps: 10, direction: TimeDirection::Forward });
    let back = predict(&bodies, &forces, 0.01, &TrajectorySettings { steps: 10, direction: TimeDirection::Backward });

    // orbiting +z forward means -z backward
    assert!(fwd[1].points[9].position.z > 0.0);
    assert!(back[1].points[9].position.z < 0.0);
}

#[test]
fn zero_mass_prediction_stays_put() {
    let bodies = vec![
        Body::new(NVec3::new(1.0, 2.0, 3.0), NVec3::new(5.0, 0.0, 0.0), 0.0, 1.0),
        Body::new(NVec3::new(10.0, 0.0, 0.0), NVec3::zeros(), 100.0, 1.0),
    ];
    let paths = predict(&bodies, &gravity_set(&test_params()), 0.1, &TrajectorySettings { steps: 20, ..Default::default() });

    assert!(paths[0].positions().all(|p| p == NVec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn overflowing_snapshot_repeats_last_position() {
    let bodies = vec![Body::new(NVec3::zeros(), NVec3::new(1.0e308, 0.0, 0.0), 1.0, 1.0)];
    let settings = TrajectorySettings { steps: 5, ..Default::default() };
    let paths = predict(&bodies, &gravity_set(&test_params()), 1.0, &settings);

    let points: Vec<NVec3> = paths[0].positions().collect();
    assert_eq!(points.len(), 5);
    assert!(points.iter().all(all_finite));
    assert_eq!(points[0].x, 1.0e308);
    assert!(points[1..].iter().all(|p| *p == points[0]));
}

#[test]
fn stalled_snapshot_stops_pulling() {
    // the runaway overflows on its first step and never moves again
    let bodies = vec![
        Body::new(NVec3::new(100.0, 0.0, 0.0), NVec3::new(0.0, 0.0, 1.0e308), 1.0, 1.0),
        Body::new(NVec3::zeros(), NVec3::zeros(), 1.0, 1.0),
    ];
    let settings = TrajectorySettings { steps: 5, ..Default::default() };
    let paths = predict(&bodies, &gravity_set(&test_params()), 10.0, &settings);

    assert!(paths[0].positions().all(|p| p == NVec3::new(100.0, 0.0, 0.0)));

    // one kick of 1e-4 * 10 in the first step, then a constant drift
    for (k, p) in paths[1].positions().enumerate() {
        let expected = (k + 1) as f64 * 1.0e-2;
        assert!((p.x - expected).abs() < 1e-12, "step {}: x = {}", k, p.x);
    }
}

// ==================================================================================
// Grid tests
// ==================================================================================

#[test]
fn grid_ceiling_is_zero() {
    let mut grid = Grid::new(GridConfig { size: 100.0, divisions: 25 }).unwrap();
    let bodies = vec![
        Body::new(NVec3::new(0.0, 0.0, 0.0), NVec3::zeros(), 10_000.0, 1.0),
        Body::new(NVec3::new(30.0, 0.0, -10.0), NVec3::zeros(), 500.0, 1.0),
        Body::new(NVec3::new(-25.0, 3.0, 20.0), NVec3::zeros(), 0.0, 1.0),
    ];
    grid.deform(&bodies, &WellModel::new(1.0), Some(NVec3::new(7.5, 3.0, -2.25)));

    assert_eq!(grid.max_height(), Some(0.0));
    assert!(grid.vertices().iter().all(all_finite));
    assert!(grid.vertices().iter().any(|v| v.y < 0.0));
}

#[test]
fn grid_survives_mass_inside_horizon() {
    let mut grid = Grid::new(GridConfig { size: 10.0, divisions: 10 }).unwrap();
    // rs = 2 * 1e9 / 1e4 = 2e5, every vertex sits inside it
    let bodies = vec![Body::new(NVec3::zeros(), NVec3::zeros(), 1.0e9, 1.0)];
    grid.deform(&bodies, &WellModel::new(1.0), None);

    assert!(grid.vertices().iter().all(all_finite));
    assert_eq!(grid.max_height(), Some(0.0));
}

#[test]
fn grid_rebuild_changes_lattice() {
    let mut grid = Grid::new(GridConfig { size: 10.0, divisions: 2 }).unwrap();
    assert_eq!(grid.segments().count(), 12);

    grid.rebuild(GridConfig { size: 10.0, divisions: 3 }).unwrap();
    assert_eq!(grid.segments().count(), 24);
    assert!(grid.rebuild(GridConfig { size: 10.0, divisions: 0 }).is_err());
    // a rejected rebuild keeps the old lattice
    assert_eq!(grid.config().divisions, 3);
}

// ==================================================================================
// Simulation / command tests
// ==================================================================================

#[test]
fn loading_smaller_scenario_clears_selection() {
    let five: Vec<Body> = (0..5)
        .map(|i| Body::new(NVec3::new(i as f64 * 10.0, 0.0, 0.0), NVec3::zeros(), 1.0, 1.0))
        .collect();
    let mut sim = simulation(&five);
    let settings = RunSettings::default();

    sim.submit(Command::SelectIndex(4));
    sim.frame(&frame(0.016), &settings);
    assert!(sim.selected_body().is_some());

    sim.submit(Command::LoadScenario(spec_of(&two_bodies(10.0, 1.0, 1.0))));
    sim.frame(&frame(0.016), &settings);

    assert_eq!(sim.bodies().len(), 2);
    assert_eq!(sim.selection(), None);
    assert!(sim.selected_body().is_none());

    // out of range index selects nothing
    sim.submit(Command::SelectIndex(4));
    sim.frame(&frame(0.016), &settings);
    assert_eq!(sim.selection(), None);
}

#[test]
fn selection_follows_body_across_removals() {
    let three: Vec<Body> = (0..3)
        .map(|i| Body::new(NVec3::new(i as f64 * 10.0, 0.0, 0.0), NVec3::zeros(), 1.0, 1.0))
        .collect();
    let mut sim = simulation(&three);
    let settings = RunSettings { paused: true, ..Default::default() };

    let first = sim.bodies().handle_at(0).unwrap();
    let last = sim.bodies().handle_at(2).unwrap();
    sim.submit(Command::Select(Some(last)));
    sim.submit(Command::RemoveBody(first));
    sim.frame(&frame(0.016), &settings);

    assert_eq!(sim.selection(), Some(last));
    assert_eq!(sim.selected_body().map(|b| b.x.x), Some(20.0));

    sim.submit(Command::RemoveBody(last));
    sim.frame(&frame(0.016), &settings);
    assert_eq!(sim.selection(), None);
}

#[test]
fn commands_wait_for_next_frame() {
    let mut sim = simulation(&two_bodies(10.0, 1.0, 1.0));
    sim.submit(Command::AddBody(BodySpec::new(NVec3::new(0.0, 5.0, 0.0), NVec3::zeros(), 1.0, 1.0)));
    assert_eq!(sim.bodies().len(), 2);

    sim.frame(&frame(0.0), &RunSettings::default());
    assert_eq!(sim.bodies().len(), 3);
}

#[test]
fn stale_and_invalid_commands_are_reported() {
    let mut sim = simulation(&two_bodies(10.0, 1.0, 1.0));
    let gone = sim.bodies().handle_at(0).unwrap();
    sim.submit(Command::RemoveBody(gone));
    sim.submit(Command::RemoveBody(gone));
    sim.submit(Command::AddBody(BodySpec::new(NVec3::zeros(), NVec3::zeros(), -3.0, 1.0)));
    sim.frame(&frame(0.0), &RunSettings::default());

    let rejected = sim
        .drain_diagnostics()
        .into_iter()
        .filter(|d| matches!(d, Diagnostic::CommandRejected(_)))
        .count();
    assert_eq!(rejected, 2);
    assert_eq!(sim.bodies().len(), 1);
}

#[test]
fn edit_keeps_handle() {
    let mut sim = simulation(&two_bodies(10.0, 1.0, 1.0));
    let h = sim.bodies().handle_at(1).unwrap();
    sim.submit(Command::EditBody(h, BodySpec::new(NVec3::new(3.0, 0.0, 0.0), NVec3::zeros(), 42.0, 2.0)));
    sim.frame(&frame(0.0), &RunSettings::default());

    assert_eq!(sim.body(h).map(|b| b.m), Some(42.0));
}

#[test]
fn paused_frame_still_predicts_without_moving() {
    let mut sim = simulation(&two_bodies(10.0, 100.0, 1.0));
    let before: Vec<Body> = sim.bodies().bodies().to_vec();
    let settings = RunSettings { paused: true, ..Default::default() };

    let report = sim.frame(&frame(0.016), &settings);

    assert_eq!(report.dt_scaled, 0.0);
    assert_eq!(sim.bodies().bodies(), &before[..]);
    assert!(sim.trajectories().all(|(_, t)| t.len() == settings.trajectory.steps));
}

#[test]
fn frame_scales_time_by_speed() {
    let mut sim = simulation(&two_bodies(10.0, 1.0, 1.0));
    let settings = RunSettings { sim_speed: 3.0, ..Default::default() };
    let report = sim.frame(&frame(0.5), &settings);
    assert_eq!(report.dt_scaled, 1.5);
    assert_eq!(sim.time(), 1.5);
}

#[test]
fn frozen_body_is_reported_and_excluded() {
    let bodies = vec![
        Body::new(NVec3::zeros(), NVec3::new(1.0e308, 0.0, 0.0), 1.0, 1.0),
        Body::new(NVec3::new(10.0, 0.0, 0.0), NVec3::zeros(), 1.0, 1.0),
    ];
    let mut sim = simulation(&bodies);
    let runaway = sim.bodies().handle_at(0).unwrap();
    let settings = RunSettings { sim_speed: 10.0, ..Default::default() };

    let report = sim.frame(&frame(1.0), &settings);
    assert_eq!(report.frozen, 1);
    assert!(sim.drain_diagnostics().iter().any(|d| matches!(d, Diagnostic::BodyFrozen { handle, .. } if *handle == runaway)));

    let v_after = sim.bodies().bodies()[1].v;

    // later frames stay finite everywhere
    for _ in 0..10 {
        sim.frame(&frame(0.016), &RunSettings::default());
    }
    // reported once, not every frame
    assert!(!sim.drain_diagnostics().iter().any(|d| matches!(d, Diagnostic::BodyFrozen { .. })));
    assert!(sim.bodies().bodies().iter().all(|b| all_finite(&b.x) && all_finite(&b.v)));
    assert!(sim.grid().vertices().iter().all(all_finite));
    assert!(sim.trajectories().all(|(_, t)| t.positions().all(|p| all_finite(&p))));
    // the other body no longer feels the frozen one
    assert_eq!(sim.bodies().bodies()[1].v, v_after);
}

// ==================================================================================
// Scenario file tests
// ==================================================================================

const SCENARIO: &str = r#"
parameters:
  G: 1.0
  sim_speed: 2.0
  trajectory_steps: 50
grid:
  size: 50.0
  divisions: 10
bodies:
  - x: [0.0, 0.0, 0.0]
    v: [0.0, 0.0, 0.0]
    m: 1000.0
    radius: 3.0
    color: [1.0, 0.8, 0.2]
    glows: true
  - x: [10.0, 0.0, 0.0]
    v: [0.0, 0.0, 10.0]
    m: 1.0
    radius: 1.0
"#;

#[test]
fn scenario_file_builds_simulation() {
    let cfg = ScenarioConfig::from_yaml_str(SCENARIO).unwrap();
    let scenario = Scenario::build_scenario(cfg).unwrap();

    assert_eq!(scenario.sim_speed, 2.0);
    assert_eq!(scenario.trajectory_steps, 50);
    assert_eq!(scenario.grid.divisions, 10);

    let sim = Simulation::new(scenario.spec, scenario.grid).unwrap();
    let sun = &sim.bodies().bodies()[0];
    assert!(sun.glows);
    assert_eq!(sun.color, [1.0, 0.8, 0.2]);
}

#[test]
fn scenario_with_bad_gravity_is_rejected() {
    let cfg = ScenarioConfig::from_yaml_str(&SCENARIO.replace("G: 1.0", "G: -1.0")).unwrap();
    assert!(Scenario::build_scenario(cfg).is_err());
}

#[test]
fn scenario_with_bad_well_constants_is_rejected() {
    let flat = SCENARIO.replace("divisions: 10", "divisions: 10\n  speed_of_light: 0.0");
    let cfg = ScenarioConfig::from_yaml_str(&flat).unwrap();
    assert!(matches!(
        Scenario::build_scenario(cfg),
        Err(ConfigError::InvalidParameter { name: "speed_of_light", .. })
    ));

    let shrunk = SCENARIO.replace("divisions: 10", "divisions: 10\n  unit_scale: -1.0");
    let cfg = ScenarioConfig::from_yaml_str(&shrunk).unwrap();
    assert!(matches!(
        Scenario::build_scenario(cfg),
        Err(ConfigError::InvalidParameter { name: "unit_scale", .. })
    ));
}

#[test]
fn store_replace_is_atomic() {
    let mut store = BodyStore::new();
    let old: Vec<_> = two_bodies(1.0, 1.0, 1.0).into_iter().map(|b| store.insert(b)).collect();
    let new = store.replace_all(two_bodies(4.0, 2.0, 2.0));

    assert!(old.iter().all(|h| !store.contains(*h)));
    assert!(new.iter().all(|h| store.contains(*h)));
    assert_eq!(store.bodies().iter().map(|b| b.m).sum::<f64>(), 4.0);
}
