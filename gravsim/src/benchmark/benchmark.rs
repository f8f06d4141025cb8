use std::time::Instant;

use crate::simulation::forces::{ForceSet, NewtonianGravity};
use crate::simulation::integrator::integrate_system;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};
use crate::simulation::trajectory::{predict, TrajectorySettings};

/// Helper to build a deterministic body list of size `n`
fn make_bodies(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let x = NVec3::new(
                (i_f * 0.37).sin() * 50.0,
                (i_f * 0.13).cos() * 5.0,
                (i_f * 0.07).sin() * 50.0,
            );
            Body::new(x, NVec3::zeros(), 1.0, 0.5)
        })
        .collect()
}

fn make_forces() -> ForceSet {
    let p = Parameters::default();
    ForceSet::new().with(NewtonianGravity {
        g: p.g,
        min_distance: p.min_distance,
    })
}

/// Time one full force accumulation for growing n
pub fn bench_forces() {
    let ns = [100, 200, 400, 800, 1600, 3200];
    let forces = make_forces();

    for n in ns {
        let bodies = make_bodies(n);
        let mut out = vec![NVec3::zeros(); n];

        // Warm up
        forces.accumulate_forces(&bodies, &mut out);

        let t0 = Instant::now();
        forces.accumulate_forces(&bodies, &mut out);
        let ms = t0.elapsed().as_secs_f64() * 1000.0;

        println!("N = {n:5}, forces = {ms:10.4} ms");
    }
}

/// Time the live integration pass (forces + kick/drift) for growing n
pub fn bench_step() {
    let ns = [100, 200, 400, 800, 1600, 3200];
    let steps = 5;
    let forces = make_forces();
    let dt = 1.0 / 60.0;

    for n in ns {
        let mut bodies = make_bodies(n);
        let mut scratch = Vec::new();

        // Warm-up
        integrate_system(&mut bodies, &forces, dt, &mut scratch);

        let t0 = Instant::now();
        for _ in 0..steps {
            integrate_system(&mut bodies, &forces, dt, &mut scratch);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("N = {n:5}, step = {ms:10.4} ms");
    }
}

/// Trajectory prediction cost against body count and step count
/// Output is CSV so it can be pasted straight into a spreadsheet
pub fn bench_trajectory_curve() {
    println!("N,steps,predict_ms");

    let forces = make_forces();
    let dt = 1.0 / 60.0;

    for n in (10..=100).step_by(10) {
        let bodies = make_bodies(n);
        for steps in [100, 250, 500, 1000] {
            let settings = TrajectorySettings { steps, ..Default::default() };

            let t0 = Instant::now();
            let paths = predict(&bodies, &forces, dt, &settings);
            let ms = t0.elapsed().as_secs_f64() * 1000.0;

            // keep the result alive so the work is not optimized out
            std::hint::black_box(paths);
            println!("{},{},{:.4}", n, steps, ms);
        }
    }
}
