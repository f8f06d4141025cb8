//! Time integration for the N-body system
//!
//! Semi-implicit (symplectic) Euler: velocity is kicked first, then the
//! position drifts with the *new* velocity. The live step runs in two
//! passes, all forces first and then every body integrated, so no body
//! sees a half-updated neighbour.

use crate::error::StateError;
use crate::simulation::forces::ForceSet;
use crate::simulation::states::{Body, NVec3};

fn finite(v: &NVec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// One semi-implicit Euler step for a single point mass.
///
/// Returns the new `(position, velocity)` or the first quantity that went
/// non-finite. The inputs are left untouched either way so callers can
/// keep the last good state.
pub fn semi_implicit_euler(
    x: &NVec3,
    v: &NVec3,
    m: f64,
    force: &NVec3,
    dt: f64,
) -> Result<(NVec3, NVec3), StateError> {
    if !finite(force) {
        return Err(StateError::NonFiniteForce);
    }

    // a = F / m
    // v_n+1 = v_n + dt * a
    let a = force / m;
    let v_new = v + a * dt;
    if !finite(&v_new) {
        return Err(StateError::NonFiniteVelocity);
    }

    // x_n+1 = x_n + dt * v_n+1
    let x_new = x + v_new * dt;
    if !finite(&x_new) {
        return Err(StateError::NonFinitePosition);
    }

    Ok((x_new, v_new))
}

/// Advance every active body by `dt_scaled`.
///
/// `scratch` is the force buffer, resized as needed and reused across frames.
/// Zero-mass and frozen bodies are skipped. A body whose step goes
/// non-finite keeps its last finite state, gets `frozen = true` and is
/// listed in the returned vector by index.
pub fn integrate_system(
    bodies: &mut [Body],
    forces: &ForceSet,
    dt_scaled: f64,
    scratch: &mut Vec<NVec3>,
) -> Vec<(usize, StateError)> {
    let mut frozen = Vec::new();
    let n = bodies.len();
    if n == 0 || dt_scaled <= 0.0 { // nothing moves
        return frozen;
    }

    scratch.resize(n, NVec3::zeros());

    // Pass 1: forces from the positions at the start of the frame
    forces.accumulate_forces(&*bodies, scratch);

    // Pass 2: kick + drift
    for (i, (b, f)) in bodies.iter_mut().zip(scratch.iter()).enumerate() {
        if !b.is_active() {
            continue;
        }
        match semi_implicit_euler(&b.x, &b.v, b.m, f, dt_scaled) {
            Ok((x, v)) => {
                b.x = x;
                b.v = v;
            }
            Err(e) => {
                b.frozen = true;
                frozen.push((i, e));
            }
        }
    }

    frozen
}
