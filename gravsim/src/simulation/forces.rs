//! Force contributors for the n-body engine
//!
//! Defines the pairwise `ForceLaw` trait, direct Newtonian gravity with a
//! minimum-distance clamp, and `ForceSet`, which sums every term into one
//! force vector per body.

use crate::simulation::states::{NVec3, PointMass};

/// Pairwise force between two point masses.
///
/// Returns the force exerted **on `a` by `b`**. Implementations must be
/// pure and antisymmetric: `pair_force(a, b) == -pair_force(b, a)`.
pub trait ForceLaw {
    fn pair_force(&self, xa: &NVec3, ma: f64, xb: &NVec3, mb: f64) -> NVec3;
}

/// Newtonian gravity, `F = G * ma * mb / d^2` along `b - a`.
///
/// Separations below `min_distance` are evaluated at `min_distance`.
/// Exactly coincident positions have no direction and give zero force.
#[derive(Debug, Clone)]
pub struct NewtonianGravity {
    pub g: f64, // gravitational constant
    pub min_distance: f64, // distance clamp
}

impl NewtonianGravity {
    /// Force on `a` by `b`; zero when either does not interact
    pub fn force_between<A: PointMass, B: PointMass>(&self, a: &A, b: &B) -> NVec3 {
        if !a.interacts() || !b.interacts() {
            return NVec3::zeros();
        }
        self.pair_force(&a.pos(), a.mass(), &b.pos(), b.mass())
    }
}

impl ForceLaw for NewtonianGravity {
    fn pair_force(&self, xa: &NVec3, ma: f64, xb: &NVec3, mb: f64) -> NVec3 {
        // r points from a to b, a is pulled along +r
        let r = xb - xa;
        let dist = r.norm();
        if dist == 0.0 || !dist.is_finite() {
            return NVec3::zeros();
        }

        let d = dist.max(self.min_distance);
        let magnitude = self.g * (ma * mb) / (d * d);

        (r / dist) * magnitude
    }
}

/// Collection of force terms (gravity, drag, etc.)
/// Each term implements [`ForceLaw`] and their contributions are summed
/// into a single force vector per body
pub struct ForceSet {
    terms: Vec<Box<dyn ForceLaw + Send + Sync>>,
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Add a force term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: ForceLaw + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute the net force on every point mass
    /// - `out[i]` is overwritten with the sum over all terms and all partners of `i`
    /// - non-interacting entries get zero and contribute nothing
    ///
    /// Reads positions only, so callers can finish this pass for the whole
    /// system before moving anything.
    pub fn accumulate_forces<P: PointMass>(&self, points: &[P], out: &mut [NVec3]) {
        debug_assert_eq!(points.len(), out.len());

        // Zero buffer
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }

        let n = points.len();
        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            let pi = &points[i];
            if !pi.interacts() {
                continue;
            }
            let (xi, mi) = (pi.pos(), pi.mass());

            for j in (i + 1)..n {
                let pj = &points[j];
                if !pj.interacts() {
                    continue;
                }
                let (xj, mj) = (pj.pos(), pj.mass());

                for term in &self.terms {
                    // equal and opposite
                    let f = term.pair_force(&xi, mi, &xj, mj);
                    out[i] += f;
                    out[j] -= f;
                }
            }
        }
    }
}
