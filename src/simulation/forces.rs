//! Force / acceleration contributors for the n-body engine
//!
//! Direct O(N^2) Newtonian gravity with a fixed softening floor. Parallel
//! evaluation follows one pattern throughout: workers fill disjoint
//! per-range buffers from an immutable view of the bodies, then the caller
//! reduces those buffers serially.

use std::ops::Range;

use crate::error::SimError;
use crate::simulation::states::{Body, NVec3};
use crate::simulation::workers::Workers;

/// Softening length added in quadrature to the squared separation
pub const SOFTENING: f64 = 1e-8;

/// Collection of acceleration terms. Their contributions are summed into a
/// single acceleration vector per body.
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Set holding only direct Newtonian gravity
    #[allow(non_snake_case)]
    pub fn newtonian(G: f64) -> Self {
        Self::new().with(NewtonianGravity { G })
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations for all `bodies`
    /// - `out[i]` is zeroed, then set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, bodies: &[Body], workers: &Workers, out: &mut [NVec3]) -> Result<(), SimError> {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        for term in &self.terms {
            term.acceleration(bodies, workers, out)?;
        }
        Ok(())
    }

    /// Evaluate accelerations and store them on the bodies themselves.
    ///
    /// `bodies` is only read while workers run; each body's acceleration is
    /// reset and written afterwards, on the calling thread.
    pub fn update_accelerations(&self, bodies: &mut [Body], workers: &Workers) -> Result<(), SimError> {
        let mut out = vec![NVec3::zeros(); bodies.len()];
        self.accumulate_accels(bodies, workers, &mut out)?;
        for (b, a) in bodies.iter_mut().zip(out) {
            b.reset_acceleration();
            b.a.e += a;
        }
        Ok(())
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Acceleration sources. Implementations add their contribution into
/// `out[i]` for each body.
pub trait Acceleration {
    fn acceleration(&self, bodies: &[Body], workers: &Workers, out: &mut [NVec3]) -> Result<(), SimError>;
}

/// Newtonian gravity, direct summation
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
}

impl NewtonianGravity {
    /// Single-threaded reference evaluation, same summation per body as the
    /// parallel path
    pub fn acceleration_sequential(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<(), SimError> {
        let n = bodies.len();
        for (i, b) in bodies.iter().enumerate() {
            out[i] += b.acceleration_from(i, bodies, 0..n, self.G)?;
        }
        Ok(())
    }
}

impl Acceleration for NewtonianGravity {
    /// With at least as many bodies as workers, bodies are split into
    /// contiguous ranges and each worker computes the full acceleration of
    /// the bodies in its range into its own buffer.
    ///
    /// With fewer bodies than workers that split would leave workers idle,
    /// so each body's sum is instead split over the other bodies
    /// ([`Body::acceleration_split`]). Both routes add the same terms.
    fn acceleration(&self, bodies: &[Body], workers: &Workers, out: &mut [NVec3]) -> Result<(), SimError> {
        check_gravitational_constant(self.G)?;
        let n = bodies.len();
        if n == 0 {
            return Ok(());
        }

        if n < workers.count() {
            for (i, slot) in out.iter_mut().enumerate() {
                *slot += bodies[i].acceleration_split(i, bodies, self.G, workers)?;
            }
            return Ok(());
        }

        let partials = workers.map_ranges(n, |range| {
            range
                .map(|i| bodies[i].acceleration_from(i, bodies, 0..n, self.G))
                .collect::<Result<Vec<NVec3>, SimError>>()
        })?;

        // ranges are contiguous and in worker order
        for (slot, a) in out.iter_mut().zip(partials.into_iter().flatten()) {
            *slot += a;
        }
        Ok(())
    }
}

impl Body {
    /// Acceleration `self` feels from `other`:
    ///
    /// ```text
    /// |a| = G * m_other / (d^2 + SOFTENING^2)
    /// a   = |a| * displacement / d
    /// ```
    ///
    /// Only the magnitude is softened. Exactly coincident bodies have no
    /// direction and contribute nothing; the collision pass deals with them.
    #[allow(non_snake_case)]
    pub fn pull_from(&self, other: &Body, G: f64) -> Result<NVec3, SimError> {
        let (d, dist) = self.x.distance_to(&other.x)?;
        if dist == 0.0 {
            return Ok(NVec3::zeros());
        }
        let softened_d2 = dist * dist + SOFTENING * SOFTENING;
        let a_mag = G * other.m / softened_d2;
        Ok(a_mag * (d / dist))
    }

    /// Sum of pulls from `bodies[range]`, skipping `bodies[me]` (which is
    /// `self`).
    #[allow(non_snake_case)]
    pub fn acceleration_from(&self, me: usize, bodies: &[Body], range: Range<usize>, G: f64) -> Result<NVec3, SimError> {
        check_gravitational_constant(G)?;
        let mut acc = NVec3::zeros();
        for j in range {
            if j == me {
                continue;
            }
            acc += self.pull_from(&bodies[j], G)?;
        }
        Ok(acc)
    }

    /// Acceleration on `self` from every other body in `bodies`, with the
    /// other bodies split into contiguous ranges across `workers`.
    ///
    /// Each worker returns a partial vector; the partials are summed here
    /// once all workers are done. Used by [`NewtonianGravity`] when there are
    /// fewer bodies than workers.
    #[allow(non_snake_case)]
    pub fn acceleration_split(&self, me: usize, bodies: &[Body], G: f64, workers: &Workers) -> Result<NVec3, SimError> {
        check_gravitational_constant(G)?;
        let partials = workers.map_ranges(bodies.len(), |range| self.acceleration_from(me, bodies, range, G))?;
        Ok(partials.into_iter().sum())
    }

    /// Accumulate the acceleration from every other body in `bodies` into
    /// `self.a`, via [`Body::acceleration_split`].
    ///
    /// The caller zeroes `self.a` first (see [`Body::reset_acceleration`]).
    /// `self` is a copy of `bodies[me]`; whole-system evaluation goes through
    /// [`AccelSet::update_accelerations`] instead.
    #[allow(non_snake_case)]
    pub fn update_acceleration(&mut self, me: usize, bodies: &[Body], G: f64, workers: &Workers) -> Result<(), SimError> {
        let total = self.acceleration_split(me, bodies, G, workers)?;
        self.a.e += total;
        Ok(())
    }
}

#[allow(non_snake_case)]
fn check_gravitational_constant(G: f64) -> Result<(), SimError> {
    if G > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidGravitationalConstant(G))
    }
}
