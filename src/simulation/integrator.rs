//! Fixed-step classical Runge–Kutta (RK4) integrator
//!
//! Each stage evaluates forces on its own snapshot of the system: a fresh
//! body array built from the live bodies plus a scaled derivative. The live
//! bodies are only touched by the first force evaluation and by the final
//! combined update. Every parallel pass returns before the next one starts,
//! so a stage always sees the complete result of the stage before it.

use tracing::trace;

use super::collisions::handle_collisions;
use super::forces::AccelSet;
use super::params::Parameters;
use super::states::{Body, NVec3, System};
use super::workers::Workers;
use crate::error::SimError;

/// One RK4 stage estimate: `dx/dt` (velocity) and `dv/dt` (acceleration) per body
#[derive(Debug, Clone)]
pub struct Derivative {
    pub dx: Vec<NVec3>,
    pub dv: Vec<NVec3>,
}

impl Derivative {
    /// Read the derivative off bodies whose accelerations are up to date
    pub fn of(bodies: &[Body]) -> Self {
        Self {
            dx: bodies.iter().map(|b| b.v.e).collect(),
            dv: bodies.iter().map(|b| b.a.e).collect(),
        }
    }
}

/// Deep copy of `base`, each body advanced by `scale * k`
pub fn advance_snapshot(base: &[Body], k: &Derivative, scale: f64, workers: &Workers) -> Result<Vec<Body>, SimError> {
    let chunks = workers.map_ranges(base.len(), |range| {
        Ok(range
            .map(|i| {
                let mut b = base[i].deep_copy();
                b.x.e += scale * k.dx[i];
                b.v.e += scale * k.dv[i];
                b
            })
            .collect::<Vec<Body>>())
    })?;
    Ok(chunks.into_iter().flatten().collect())
}

/// Evaluate forces on `snapshot` and read off its derivative
fn stage(snapshot: &mut [Body], forces: &AccelSet, workers: &Workers) -> Result<Derivative, SimError> {
    forces.update_accelerations(snapshot, workers)?;
    Ok(Derivative::of(snapshot))
}

/// Advance the system by one RK4 step of `params.h0`, then resolve any
/// collisions on the updated system.
///
/// Returns the number of collision pairs resolved. Any error aborts the
/// step; the live bodies are only modified once all four stages succeeded
/// (apart from their stored acceleration, which holds the k1 evaluation).
pub fn rk4_step(sys: &mut System, forces: &AccelSet, params: &Parameters, workers: &Workers) -> Result<usize, SimError> {
    let dt = params.h0;
    if sys.bodies.is_empty() { // no bodies, only time moves
        sys.t += dt;
        return Ok(0);
    }
    let half_dt = 0.5 * dt;

    // k1 at the current state
    let k1 = stage(&mut sys.bodies, forces, workers)?;

    // k2 at the midpoint reached with k1
    let mut s2 = advance_snapshot(&sys.bodies, &k1, half_dt, workers)?;
    let k2 = stage(&mut s2, forces, workers)?;
    drop(s2);

    // k3 at the midpoint reached with k2
    let mut s3 = advance_snapshot(&sys.bodies, &k2, half_dt, workers)?;
    let k3 = stage(&mut s3, forces, workers)?;
    drop(s3);

    // k4 at the end point reached with k3 (full step)
    let mut s4 = advance_snapshot(&sys.bodies, &k3, dt, workers)?;
    let k4 = stage(&mut s4, forces, workers)?;
    drop(s4);
    trace!(t = sys.t, "rk4 stages evaluated");

    // x += dt/6 (k1 + 2 k2 + 2 k3 + k4), same for v
    let sixth_dt = dt / 6.0;
    workers.for_each_chunk_mut(&mut sys.bodies, |start, chunk| {
        for (off, b) in chunk.iter_mut().enumerate() {
            let i = start + off;
            b.x.e += sixth_dt * (k1.dx[i] + 2.0 * k2.dx[i] + 2.0 * k3.dx[i] + k4.dx[i]);
            b.v.e += sixth_dt * (k1.dv[i] + 2.0 * k2.dv[i] + 2.0 * k3.dv[i] + k4.dv[i]);
        }
        Ok(())
    })?;
    sys.t += dt;

    handle_collisions(&mut sys.bodies, workers)
}
