//! Close-approach detection and elastic collision response
//!
//! Detection splits the unordered pair space `(i, j), i < j` (in row-major
//! order) into contiguous slices, one per worker. Every worker collects its
//! hits into a local list; once all workers are done the pairs are applied
//! one at a time on the calling thread, worker order first, then discovery
//! order. A body caught in several pairs is therefore never updated by two
//! threads at once.

use tracing::{trace, warn};

use crate::error::SimError;
use crate::simulation::states::Body;
use crate::simulation::workers::Workers;

/// Bodies closer than this are considered to be colliding
pub const COLLISION_THRESHOLD: f64 = 1e-8;

/// Indices `(i, j)` with `i < j` of two colliding bodies
pub type CollisionPair = (usize, usize);

/// Number of unordered pairs among `n` bodies
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Pair at position `k` of the row-major enumeration
/// `(0,1), (0,2), .., (0,n-1), (1,2), ..`
fn pair_at(mut k: usize, n: usize) -> CollisionPair {
    let mut i = 0;
    while k >= n - 1 - i {
        k -= n - 1 - i;
        i += 1;
    }
    (i, i + 1 + k)
}

/// Find every pair of bodies closer than [`COLLISION_THRESHOLD`].
pub fn detect_collisions(bodies: &[Body], workers: &Workers) -> Result<Vec<CollisionPair>, SimError> {
    let n = bodies.len();
    let total = pair_count(n);
    if total == 0 {
        return Ok(Vec::new());
    }

    let found = workers.map_ranges(total, |range| {
        let mut hits = Vec::new();
        let (mut i, mut j) = pair_at(range.start, n);
        for _ in range {
            let (_, dist) = bodies[i].x.distance_to(&bodies[j].x)?;
            if dist < COLLISION_THRESHOLD {
                hits.push((i, j));
            }
            j += 1;
            if j == n {
                i += 1;
                j = i + 1;
            }
        }
        Ok(hits)
    })?;

    Ok(found.into_iter().flatten().collect())
}

/// 1-D elastic collision of masses `m1`, `m2` with velocities `v1`, `v2`.
/// Returns the post-collision velocities.
pub fn elastic_collision(m1: f64, m2: f64, v1: f64, v2: f64) -> (f64, f64) {
    let total = m1 + m2;
    let v1_new = ((m1 - m2) * v1 + 2.0 * m2 * v2) / total;
    let v2_new = ((m2 - m1) * v2 + 2.0 * m1 * v1) / total;
    (v1_new, v2_new)
}

/// Apply the elastic response to bodies `i` and `j`, each axis on its own.
///
/// All three axes read the pre-collision velocities. Positions and masses
/// are left alone.
pub fn resolve_collision(bodies: &mut [Body], (i, j): CollisionPair) {
    let (m1, m2) = (bodies[i].m, bodies[j].m);
    let v1 = bodies[i].v.e;
    let v2 = bodies[j].v.e;

    for axis in 0..3 {
        let (a, b) = elastic_collision(m1, m2, v1[axis], v2[axis]);
        bodies[i].v.e[axis] = a;
        bodies[j].v.e[axis] = b;
    }
}

/// Detect and resolve all collisions in `bodies`.
/// Returns the number of pairs resolved.
pub fn handle_collisions(bodies: &mut [Body], workers: &Workers) -> Result<usize, SimError> {
    let pairs = detect_collisions(bodies, workers)?;
    trace!(pairs = pairs.len(), "collision detection done");

    for &pair in &pairs {
        warn!(i = pair.0, j = pair.1, "resolving collision");
        resolve_collision(bodies, pair);
    }
    Ok(pairs.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_enumeration_is_row_major() {
        let n = 5;
        let expected: Vec<CollisionPair> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        let got: Vec<CollisionPair> = (0..pair_count(n)).map(|k| pair_at(k, n)).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn pair_count_small() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(4), 6);
    }
}
