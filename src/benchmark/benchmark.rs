use std::time::Instant;

use tracing::info;

use crate::error::SimError;
use crate::simulation::forces::{Acceleration, NewtonianGravity};
use crate::simulation::engine::run_simulation;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3, System, Vector};
use crate::simulation::workers::Workers;

/// Helper to build a random System of size `n`
/// mass in [0.1, 1.0), position and velocity components in [0, 1)
pub fn random_system(n: usize, seed: u64) -> Result<System, SimError> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut bodies = Vec::with_capacity(n);

    for _ in 0..n {
        let x = Vector::cartesian(rng.f64(), rng.f64(), rng.f64());
        let v = Vector::cartesian(rng.f64(), rng.f64(), rng.f64());
        let m = 0.1 + rng.f64() * (1.0 - 0.1);
        bodies.push(Body::new(m, x, v)?);
    }

    Ok(System::new(bodies))
}

/// Full simulation runs for a sweep of body counts
/// N = 10, 50, 250, 1250, 6250
pub fn bench_simulation(workers: &Workers) -> Result<(), SimError> {
    let params = Parameters {
        t_end: 10.0,
        h0: 0.01,
        G: 1.0,
    };

    info!("starting benchmark");
    let mut n = 10;
    while n <= 10_000 {
        let mut sys = random_system(n, 42)?;
        info!(n, "simulating");

        let t0 = Instant::now();
        run_simulation(&mut sys, &params, "benchmark.txt", workers)?;
        let elapsed = t0.elapsed().as_secs_f64();

        info!(n, elapsed_s = elapsed, "done");
        println!("N = {n:5}, time = {elapsed:10.3} s");
        n *= 5;
    }
    info!("benchmark completed");
    Ok(())
}

/// Time one sequential and one parallel evaluation of the accelerations
pub fn bench_gravity(workers: &Workers) -> Result<(), SimError> {
    // Different system sizes to test
    let ns = [200, 400, 800, 1600, 3200, 6400];
    let gravity = NewtonianGravity { G: 1.0 };

    for n in ns {
        let sys = random_system(n, 7)?;
        let mut out = vec![NVec3::zeros(); n];

        // Warm up
        gravity.acceleration(&sys.bodies, workers, &mut out)?;

        let t0 = Instant::now();
        gravity.acceleration_sequential(&sys.bodies, &mut out)?;
        let dt_seq = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        gravity.acceleration(&sys.bodies, workers, &mut out)?;
        let dt_par = t1.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, sequential = {:8.6} s, parallel ({} workers) = {:8.6} s",
            dt_seq,
            workers.count(),
            dt_par
        );
    }
    Ok(())
}
