//! Simulation driver
//!
//! Runs `floor(t_end / h0)` RK4 steps. Each step is one integrator advance
//! (which ends with its own collision pass), one more collision pass, and
//! one write of every body's position.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::SimError;
use crate::output::writer::StateWriter;
use crate::simulation::collisions::handle_collisions;
use crate::simulation::forces::AccelSet;
use crate::simulation::integrator::rk4_step;
use crate::simulation::params::Parameters;
use crate::simulation::states::System;
use crate::simulation::workers::Workers;

/// What a finished run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub collisions: usize,
}

/// Integrate `sys` for `params.t_end` and dump positions to `output` after
/// every step.
///
/// The output file is truncated before the first step. The first error, from
/// the physics or from the writer, ends the run.
pub fn run_simulation(
    sys: &mut System,
    params: &Parameters,
    output: impl AsRef<Path>,
    workers: &Workers,
) -> Result<RunSummary, SimError> {
    params.validate()?;
    let forces = AccelSet::newtonian(params.G);
    let mut writer = StateWriter::create(output)?;

    let steps = params.steps();
    info!(
        bodies = sys.len(),
        steps,
        dt = params.h0,
        workers = workers.count(),
        output = %writer.path().display(),
        "simulation started"
    );
    let start = Instant::now();

    let mut collisions = 0;
    for step in 0..steps {
        collisions += rk4_step(sys, &forces, params, workers)?;
        collisions += handle_collisions(&mut sys.bodies, workers)?;
        writer.write_state(&sys.bodies)?;
        debug!(step, t = sys.t, "step done");
    }

    info!(
        steps,
        collisions,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "simulation completed"
    );
    Ok(RunSummary { steps, collisions })
}
