//! Build a fully-initialized simulation scenario from configuration
//!
//! Takes a `ScenarioConfig` (file-facing) and produces the runtime bundle:
//! - numerical parameters (`Parameters`)
//! - system state (`System` with Cartesian bodies at t = 0)
//! - the worker pool
//! - the output path
//!
//! Every validation error surfaces here, before any step runs.

use std::path::PathBuf;

use tracing::info;

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::error::SimError;
use crate::simulation::engine::{run_simulation, RunSummary};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, CoordinateSystem, System, Vector};
use crate::simulation::workers::Workers;

pub struct Scenario {
    pub parameters: Parameters,
    pub system: System,
    pub workers: Workers,
    pub output: PathBuf,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, SimError> {
        let s_cfg = cfg.simulator_config;
        let parameters = Parameters {
            t_end: s_cfg.total_time,
            h0: s_cfg.dt,
            G: s_cfg.gravitational_constant,
        };
        parameters.validate()?;

        // Bodies: map `BodyConfig` -> runtime `Body`, converting to Cartesian
        let coords = cfg.coordinate_type;
        let bodies = cfg
            .bodies
            .iter()
            .map(|bc| body_from_config(bc, coords))
            .collect::<Result<Vec<Body>, SimError>>()?;

        let workers = match s_cfg.workers {
            Some(n) => Workers::new(n)?,
            None => Workers::from_hardware()?,
        };

        info!(bodies = bodies.len(), coords = ?coords, workers = workers.count(), "scenario built");

        Ok(Self {
            parameters,
            system: System::new(bodies),
            workers,
            output: PathBuf::from(s_cfg.output_file),
        })
    }

    /// Run the scenario to completion
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        run_simulation(&mut self.system, &self.parameters, &self.output, &self.workers)
    }
}

fn body_from_config(bc: &BodyConfig, coords: CoordinateSystem) -> Result<Body, SimError> {
    let [x1, x2, x3] = bc.position;
    let [v1, v2, v3] = bc.velocity;
    Body::new(
        bc.mass,
        Vector::new(x1, x2, x3, coords),
        Vector::new(v1, v2, v3, coords),
    )
}
