//! Configuration types for loading simulation scenarios.
//!
//! A scenario file consists of:
//!
//! - [`SimulatorConfig`] – physical constant, step size, duration, output path
//! - a global coordinate system tag for every body vector
//! - [`BodyConfig`]      – initial state for each body
//! - [`ScenarioConfig`]  – top-level wrapper
//!
//! # Format
//! Files are read with `serde_yaml`. YAML is a superset of JSON, so the same
//! scenario may be written either way:
//!
//! ```yaml
//! simulator_config:
//!   gravitational_constant: 1.0
//!   dt: 0.01
//!   total_time: 10.0
//!   output_file: "output.txt"
//!   workers: 4                # optional, defaults to the core count
//!
//! coordinate_type: cartesian  # or spherical: (r, theta, phi)
//!
//! bodies:
//!   - _name: "a"              # optional label
//!     mass: 1.0
//!     position: [-0.5, 0.0, 0.0]
//!     velocity: [0.0, -0.5, 0.0]
//!   - _name: "b"
//!     mass: 1.0
//!     position: [0.5, 0.0, 0.0]
//!     velocity: [0.0, 0.5, 0.0]
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::SimError;
use crate::simulation::states::CoordinateSystem;

/// Global numerical and physical settings
#[derive(Deserialize, Debug, Clone)]
pub struct SimulatorConfig {
    pub gravitational_constant: f64,
    pub dt: f64,          // time step size
    pub total_time: f64,  // simulated time span
    pub output_file: String,
    #[serde(default)]
    pub workers: Option<usize>, // worker pool size, None -> hardware parallelism
}

/// Initial state of a single body, in the scenario's coordinate system
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    #[serde(rename = "_name", default)]
    pub name: Option<String>,
    pub mass: f64,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

/// Top-level scenario configuration
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub simulator_config: SimulatorConfig,
    pub coordinate_type: CoordinateSystem,
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    /// Read and parse a scenario file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SimError::io(path, e))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(|source| SimError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Body labels in file order, `body <i>` where a body has none
    pub fn labels(&self) -> Vec<String> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, b)| b.name.clone().unwrap_or_else(|| format!("body {}", i + 1)))
            .collect()
    }
}
