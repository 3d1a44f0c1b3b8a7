//! Error type shared by the simulation core, the scenario loader and the
//! output writer.
//!
//! Every variant is terminal for a run: nothing in the crate retries.

use std::path::PathBuf;

use thiserror::Error;

use crate::simulation::states::CoordinateSystem;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("mass must be a positive value, got {0}")]
    InvalidMass(f64),

    #[error("gravitational constant must be a positive value, got {0}")]
    InvalidGravitationalConstant(f64),

    #[error("invalid time step: dt = {0} (dt must be positive, total time finite and non-negative, and their ratio a countable number of steps)")]
    InvalidTimeStep(f64),

    #[error("coordinate mismatch: expected {expected:?} vectors, found {found:?}")]
    CoordinateMismatch {
        expected: CoordinateSystem,
        found: CoordinateSystem,
    },

    #[error("i/o failure on {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("malformed position dump, line {line}: {reason}")]
    MalformedDump { line: usize, reason: String },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl SimError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SimError::IoFailure {
            path: path.into(),
            source,
        }
    }
}
