pub mod simulation;
pub mod configuration;
pub mod output;
pub mod benchmark;
pub mod visualization;
pub mod error;

pub use error::SimError;

pub use simulation::states::{Body, System, Vector, CoordinateSystem, NVec3, convert_spherical_to_cartesian};
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity, SOFTENING};
pub use simulation::collisions::{detect_collisions, handle_collisions, elastic_collision, COLLISION_THRESHOLD};
pub use simulation::integrator::rk4_step;
pub use simulation::workers::Workers;
pub use simulation::params::Parameters;
pub use simulation::engine::{run_simulation, RunSummary};
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, SimulatorConfig, BodyConfig};

pub use output::writer::StateWriter;

pub use visualization::trajectory::{parse_tracks, read_tracks, Trajectories};

pub use benchmark::benchmark::{bench_gravity, bench_simulation, random_system};
