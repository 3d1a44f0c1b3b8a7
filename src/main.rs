use gravsim::{ScenarioConfig, Scenario, Workers};
use gravsim::{bench_gravity, bench_simulation, read_tracks};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Direct-summation gravitational N-body simulator (RK4)")]
struct Args {
    /// Scenario file (YAML or JSON)
    #[arg(short, long, default_value = "scenarios/two_body.yaml")]
    file_name: PathBuf,

    /// Override the scenario's output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the worker count
    #[arg(short, long)]
    workers: Option<usize>,

    /// Run the body-count sweep and force timing instead of a scenario
    #[arg(long)]
    bench: bool,

    /// Replay a position dump instead of running a scenario
    #[arg(long, value_name = "DUMP")]
    plot: Option<PathBuf>,

    /// Bodies per step in the dump (defaults to the scenario's body count)
    #[arg(long)]
    bodies: Option<usize>,

    /// Comma-separated body labels for the replay, e.g. "Sun,Earth,Moon"
    #[arg(long)]
    labels: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        let workers = match args.workers {
            Some(n) => Workers::new(n)?,
            None => Workers::from_hardware()?,
        };
        bench_gravity(&workers)?;
        bench_simulation(&workers)?;
        return Ok(());
    }

    if let Some(dump) = &args.plot {
        return plot(&args, dump);
    }

    let mut scenario_cfg = ScenarioConfig::load(&args.file_name)
        .with_context(|| format!("failed to load scenario {}", args.file_name.display()))?;
    if let Some(n) = args.workers {
        scenario_cfg.simulator_config.workers = Some(n);
    }

    let mut scenario = Scenario::build_scenario(scenario_cfg).context("failed to initialize system")?;
    if let Some(out) = args.output {
        scenario.output = out;
    }

    tracing::info!("simulation started with {} bodies", scenario.system.len());
    let start = Instant::now();

    let summary = scenario.run().context("simulation aborted")?;

    tracing::info!(
        "simulation completed: {} steps, {} collisions, results saved to {}",
        summary.steps,
        summary.collisions,
        scenario.output.display()
    );
    tracing::info!("time taken: {} ms", start.elapsed().as_millis());

    Ok(())
}

fn plot(args: &Args, dump: &Path) -> Result<()> {
    let scenario_labels: Vec<String> = match args.bodies {
        Some(n) => (1..=n).map(|i| format!("body {i}")).collect(),
        None => ScenarioConfig::load(&args.file_name)
            .context("pass --bodies or a scenario file to size the tracks")?
            .labels(),
    };
    let num_bodies = scenario_labels.len();

    let labels: Vec<String> = match &args.labels {
        Some(list) => list.split(',').map(|l| l.trim().to_string()).collect(),
        None => scenario_labels,
    };
    if labels.len() != num_bodies {
        bail!("{} labels given for {} bodies", labels.len(), num_bodies);
    }

    let trajectories = read_tracks(dump, num_bodies)?;
    tracing::info!("{}: {} frames of {} bodies", dump.display(), trajectories.frames(), num_bodies);
    for (label, last) in labels.iter().zip(trajectories.final_positions()) {
        if let Some(p) = last {
            tracing::info!("{label}: final position ({:.6}, {:.6}, {:.6})", p.x, p.y, p.z);
        }
    }

    #[cfg(feature = "viewer")]
    gravsim::visualization::replay::run_replay(trajectories, &labels);
    #[cfg(not(feature = "viewer"))]
    tracing::warn!("built without the `viewer` feature; rebuild with --features viewer to open the replay window");

    Ok(())
}
