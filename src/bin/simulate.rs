use std::{path::PathBuf, time::Instant};

use clap::Parser;
use color_eyre::eyre::Result;
use nalgebra::{DMatrix, Vector2};
use quadtree_gravity::{
    creator::{BodyCreator, RingBodyCreator},
    csv::{write_csv_positions, write_csv_tree},
    Simulation, SimulationConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run the simulation without a window and log its progress.
#[derive(Parser, Debug)]
struct Args {
    /// TOML configuration. Everything it leaves out keeps its default.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'n', long, default_value_t = 1_000)]
    steps: usize,

    /// Overrides `bodies.count` of the configuration.
    #[arg(short, long)]
    bodies: Option<usize>,

    /// Overrides `bodies.seed` of the configuration.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the positions after every step to this CSV file.
    #[arg(long)]
    positions: Option<PathBuf>,

    /// Write the tree of the last step to this CSV file.
    #[arg(long)]
    tree: Option<PathBuf>,

    /// Calculate the forces on the Rayon thread pool.
    #[arg(long)]
    multi_threaded: bool,

    /// Log progress every this many steps, 0 to disable.
    #[arg(long, default_value_t = 100)]
    log_every: usize,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(count) = args.bodies {
        config.bodies.count = count;
    }
    if let Some(seed) = args.seed {
        config.bodies.seed = Some(seed);
    }

    let bodies = RingBodyCreator::from_config(&config.bodies)?.create_bodies(config.bodies.count);
    let mut simulation = Simulation::from_config(bodies, &config)?;
    if args.multi_threaded {
        simulation = simulation.multi_threaded();
    }

    info!(
        bodies = simulation.bodies().len(),
        steps = args.steps,
        capacity = simulation.capacity().get(),
        execution = ?simulation.execution(),
        "starting simulation"
    );

    let record = args.positions.is_some();
    let mut history = Vec::new();
    if record {
        history.push(snapshot(&simulation));
    }

    let start = Instant::now();
    let mut last_tree = None;
    for t in 1..=args.steps {
        let tree = simulation.step();

        if record {
            history.push(snapshot(&simulation));
        }
        if args.log_every > 0 && t % args.log_every == 0 {
            info!(
                step = t,
                depth = tree.depth(),
                nodes = tree.nodes().count(),
                elapsed = ?start.elapsed(),
                "progress"
            );
        }

        last_tree = Some(tree);
    }

    info!(elapsed = ?start.elapsed(), "simulation done");

    if let Some(path) = &args.positions {
        let positions = DMatrix::from_fn(history.len(), simulation.bodies().len(), |t, i| {
            history[t][i]
        });
        write_csv_positions(&positions, path)?;
        info!(path = %path.display(), "wrote positions");
    }

    if let (Some(path), Some(tree)) = (&args.tree, &last_tree) {
        write_csv_tree(tree, path)?;
        info!(path = %path.display(), "wrote tree");
    }

    Ok(())
}

fn snapshot(simulation: &Simulation) -> Vec<Vector2<f64>> {
    simulation.bodies().iter().map(|b| *b.position()).collect()
}
