use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use murmur_core::{AgentPool, SimConfig, Simulator, TickStats, Vec2};
use serde::Serialize;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless flocking simulation runner", long_about = None)]
struct Args {
    /// Number of agents to spawn
    #[arg(short = 'n', long, default_value_t = 90)]
    count: usize,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Viewport width
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Viewport height
    #[arg(long, default_value_t = 500.0)]
    height: f32,

    /// Separation weight (acts within half this distance)
    #[arg(long, default_value_t = 40.0)]
    separation: f32,

    /// Cohesion weight (acts within this distance)
    #[arg(long, default_value_t = 50.0)]
    cohesion: f32,

    /// Alignment weight (acts within twice this distance)
    #[arg(long, default_value_t = 60.0)]
    alignment: f32,

    /// How to place the initial population
    #[arg(long, value_enum, default_value = "random")]
    spawn: SpawnMode,

    /// Ring radius when --spawn ring is selected
    #[arg(long, default_value_t = 100.0)]
    ring_radius: f32,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SpawnMode {
    /// Uniform random positions and headings
    Random,
    /// Evenly spaced on a centered ring, headings tangent
    Ring,
}

#[derive(Serialize)]
struct RunSummary {
    agents: usize,
    ticks: u64,
    config: SimConfig,
    stats: TickStats,
    elapsed_ms: u128,
}

fn run(args: &Args) -> RunSummary {
    let config = SimConfig {
        separation_weight: args.separation,
        cohesion_weight: args.cohesion,
        alignment_weight: args.alignment,
        width: args.width,
        height: args.height,
    };

    let mut pool = AgentPool::new();
    match args.spawn {
        SpawnMode::Random => pool.spawn_uniform(args.count, config.width, config.height),
        SpawnMode::Ring => pool.spawn_ring(
            args.count,
            args.ring_radius,
            Vec2::new(config.width / 2.0, config.height / 2.0),
        ),
    }
    log::info!("Spawned {} agents ({:?})", pool.len(), args.spawn);

    let mut simulator = Simulator::new(config);
    let started = Instant::now();

    for tick in 1..=args.ticks {
        simulator.tick(&mut pool);
        if tick % 100 == 0 {
            let stats = simulator.stats();
            log::debug!(
                "tick {}: neighbors min={} max={}",
                tick,
                stats.min_neighbors,
                stats.max_neighbors
            );
        }
    }

    RunSummary {
        agents: pool.len(),
        ticks: args.ticks,
        config,
        stats: simulator.stats(),
        elapsed_ms: started.elapsed().as_millis(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    log::info!(
        "Running {} agents for {} ticks on {}x{}",
        args.count,
        args.ticks,
        args.width,
        args.height
    );

    let summary = run(&args);

    log::info!(
        "Done in {} ms: neighbors min={} max={}",
        summary.elapsed_ms,
        summary.stats.min_neighbors,
        summary.stats.max_neighbors
    );

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        println!("{json}");
    }

    Ok(())
}
