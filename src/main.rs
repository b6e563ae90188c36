//! Volume Life CLI - Run simulations from JSON configuration.

use std::path::PathBuf;
use std::time::Instant;

use volume_life::{
    compute::{NullSink, SimulationEngine, SimulationStats},
    schema::{PRESETS, SimulationConfig},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [steps]", args[0]);
        eprintln!();
        eprintln!("Run a Volume Life simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  steps        Number of generations (default: 100)");
        eprintln!();
        eprintln!("Example configuration is printed with the --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = SimulationConfig::from_path(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    println!("Volume Life Simulation");
    println!("======================");
    println!(
        "Grid: {0}x{0}x{0} ({1:?} backend)",
        config.axis_size, config.backend
    );
    println!("Rule: {}", config.rule);
    println!("Steps: {}", steps);
    println!();

    let mut engine = SimulationEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Error initializing simulation: {}", e);
        std::process::exit(1);
    });

    if let Some(seed) = engine.seed() {
        println!("Seed: {}", seed);
    }
    if let Some(stats) = engine.stats() {
        println!("Initial state:");
        print_stats(&stats);
        println!();
    }

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..steps {
        if let Err(e) = engine.step(&mut NullSink) {
            eprintln!("Step {} failed: {}", i + 1, e);
            std::process::exit(1);
        }

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            if let Some(stats) = engine.stats() {
                let elapsed = start.elapsed().as_secs_f32();
                let steps_per_sec = (i + 1) as f32 / elapsed;
                println!(
                    "  Step {}/{}: alive={}, decaying={}, {:.1} steps/s",
                    i + 1,
                    steps,
                    stats.alive_cells,
                    stats.decaying_cells,
                    steps_per_sec
                );
            }
        }
    }

    let elapsed = start.elapsed();

    println!();
    if let Some(stats) = engine.stats() {
        println!("Final state:");
        print_stats(&stats);
        println!();
    }
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );
}

fn print_stats(stats: &SimulationStats) {
    println!("  Alive cells: {}", stats.alive_cells);
    println!("  Decaying cells: {}", stats.decaying_cells);
    println!("  Occupancy: {:.4}%", stats.occupancy * 100.0);
}

fn print_example_config() {
    let config = SimulationConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
    println!();
    println!("Named rules:");
    for (name, rule) in PRESETS {
        println!("  {:<12} {}", name, rule);
    }
}
