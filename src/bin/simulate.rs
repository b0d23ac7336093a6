//! Click-session simulator CLI.
//!
//! Runs scripted players through the engine to inspect leveling pace.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                    # Default: 4 players, 20k clicks
//!   cargo run --bin simulate -- -p 8 -c 50000   # 8 players, 50k clicks each
//!   cargo run --bin simulate -- --seed 42       # Reproducible run

use anyhow::{Context, Result};
use brickrpg::build_info::version_string;
use brickrpg::simulator::{run_simulation, SimConfig};
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let (config, show_level_curve) = parse_args(&args);

    let default_filter = match config.verbosity {
        0 => "error",
        1 => "warn",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              BRICKRPG CLICK SIMULATOR                         ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Players:        {}", config.num_players);
    println!("  Clicks/player:  {}", config.clicks_per_player);
    println!("  Click interval: {} ms", config.click_interval_ms);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    if let Some(dir) = &config.data_dir {
        println!("  Data dir:       {}", dir.display());
    }
    if let Some(path) = &config.engine_config {
        println!("  Engine config:  {}", path.display());
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config).context("simulation failed")?;

    println!("{}", report.to_text());

    if show_level_curve {
        println!("{}", report.level_curve_text());
    }

    if args.iter().any(|a| a == "--json") {
        let json = report.to_json().context("failed to encode report")?;
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        std::fs::write(&filename, json)
            .with_context(|| format!("failed to write {filename}"))?;
        println!("JSON report saved to: {}", filename);
    }
    Ok(())
}

fn parse_args(args: &[String]) -> (SimConfig, bool) {
    let mut config = SimConfig::default();
    let mut show_level_curve = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-p" | "--players" => {
                if i + 1 < args.len() {
                    config.num_players = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "-c" | "--clicks" => {
                if i + 1 < args.len() {
                    config.clicks_per_player = args[i + 1].parse().unwrap_or(20_000);
                    i += 1;
                }
            }
            "-i" | "--interval" => {
                if i + 1 < args.len() {
                    config.click_interval_ms = args[i + 1].parse().unwrap_or(250);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--data-dir" => {
                if i + 1 < args.len() {
                    config.data_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config.engine_config = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--level-curve" => {
                show_level_curve = true;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-q" | "--quiet" => {
                config.verbosity = 0;
            }
            "--quick" => {
                config = SimConfig::quick();
            }
            "--long" => {
                config = SimConfig::long_session();
            }
            "-V" | "--version" => {
                println!("simulate {}", version_string());
                std::process::exit(0);
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    (config, show_level_curve)
}

fn print_help() {
    println!("BrickRPG Click Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -p, --players <N>     Simulated players (default: 4)");
    println!("    -c, --clicks <N>      Clicks per player (default: 20,000)");
    println!("    -i, --interval <MS>   Simulated ms between clicks (default: 250)");
    println!("    -s, --seed <S>        Random seed for reproducibility");
    println!("    --data-dir <DIR>      Persist to JSON files in DIR");
    println!("    --config <FILE>       Engine config TOML");
    println!("    --level-curve         Show level-up pacing");
    println!("    -v, --verbose         Verbose output (RUST_LOG overrides)");
    println!("    -q, --quiet           Only errors");
    println!("    --json                Save JSON report");
    println!("    --quick               Quick run (2 players, 2,000 clicks)");
    println!("    --long                Long run (8 players, 250,000 clicks)");
    println!("    -V, --version         Print version");
    println!("    -h, --help            Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                      # Default run");
    println!("    cargo run --bin simulate -- -p 8 -c 50000     # Bigger session");
    println!("    cargo run --bin simulate -- --seed 42         # Reproducible");
    println!("    cargo run --bin simulate -- --long --level-curve");
}
