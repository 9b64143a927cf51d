use amoebot_core::algorithms::{
    heterogeneous_edges, Color, Compression, CompressionMemory, Separation, SeparationMemory,
};
use amoebot_core::config::{AlgorithmKind, Layout, SimConfig};
use amoebot_core::metrics::RunSummary;
use amoebot_core::setup::build_system;
use amoebot_core::system::{Algorithm, System, Termination};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

const BENCHMARK_ACTIVATIONS: u64 = 200_000;
const BENCHMARK_SEED: u64 = 42;

#[derive(Parser)]
#[command(name = "amoebot")]
#[command(about = "Amoebot model simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation from a config file
    Run {
        /// Path to config file (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Output directory for the run summary (optional)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Stop after this many activations, replacing the configured termination
        #[arg(long)]
        activations: Option<u64>,
    },
    /// Measure activation throughput for both algorithms
    Benchmark,
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn simulate<M, A>(system: &mut System<M>, algorithm: &A, config: &SimConfig) -> RunSummary
where
    A: Algorithm<M>,
{
    let outcome = system.run(algorithm, &config.termination, config.max_activations);
    RunSummary::collect(system, config.algorithm, &outcome)
}

fn run_config(config: &SimConfig) -> Result<RunSummary> {
    let summary = match config.algorithm {
        AlgorithmKind::Compression { lambda } => {
            let mut system = build_system(config, |_| CompressionMemory::default())
                .context("failed to build system")?;
            simulate(&mut system, &Compression::new(lambda), config)
        }
        AlgorithmKind::Separation { lambda, kappa } => {
            let mut system = build_system(config, |rng| SeparationMemory::new(Color::random(rng)))
                .context("failed to build system")?;
            let mut summary = simulate(&mut system, &Separation::new(lambda, kappa), config);
            summary.heterogeneous_edges = Some(heterogeneous_edges(&system));
            summary
        }
    };
    Ok(summary)
}

fn run_benchmark(num_particles: usize, algorithm: AlgorithmKind) -> Result<()> {
    let config = SimConfig {
        seed: BENCHMARK_SEED,
        num_particles,
        algorithm,
        layout: Layout::Blob {
            hole_probability: 0.1,
        },
        termination: Termination::MaxActivations {
            activations: BENCHMARK_ACTIVATIONS,
        },
        max_activations: None,
    };
    config
        .validate()
        .context("Benchmark config validation error")?;

    let start = Instant::now();
    let summary = run_config(&config)?;
    let elapsed = start.elapsed().as_secs_f64();
    let per_sec = summary.counters.activations as f64 / elapsed.max(f64::EPSILON);

    println!("--- {num_particles} particles ({}) ---", algorithm.name());
    println!(
        "  Activations:   {} in {elapsed:.2} s ({per_sec:.0} activations/sec)",
        summary.counters.activations
    );
    println!(
        "  Moves:         {}, rounds: {}",
        summary.counters.moves, summary.counters.rounds
    );
    println!(
        "  Perimeter:     {}, connected: {}",
        summary.perimeter, summary.connected
    );
    println!();
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = SimConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Benchmark => {
            if cfg!(debug_assertions) {
                eprintln!("WARNING: running in debug mode. Results are not representative.");
                eprintln!("         Use: cargo run -p amoebot-cli --release -- benchmark");
                eprintln!();
            }
            println!("=== Amoebot Activation Benchmark ===");
            println!("Activations per run: {BENCHMARK_ACTIVATIONS}");
            println!();

            let algorithms = [
                AlgorithmKind::Compression { lambda: 4.0 },
                AlgorithmKind::Separation {
                    lambda: 4.0,
                    kappa: 4.0,
                },
            ];
            for algorithm in algorithms {
                for num_particles in [100, 1_000, 10_000] {
                    run_benchmark(num_particles, algorithm)?;
                }
            }
        }
        Commands::Run {
            config,
            out,
            activations,
        } => {
            let file = File::open(&config).context("failed to open config file")?;
            let reader = BufReader::new(file);
            let mut sim_config: SimConfig =
                serde_json::from_reader(reader).context("failed to parse config")?;
            if let Some(activations) = activations {
                sim_config.termination = Termination::MaxActivations { activations };
            }
            sim_config.validate().context("Config validation error")?;

            info!(
                path = %config.display(),
                algorithm = sim_config.algorithm.name(),
                particles = sim_config.num_particles,
                "loaded config"
            );

            let summary = run_config(&sim_config)?;

            if let Some(out_dir) = out {
                std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;
                let summary_path = out_dir.join("summary.json");
                let file = File::create(summary_path).context("failed to create summary file")?;
                serde_json::to_writer_pretty(file, &summary).context("failed to write summary")?;
                println!("Run complete. Results saved to {:?}", out_dir);
            } else {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }
    }
    Ok(())
}
