//! Lotka-Volterra Luncheon Driver
//!
//! Builds luncheons from seating rules or input files, runs them for a
//! number of generations and writes the recorded history as JSON.
//! Runs entirely in-process — no server, no rendering.
//!
//! Usage:
//!   cargo run -p lotkavolterra-simtest -- list
//!   cargo run -p lotkavolterra-simtest -- test halves --num-seats 12
//!   cargo run -p lotkavolterra-simtest -- run data/luncheons/sample.json -o run.json
//!   cargo run -p lotkavolterra-simtest -- validate --verbose

mod checks;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use lotkavolterra_logic::config::{validate_config, SimulationConfig};
use lotkavolterra_logic::input::{build_luncheon, LuncheonFile};
use lotkavolterra_logic::seating::{test_luncheon, SeatingRule};
use lotkavolterra_logic::snapshot::RunHistory;
use lotkavolterra_logic::Luncheon;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lotkavolterra-simtest")]
#[command(version)]
#[command(about = "Run pack/herd population dynamics at luncheon tables")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the seating rules for test luncheons
    List,
    /// Run a single-table luncheon seated by a rule
    Test {
        /// Seating rule (random, alternating, halves)
        rule: String,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Run a luncheon described by a JSON input file
    Run {
        /// Luncheon description
        input: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Check the engine against its expected properties
    Validate,
}

#[derive(Args)]
struct RunArgs {
    /// JSON config file (fields not given fall back to defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seats at the test table
    #[arg(long)]
    num_seats: Option<usize>,

    /// Initial population of every seat
    #[arg(long, allow_negative_numbers = true)]
    population_size: Option<i64>,

    /// Generations to run
    #[arg(long)]
    num_generations: Option<u32>,

    /// Random seed for group draws
    #[arg(long)]
    seed: Option<u64>,

    /// Write the run history here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RunArgs {
    /// Defaults, overlaid by the config file, overlaid by flags.
    fn resolve_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                SimulationConfig::from_json(&json)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };

        if let Some(n) = self.num_seats {
            config.num_seats = n;
        }
        if let Some(p) = self.population_size {
            config.population_size = p;
        }
        if let Some(g) = self.num_generations {
            config.num_generations = g;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        let errors = validate_config(&config);
        if !errors.is_empty() {
            let detail: Vec<String> = errors.iter().map(ToString::to_string).collect();
            bail!("invalid configuration: {}", detail.join("; "));
        }
        Ok(config)
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::List => {
            for rule in SeatingRule::ALL {
                println!("{rule}");
            }
        }
        Commands::Test { rule, run } => {
            let rule: SeatingRule = rule.parse()?;
            let config = run.resolve_config()?;
            let mut rng = make_rng(config.seed);
            let luncheon = test_luncheon(
                rule,
                config.num_seats,
                config.population_size,
                config.rates.clone(),
                &mut rng,
            )?;
            record_and_write(luncheon, &config, run.output.as_deref())?;
        }
        Commands::Run { input, run } => {
            let config = run.resolve_config()?;
            let json = std::fs::read_to_string(&input)
                .with_context(|| format!("reading luncheon {}", input.display()))?;
            let file = LuncheonFile::from_json(&json)
                .with_context(|| format!("parsing luncheon {}", input.display()))?;
            let mut rng = make_rng(config.seed);
            let luncheon =
                build_luncheon(&file, config.population_size, config.rates.clone(), &mut rng)?;
            record_and_write(luncheon, &config, run.output.as_deref())?;
        }
        Commands::Validate => {
            if !checks::run_all(cli.verbose) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn record_and_write(
    mut luncheon: Luncheon,
    config: &SimulationConfig,
    output: Option<&Path>,
) -> Result<()> {
    info!(
        "Running '{}' for {} generations ({} tables, {} seats)",
        luncheon.name,
        config.num_generations,
        luncheon.tables().len(),
        luncheon.seat_count()
    );
    let history = RunHistory::record(&mut luncheon, config.num_generations)?;

    if let Some(last) = history.generations.last() {
        info!(
            "Generation {}: pack={} herd={}",
            last.generation, last.totals.pack, last.totals.herd
        );
    }

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &history)?;
            writer.flush()?;
            info!("Wrote run history to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &history)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
