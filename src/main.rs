use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use poker_drills::dataset::{DEFAULT_POSTFLOP_CSV, DEFAULT_PREFLOP_CSV};
use poker_drills::scenario::ScenarioFilter;
use poker_drills::web;
use poker_drills::{Trainer, TrainerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "poker-drills",
    version,
    about = "Preflop/postflop decision drills and hand replayer",
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Number of scenarios to drill (defaults to 1)
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Which scenarios to draw
    #[arg(long = "type", value_enum, default_value = "mixed")]
    kind: ScenarioTypeArg,

    /// Preflop dataset (CSV)
    #[arg(long = "preflop-csv", global = true, default_value = DEFAULT_PREFLOP_CSV)]
    preflop_csv: PathBuf,

    /// Postflop dataset (CSV)
    #[arg(long = "postflop-csv", global = true, default_value = DEFAULT_POSTFLOP_CSV)]
    postflop_csv: PathBuf,

    /// Disable ANSI colors in CLI output
    #[arg(long = "no-color", global = true, default_value_t = false)]
    no_color: bool,

    /// Answer every scenario with the stored decision (useful for smoke tests)
    #[arg(long, default_value_t = false)]
    auto: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        /// Address to bind (HOST:PORT)
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
    /// Print the replay of a random postflop hand
    Replay {
        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, ValueEnum)]
enum ScenarioTypeArg {
    Preflop,
    Postflop,
    Mixed,
}

impl From<ScenarioTypeArg> for ScenarioFilter {
    fn from(arg: ScenarioTypeArg) -> Self {
        match arg {
            ScenarioTypeArg::Preflop => ScenarioFilter::Preflop,
            ScenarioTypeArg::Postflop => ScenarioFilter::Postflop,
            ScenarioTypeArg::Mixed => ScenarioFilter::Mixed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = color_eyre::install();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TrainerConfig {
        rounds: cli.rounds,
        seed: cli.seed,
        filter: cli.kind.clone().into(),
        no_color: cli.no_color,
        preflop_csv: cli.preflop_csv.clone(),
        postflop_csv: cli.postflop_csv.clone(),
    };

    match cli.command {
        Some(Commands::Serve { addr }) => run_server(addr, config).await?,
        Some(Commands::Replay { seed }) => run_replay(TrainerConfig {
            seed: seed.or(config.seed),
            ..config
        })?,
        None => run_cli(config, cli.auto)?,
    }

    Ok(())
}

fn run_cli(config: TrainerConfig, auto: bool) -> Result<()> {
    let state = config.load_state();
    let mut trainer = Trainer::new(config, state);
    if auto {
        let stats = trainer.autoplay()?;
        trainer.print_summary(&stats);
        Ok(())
    } else {
        trainer.run()
    }
}

fn run_replay(config: TrainerConfig) -> Result<()> {
    let state = config.load_state();
    let mut trainer = Trainer::new(config, state);
    trainer.replay()?;
    Ok(())
}

async fn run_server(addr: String, config: TrainerConfig) -> Result<()> {
    let addr: SocketAddr = addr.parse()?;
    let state = config.load_state();
    web::serve(addr, state).await
}
