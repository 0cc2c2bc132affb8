//! Terminal frontend for the Mindgarden mini-games.

mod autoplay;
mod commands;
mod script;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "mindgarden",
    about = "Mindgarden - timed wellness mini-games in the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Load the game catalog from a JSON file instead of the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available games
    List,

    /// Show details and how-to-play text for a game
    Show {
        /// Game id (e.g. breathing, memory, focus, mood)
        id: String,
    },

    /// Play one session headlessly in virtual time
    Play {
        /// Game id
        id: String,

        /// RNG seed for deterministic sessions
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Session length in seconds (default: the game's own duration)
        #[arg(short, long)]
        duration: Option<u32>,

        /// Scripted input as SECONDS:EVENT, e.g. 1.5:hit, 4:2, 3:Calm
        #[arg(short, long = "input", value_name = "T:EVENT")]
        inputs: Vec<String>,

        /// Let the computer play perfectly
        #[arg(short, long)]
        autoplay: bool,

        /// Print a snapshot every second
        #[arg(short, long)]
        verbose: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Progress file the result is recorded in
        #[arg(long, default_value = commands::DEFAULT_STORE)]
        store: PathBuf,

        /// Do not record the result
        #[arg(long)]
        no_record: bool,
    },

    /// Show aggregated progress
    Stats {
        /// Progress file to read
        #[arg(long, default_value = commands::DEFAULT_STORE)]
        store: PathBuf,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let catalog = cli.catalog.as_deref();

    let result = match cli.command {
        Commands::List => commands::list::run(catalog),
        Commands::Show { id } => commands::show::run(catalog, &id),
        Commands::Play {
            id,
            seed,
            duration,
            inputs,
            autoplay,
            verbose,
            json,
            store,
            no_record,
        } => commands::play::run(
            catalog,
            &id,
            &commands::play::PlayOptions {
                seed,
                duration,
                inputs,
                autoplay,
                verbose,
                json,
                store: (!no_record).then_some(store),
            },
        ),
        Commands::Stats { store } => commands::stats::run(catalog, &store),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
