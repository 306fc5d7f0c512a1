//! registrar CLI: load a roster into the engine and inspect it.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "registrar", version, about = "Academic registry engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a roster and print students by GPA and courses by difficulty
    Report {
        /// Path to a .toml roster file
        #[arg(long)]
        roster: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Find a user in a roster by id or name prefix
    Search {
        /// Path to a .toml roster file
        #[arg(long)]
        roster: PathBuf,

        /// An id, or the start of a name (0 cancels)
        #[arg(long, allow_hyphen_values = true)]
        query: String,

        /// Only consider users with this role
        #[arg(long)]
        role: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a roster file
    Validate {
        /// Path to a .toml roster file
        #[arg(long)]
        roster: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and example roster
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("registrar=info,registrar_core=error")
            }),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report {
            roster,
            format,
            config,
        } => commands::report::execute(roster, format, config),
        Commands::Search {
            roster,
            query,
            role,
            config,
        } => commands::search::execute(roster, query, role, config),
        Commands::Validate { roster, config } => commands::validate::execute(roster, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
