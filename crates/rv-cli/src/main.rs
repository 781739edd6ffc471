//! CLI frontend for the Reverie dialogue runtime.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rv",
    about = "Reverie: check, play and inspect narrative content",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log filter, e.g. `info` or `rv_dialogue=debug` (default: $RUST_LOG, then `warn`)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate dialogues, interactables and config in a content directory
    Check {
        /// Content directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Play a dialogue in the terminal
    Play {
        /// Dialogue id (file name under dialogues/ without .json)
        dialogue: String,

        /// Content directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// RNG seed for text corruption
        #[arg(long)]
        seed: Option<u64>,

        /// Read input lines from a file instead of stdin
        #[arg(long)]
        script: Option<PathBuf>,

        /// Resume from a save file
        #[arg(long)]
        load: Option<PathBuf>,

        /// Write a save file when the session ends
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Inspect save files
    Save {
        #[command(subcommand)]
        command: SaveCommands,
    },
}

#[derive(Subcommand)]
enum SaveCommands {
    /// Pretty-print a save file
    Show {
        /// Save file path
        file: PathBuf,
    },
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let result = match cli.command {
        Commands::Check { dir } => commands::check::run(&dir),
        Commands::Play {
            dialogue,
            dir,
            seed,
            script,
            load,
            save,
        } => commands::play::run(
            &dir,
            &dialogue,
            commands::play::PlayOptions {
                seed,
                script,
                load,
                save,
            },
        ),
        Commands::Save {
            command: SaveCommands::Show { file },
        } => commands::save::show(&file),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
