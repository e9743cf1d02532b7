//! cylab CLI: the interactive front end over the record store.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(
    name = "cylab",
    version,
    about = "Concrete cylinder compression test registry"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session reading commands from stdin
    Shell {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load a CSV export and render tables, statistics and the range filter
    Report {
        /// CSV export to load
        #[arg(long)]
        input: PathBuf,

        /// Output format: text, markdown, html, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Lower strength bound of the filter in MPa (default: observed min)
        #[arg(long)]
        min: Option<f64>,

        /// Upper strength bound of the filter in MPa (default: observed max)
        #[arg(long)]
        max: Option<f64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter cylab.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cylab_cli=info".parse().expect("valid directive"))
                .add_directive("cylab_core=info".parse().expect("valid directive"))
                .add_directive("cylab_report=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Shell { config } => commands::shell::execute(config),
        Commands::Report {
            input,
            format,
            output,
            min,
            max,
            config,
        } => commands::report::execute(input, format, output, min, max, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
