//! QuizReel CLI: build quiz videos from JSON documents.
//!
//! Usage:
//!   quizreel build <SETTINGS>      Build the timeline and export a manifest
//!   quizreel validate <SETTINGS>   Load documents and report missing media
//!   quizreel info <SETTINGS>       Show the timeline summary
//!   quizreel init <NAME>           Scaffold a new project
//!   quizreel check                 Check external tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quizreel_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "quizreel",
    about = "Quiz video timelines from question lists",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the timeline and export it for rendering
    Build {
        /// Path to the global settings document
        settings: PathBuf,

        /// Output directory (defaults to the configured output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load every document and report media that does not resolve
    Validate {
        /// Path to the global settings document
        settings: PathBuf,
    },

    /// Build the timeline and print a summary
    Info {
        /// Path to the global settings document
        settings: PathBuf,
    },

    /// Create a new project with starter documents
    Init {
        /// Project name
        name: String,

        /// Application root to create the project in
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Check that ffmpeg and ffprobe are available
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    quizreel_common::logging::init_logging(&logging);
    tracing::debug!(
        output_dir = %config.output_dir.display(),
        app_root = ?config.app_root,
        "Application config loaded"
    );

    match cli.command {
        Commands::Build { settings, output } => commands::build::run(settings, output, &config).await,
        Commands::Validate { settings } => commands::validate::run(settings, &config),
        Commands::Info { settings } => commands::info::run(settings, &config),
        Commands::Init { name, output } => commands::init::run(name, output),
        Commands::Check => commands::check::run(),
    }
}
