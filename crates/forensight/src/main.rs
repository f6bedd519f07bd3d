//! Forensight CLI - image forensics from the command line.
//!
//! Forensight inspects a JPEG or PNG file and reports evidence of editing:
//! an error level analysis (ELA) visualization, EXIF metadata, the embedded
//! camera thumbnail and integrity hashes of the original bytes.
//!
//! # Usage
//!
//! ```bash
//! # Full report to stdout
//! forensight analyze photo.jpg --pretty
//!
//! # Only the ELA visualization
//! forensight ela photo.jpg --out photo_ela.png --quality 90
//!
//! # View configuration
//! forensight config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Forensight - image forensics: error level analysis, EXIF metadata and hashes.
#[derive(Parser, Debug)]
#[command(name = "forensight")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze an image and write a forensic report
    Analyze(cli::analyze::AnalyzeArgs),

    /// Write only the error level analysis visualization
    Ela(cli::ela::ElaArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match forensight_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `forensight config path`."
            );
            forensight_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Forensight v{}", forensight_core::VERSION);

    match cli.command {
        Commands::Analyze(args) => cli::analyze::execute(args, config).await,
        Commands::Ela(args) => cli::ela::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
