//! traceweld CLI
//!
//! Command-line tools for inspecting telemetry record streams.
//!
//! # Commands
//!
//! - `scan` - Assemble a record buffer and print its bucket/segment structure
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// traceweld command-line stream tools.
#[derive(Parser)]
#[command(name = "traceweld")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a record buffer and print its segment structure
    Scan {
        /// Path to the record buffer file
        file: PathBuf,

        /// Skip sample materialization (metadata-only pass)
        #[arg(long)]
        skip_samples: bool,

        /// Extract timing quality and calibration classification
        #[arg(short, long)]
        details: bool,

        /// JSON file with auxiliary field descriptors
        /// (array of {"blockette", "offset", "len"})
        #[arg(long)]
        fields: Option<PathBuf>,

        /// Nominal record length, if the stream is fixed-length
        #[arg(short, long)]
        record_length: Option<u32>,

        /// Only include records from this station
        #[arg(short, long)]
        station: Option<String>,

        /// Only include records from this channel
        #[arg(short, long)]
        channel: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Scan {
            file,
            skip_samples,
            details,
            fields,
            record_length,
            station,
            channel,
            format,
        } => {
            let opts = commands::scan::ScanArgs {
                file,
                skip_samples,
                details,
                fields,
                record_length,
                station,
                channel,
                format,
                verbose: cli.verbose,
            };
            commands::scan::run(&opts)?;
        }
        Commands::Version => {
            println!("traceweld {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
