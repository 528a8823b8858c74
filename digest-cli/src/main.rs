//! Digest CLI - PDF document summarization
//!
//! A command-line interface for the Digest summarization service: run the
//! HTTP server, or summarize and analyze documents directly.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use digest_core::style::SummaryStyle;
use digest_core::Config;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Digest - PDF document summarization
#[derive(Parser)]
#[command(name = "digest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model to use (overrides config)
    #[arg(short, long, global = true, env = "DIGEST_MODEL")]
    model: Option<String>,

    /// Server port (overrides config)
    #[arg(long, global = true, env = "DIGEST_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info", env = "DIGEST_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Digest HTTP server
    Serve,

    /// Summarize a PDF file and print the result
    Summarize {
        /// Path to the PDF file
        file: PathBuf,

        /// Summary style (concise, detailed, bullet_points, academic, eli5)
        #[arg(short, long, default_value = "concise")]
        style: String,

        /// Output format: text or markdown
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Analyze a PDF file's text without summarizing
    Analyze {
        /// Path to the PDF file
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available summary styles
    Styles,

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Initialize default configuration
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    // Load configuration
    let mut config = if let Some(path) = &cli.config {
        Config::load_from_file(path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Apply CLI overrides
    if let Some(model) = &cli.model {
        config.model.default_model = model.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Ensure digest directory exists
    Config::ensure_dirs()?;

    match cli.command {
        Commands::Serve => commands::serve::run(config).await,
        Commands::Summarize {
            file,
            style,
            format,
        } => {
            let style = SummaryStyle::parse_or_default(&style);
            commands::summarize::run(config, file, style, &format).await
        }
        Commands::Analyze { file, json } => commands::analyze::run(config, file, json).await,
        Commands::Styles => commands::styles::run(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(config),
            ConfigCommands::Init { force } => commands::config::init(force),
        },
    }
}
