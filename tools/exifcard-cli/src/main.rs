//! exifcard CLI: compose photo cards from the command line.
//!
//! Usage:
//!   exifcard compose <INPUT> [OPTIONS]   Compose a card and write it to disk
//!   exifcard info <INPUT>                Show the metadata a card would print
//!   exifcard check                       Show the effective configuration
//!   exifcard init-config                 Write the default config file

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "exifcard",
    about = "Frame photos on a padded card with their camera settings",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a card from a photo
    Compose(ComposeArgs),

    /// Show the metadata fields derived from a photo
    Info {
        /// Photo to inspect
        input: PathBuf,

        /// Also list every decoded tag
        #[arg(long)]
        tags: bool,
    },

    /// Show the effective configuration and font
    Check,

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ComposeArgs {
    /// Photo to compose
    pub input: PathBuf,

    /// Output file or directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Padding around the photo in pixels (0-100)
    #[arg(short, long)]
    pub padding: Option<u32>,

    /// Hide all metadata text
    #[arg(long)]
    pub no_metadata: bool,

    /// Hide the camera line
    #[arg(long)]
    pub hide_camera: bool,

    /// Hide the exposure settings line
    #[arg(long)]
    pub hide_settings: bool,

    /// Bounding box width for fit-within scaling
    #[arg(long, conflicts_with = "half")]
    pub max_width: Option<u32>,

    /// Bounding box height for fit-within scaling
    #[arg(long, conflicts_with = "half")]
    pub max_height: Option<u32>,

    /// Scale the photo to exactly half size instead of fitting the box
    #[arg(long)]
    pub half: bool,

    /// Output format: jpeg|png
    #[arg(long)]
    pub format: Option<String>,

    /// TrueType font for the metadata text
    #[arg(long)]
    pub font: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = exifcard_common::config::AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    exifcard_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Compose(args) => commands::compose::run(config, args).await,
        Commands::Info { input, tags } => commands::info::run(input, tags).await,
        Commands::Check => commands::check::run(&config),
        Commands::InitConfig { force } => commands::init_config::run(force),
    }
}
