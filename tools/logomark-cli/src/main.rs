//! Logomark CLI: stamp a logo onto images from the command line.
//!
//! Usage:
//!   logomark compose <SOURCE> --logo <LOGO>    Render one image
//!   logomark batch <SOURCES>... --logo <LOGO>  Render a numbered set
//!   logomark layout <SOURCE> --logo <LOGO>     Print the resolved geometry
//!   logomark sizes                             List output size presets
//!   logomark config                            Show or write the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use logomark_common::config::AppConfig;

mod acquire;
mod commands;

use commands::PlacementArgs;

#[derive(Parser)]
#[command(
    name = "logomark",
    about = "Place a logo consistently across a set of images",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single image with the logo applied
    Compose {
        /// Source image
        source: PathBuf,

        /// Logo image
        #[arg(short, long)]
        logo: PathBuf,

        /// Output file (defaults to 01.png in the configured output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the bounded preview to this path
        #[arg(long)]
        preview: Option<PathBuf>,

        #[command(flatten)]
        placement: PlacementArgs,
    },

    /// Render every source with the same logo and placement
    Batch {
        /// Source images, in output order
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Logo image
        #[arg(short, long)]
        logo: PathBuf,

        /// Output directory (defaults to the configured output directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Do not write manifest.json next to the outputs
        #[arg(long)]
        no_manifest: bool,

        #[command(flatten)]
        placement: PlacementArgs,
    },

    /// Print the canvas geometry and logo rectangle as JSON
    Layout {
        /// Source image
        source: PathBuf,

        /// Logo image
        #[arg(short, long)]
        logo: PathBuf,

        #[command(flatten)]
        placement: PlacementArgs,
    },

    /// List output size presets
    Sizes,

    /// Show the effective configuration
    Config {
        /// Write the effective configuration back to disk
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    logomark_common::logging::init_logging(&logging);

    config.validate()?;

    match cli.command {
        Commands::Compose {
            source,
            logo,
            output,
            preview,
            placement,
        } => commands::compose::run(&config, source, logo, output, preview, placement).await,
        Commands::Batch {
            sources,
            logo,
            output_dir,
            no_manifest,
            placement,
        } => {
            commands::batch::run(&config, sources, logo, output_dir, !no_manifest, placement)
                .await
        }
        Commands::Layout {
            source,
            logo,
            placement,
        } => commands::layout::run(&config, source, logo, placement),
        Commands::Sizes => commands::sizes::run(),
        Commands::Config { write } => commands::config::run(&config, cli.config, write),
    }
}
