//! Command-line parsing and command routing.

use clap::{ArgGroup, Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

use crate::commands::{self, PositionSource};
use crate::config::RecwaveConfig;
use crate::logging;

/// Waveform normalization and time/pixel mapping for audio recordings
#[derive(Parser)]
#[command(name = "recwave")]
#[command(version)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/recwave/recwave.toml\n    Logs:               ~/.local/state/recwave/recwave.log.*"
)]
struct Cli {
    /// Use this config file instead of ~/.config/recwave/recwave.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a gain series into pixel half-heights
    ///
    /// FILE is either a 16-bit PCM WAV file or a text file of integer gains
    /// separated by whitespace or commas. Prints one height per line.
    #[command(visible_alias = "n")]
    Normalize {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Half-height of the drawing surface in pixels
        #[arg(long, value_name = "PX", allow_negative_numbers = true)]
        half_height: Option<i32>,

        /// Print percentile and scaling statistics before the heights
        #[arg(long)]
        stats: bool,
    },

    /// Extract per-frame gains from a WAV file
    Frames {
        #[arg(value_name = "WAV")]
        file: PathBuf,

        /// Samples per frame
        #[arg(long, value_name = "N")]
        frame_size: Option<usize>,
    },

    /// Print the pixels-per-second density for a record
    Density {
        /// Record duration in seconds
        #[arg(long, value_name = "SECS", allow_negative_numbers = true)]
        duration: f64,

        /// Pixel budget long records are fitted into
        #[arg(long, value_name = "PX", allow_negative_numbers = true)]
        budget: Option<f64>,
    },

    /// Print grid marks as `pixel MM:SS` rows
    Grid {
        /// Record duration in seconds
        #[arg(long, value_name = "SECS", allow_negative_numbers = true)]
        duration: f64,

        /// Visible width in pixels (defaults to the whole record)
        #[arg(long, value_name = "PX")]
        width: Option<u32>,

        /// Seconds between marks (defaults to a readable step)
        #[arg(long, value_name = "SECS")]
        step: Option<u64>,
    },

    /// Convert a playback time or seek pixel into a consistent position
    Position(PositionArgs),

    /// Show the effective configuration
    Config {
        /// Write the default config file if none exists
        #[arg(long)]
        init: bool,
    },

    /// Show recent log entries
    Logs,

    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["time", "pixel"])))]
struct PositionArgs {
    /// Record duration in seconds
    #[arg(long, value_name = "SECS", allow_negative_numbers = true)]
    duration: f64,

    /// Playback time in milliseconds
    #[arg(long, value_name = "MS")]
    time: Option<u64>,

    /// Seek offset in pixels
    #[arg(long, value_name = "PX")]
    pixel: Option<u32>,
}

impl PositionArgs {
    fn source(&self) -> PositionSource {
        match (self.time, self.pixel) {
            (Some(millis), _) => PositionSource::Time(millis),
            (None, Some(pixel)) => PositionSource::Pixel(pixel),
            (None, None) => PositionSource::Time(0),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<RecwaveConfig> {
    match path {
        Some(path) => RecwaveConfig::load_from(path),
        None => RecwaveConfig::load(),
    }
}

/// Runs the application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If the configuration cannot be loaded
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging or config
    match &cli.command {
        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "recwave", &mut io::stdout());
            return Ok(());
        }
        Commands::Logs => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    logging::init_logging()?;

    let config = load_config(cli.config_file.as_ref()).map_err(|e| {
        tracing::error!("Failed to load configuration: {e}");
        e
    })?;

    match cli.command {
        Commands::Normalize {
            file,
            half_height,
            stats,
        } => commands::handle_normalize(&file, half_height, stats, &config)?,
        Commands::Frames { file, frame_size } => {
            commands::handle_frames(&file, frame_size, &config)?
        }
        Commands::Density { duration, budget } => {
            commands::handle_density(duration, budget, &config)?
        }
        Commands::Grid {
            duration,
            width,
            step,
        } => commands::handle_grid(duration, width, step, &config)?,
        Commands::Position(args) => {
            commands::handle_position(args.duration, args.source(), &config)?
        }
        Commands::Config { init } => commands::handle_config(&config, init)?,
        Commands::Completions { .. } | Commands::Logs => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
