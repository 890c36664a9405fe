//! Emotrace CLI — replay frame logs and manage detector profiles.
//!
//! Usage:
//!   emotrace replay <FRAMES>     Run the emotion engine over a frame log
//!   emotrace validate <PROFILE>  Validate a detector profile
//!   emotrace init <PATH>         Write the default detector profile

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use emotrace_common::{AppConfig, LoggingConfig};
use emotrace_face_model::TimestampPolicy;

mod commands;

#[derive(Parser)]
#[command(
    name = "emotrace",
    about = "Debounced emotion detection from facial action units",
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
    /// Replay a recorded frame log through the emotion engine
    Replay {
        /// Path to a JSONL frame log
        frames: PathBuf,

        /// Detector profile (defaults to the configured profile, then built-in defaults)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,

        /// Override the profile's handling of out-of-order timestamps
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },

    /// Validate a detector profile
    Validate {
        /// Path to the profile JSON file
        path: PathBuf,
    },

    /// Write the default detector profile
    Init {
        /// Output path for the profile
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Record the profile as the default in the app config
        #[arg(long)]
        set_default: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Reject,
    Clamp,
}

impl From<PolicyArg> for TimestampPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Reject => TimestampPolicy::Reject,
            PolicyArg::Clamp => TimestampPolicy::Clamp,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let logging = if cli.verbose {
        LoggingConfig {
            level: "debug".to_string(),
            ..config.logging.clone()
        }
    } else {
        config.logging.clone()
    };
    emotrace_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay {
            frames,
            profile,
            json,
            policy,
        } => commands::replay::run(&config, frames, profile, json, policy.map(Into::into)),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Init {
            path,
            force,
            set_default,
        } => commands::init::run(config, path, force, set_default),
    }
}
