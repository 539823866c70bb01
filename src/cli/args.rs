use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "owm-collector")]
#[command(about = "Adaptive weather data collector for the OpenWeatherMap API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a collection session against the configured API
    Collect {
        #[arg(short, long, default_value = "config.json", help = "Configuration file")]
        config: PathBuf,

        #[arg(long, help = "Override the configured request budget")]
        max_requests: Option<u32>,

        #[arg(long, default_value = "false", help = "Suppress progress output")]
        silent: bool,
    },

    /// Load a configuration file and resolve its secret without collecting
    CheckConfig {
        #[arg(short, long, default_value = "config.json", help = "Configuration file")]
        config: PathBuf,
    },

    /// Display statistics for a stored snapshot file
    Info {
        #[arg(short, long, help = "Snapshot file written by a collection run")]
        file: PathBuf,

        #[arg(short, long, default_value = "5")]
        sample: usize,
    },
}
