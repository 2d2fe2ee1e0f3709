use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DATASET, ENV_HOST, ENV_PORT};

#[derive(Parser)]
#[command(name = "filmdex")]
#[command(version, about = "Searchable movie catalog server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to the SQLite movie dataset
    #[arg(long, short = 'd', global = true, env = ENV_DATASET)]
    pub dataset: Option<PathBuf>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dataset: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        dataset: cli.dataset,
        config: cli.config,
    };
    (config, cli.command)
}
