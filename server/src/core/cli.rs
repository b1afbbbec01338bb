use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DB_PATH, ENV_DEBUG, ENV_HOST, ENV_MAX_FILTERS, ENV_PORT, ENV_SEED_DEMO,
};

#[derive(Parser)]
#[command(name = "relquery")]
#[command(version, about = "Filterable REST listings over SQLite", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (verbose filter compilation logs)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// SQLite database file (defaults to the data directory)
    #[arg(long, global = true, env = ENV_DB_PATH)]
    pub db_path: Option<PathBuf>,

    /// Insert demo invoices when the database is empty
    #[arg(long, global = true, env = ENV_SEED_DEMO)]
    pub seed_demo: bool,

    /// Maximum number of filters per request
    #[arg(long, global = true, env = ENV_MAX_FILTERS)]
    pub max_filters: Option<usize>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Print the filters accepted by each endpoint and exit
    Filters,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub seed_demo: bool,
    pub max_filters: Option<usize>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            debug: cli.debug,
            config: cli.config,
            db_path: cli.db_path,
            seed_demo: cli.seed_demo,
            max_filters: cli.max_filters,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
}
