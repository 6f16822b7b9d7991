//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use common::config::{default_cache_path, ConfigResolver, CONFIG_FILE_NAME};

#[derive(Debug, Parser)]
#[command(name = "mongo-mcp", version, about = "Connect to MongoDB and run a bounded find")]
pub struct Cli {
    /// Configuration file (JSON).
    #[arg(long, global = true, value_name = "PATH", default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Cache file location (defaults to the per-user config directory).
    #[arg(long, global = true, value_name = "PATH", env = "MONGO_MCP_CACHE_PATH")]
    pub cache_path: Option<PathBuf>,

    /// Neither read nor write the cache.
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Fall back to mongodb://localhost:27017 / mydatabase when nothing else is configured.
    #[arg(long, global = true)]
    pub use_defaults: bool,

    /// Attach the effective configuration (password masked) to every response.
    #[arg(long, global = true)]
    pub echo_config: bool,

    /// Debug logging unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Connect and ping (default).
    Connect,
    /// Run the configured find, connecting first.
    Find,
    /// Connect, then find.
    Run,
    /// Print which configuration source was used and why others were skipped.
    Resolve,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Connect)
    }

    /// Resolver over the process environment honouring the cache flags.
    pub fn resolver(&self) -> ConfigResolver {
        let cache_path = if self.no_cache {
            None
        } else {
            self.cache_path.clone().or_else(default_cache_path)
        };
        ConfigResolver::from_process(self.config.clone())
            .with_cache_path(cache_path)
            .with_defaults(self.use_defaults)
    }
}
