//! Command-line argument parsing for Stocklens.
//!
//! Uses clap derive with one subcommand per operator surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// An AI-assisted inventory Q&A and detection logging tool.
#[derive(Parser, Debug)]
#[command(name = "stocklens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Generation provider to use: "gemini" or "mock" (overrides config)
    #[arg(long, value_name = "PROVIDER")]
    pub llm: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operator subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a free-text question about the inventory
    Ask {
        /// The question text
        question: String,

        /// Also print the final query text sent to the store
        #[arg(long)]
        show_sql: bool,
    },

    /// Run detection on an image file and record the counts
    Detect {
        /// Path to the image file
        image: PathBuf,
    },

    /// Print the current inventory
    Stock,

    /// Print recent inventory log entries
    Log {
        /// Maximum number of entries to print
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }
}
