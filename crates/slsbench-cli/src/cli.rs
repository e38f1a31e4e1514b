//! Command-line definition

use crate::config::{ConfigError, Settings};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// slsbench: turn an OpenAPI document into a benchmark scenario
#[derive(Parser, Debug)]
#[command(name = "slsbench", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./slsbench.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Assign semantic hints to the leaf fields of an OpenAPI document
    Enrich {
        /// OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a scenario graph from an (enriched) OpenAPI document
    Scenario {
        /// OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the execution order of a saved scenario
    Order {
        /// Scenario JSON file
        #[arg(short, long)]
        scenario: PathBuf,
    },
}

impl Cli {
    /// Settings from the config file with flag overrides applied
    pub fn settings(&self, working_dir: &Path) -> Result<Settings, ConfigError> {
        let mut settings = Settings::discover(self.config.as_deref(), working_dir)?;
        if let Some(level) = &self.log_level {
            settings = settings.with_log_level(level.clone());
        }
        if self.log_json {
            settings = settings.with_log_json(true);
        }
        match &self.command {
            Command::Enrich {
                output: Some(dir), ..
            }
            | Command::Scenario {
                output: Some(dir), ..
            } => settings = settings.with_output_dir(dir.clone()),
            _ => {}
        }
        Ok(settings)
    }
}
