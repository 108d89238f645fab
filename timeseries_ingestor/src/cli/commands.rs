use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::layout::AxisMode;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every configured endpoint and write the chart document
    Fetch {
        /// Path to the chart config file (chart.toml)
        #[arg(short, long)]
        config: PathBuf,

        /// Comma-separated endpoints overriding the config (e.g. "/fans/total,/fans/twitter")
        #[arg(long)]
        endpoints: Option<String>,

        /// Axis mode overriding the config: shared or per-series
        #[arg(long)]
        axis: Option<AxisMode>,

        /// Write the JSON document to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a saved API response envelope and print its points as JSON
    Decode {
        /// Path to the JSON response file
        #[arg(short, long)]
        input: PathBuf,
    },
}
