use std::path::PathBuf;

use clap::{Parser, Subcommand};
use spendview_core::config::SettingsOverrides;
use spendview_core::ChartVariant;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Receipt expense dashboard")]
pub struct Config {
    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Endpoint issuing presigned upload credentials
    #[arg(long, global = true)]
    pub presign_url: Option<String>,

    /// Endpoint returning category totals
    #[arg(long, global = true)]
    pub summary_url: Option<String>,

    /// Wait between a stored upload and the summary refresh (milliseconds)
    #[arg(long, global = true)]
    pub settle_delay_ms: Option<u64>,

    /// Treat a non-2xx storage response as a failed upload
    #[arg(long, global = true)]
    pub strict_transfer: bool,

    /// Also write every rendered chart configuration as JSON to this file
    #[arg(long, global = true)]
    pub json_out: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch the category totals and draw the chart
    Show {
        /// Chart variant to draw (radar or pie)
        #[arg(short, long)]
        variant: Option<ChartVariant>,
    },
    /// Upload a receipt, wait for processing and redraw the chart
    Upload {
        /// Receipt file to upload
        file: PathBuf,

        /// Chart variant to draw (radar or pie)
        #[arg(short, long)]
        variant: Option<ChartVariant>,
    },
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Flags that override values from the config file
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            presign_url: self.presign_url.clone(),
            summary_url: self.summary_url.clone(),
            strict_transfer: self.strict_transfer,
            settle_delay_ms: self.settle_delay_ms,
        }
    }

    /// Subcommand to run; `show` when none was given
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Show { variant: None })
    }

    /// Variant requested on the command line, if any
    pub fn variant(&self) -> Option<ChartVariant> {
        match self.command() {
            Command::Show { variant } | Command::Upload { variant, .. } => variant,
        }
    }
}
