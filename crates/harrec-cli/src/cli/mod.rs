//! CLI for harrec.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use harrec_core::config;
use std::path::PathBuf;

use commands::{run_convert, run_summary, ConvertArgs};

/// Top-level CLI for harrec.
#[derive(Debug, Parser)]
#[command(name = "harrec")]
#[command(about = "harrec: turn captured DevTools network events into HAR archives", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Convert one or more event logs (JSON Lines) into a single HAR file, one page per log.
    Convert {
        /// Event log files, in page order.
        #[arg(required = true, value_name = "LOG")]
        logs: Vec<PathBuf>,

        /// Page URL of the first log. Defaults to the URL of its first top-level request.
        #[arg(long)]
        url: Option<String>,

        /// Output directory (overrides `output_dir` from the config file).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Write compact JSON even if the config asks for pretty output.
        #[arg(long)]
        compact: bool,
    },

    /// Replay an event log and list the captured requests.
    Summary {
        /// Event log file.
        log: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Convert {
                logs,
                url,
                out,
                compact,
            } => {
                let out_dir = match out.or_else(|| cfg.output_dir.clone()) {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                let args = ConvertArgs {
                    logs,
                    page_url: url,
                    out_dir,
                    pretty: cfg.pretty && !compact,
                };
                run_convert(&cfg, args).await?;
            }
            CliCommand::Summary { log } => run_summary(&log).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
