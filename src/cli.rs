use anyhow::{Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Batchview - web viewer for structured device logs
#[derive(Parser, Debug)]
#[command(name = "bview")]
#[command(version)]
#[command(about = "Web viewer for structured device logs")]
#[command(long_about = "Batchview (bview) serves a directory of .txt device logs over HTTP.

Each log is split into typed batches (type, time, subtype, action, location)
and rendered as a filterable HTML table. Filters are plain query parameters;
open the listing page for the supported ones.

Quick start:
  1. Run 'bview --init' to generate a config file
  2. Edit .batchview.toml to point log_dir at your logs
  3. Run 'bview' and open http://localhost:19007")]
pub struct Cli {
    /// Path to config file (defaults to .batchview.toml)
    #[arg(short, long, default_value = ".batchview.toml")]
    pub config: String,

    /// Directory of .txt log files (overrides config file setting)
    #[arg(short = 'd', long = "dir")]
    pub log_dir: Option<PathBuf>,

    /// Port to listen on (overrides config file setting)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable debug logging (same as RUST_LOG=debug)
    #[arg(long)]
    pub debug: bool,

    /// Initialize a new .batchview.toml config file
    #[arg(long)]
    pub init: bool,
}

/// Write a starter config file for --init.
pub fn init_config(config_path: &str) -> Result<()> {
    if Path::new(config_path).exists() {
        bail!("Config file '{config_path}' already exists");
    }

    Config::default().save(config_path)?;
    println!("Created {config_path}");
    println!("Edit it to point log_dir at your logs, then run 'bview'.");
    Ok(())
}
