mod cli;
mod config;
mod http;
mod log;
mod render;

use cli::{Cli, init_config};
use config::Config;
use http::Server;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Handle --init flag
    if cli.init {
        return init_config(&cli.config);
    }

    let mut config = Config::load(&cli.config)?;
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = log_dir;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    init_logging(cli.debug, config.log_level.as_deref());

    let server = Server::bind(config).await?;
    let addr = server.local_addr()?;
    tracing::info!(%addr, "listening");
    println!("Listening at http://{addr}");

    server.run().await
}

/// Priority: RUST_LOG env var > CLI --debug flag > config level > "info".
fn init_logging(debug_flag: bool, config_level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}
