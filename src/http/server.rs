use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use super::{Request, Response, handler};
use crate::config::Config;

/// HTTP server for the log listing and viewer pages. One task per
/// connection; every request segments and filters its own fresh batch
/// sequence, so connections share nothing but the immutable config.
pub struct Server {
    listener: TcpListener,
    config: Arc<Config>,
}

impl Server {
    /// Bind to the configured host and port. Port 0 picks a free port;
    /// use `local_addr` to find out which.
    pub async fn bind(config: Config) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        Ok(Self {
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the task is dropped or accept fails.
    pub async fn run(self) -> Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            let config = Arc::clone(&self.config);
            tokio::spawn(async move {
                if let Err(err) = handle_connection(stream, &config).await {
                    tracing::debug!(error = %err, %peer, "connection error");
                }
            });
        }
    }
}

async fn handle_connection(stream: TcpStream, config: &Config) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    // Drain the header section; GET requests carry no body we care about.
    let mut header = String::new();
    loop {
        header.clear();
        if reader.read_line(&mut header).await? == 0 {
            break;
        }
        if header == "\r\n" || header == "\n" {
            break;
        }
    }

    let response = match Request::parse(request_line.trim_end()) {
        Ok(request) => {
            tracing::info!(method = %request.method, path = %request.path, "request");
            handler::handle(&request, config)
        }
        Err(err) => {
            tracing::warn!(error = %err, "unparsable request");
            Response::text(400, "bad request")
        }
    };

    write_half.write_all(&response.to_bytes()).await?;
    write_half.shutdown().await?;
    Ok(())
}
