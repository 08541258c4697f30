use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docchat::server::{self, AppState};
use docchat::{AppConfig, DocumentAnswerer, OllamaClientBuilder};

/// docchat - ask questions about a local document through Ollama
#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "Upload a document and ask questions answered by a local LLM")]
#[command(version)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8006)]
    port: u16,

    /// Directory holding the web frontend
    #[arg(long, default_value = "static", value_name = "DIR")]
    static_dir: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    // The blocking HTTP client must be created outside the async runtime.
    let client = OllamaClientBuilder::new()
        .base_url(config.ollama_base_url.clone())
        .build()
        .context("Failed to create Ollama client")?;
    let answerer = Arc::new(DocumentAnswerer::new(Arc::new(client), &config));

    let state = AppState::new(answerer);
    let router = server::router(state, &cli.static_dir);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cli.host, cli.port))?;

    tracing::info!(
        ollama = %config.ollama_base_url,
        default_model = %config.default_model,
        "starting docchat"
    );

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?
        .block_on(server::serve(router, addr))
}
